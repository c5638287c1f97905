//! Dump parameters and verbosity levels.

use std::fmt::{self, Write};

/// Dump verbosity. Each level includes what the previous one shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DumpType {
    /// One line per object.
    #[default]
    Line,
    /// All attributes.
    Details,
    /// All attributes plus statistics.
    Stats,
}

impl DumpType {
    /// Name of the operations table hook serving this level.
    pub fn hook_name(self) -> &'static str {
        match self {
            Self::Line => "dump_line",
            Self::Details => "dump_details",
            Self::Stats => "dump_stats",
        }
    }
}

/// Output sink and settings for dumping objects.
///
/// Dump hooks write through [`dump`](Self::dump) (continues the current
/// line) and [`dump_line`](Self::dump_line) (starts a new, prefixed line),
/// or with `write!` via the [`fmt::Write`] impl.
#[derive(Debug, Clone, Default)]
pub struct DumpParams {
    kind: DumpType,
    prefix: usize,
    buf: String,
    lines: usize,
}

impl DumpParams {
    /// Create parameters for the given verbosity.
    pub fn new(kind: DumpType) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Indent every new line by `prefix` spaces.
    pub fn with_prefix(mut self, prefix: usize) -> Self {
        self.prefix = prefix;
        self
    }

    /// Requested verbosity.
    pub fn kind(&self) -> DumpType {
        self.kind
    }

    /// Append to the current line.
    pub fn dump(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = self.buf.write_fmt(args);
    }

    /// Start a new line (prefix applied) and append to it.
    pub fn dump_line(&mut self, args: fmt::Arguments<'_>) {
        self.new_line();
        self.dump(args);
    }

    fn new_line(&mut self) {
        self.lines += 1;
        self.buf.extend(std::iter::repeat_n(' ', self.prefix));
    }

    /// Number of lines started so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Text produced so far.
    pub fn output(&self) -> &str {
        &self.buf
    }

    /// Consume the parameters, returning the text.
    pub fn into_output(self) -> String {
        self.buf
    }
}

impl Write for DumpParams {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

//! Text and JSON rendering of objects.
//!
//! Text output reuses the object dumpers; JSON output builds one object per
//! item, leaving out absent attributes.

mod json;

pub use json::{JsonBuilder, JsonOutput};

use std::io::Write;

use serde_json::{Value, json};

use crate::ancillary::Ucred;
use crate::genl::{
    FAMILY_ATTR_HDRSIZE, FAMILY_ATTR_ID, FAMILY_ATTR_MAXATTR, FAMILY_ATTR_VERSION, GenlFamily,
};
use crate::object::DumpType;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Show statistics.
    pub stats: bool,
    /// Show extra details.
    pub details: bool,
    /// Pretty print (for JSON).
    pub pretty: bool,
}

impl OutputOptions {
    /// Dump level matching these options.
    pub fn dump_type(&self) -> DumpType {
        if self.stats {
            DumpType::Stats
        } else if self.details {
            DumpType::Details
        } else {
            DumpType::Line
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Trait for types that can be printed.
pub trait Printable {
    /// Print as plain text.
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()>;

    /// Convert to JSON value.
    fn to_json(&self) -> Value;

    /// Print in the specified format.
    fn print<W: Write>(
        &self,
        w: &mut W,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> std::io::Result<()> {
        match format {
            OutputFormat::Text => self.print_text(w, opts),
            OutputFormat::Json => {
                let mut out = JsonOutput::new(&mut *w);
                if opts.pretty {
                    out = out.pretty();
                }
                out.write(&self.to_json())
            }
        }
    }
}

impl Printable for GenlFamily {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        w.write_all(self.dump(opts.dump_type()).as_bytes())
    }

    fn to_json(&self) -> Value {
        let present = |attr, value: u32| self.has(attr).then_some(u64::from(value));

        let ops: Vec<Value> = self
            .family_ops()
            .iter()
            .map(|op| json!({ "id": op.id, "flags": op.flags.names() }))
            .collect();
        let groups: Vec<Value> = self
            .groups()
            .iter()
            .map(|grp| json!({ "id": grp.id, "name": grp.name }))
            .collect();

        JsonBuilder::new()
            .u64_opt("id", present(FAMILY_ATTR_ID, self.id()))
            .string_opt("name", self.name())
            .u64_opt("version", present(FAMILY_ATTR_VERSION, self.version()))
            .u64_opt("hdrsize", present(FAMILY_ATTR_HDRSIZE, self.hdrsize()))
            .u64_opt("maxattr", present(FAMILY_ATTR_MAXATTR, self.maxattr()))
            .array("ops", ops)
            .array("groups", groups)
            .build()
    }
}

impl Printable for Ucred {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        writeln!(w, "{}", self)
    }

    fn to_json(&self) -> Value {
        JsonBuilder::new()
            .u64("pid", self.pid().into())
            .u64("uid", self.uid().into())
            .u64("gid", self.gid().into())
            .build()
    }
}

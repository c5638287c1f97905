//! JSON output helpers.

use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

/// Writes one JSON document per line.
pub struct JsonOutput<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonOutput<W> {
    /// Create a new JSON output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Enable pretty printing.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Write a serializable value followed by a newline.
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> std::io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)?;
        } else {
            serde_json::to_writer(&mut self.writer, value)?;
        }
        writeln!(self.writer)
    }

    /// Get the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Builder for JSON objects with optional fields.
#[derive(Debug, Default)]
pub struct JsonBuilder {
    map: Map<String, Value>,
}

impl JsonBuilder {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string field.
    pub fn string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.map.insert(key.to_string(), Value::String(value.into()));
        self
    }

    /// Add a string field if the value is Some.
    pub fn string_opt(mut self, key: &str, value: Option<impl Into<String>>) -> Self {
        if let Some(v) = value {
            self.map.insert(key.to_string(), Value::String(v.into()));
        }
        self
    }

    /// Add a u64 field.
    pub fn u64(mut self, key: &str, value: u64) -> Self {
        self.map.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a u64 field if the value is Some.
    pub fn u64_opt(self, key: &str, value: Option<u64>) -> Self {
        match value {
            Some(v) => self.u64(key, v),
            None => self,
        }
    }

    /// Add an array field.
    pub fn array(mut self, key: &str, value: Vec<Value>) -> Self {
        self.map.insert(key.to_string(), Value::Array(value));
        self
    }

    /// Build the JSON value.
    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}

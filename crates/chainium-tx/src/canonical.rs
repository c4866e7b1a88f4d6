//! Canonical JSON encoding.
//!
//! The compact form is the signing input: struct fields in declaration
//! order, no whitespace, decimals as exact literals. Strings escape
//! `<`, `>`, `&`, U+2028 and U+2029 as lowercase `\uXXXX` sequences,
//! matching the encoding other ledger clients sign. The indented form
//! holds the same content with four-space indentation and is meant for
//! people, never for signing.

use std::io;

use chainium_types::{ChainiumError, Result};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

use crate::tx::Tx;

/// Indentation unit of the human-readable form.
const INDENT: &[u8] = b"    ";

// ---------------------------------------------------------------------------
// Formatter
// ---------------------------------------------------------------------------

/// Wraps a formatter and escapes the HTML-significant and line
/// separator characters inside strings.
struct EscapingFormatter<F>(F);

/// Returns the escape sequence of `c`, if it has one.
fn escape_of(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("\\u003c"),
        '>' => Some("\\u003e"),
        '&' => Some("\\u0026"),
        '\u{2028}' => Some("\\u2028"),
        '\u{2029}' => Some("\\u2029"),
        _ => None,
    }
}

impl<F: Formatter> Formatter for EscapingFormatter<F> {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if let Some(escape) = escape_of(c) {
                self.0.write_string_fragment(writer, &fragment[start..i])?;
                writer.write_all(escape.as_bytes())?;
                start = i + c.len_utf8();
            }
        }
        self.0.write_string_fragment(writer, &fragment[start..])
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn write_with<T, F>(value: &T, formatter: F) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, EscapingFormatter(formatter));
    value.serialize(&mut serializer).map_err(serialization_error)?;
    Ok(buf)
}

/// Serializes `value` compactly, or with four-space indentation when
/// `indent` is set.
pub fn to_json<T: Serialize + ?Sized>(value: &T, indent: bool) -> Result<String> {
    let bytes = if indent {
        write_with(value, PrettyFormatter::with_indent(INDENT))?
    } else {
        write_with(value, CompactFormatter)?
    };

    String::from_utf8(bytes).map_err(|e| ChainiumError::SerializationError {
        reason: format!("encoder produced invalid UTF-8: {e}"),
    })
}

fn serialization_error(e: serde_json::Error) -> ChainiumError {
    ChainiumError::SerializationError {
        reason: e.to_string(),
    }
}

impl Tx {
    /// Returns the canonical JSON text that gets signed.
    pub fn to_canonical_json(&self) -> Result<String> {
        to_json(self, false)
    }

    /// Returns the transaction as JSON: canonical, or indented for display.
    pub fn to_json(&self, indent: bool) -> Result<String> {
        to_json(self, indent)
    }

    /// Parses a transaction from its JSON text.
    ///
    /// Both the compact and the indented forms are accepted.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ChainiumError::SerializationError {
            reason: format!("invalid transaction JSON: {e}"),
        })
    }
}

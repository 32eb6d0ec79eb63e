//! XML reader events

/// Events emitted by the streaming XML reader
///
/// Only element names survive tokenization; attributes and text content are
/// scanned for well-formedness and then dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Opening tag, or the first half of a self-closing tag
    Start(String),
    /// Closing tag, or the second half of a self-closing tag
    End(String),
    /// Non-whitespace character data or a CDATA section
    Text,
}

//! Streaming XML reader
//!
//! Pulls one [`Event`] at a time from a byte slice. The reader checks
//! well-formedness as it goes (balanced tags, a single top-level element,
//! quoted attributes, known entity references) but keeps nothing besides
//! element names.

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::lexer::Cursor;
use crate::xml::event::Event;

/// Configuration for the XML reader
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Config {
    /// Create a config without a size limit
    pub const fn unlimited() -> Self {
        Self { max_size: 0 }
    }

    /// Create a config with a specific size limit
    pub const fn new(max_size: usize) -> Self {
        Self { max_size }
    }
}

/// Pull-based XML tokenizer
#[derive(Debug)]
pub struct Reader<'a> {
    cursor: Cursor<'a>,
    config: Config,
    /// Names of the elements currently open, innermost last
    open: Vec<String>,
    /// End event owed for a self-closing tag
    pending_end: Option<String>,
    seen_root: bool,
    started: bool,
    failed: bool,
}

impl<'a> Reader<'a> {
    /// Create a new reader with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new reader with custom configuration
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            open: Vec::new(),
            pending_end: None,
            seen_root: false,
            started: false,
            failed: false,
        }
    }

    /// Read the next event; `Ok(None)` marks a clean end of input.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        if !self.started {
            self.started = true;
            self.check_size()?;
            if self.cursor.starts_with(b"\xEF\xBB\xBF") {
                self.cursor.advance_by(3);
            }
        }

        if let Some(name) = self.pending_end.take() {
            return Ok(Some(Event::End(name)));
        }

        loop {
            if self.open.is_empty() {
                self.cursor.skip_whitespace();
            }

            let Some(b) = self.cursor.current() else {
                return self.finish();
            };

            if b != b'<' {
                if self.open.is_empty() {
                    return Err(self.error_here(
                        ErrorKind::InvalidToken,
                        "text outside the root element",
                    ));
                }
                if self.scan_text()? {
                    return Ok(Some(Event::Text));
                }
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                if self.open.is_empty() {
                    return Err(self.error_here(
                        ErrorKind::InvalidToken,
                        "CDATA outside the root element",
                    ));
                }
                self.cursor.advance_by(9);
                self.skip_until(b"]]>")?;
                return Ok(Some(Event::Text));
            }

            if self.cursor.starts_with(b"<!") {
                if !self.open.is_empty() {
                    return Err(self.error_here(
                        ErrorKind::InvalidToken,
                        "declaration inside an element",
                    ));
                }
                self.skip_declaration()?;
                continue;
            }

            if self.cursor.starts_with(b"</") {
                return self.read_end_tag().map(Some);
            }

            return self.read_start_tag().map(Some);
        }
    }

    fn finish(&self) -> Result<Option<Event>> {
        match self.open.last() {
            Some(name) => Err(Error::with_message(
                ErrorKind::UnexpectedEof,
                Span::at(self.cursor.position()),
                format!("unclosed element <{name}>"),
            )),
            None => Ok(None),
        }
    }

    fn check_size(&self) -> Result<()> {
        let size = self.cursor.remaining().len();
        if self.config.max_size > 0 && size > self.config.max_size {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Span::empty(),
            ));
        }
        Ok(())
    }

    fn read_start_tag(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        // cursor currently at '<'
        self.cursor.advance();

        if self.open.is_empty() && self.seen_root {
            return Err(Error::at(ErrorKind::MultipleRoots, start));
        }

        let name = self.parse_name()?;
        self.skip_attributes()?;
        self.seen_root = true;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.pending_end = Some(name.clone());
        } else {
            self.expect_byte(b'>')?;
            self.open.push(name.clone());
        }

        Ok(Event::Start(name))
    }

    fn read_end_tag(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;

        match self.open.pop() {
            None => Err(Error::at(ErrorKind::UnexpectedClosingTag { name }, start)),
            Some(expected) if expected != name => Err(Error::at(
                ErrorKind::MismatchedTag {
                    expected,
                    found: name,
                },
                start,
            )),
            Some(_) => Ok(Event::End(name)),
        }
    }

    fn skip_attributes(&mut self) -> Result<()> {
        let mut seen: Vec<&'a [u8]> = Vec::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => return Ok(()),
                Some(_) => {}
                None => {
                    return Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated tag"));
                }
            }

            let attr_pos = self.cursor.position();
            let attr = self.scan_name()?;
            if seen.contains(&attr) {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    Span::at(attr_pos),
                    "duplicate attribute",
                ));
            }
            seen.push(attr);

            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            self.skip_attribute_value()?;
        }
    }

    fn skip_attribute_value(&mut self) -> Result<()> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(self.error_here(
                    ErrorKind::InvalidToken,
                    "expected quoted attribute value",
                ));
            }
        };
        self.cursor.advance();
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        while let Some(b) = self.cursor.current() {
            match b {
                _ if b == quote => {
                    check_utf8(self.cursor.slice_from(start), start_pos)?;
                    self.cursor.advance();
                    return Ok(());
                }
                b'<' => {
                    return Err(
                        self.error_here(ErrorKind::InvalidToken, "'<' in attribute value")
                    );
                }
                b'&' => self.skip_entity()?,
                _ => self.cursor.advance(),
            }
        }

        Err(self.error_here(
            ErrorKind::UnterminatedMarkup,
            "unterminated attribute value",
        ))
    }

    /// Scan character data up to the next '<'; true if any of it is not whitespace.
    fn scan_text(&mut self) -> Result<bool> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        let mut significant = false;
        while let Some(b) = self.cursor.current() {
            match b {
                b'<' => break,
                b'&' => {
                    self.skip_entity()?;
                    significant = true;
                }
                b' ' | b'\t' | b'\r' | b'\n' => self.cursor.advance(),
                b']' if self.cursor.starts_with(b"]]>") => {
                    return Err(self.error_here(ErrorKind::InvalidToken, "']]>' in text"));
                }
                _ => {
                    significant = true;
                    self.cursor.advance();
                }
            }
        }
        check_utf8(self.cursor.slice_from(start), start_pos)?;
        Ok(significant)
    }

    fn skip_entity(&mut self) -> Result<()> {
        let start_pos = self.cursor.position();
        // cursor currently at '&'
        self.cursor.advance();
        let start = self.cursor.pos();

        while let Some(b) = self.cursor.current() {
            if b == b';' {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                if is_known_entity(raw) {
                    return Ok(());
                }
                break;
            }
            if !(b.is_ascii_alphanumeric() || b == b'#') {
                break;
            }
            self.cursor.advance();
        }

        Err(Error::at(ErrorKind::InvalidEntity, start_pos))
    }

    fn parse_name(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let raw = self.scan_name()?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
    }

    fn scan_name(&mut self) -> Result<&'a [u8]> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            Some(_) => return Err(self.error_here(ErrorKind::InvalidToken, "expected name")),
            None => return Err(self.error_here(ErrorKind::UnexpectedEof, "expected name")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        Ok(self.cursor.slice_from(start))
    }

    fn skip_declaration(&mut self) -> Result<()> {
        // cursor currently at "<!", e.g. a DOCTYPE with an optional internal subset
        self.cursor.advance_by(2);
        let mut brackets = 0usize;

        while let Some(b) = self.cursor.current() {
            match b {
                b'"' | b'\'' => {
                    self.cursor.advance();
                    while let Some(inner) = self.cursor.current() {
                        self.cursor.advance();
                        if inner == b {
                            break;
                        }
                    }
                    continue;
                }
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => {
                    self.cursor.advance();
                    return Ok(());
                }
                _ => {}
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnterminatedMarkup, "unterminated declaration"))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            return Ok(());
        }
        let kind = if self.cursor.is_eof() {
            ErrorKind::UnexpectedEof
        } else {
            ErrorKind::InvalidToken
        };
        Err(self.error_here(kind, &format!("expected '{}'", char::from(expected))))
    }

    fn error_here(&self, kind: ErrorKind, message: &str) -> Error {
        Error::with_message(kind, Span::at(self.cursor.position()), message)
    }
}

impl Iterator for Reader<'_> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_event() {
            Ok(event) => event.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

fn check_utf8(raw: &[u8], pos: Pos) -> Result<()> {
    std::str::from_utf8(raw)
        .map(|_| ())
        .map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn is_known_entity(raw: &[u8]) -> bool {
    matches!(raw, b"amp" | b"lt" | b"gt" | b"quot" | b"apos") || decode_numeric_entity(raw).is_some()
}

fn decode_numeric_entity(raw: &[u8]) -> Option<char> {
    let entity = std::str::from_utf8(raw).ok()?;
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

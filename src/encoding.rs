// snapshot/src/encoding.rs
//! Output boundary: encode text for the sink with a replacement policy.
//!
//! Every character the target encoding can't represent becomes a single
//! `?`. Neighbouring characters are never touched, so a bad character can't
//! eat the text around it.

use anyhow::{
    anyhow,
    Result
};
use std::{
    borrow::Cow,
    fmt,
    io::{
        self,
        Write
    },
    str::FromStr,
};

pub const REPLACEMENT: u8 = b'?';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEncoding {
    #[default]
    Utf8,
    Ascii,
    /// ISO-8859-1: code points up to U+00FF, one byte each.
    Latin1,
}

impl OutputEncoding {
    pub fn name(self) -> &'static str {
        match self {
            OutputEncoding::Utf8 => "utf8",
            OutputEncoding::Ascii => "ascii",
            OutputEncoding::Latin1 => "latin1",
        }
    }

    pub fn can_encode(self, ch: char) -> bool {
        match self {
            OutputEncoding::Utf8 => true,
            OutputEncoding::Ascii => ch.is_ascii(),
            OutputEncoding::Latin1 => (ch as u32) <= 0xFF,
        }
    }

    /// Encode `text`, borrowing when no byte changes.
    pub fn encode<'a>(self, text: &'a str) -> Cow<'a, [u8]> {
        if self == OutputEncoding::Utf8 || text.chars().all(|ch| self.can_encode(ch)) {
            return Cow::Borrowed(text.as_bytes());
        }
        // Only Ascii/Latin1 reach here: every encodable char fits in one byte.
        Cow::Owned(
            text.chars()
                .map(|ch| if self.can_encode(ch) { ch as u8 } else { REPLACEMENT })
                .collect(),
        )
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "utf8" => Ok(OutputEncoding::Utf8),
            "ascii" | "usascii" => Ok(OutputEncoding::Ascii),
            "latin1" | "iso88591" => Ok(OutputEncoding::Latin1),
            other => Err(anyhow!("unsupported output encoding `{other}` (utf8|ascii|latin1)")),
        }
    }
}

/* ================================= Writer ================================= */

/// Line writer that runs every line through an [`OutputEncoding`].
pub struct EncodedWriter<W: Write> {
    inner: W,
    encoding: OutputEncoding,
}

impl<W: Write> EncodedWriter<W> {
    pub fn new(inner: W, encoding: OutputEncoding) -> Self {
        Self { inner, encoding }
    }

    /// Write `line` followed by `\n`.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_all(&self.encoding.encode(line))?;
        self.inner.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/* ================================== Tests ================================== */

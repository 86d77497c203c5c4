use std::io::{self, BufReader, Bytes, Read};

use crate::ast::location::{Location, Position};

/// Reads characters one at a time from a byte source.
///
/// Line terminators `\r\n`, `\r` and `\n` all come out as a single `\n`.
/// The buffer tracks the position of the character it last read and the one
/// before it; once the source is exhausted it reports EOF at the position just
/// past the last character.
pub struct StreamBuffer<R: Read> {
    bytes:     Bytes<BufReader<R>>,
    lookahead: Option<char>,
    current:   Option<char>,
    position:  Position,
    previous:  Position,
    next:      Position,
    eof:       bool,
}

impl<R: Read> StreamBuffer<R> {
    /// Wraps a reader. Nothing is read until [`StreamBuffer::read_next`].
    pub fn new(reader: R) -> Self {
        Self { bytes:     BufReader::new(reader).bytes(),
               lookahead: None,
               current:   None,
               position:  Position::default(),
               previous:  Position::default(),
               next:      Position::default(),
               eof:       false, }
    }

    /// Advances to the next character and returns it, or `None` at EOF.
    ///
    /// # Errors
    /// Fails if the reader fails or the bytes are not UTF-8.
    pub fn read_next(&mut self) -> io::Result<Option<char>> {
        if self.eof {
            return Ok(None);
        }
        let next = match self.decode()? {
            Some('\r') => {
                if let Some(c) = self.decode()?
                   && c != '\n'
                {
                    self.lookahead = Some(c);
                }
                Some('\n')
            },
            other => other,
        };

        self.previous = self.position;
        self.position = self.next;
        self.current = next;
        match next {
            Some('\n') => self.next = Position::new(self.next.line + 1, 1),
            Some(_) => self.next = Position::new(self.next.line, self.next.column + 1),
            None => self.eof = true,
        }
        Ok(next)
    }

    /// The character last returned by [`StreamBuffer::read_next`].
    #[must_use]
    pub const fn current(&self) -> Option<char> {
        self.current
    }

    /// Position of the current character, or of EOF.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Position of the character read before the current one.
    #[must_use]
    pub const fn previous_position(&self) -> Position {
        self.previous
    }

    /// Whether the source is exhausted.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.eof
    }

    fn byte(&mut self) -> io::Result<Option<u8>> {
        self.bytes.next().transpose()
    }

    fn decode(&mut self) -> io::Result<Option<char>> {
        if let Some(c) = self.lookahead.take() {
            return Ok(Some(c));
        }
        let Some(first) = self.byte()? else {
            return Ok(None);
        };
        let width = match first {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(invalid_utf8()),
        };
        let mut encoded = [first, 0, 0, 0];
        for slot in encoded.iter_mut().take(width).skip(1) {
            *slot = self.byte()?.ok_or_else(invalid_utf8)?;
        }
        std::str::from_utf8(&encoded[..width]).ok()
                                              .and_then(|s| s.chars().next())
                                              .map(Some)
                                              .ok_or_else(invalid_utf8)
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "source is not valid UTF-8")
}

/// A fully read, normalised source text with a line index.
///
/// The lexer works on byte offsets into [`SourceText::text`]; this type turns
/// those offsets back into line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text:        String,
    line_starts: Vec<usize>,
    end:         Position,
}

impl SourceText {
    /// Drains a reader through a [`StreamBuffer`].
    ///
    /// # Errors
    /// Fails if the reader fails or the bytes are not UTF-8.
    ///
    /// # Example
    /// ```
    /// use fhll::interpreter::stream::SourceText;
    ///
    /// let source = SourceText::read("a\r\nb\rc".as_bytes()).unwrap();
    /// assert_eq!(source.text(), "a\nb\nc");
    /// assert_eq!(source.position(4).to_string(), "3:1");
    /// ```
    pub fn read(reader: impl Read) -> io::Result<Self> {
        let mut buffer = StreamBuffer::new(reader);
        let mut text = String::new();
        let mut line_starts = vec![0];

        while let Some(c) = buffer.read_next()? {
            if buffer.position().column == 1 && buffer.position().line > 1 {
                line_starts.push(text.len());
            }
            text.push(c);
        }

        Ok(Self { text,
                  line_starts,
                  end: buffer.position() })
    }

    /// The normalised text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position just past the last character.
    #[must_use]
    pub const fn end(&self) -> Position {
        self.end
    }

    /// Position of the character starting at byte `offset`.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        if offset >= self.text.len() {
            return self.end;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        let column = self.text[start..offset].chars().count() + 1;
        Position::new(line, column)
    }

    /// Location covering the bytes `start..end`, from the first character to
    /// the last one inclusive.
    #[must_use]
    pub fn location(&self, start: usize, end: usize) -> Location {
        let begin = self.position(start);
        let last = self.text[start..end].char_indices()
                                        .next_back()
                                        .map_or(start, |(offset, _)| start + offset);
        Location::new(begin, self.position(last))
    }
}

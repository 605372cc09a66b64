use std::io::{Bytes, Read};

use super::{LexerError, Position, TokenKind};

/// Streams tokens out of a byte source without ever holding the whole program.
///
/// Callers should hand in something buffered (`BufReader`, `&[u8]`) since
/// the source is pulled a single byte at a time.
pub struct Lexer<R: Read> {
    /** Human Readable positions in file */
    pub cur_line: usize,
    pub cur_col: usize,

    /** 'raw' format / offset within the file (in terms of bytes) */
    pub byte_offset: usize,

    bytes: Bytes<R>,
    pending_newline: bool,
}

impl<R: Read> Lexer<R> {
    pub fn new(source: R) -> Lexer<R> {
        Lexer {
            cur_line: 1,
            cur_col: 0,

            byte_offset: 0,

            bytes: source.bytes(),
            pending_newline: false,
        }
    }

    /// Position of the last byte handed out (line 1, col 0 before any)
    pub fn position(&self) -> Position {
        Position {
            line: self.cur_line,
            column: self.cur_col,
        }
    }

    fn consume_byte(&mut self) -> Result<Option<u8>, LexerError> {
        match self.bytes.next() {
            Some(byte) => {
                let byte = byte?;
                if self.pending_newline {
                    self.cur_line += 1;
                    self.cur_col = 0;
                    self.pending_newline = false;
                }
                self.cur_col += 1;
                // the newline itself still belongs to the line it ends
                self.pending_newline = byte == b'\n';
                self.byte_offset += 1;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    /// `Ok(None)` once the source is exhausted
    pub fn next_token(&mut self) -> Result<Option<TokenKind>, LexerError> {
        while let Some(byte) = self.consume_byte()? {
            if let Some(token) = TokenKind::from_byte(byte) {
                return Ok(Some(token));
            }
        }

        Ok(None)
    }

    pub fn collect_results(&mut self) -> Result<Vec<TokenKind>, LexerError> {
        self.by_ref().collect()
    }
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = Result<TokenKind, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

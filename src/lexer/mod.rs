use thiserror::Error;

pub mod lexer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // `0`: Increment the `data pointer` by one
    MoveRight,
    // `1`: Decrement the `data pointer` by one
    MoveLeft,

    // `2`: Increment the byte at the `data pointer` by one
    Increment,
    // `3`: Decrement the byte at the `data pointer` by one
    Decrement,

    // `4`: Write the byte at the `data pointer` to stdout
    Write,
    // `5`: Read the next byte from stdin and store it at the `data pointer`
    Read,

    // `6`: If the byte at the `data pointer` is zero, jump forward past the matching `7`
    LoopStart,
    // `7`: If the byte at the `data pointer` is non-zero, jump back to just after the matching `6`
    LoopEnd,
}

impl TokenKind {
    /// Every other byte is a comment
    pub fn from_byte(byte: u8) -> Option<TokenKind> {
        match byte {
            b'0' => Some(TokenKind::MoveRight),
            b'1' => Some(TokenKind::MoveLeft),
            b'2' => Some(TokenKind::Increment),
            b'3' => Some(TokenKind::Decrement),
            b'4' => Some(TokenKind::Write),
            b'5' => Some(TokenKind::Read),
            b'6' => Some(TokenKind::LoopStart),
            b'7' => Some(TokenKind::LoopEnd),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            TokenKind::MoveRight => '0',
            TokenKind::MoveLeft => '1',
            TokenKind::Increment => '2',
            TokenKind::Decrement => '3',
            TokenKind::Write => '4',
            TokenKind::Read => '5',
            TokenKind::LoopStart => '6',
            TokenKind::LoopEnd => '7',
        }
    }
}

/// Where the lexer is in the source, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Error, Debug)]
pub enum LexerError {
    #[error("failed to read source: {0}")]
    Io(
        #[from]
        std::io::Error,
    ),
}

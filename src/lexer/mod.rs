mod token;

use logos::Logos;
pub use token::TokenKind;

/// A single lexed token, still borrowing from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Thin wrapper over a [`logos`] lexer that drops whitespace/comments and
/// turns unrecognized characters into recoverable warnings instead of
/// aborting, mirroring the original parser's "skip one character and keep
/// going" recovery.
pub struct Lexer<'a> {
    input: &'a str,
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            inner: TokenKind::lexer(input),
        }
    }

    /// Produces the non-trivia token stream, collecting a human-readable
    /// warning for every character that could not be classified.
    pub fn tokenize(input: &'a str) -> (Vec<Token<'a>>, Vec<String>) {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();
        let mut warnings = Vec::new();

        while let Some(result) = lexer.inner.next() {
            match result {
                Ok(kind) if kind.is_trivia() => {}
                Ok(kind) => tokens.push(Token {
                    kind,
                    text: lexer.inner.slice(),
                }),
                Err(_) => {
                    let bad = lexer.inner.slice();
                    let ch = bad.chars().next().unwrap_or('?');
                    warnings.push(format!("Illegal Character '{ch}'"));
                }
            }
        }

        (tokens, warnings)
    }

    /// Iterator form, used by unit tests that only care about the next
    /// non-trivia token.
    pub fn tokens(&mut self) -> impl Iterator<Item = Token<'a>> + '_ {
        std::iter::from_fn(move || loop {
            match self.inner.next()? {
                Ok(kind) if kind.is_trivia() => continue,
                Ok(kind) => return Some(Token {
                    kind,
                    text: self.inner.slice(),
                }),
                Err(_) => continue,
            }
        })
    }

    pub fn source(&self) -> &'a str {
        self.input
    }
}

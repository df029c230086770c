// A pull-based token source with unbounded lookahead: `peek`/`consume`
// plus sentinel end-of-stream behavior. The lexer that feeds it lives
// in `lexer.rs`.

use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    IntegerValue,
    IntegerType,
    Name,
    Return,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semicolon,
    Comma,
    Tilde,
    Minus,
    DoubleMinus,
    Bang,
    Plus,
    Star,
    Slash,
    Percent,
    AmpAmp,
    PipePipe,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    EqEq,
    NotEq,
    Lt,
    Gt,
    Lte,
    Gte,
    EndOfFile,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenValue {
    None,
    Integer(i32),
    Name(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
}

impl Token {
    pub fn new(kind: TokenKind) -> Token {
        Token { kind, value: TokenValue::None }
    }

    pub fn integer(value: i32) -> Token {
        Token { kind: TokenKind::IntegerValue, value: TokenValue::Integer(value) }
    }

    pub fn name(value: String) -> Token {
        Token { kind: TokenKind::Name, value: TokenValue::Name(value) }
    }

    /// Human-readable description for diagnostics, e.g. "';'" or "NAME".
    pub fn describe(&self) -> String {
        match &self.value {
            TokenValue::Integer(n) => n.to_string(),
            TokenValue::Name(s) => s.clone(),
            TokenValue::None => format!("{:?}", self.kind),
        }
    }
}

/// Anything that can produce a token at a time: the contract `TokenStream`
/// buffers over. Kept separate from `TokenStream` so the stream's
/// peek/consume/buffering logic never depends on how tokens are produced.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, crate::error::SyntaxError>;
}

/// Buffers as many tokens as needed to satisfy the largest live peek.
/// Not thread-safe; assumes a single consumer.
pub struct TokenStream<S: TokenSource> {
    source: S,
    buffer: VecDeque<Token>,
    exhausted: bool,
}

impl<S: TokenSource> TokenStream<S> {
    pub fn new(source: S) -> TokenStream<S> {
        TokenStream { source, buffer: VecDeque::new(), exhausted: false }
    }

    /// Look `k` tokens ahead (`k = 0` is the next token to be consumed).
    /// Peeking past end-of-stream is idempotent and returns the sentinel.
    pub fn peek(&mut self, k: usize) -> Result<&Token, crate::error::SyntaxError> {
        while self.buffer.len() <= k {
            if self.exhausted {
                break;
            }
            let tok = self.source.next_token()?;
            if tok.kind == TokenKind::EndOfFile {
                self.exhausted = true;
            }
            self.buffer.push_back(tok);
        }
        // Once exhausted, every index past the buffered tail reads the
        // trailing sentinel instead of panicking.
        let idx = k.min(self.buffer.len() - 1);
        Ok(&self.buffer[idx])
    }

    pub fn consume(&mut self) -> Result<Token, crate::error::SyntaxError> {
        self.peek(0)?;
        if self.buffer.len() > 1 || !self.exhausted {
            Ok(self.buffer.pop_front().unwrap())
        } else {
            // Sole remaining element is the sentinel: leave it buffered
            // so further consumes keep returning it.
            Ok(self.buffer.front().unwrap().clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        tokens: VecDeque<Token>,
    }

    impl TokenSource for Scripted {
        fn next_token(&mut self) -> Result<Token, crate::error::SyntaxError> {
            Ok(self.tokens.pop_front().unwrap_or(Token::new(TokenKind::EndOfFile)))
        }
    }

    fn scripted(kinds: &[TokenKind]) -> TokenStream<Scripted> {
        TokenStream::new(Scripted { tokens: kinds.iter().map(|k| Token::new(*k)).collect() })
    }

    #[test]
    fn peek_does_not_consume() {
        let mut s = scripted(&[TokenKind::LParen, TokenKind::RParen]);
        assert_eq!(s.peek(0).unwrap().kind, TokenKind::LParen);
        assert_eq!(s.peek(0).unwrap().kind, TokenKind::LParen);
        assert_eq!(s.consume().unwrap().kind, TokenKind::LParen);
        assert_eq!(s.consume().unwrap().kind, TokenKind::RParen);
    }

    #[test]
    fn peek_past_eof_is_idempotent_sentinel() {
        let mut s = scripted(&[TokenKind::LParen]);
        assert_eq!(s.peek(5).unwrap().kind, TokenKind::EndOfFile);
        assert_eq!(s.peek(50).unwrap().kind, TokenKind::EndOfFile);
        assert_eq!(s.consume().unwrap().kind, TokenKind::LParen);
        assert_eq!(s.consume().unwrap().kind, TokenKind::EndOfFile);
        assert_eq!(s.consume().unwrap().kind, TokenKind::EndOfFile);
    }

    #[test]
    fn unbounded_lookahead() {
        let mut s = scripted(&[TokenKind::IntegerType, TokenKind::Name, TokenKind::LParen, TokenKind::RParen]);
        assert_eq!(s.peek(3).unwrap().kind, TokenKind::RParen);
        assert_eq!(s.peek(0).unwrap().kind, TokenKind::IntegerType);
    }
}

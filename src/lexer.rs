// The character-level lexer, producing the `Token`s the token stream
// hands out (see `token.rs`).

use crate::error::SyntaxError;
use crate::token::{Token, TokenKind, TokenSource};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer { chars: source.chars().collect(), pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn lex_number(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if text.is_empty() {
            return Err(SyntaxError::UnterminatedNumber);
        }
        let value: i64 = text.parse().map_err(|_| SyntaxError::NumberOverflow(text.clone()))?;
        let narrowed: i32 =
            i32::try_from(value).map_err(|_| SyntaxError::NumberOverflow(text.clone()))?;
        Ok(Token::integer(narrowed))
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match text.as_str() {
            "int" => Token::new(TokenKind::IntegerType),
            "return" => Token::new(TokenKind::Return),
            _ => Token::name(text),
        }
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        let Some(c) = self.peek_char() else {
            return Ok(Token::new(TokenKind::EndOfFile));
        };

        if c.is_ascii_digit() {
            return self.lex_number();
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(self.lex_identifier());
        }

        // Longest-match-first for every two-character punctuator.
        let two = self.peek_char_at(1);
        let kind = match (c, two) {
            ('-', Some('-')) => { self.pos += 2; TokenKind::DoubleMinus }
            ('<', Some('<')) => { self.pos += 2; TokenKind::Shl }
            ('>', Some('>')) => { self.pos += 2; TokenKind::Shr }
            ('<', Some('=')) => { self.pos += 2; TokenKind::Lte }
            ('>', Some('=')) => { self.pos += 2; TokenKind::Gte }
            ('=', Some('=')) => { self.pos += 2; TokenKind::EqEq }
            ('!', Some('=')) => { self.pos += 2; TokenKind::NotEq }
            ('&', Some('&')) => { self.pos += 2; TokenKind::AmpAmp }
            ('|', Some('|')) => { self.pos += 2; TokenKind::PipePipe }
            _ => {
                self.pos += 1;
                match c {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    '~' => TokenKind::Tilde,
                    '-' => TokenKind::Minus,
                    '+' => TokenKind::Plus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '%' => TokenKind::Percent,
                    '!' => TokenKind::Bang,
                    '&' => TokenKind::Amp,
                    '|' => TokenKind::Pipe,
                    '^' => TokenKind::Caret,
                    '<' => TokenKind::Lt,
                    '>' => TokenKind::Gt,
                    other => return Err(SyntaxError::UnexpectedChar(other)),
                }
            }
        };
        Ok(Token::new(kind))
    }
}

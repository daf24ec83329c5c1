// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for the analyzed C#-style source subset.
//!
//! The lexer is hand-written for full control over error recovery: it never
//! panics or aborts on malformed input. Unknown characters and unterminated
//! strings or comments become [`TokenKind::Error`] tokens, which the parser
//! turns into diagnostics while continuing to parse.
//!
//! # Example
//!
//! ```
//! use mapguard_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("person.FirstName = x").collect();
//! assert_eq!(tokens.len(), 5); // person, ., FirstName, =, x
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Span, Token, TokenKind};

/// A lexer over the analyzed source text.
///
/// Implements [`Iterator`]; whitespace and comments are consumed silently
/// between tokens.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Consumes whitespace and comments preceding the next token.
    ///
    /// An unterminated block comment produces an `Error` token rather than
    /// looping forever.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    let start = self.current_position();
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek().map(|&(_, c)| c) {
                        Some('/') => {
                            self.advance_while(|c| c != '\n');
                        }
                        Some('*') => {
                            self.advance(); // `/`
                            self.advance(); // `*`
                            if !self.skip_block_comment() {
                                return Some(Token::new(
                                    TokenKind::Error("unterminated block comment".into()),
                                    self.span_from(start),
                                ));
                            }
                        }
                        _ => return None, // a lone `/` is handled as an unknown character
                    }
                }
                _ => return None,
            }
        }
    }

    /// Consumes a block comment body. Returns `false` if input ended first.
    fn skip_block_comment(&mut self) -> bool {
        while let Some(c) = self.advance() {
            if c == '*' && self.peek_char() == Some('/') {
                self.advance();
                return true;
            }
        }
        false
    }

    fn lex_identifier_or_keyword(&mut self, start: u32) -> Token {
        self.advance_while(|c| c.is_alphanumeric() || c == '_');
        let span = self.span_from(start);
        let text = &self.source[span.as_range()];
        let kind = TokenKind::keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(EcoString::from(text)));
        Token::new(kind, span)
    }

    fn lex_integer(&mut self, start: u32) -> Token {
        self.advance_while(|c| c.is_ascii_digit());
        let span = self.span_from(start);
        let text = &self.source[span.as_range()];
        let kind = match text.parse::<i64>() {
            Ok(value) => TokenKind::Integer(value),
            Err(_) => TokenKind::Error("integer literal out of range".into()),
        };
        Token::new(kind, span)
    }

    /// Lexes a double-quoted string literal; the opening quote is consumed.
    fn lex_string(&mut self, start: u32) -> Token {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => {
                    return Token::new(
                        TokenKind::String(value.into()),
                        self.span_from(start),
                    );
                }
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some(other) => {
                        // Invalid escape: keep lexing to the closing quote so
                        // the rest of the file stays parseable.
                        value.push(other);
                    }
                    None => break,
                },
                Some('\n') | None => break,
                Some(c) => value.push(c),
            }
        }
        Token::new(
            TokenKind::Error("unterminated string literal".into()),
            self.span_from(start),
        )
    }

    fn lex_token(&mut self) -> Option<Token> {
        if let Some(error) = self.skip_trivia() {
            return Some(error);
        }

        let start = self.current_position();
        let c = self.advance()?;

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '=' => TokenKind::Equals,
            '+' => TokenKind::Plus,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '"' => return Some(self.lex_string(start)),
            c if c.is_ascii_digit() => return Some(self.lex_integer(start)),
            c if c.is_alphabetic() || c == '_' => {
                return Some(self.lex_identifier_or_keyword(start));
            }
            other => TokenKind::Error(format!("unexpected character '{other}'").into()),
        };
        Some(Token::new(kind, self.span_from(start)))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.lex_token()
    }
}

/// Lexes the entire source into a token vector (no EOF token).
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lexes the entire source and appends a single [`TokenKind::Eof`] token.
///
/// The parser relies on the trailing EOF token to avoid bounds checks.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut tokens = lex(source);
    let end = Span::from(source.len()..source.len());
    tokens.push(Token::new(TokenKind::Eof, end));
    tokens
}

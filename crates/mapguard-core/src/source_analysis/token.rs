// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Token types produced by the lexer.
//!
//! Each token is a [`TokenKind`] plus the [`Span`] it covers. String data
//! uses [`EcoString`] so tokens stay cheap to clone while the parser
//! shuffles them around.

use ecow::EcoString;

use super::Span;

/// The kind of token, without source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals and names ===
    /// An identifier: `Person`, `firstName`, `Map`.
    Identifier(EcoString),

    /// A double-quoted string literal, with escapes resolved.
    String(EcoString),

    /// A decimal integer literal.
    Integer(i64),

    // === Keywords ===
    Class,
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Virtual,
    Override,
    Abstract,
    Sealed,
    New,
    Return,
    Var,
    Void,
    Get,
    Set,
    If,
    Else,
    Null,
    True,
    False,

    // === Delimiters ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,

    // === Punctuation ===
    /// `=`
    Equals,
    /// `+`
    Plus,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,

    /// End of input. Appended once by [`lex_with_eof`](super::lex_with_eof).
    Eof,

    /// An unrecognized or malformed piece of input.
    ///
    /// The lexer never fails outright; bad input becomes `Error` tokens so
    /// the parser can keep going and report a diagnostic.
    Error(EcoString),
}

impl TokenKind {
    /// Maps a lexed word to its keyword kind, if it is one.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "class" => Self::Class,
            "public" => Self::Public,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "internal" => Self::Internal,
            "static" => Self::Static,
            "virtual" => Self::Virtual,
            "override" => Self::Override,
            "abstract" => Self::Abstract,
            "sealed" => Self::Sealed,
            "new" => Self::New,
            "return" => Self::Return,
            "var" => Self::Var,
            "void" => Self::Void,
            "get" => Self::Get,
            "set" => Self::Set,
            "if" => Self::If,
            "else" => Self::Else,
            "null" => Self::Null,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` if this is the end-of-input token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The byte range this token covers.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The span of this token.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }
}

// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the lexer.
//!
//! Invariants checked over generated inputs:
//!
//! 1. The lexer never panics, on any input
//! 2. Token spans stay within input bounds
//! 3. Token spans are ordered and non-overlapping
//! 4. `lex_with_eof` always ends with exactly one EOF token
//! 5. Lexing is deterministic
//! 6. Known-valid fragments lex without error tokens

use proptest::prelude::*;

use super::lexer::{lex, lex_with_eof};
use super::token::TokenKind;

/// Known-valid fragments that must lex without errors.
const VALID_FRAGMENTS: &[&str] = &[
    "42",
    "\"hello\"",
    "\"esc\\\"aped\"",
    "person",
    "FirstName",
    "public class Person { }",
    "[MappingMethod]",
    "person.FirstName = \"Test\";",
    "new[] { \"A\", \"B\" }",
    "((Base) person).LastName",
    "// comment\nx",
    "/* block */ y",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_FRAGMENTS).prop_map(std::string::ToString::to_string)
}

fn is_error(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Error(_))
}

proptest! {
    /// Property 1: the lexer never panics on arbitrary input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,400}") {
        let _tokens = lex_with_eof(&input);
    }

    /// Property 2: all token spans are within input bounds.
    #[test]
    fn token_spans_within_input(input in "\\PC{0,400}") {
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for token in lex_with_eof(&input) {
            prop_assert!(
                token.span.end() <= input_len,
                "token {:?} span {:?} exceeds input length {} for {:?}",
                token.kind, token.span, input_len, input,
            );
            prop_assert!(token.span.start() <= token.span.end());
        }
    }

    /// Property 3: token spans are ordered and non-overlapping.
    #[test]
    fn token_spans_non_overlapping(input in "\\PC{0,400}") {
        let tokens = lex(&input);
        for window in tokens.windows(2) {
            prop_assert!(
                window[1].span.start() >= window[0].span.end(),
                "overlapping spans {:?} and {:?} for {:?}",
                window[0], window[1], input,
            );
        }
    }

    /// Property 4: `lex_with_eof` ends with exactly one EOF token.
    #[test]
    fn eof_always_last(input in "\\PC{0,400}") {
        let tokens = lex_with_eof(&input);
        prop_assert!(tokens.last().is_some_and(|t| t.kind.is_eof()));
        let eof_count = tokens.iter().filter(|t| t.kind.is_eof()).count();
        prop_assert_eq!(eof_count, 1);
    }

    /// Property 5: lexing is deterministic.
    #[test]
    fn lexer_deterministic(input in "\\PC{0,200}") {
        prop_assert_eq!(lex_with_eof(&input), lex_with_eof(&input));
    }

    /// Property 6: known-valid fragments produce no error tokens.
    #[test]
    fn valid_fragments_lex_cleanly(input in valid_fragment()) {
        for token in lex(&input) {
            prop_assert!(
                !is_error(&token.kind),
                "valid input {:?} produced error token {:?}",
                input, token,
            );
        }
    }
}

//! Property-based tests for the OpenSSL configuration lexer
//!
//! These tests ensure that the scanner is total over arbitrary input and that its
//! output always covers the input exactly, with and without merging.

use cnflex::cnf::lexing::resolve;
use cnflex::cnf::{MergePolicy, ScanOptions, Scanner, Token, TokenKind};
use proptest::prelude::*;
use std::time::{Duration, Instant};

/// Helper: concatenate the text of every token
fn rebuild(source: &str, tokens: impl IntoIterator<Item = Token>) -> String {
    resolve(source, tokens)
        .into_iter()
        .map(|(_, text)| text)
        .collect()
}

/// Helper: ranges are non-empty, start at zero and follow each other without gaps
fn assert_contiguous(source: &str, tokens: &[Token]) {
    let mut offset = 0;
    for (_, range) in tokens {
        assert_eq!(range.start, offset, "gap before {:?}", range);
        assert!(range.end > range.start, "empty token at {}", range.start);
        offset = range.end;
    }
    assert_eq!(offset, source.len());
}

fn all_options() -> Vec<ScanOptions> {
    let mut options = Vec::new();
    for inline_comments in [true, false] {
        for merge in [
            MergePolicy::default(),
            MergePolicy::disabled(),
            MergePolicy::merge_all(),
        ] {
            options.push(ScanOptions {
                inline_comments,
                merge,
            });
        }
    }
    options
}

/// Strategy for one line of something resembling openssl.cnf
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "# [a-z ]{0,12}",
        "\\[ ?[a-z_]{1,8} ?\\]",
        "[a-z_]{1,8} ?= ?[a-z0-9.,:/@ ]{0,16}",
        "[a-z]{1,6} = \\$\\{[A-Z]{0,3}(::)?[a-z]{0,6}\\}?",
        "[a-z]{1,6} = \\$\\([A-Z]{0,3}(::)?[a-z]{0,6}\\)?",
        "[a-z]{1,6} = (email|IP|DER):[0-9a-fA-F.:@]{0,12}",
        "[a-z]{1,6} = critical, ?[a-zA-Z]{0,10}",
        "\\.(pragma|include|[a-z]{1,6}) ?=? ?[a-z]{0,8}:?[a-z/]{0,8}",
        "[a-z]{1,6} = \"[a-z \\\\]{0,8}\"?",
        "[a-z]{1,6} = [a-z ]{0,8}\\\\",
    ]
}

fn cnf_document_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(line_strategy(), 1..20),
        prop_oneof![Just("\n"), Just("\r\n")],
    )
        .prop_map(|(lines, eol)| lines.join(eol))
}

proptest! {
    #[test]
    fn test_tokenize_never_panics(input in "\\PC*") {
        for options in all_options() {
            let _ = Scanner::new(options).tokenize(&input).count();
        }
    }

    #[test]
    fn test_arbitrary_input_is_covered(input in any::<String>()) {
        let scanner = Scanner::default();
        prop_assert_eq!(&rebuild(&input, scanner.tokenize_raw(&input)), &input);
        prop_assert_eq!(&rebuild(&input, scanner.tokenize(&input)), &input);
    }

    #[test]
    fn test_documents_are_covered(input in cnf_document_strategy()) {
        for options in all_options() {
            let scanner = Scanner::new(options);
            let raw: Vec<Token> = scanner.tokenize_raw(&input).collect();
            let merged: Vec<Token> = scanner.tokenize(&input).collect();
            assert_contiguous(&input, &raw);
            assert_contiguous(&input, &merged);
            prop_assert!(merged.len() <= raw.len());
        }
    }

    #[test]
    fn test_default_merge_leaves_no_mergeable_neighbours(input in cnf_document_strategy()) {
        let tokens: Vec<Token> = Scanner::default().tokenize(&input).collect();
        for pair in tokens.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            if first.0 == second.0 {
                prop_assert_eq!(first.0, TokenKind::VariableName);
            }
        }
    }

    #[test]
    fn test_tokenize_is_restartable(input in cnf_document_strategy()) {
        let scanner = Scanner::default();
        let first: Vec<Token> = scanner.tokenize(&input).collect();
        let second: Vec<Token> = scanner.tokenize(&input).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_stopping_early_matches_prefix(input in cnf_document_strategy(), take in 0usize..8) {
        let scanner = Scanner::default();
        let prefix: Vec<Token> = scanner.tokenize(&input).take(take).collect();
        let full: Vec<Token> = scanner.tokenize(&input).collect();
        prop_assert_eq!(&prefix[..], &full[..prefix.len()]);
    }
}

#[test]
fn test_empty_and_single_characters() {
    let scanner = Scanner::default();
    assert_eq!(scanner.tokenize("").count(), 0);
    for source in ["=", "[", "]", "$", "\\", "\n", "\r", "#", ".", "\"", "'", "\u{0}", "é"] {
        let tokens: Vec<Token> = scanner.tokenize(source).collect();
        assert_contiguous(source, &tokens);
    }
}

#[test]
fn test_deeply_unclosed_interpolations() {
    let source = format!("a = {}\n", "${".repeat(5000));
    let tokens: Vec<Token> = Scanner::default().tokenize(&source).collect();
    assert_contiguous(&source, &tokens);
    assert_eq!(tokens.last().map(|(kind, _)| *kind), Some(TokenKind::Whitespace));
}

/// Constructs whose rules read far ahead before failing, `n` units each
fn unterminated_document(n: usize) -> String {
    [
        format!("a = \"{}\n", "\\\"".repeat(n)),
        format!("b = '{}\n", "\\'".repeat(n)),
        format!("{}\n", "[".repeat(n)),
        format!(".pragma {}\n", "a".repeat(n)),
        format!("c = {}x\n", "1".repeat(n)),
    ]
    .concat()
}

fn scan_time(source: &str) -> Duration {
    (0..3)
        .map(|_| {
            let start = Instant::now();
            assert!(Scanner::default().tokenize(source).count() > 0);
            start.elapsed()
        })
        .min()
        .unwrap()
}

#[test]
fn test_unterminated_constructs_scan_in_linear_time() {
    let small = unterminated_document(5_000);
    let large = unterminated_document(20_000);

    let tokens: Vec<Token> = Scanner::default().tokenize(&large).collect();
    assert_contiguous(&large, &tokens);

    // four times the input should take about four times as long, not sixteen
    let (small_time, large_time) = (scan_time(&small), scan_time(&large));
    assert!(
        large_time < small_time * 10 + Duration::from_millis(20),
        "small {:?}, large {:?}",
        small_time,
        large_time
    );
}

#[test]
fn test_concurrent_scans_share_tables() {
    let sources = [
        "[ ca ]\ndir = ./demoCA\n",
        "a = ${ENV::HOME}/x\n",
        ".pragma dollarid:true\n",
        "alt = IP:10.0.0.1, email:a@b.c\n",
    ];
    let handles: Vec<_> = sources
        .into_iter()
        .map(|source| {
            std::thread::spawn(move || {
                let tokens: Vec<Token> = Scanner::default().tokenize(source).collect();
                rebuild(source, tokens) == source
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

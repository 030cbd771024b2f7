//! Scanner integration tests.
//!
//! Verifies tokenization, position tracking, and lexical error reporting.

use ampl_core::text::SourcePos;
use ampl_options::ScannerOptions;
use ampl_scanner::{LexError, LexErrorKind, Scanner, Token, TokenKind, RESERVED_WORDS};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Helper: scan all tokens up to and including end-of-file.
fn scan_all(source: &str) -> Vec<Token> {
    Scanner::from_source(source)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<TokenKind> {
    scan_all(source).into_iter().map(|t| t.kind).collect()
}

/// Helper: scan until the first fatal error.
fn scan_error(source: &str) -> LexError {
    Scanner::from_source(source)
        .find_map(Result::err)
        .expect("source should fail to scan")
}

fn at(line: u32, column: u32) -> SourcePos {
    SourcePos::new(line, column)
}

#[test]
fn test_empty_source() {
    let tokens = scan_all("");
    assert_eq!(tokens, vec![Token::new(TokenKind::Eof, at(1, 1))]);
}

#[test]
fn test_whitespace_only() {
    assert_eq!(scan_kinds("   \n\t  \r\n"), vec![TokenKind::Eof]);
}

#[test]
fn test_let_statement() {
    let tokens = scan_all("let x: int = 10 ..");
    assert_eq!(
        tokens,
        vec![
            Token::new(TokenKind::Let, at(1, 1)),
            Token::new(TokenKind::Id, at(1, 5)).with_text("x".into()),
            Token::new(TokenKind::Colon, at(1, 6)),
            Token::new(TokenKind::Int, at(1, 8)),
            Token::new(TokenKind::Eq, at(1, 12)),
            Token::new(TokenKind::Num, at(1, 14)).with_number(10),
            Token::new(TokenKind::DotDot, at(1, 17)),
            Token::new(TokenKind::Eof, at(1, 19)),
        ]
    );
}

#[test]
fn test_positions_across_lines() {
    let tokens = scan_all("a\n  b\n\tc");
    let positions: Vec<_> = tokens.iter().map(|t| t.pos).collect();
    assert_eq!(positions, vec![at(1, 1), at(2, 3), at(3, 5), at(3, 6)]);
}

#[test]
fn test_custom_tab_width() {
    let options = ScannerOptions {
        tab_width: 2,
        ..ScannerOptions::default()
    };
    let mut scanner = Scanner::with_options("\t\tx".as_bytes(), options);
    assert_eq!(scanner.next_token().unwrap().pos, at(1, 5));
}

#[test]
fn test_all_keywords() {
    for (word, kind) in RESERVED_WORDS {
        assert_eq!(scan_kinds(word), vec![kind, TokenKind::Eof], "keyword {word}");
    }
}

#[test]
fn test_keywords_are_case_sensitive() {
    let tokens = scan_all("While END");
    assert_eq!(tokens[0].kind, TokenKind::Id);
    assert_eq!(tokens[0].text(), Some("While"));
    assert_eq!(tokens[1].kind, TokenKind::Id);
}

#[test]
fn test_identifiers() {
    let tokens = scan_all("_tmp x1 snake_case");
    let names: Vec<_> = tokens.iter().filter_map(Token::text).collect();
    assert_eq!(names, vec!["_tmp", "x1", "snake_case"]);
}

#[test]
fn test_string_escape_normalized() {
    let tokens = scan_all(r#""ab\"c""#);
    assert_eq!(
        tokens,
        vec![
            Token::new(TokenKind::Str, at(1, 1)).with_text("ab\"c".into()),
            Token::new(TokenKind::Eof, at(1, 8)),
        ]
    );
}

#[test]
fn test_string_all_escapes() {
    let tokens = scan_all(r#""a\nb\tc\\d""#);
    assert_eq!(tokens[0].text(), Some("a\nb\tc\\d"));
}

#[test]
fn test_empty_string() {
    let tokens = scan_all(r#""""#);
    assert_eq!(tokens[0].kind, TokenKind::Str);
    assert_eq!(tokens[0].text(), Some(""));
}

#[test]
fn test_long_string_grows() {
    let body = "x".repeat(1000);
    let tokens = scan_all(&format!("\"{body}\""));
    assert_eq!(tokens[0].text(), Some(body.as_str()));
}

#[test]
fn test_nested_comment_skipped() {
    let tokens = scan_all("{ a { b } c } end");
    assert_eq!(
        tokens,
        vec![
            Token::new(TokenKind::End, at(1, 15)),
            Token::new(TokenKind::Eof, at(1, 18)),
        ]
    );
}

#[test]
fn test_comment_spanning_lines() {
    let tokens = scan_all("{ one\ntwo }\n  x");
    assert_eq!(tokens[0].pos, at(3, 3));
}

#[test]
fn test_comment_between_tokens() {
    assert_eq!(
        scan_kinds("a{gap}b"),
        vec![TokenKind::Id, TokenKind::Id, TokenKind::Eof]
    );
}

#[test]
fn test_div_at_end_of_input() {
    assert_eq!(
        scan_kinds("5/"),
        vec![TokenKind::Num, TokenKind::Div, TokenKind::Eof]
    );
}

#[test]
fn test_minus_then_digits_is_two_tokens() {
    let tokens = scan_all("-12");
    assert_eq!(tokens[0].kind, TokenKind::Minus);
    assert_eq!(tokens[1].number(), Some(12));
}

#[test]
fn test_largest_number() {
    let mut scanner = Scanner::from_source("2147483647");
    assert_eq!(scanner.next_token().unwrap().number(), Some(i32::MAX));
    assert!(scanner.diagnostics().is_empty());
}

#[test]
fn test_number_too_large_is_recoverable() {
    let mut scanner = Scanner::from_source("x 2147483648 y");
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Id);

    let number = scanner.next_token().unwrap();
    assert_eq!(number.kind, TokenKind::Num);
    assert_eq!(number.number(), Some(214_748_364));

    let next = scanner.next_token().unwrap();
    assert_eq!(next.text(), Some("y"));

    let diagnostics = scanner.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics.diagnostics()[0];
    assert_eq!(diagnostic.message_text, "number too large");
    assert_eq!(diagnostic.pos, Some(at(1, 3)));
    assert!(scanner.diagnostics().is_empty());
}

#[test]
fn test_identifier_too_long_is_truncated() {
    let long = "a".repeat(40);
    let mut scanner = Scanner::from_source(&long);
    let token = scanner.next_token().unwrap();
    assert_eq!(token.text(), Some("a".repeat(32).as_str()));
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(
        scanner.diagnostics().diagnostics()[0].message_text,
        "identifier too long"
    );
}

#[test]
fn test_identifier_at_limit_is_accepted() {
    let exact = "b".repeat(32);
    let mut scanner = Scanner::from_source(&exact);
    assert_eq!(scanner.next_token().unwrap().text(), Some(exact.as_str()));
    assert!(scanner.diagnostics().is_empty());
}

#[test]
fn test_configured_identifier_limit() {
    let options = ScannerOptions {
        max_id_length: 3,
        ..ScannerOptions::default()
    };
    let mut scanner = Scanner::with_options("abcdef".as_bytes(), options);
    assert_eq!(scanner.next_token().unwrap().text(), Some("abc"));
    assert!(scanner.diagnostics().has_errors());
}

#[test]
fn test_truncated_keyword_prefix_is_keyword() {
    let options = ScannerOptions {
        max_id_length: 5,
        ..ScannerOptions::default()
    };
    let mut scanner = Scanner::with_options("whilexyz".as_bytes(), options);
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::While);
}

#[test]
fn test_unterminated_string() {
    let error = scan_error("x = \"abc");
    assert_eq!(error.kind, LexErrorKind::UnterminatedString);
    assert_eq!(error.pos, at(1, 5));
}

#[test]
fn test_newline_in_string() {
    let error = scan_error("\"ab\ncd\"");
    assert_eq!(error.kind, LexErrorKind::NonPrintableInString(b'\n'));
    assert_eq!(error.pos, at(1, 4));
    assert_eq!(error.to_string(), "1:4: non-printable character (ASCII #10) in string");
}

#[test]
fn test_illegal_escape() {
    let error = scan_error(r#""a\qb""#);
    assert_eq!(error.kind, LexErrorKind::IllegalEscape(b'q'));
    assert_eq!(error.pos, at(1, 3));
}

#[test]
fn test_backslash_at_end_of_input() {
    let error = scan_error("\"a\\");
    assert_eq!(error.kind, LexErrorKind::UnterminatedString);
    assert_eq!(error.pos, at(1, 1));
}

#[test]
fn test_unterminated_comment() {
    let error = scan_error("{ { }");
    assert_eq!(error.kind, LexErrorKind::UnterminatedComment);
    assert_eq!(error.pos, at(1, 1));
}

#[test]
fn test_illegal_characters() {
    for (source, byte) in [("@", b'@'), ("!", b'!'), ("}", b'}'), ("\u{e9}", 0xC3)] {
        let error = scan_error(source);
        assert_eq!(error.kind, LexErrorKind::IllegalCharacter(byte), "source {source:?}");
        assert_eq!(error.pos, at(1, 1));
    }
}

#[test]
fn test_scanning_resumes_after_illegal_character() {
    let mut scanner = Scanner::from_source("$ x");
    assert!(scanner.next_token().is_err());
    let token = scanner.next_token().unwrap();
    assert_eq!(token.text(), Some("x"));
    assert_eq!(token.pos, at(1, 3));
}

#[test]
fn test_small_program() {
    let source = "program p:\nmain:\n  output(\"hi\");\nend\n";
    assert_eq!(
        scan_kinds(source),
        vec![
            TokenKind::Program,
            TokenKind::Id,
            TokenKind::Colon,
            TokenKind::Main,
            TokenKind::Colon,
            TokenKind::Output,
            TokenKind::LParen,
            TokenKind::Str,
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::End,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_reads_from_any_reader() {
    let source = std::io::Cursor::new(b"a -> b".to_vec());
    let kinds: Vec<_> = Scanner::new(source).map(|t| t.unwrap().kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Id, TokenKind::Arrow, TokenKind::Id, TokenKind::Eof]
    );
}

proptest! {
    #[test]
    fn prop_integer_literal_scans_to_its_value(
        value in 0..=i32::MAX,
        before in "[ \t\n\r]{0,4}",
        after in "[ \t\n\r]{0,4}",
    ) {
        let source = format!("{before}{value}{after}");
        let mut scanner = Scanner::from_source(&source);
        let token = scanner.next_token().unwrap();
        prop_assert_eq!(token.kind, TokenKind::Num);
        prop_assert_eq!(token.number(), Some(value));
        prop_assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Eof);
        prop_assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn prop_one_character_off_keyword_is_identifier(
        index in 0..RESERVED_WORDS.len(),
        position in any::<prop::sample::Index>(),
        replacement in "[a-z_0-9]",
    ) {
        let (word, kind) = RESERVED_WORDS[index];
        let at = position.index(word.len());
        let mut variant = word.to_string();
        variant.replace_range(at..at + 1, &replacement);
        prop_assume!(variant != word);
        prop_assume!(TokenKind::from_keyword(&variant).is_none());
        // A leading digit would start a number instead.
        prop_assume!(!variant.starts_with(|c: char| c.is_ascii_digit()));

        let tokens = scan_all(&variant);
        prop_assert_eq!(tokens[0].kind, TokenKind::Id);
        prop_assert_ne!(tokens[0].kind, kind);
        prop_assert_eq!(tokens[0].text(), Some(variant.as_str()));

        let exact = scan_all(word);
        prop_assert_eq!(exact[0].kind, kind);
    }
}

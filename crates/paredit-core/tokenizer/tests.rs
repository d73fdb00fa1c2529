//! Tests for tokenizer functionality

use super::*;

fn kinds(source: &str) -> Vec<(TokenType, &str)> {
    SexpTokenizer::new(source)
        .map(|token| (token.token_type, token.span))
        .collect()
}

#[test]
fn tokenize_simple_list() {
    assert_eq!(
        kinds("(foo bar)"),
        vec![
            (TokenType::Open(DelimiterType::Paren), "("),
            (TokenType::Atom, "foo"),
            (TokenType::Whitespace, " "),
            (TokenType::Atom, "bar"),
            (TokenType::Close(DelimiterType::Paren), ")"),
        ]
    );
}

#[test]
fn tokenize_all_bracket_kinds() {
    let tokens = kinds("[{}]");
    assert_eq!(tokens[0].0, TokenType::Open(DelimiterType::Bracket));
    assert_eq!(tokens[1].0, TokenType::Open(DelimiterType::Brace));
    assert_eq!(tokens[2].0, TokenType::Close(DelimiterType::Brace));
    assert_eq!(tokens[3].0, TokenType::Close(DelimiterType::Bracket));
}

#[test]
fn commas_and_newlines_are_whitespace() {
    assert_eq!(
        kinds("a,\n b"),
        vec![
            (TokenType::Atom, "a"),
            (TokenType::Whitespace, ",\n "),
            (TokenType::Atom, "b"),
        ]
    );
}

#[test]
fn brackets_inside_strings_are_opaque() {
    assert_eq!(
        kinds(r#"("(]" x)"#),
        vec![
            (TokenType::Open(DelimiterType::Paren), "("),
            (TokenType::String, r#""(]""#),
            (TokenType::Whitespace, " "),
            (TokenType::Atom, "x"),
            (TokenType::Close(DelimiterType::Paren), ")"),
        ]
    );
}

#[test]
fn escaped_quote_does_not_end_string() {
    let tokens = kinds(r#""a\"b" c"#);
    assert_eq!(tokens[0], (TokenType::String, r#""a\"b""#));
    assert_eq!(tokens[2], (TokenType::Atom, "c"));
}

#[test]
fn line_comment_stops_before_newline() {
    assert_eq!(
        kinds("; (hi\n)"),
        vec![
            (TokenType::LineComment, "; (hi"),
            (TokenType::Whitespace, "\n"),
            (TokenType::Close(DelimiterType::Paren), ")"),
        ]
    );
}

#[test]
fn block_comment_is_one_token() {
    assert_eq!(
        kinds("#| ( |# x"),
        vec![
            (TokenType::BlockComment, "#| ( |#"),
            (TokenType::Whitespace, " "),
            (TokenType::Atom, "x"),
        ]
    );
}

#[test]
fn character_literals_are_atoms() {
    assert_eq!(
        kinds(r"(\( \) \space)"),
        vec![
            (TokenType::Open(DelimiterType::Paren), "("),
            (TokenType::Atom, r"\("),
            (TokenType::Whitespace, " "),
            (TokenType::Atom, r"\)"),
            (TokenType::Whitespace, " "),
            (TokenType::Atom, r"\space"),
            (TokenType::Close(DelimiterType::Paren), ")"),
        ]
    );
}

#[test]
fn reader_macro_prefixes() {
    let cases = [
        ("'a", "'"),
        ("`a", "`"),
        ("~a", "~"),
        ("~@a", "~@"),
        ("@a", "@"),
        ("^:m a", "^"),
        ("#_a", "#_"),
        ("#'a", "#'"),
        ("#?(:clj 1)", "#?"),
        ("#?@(:clj [1])", "#?@"),
        ("#=(+ 1)", "#="),
        ("#^m a", "#^"),
        ("#(inc %)", "#"),
        ("#{1}", "#"),
        ("#inst \"2020\"", "#inst"),
        ("#:user{:a 1}", "#:user"),
    ];
    for (source, marker) in cases {
        let tokens = kinds(source);
        assert_eq!(tokens[0], (TokenType::ReaderMacro, marker), "{source}");
    }
}

#[test]
fn symbolic_values_are_atoms() {
    assert_eq!(kinds("##Inf"), vec![(TokenType::Atom, "##Inf")]);
    assert_eq!(kinds("##NaN)")[0], (TokenType::Atom, "##NaN"));
}

#[test]
fn regex_literal_is_string() {
    assert_eq!(kinds(r#"#"\d+""#), vec![(TokenType::String, r#"#"\d+""#)]);
}

#[test]
fn atoms_may_contain_quote_characters() {
    assert_eq!(kinds("a'b"), vec![(TokenType::Atom, "a'b")]);
    assert_eq!(kinds("x#")[0], (TokenType::Atom, "x#"));
}

#[test]
fn unterminated_string_covers_rest_of_buffer() {
    let source = "(a \"b c)";
    let tokens = SexpTokenizer::new(source).tokenize_all();
    let last = tokens[tokens.len() - 1];
    assert_eq!(last.span, "\"b c)");
    assert!(!last.is_terminated());
}

#[test]
fn byte_order_mark_is_whitespace() {
    let tokens = kinds("\u{FEFF}(a)");
    assert_eq!(tokens[0], (TokenType::Whitespace, "\u{FEFF}"));
}

#[test]
fn offsets_are_byte_offsets() {
    let tokens = SexpTokenizer::new("(λ x)").tokenize_all();
    assert_eq!(tokens[1].offset, 1);
    assert_eq!(tokens[2].offset, 3);
    assert_eq!(tokens[3].offset, 4);
}

#[test]
fn tokens_cover_source_exactly() {
    let source = "(ns foo) #_ #?(:cljs \"x\\\"\") ;c\n#{[1 2]} \\a 'b";
    let tokens = SexpTokenizer::new(source).tokenize_all();
    let mut offset = 0;
    for token in &tokens {
        assert_eq!(token.offset, offset);
        assert!(!token.is_empty());
        offset = token.end();
    }
    assert_eq!(offset, source.len());
}

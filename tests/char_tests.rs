use parsekit::{
    any_in, char, char_matcher, digit, letter, lowercase, pattern, pattern_with, range,
    uppercase, whitespace, word, CharMatcher, Value,
};
use rstest::rstest;

#[test]
fn char_recognizes_one_code_point() {
    let parser = char('a');
    assert_eq!(parser.parse("ab").map(|s| s.value), Ok(Value::Char('a')));
    let failure = parser.parse("b").expect_err("mismatch rejected");
    assert_eq!(failure.message, "'a' expected");
}

#[test]
fn range_is_inclusive() {
    let parser = range('b', 'd');
    assert!(parser.accept("b"));
    assert!(parser.accept("d"));
    assert!(!parser.accept("a"));
    assert!(!parser.accept("e"));
}

#[test]
#[should_panic(expected = "inverted")]
fn range_rejects_inverted_bounds() {
    let _ = range('z', 'a');
}

#[test]
fn digit_and_letter_classes() {
    assert!(digit().accept("5"));
    assert!(!digit().accept("a"));
    assert!(letter().accept("a"));
    assert!(letter().accept("Z"));
    assert!(!letter().accept("5"));
}

#[test]
fn case_classes() {
    assert!(lowercase().accept("a"));
    assert!(!lowercase().accept("A"));
    assert!(uppercase().accept("A"));
    assert!(!uppercase().accept("a"));
}

#[test]
fn word_accepts_letters_digits_and_underscore() {
    for input in ["a", "Z", "7", "_"] {
        assert!(word().accept(input), "word should accept {input:?}");
    }
    assert!(!word().accept("-"));
}

#[test]
fn whitespace_covers_the_unicode_set() {
    for input in [" ", "\t", "\n", "\r", "\u{00A0}", "\u{2003}", "\u{3000}", "\u{FEFF}"] {
        assert!(whitespace().accept(input), "whitespace should accept {input:?}");
    }
    assert!(!whitespace().accept("a"));
}

#[test]
fn any_in_matches_set_members() {
    let parser = any_in("cba");
    assert!(parser.accept("a"));
    assert!(parser.accept("c"));
    assert!(!parser.accept("d"));
}

#[test]
fn char_matcher_composes() {
    let matcher = CharMatcher::AnyOf(vec![
        CharMatcher::range('0', '3'),
        CharMatcher::Single('9'),
    ]);
    let parser = char_matcher(matcher.clone(), "small digit expected");
    assert!(parser.accept("2"));
    assert!(parser.accept("9"));
    assert!(!parser.accept("5"));

    let negated = char_matcher(matcher.negate(), "anything else expected");
    assert!(negated.accept("5"));
    assert!(!negated.accept("2"));
}

#[rstest]
#[case("a-z", 'm', true)]
#[case("a-z", 'A', false)]
#[case("^a-z", 'A', true)]
#[case("^a-z", 'm', false)]
#[case("a-z0-9_", '_', true)]
#[case("a-z0-9_", '7', true)]
#[case("a-z0-9_", '-', false)]
#[case("abc", 'b', true)]
#[case("abc", 'd', false)]
#[case("a-", '-', true)]
#[case("-z", 'z', true)]
#[case("^", '^', true)]
fn pattern_compiles_bracket_expressions(
    #[case] expression: &str,
    #[case] input: char,
    #[case] expected: bool,
) {
    assert_eq!(
        pattern(expression).accept(&input.to_string()),
        expected,
        "pattern {expression:?} on {input:?}"
    );
}

#[test]
fn pattern_reports_with_bracketed_message() {
    let failure = pattern("a-z").parse("A").expect_err("uppercase rejected");
    assert_eq!(failure.message, "[a-z] expected");
}

#[test]
fn pattern_with_uses_custom_message() {
    let failure = pattern_with("0-9", "octet expected")
        .parse("x")
        .expect_err("letter rejected");
    assert_eq!(failure.message, "octet expected");
}

#[test]
#[should_panic(expected = "inverted")]
fn pattern_rejects_inverted_ranges() {
    let _ = pattern("z-a");
}

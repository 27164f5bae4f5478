use parsekit::{char, letter, Value, UNBOUNDED};

fn char_list(values: &str) -> Value {
    Value::List(values.chars().map(Value::Char).collect())
}

#[test]
fn star_accepts_empty_input() {
    let success = letter().star().parse("").expect("star never fails");
    assert_eq!(success.position(), 0);
    assert_eq!(success.value, Value::List(Vec::new()));
}

#[test]
fn plus_requires_one_element() {
    assert!(letter().plus().accept("a"));
    assert!(!letter().plus().accept("1"));
}

#[test]
fn repeat_honors_min_and_max() {
    let parser = char('a').repeat(2, 3);
    let success = parser.parse("aaaa").expect("three accepted");
    assert_eq!(success.position(), 3);
    assert_eq!(success.value, char_list("aaa"));

    let failure = parser.parse("a").expect_err("one is too few");
    assert_eq!(failure.message, "'a' expected");
    assert_eq!(failure.position(), 1);
}

#[test]
fn times_matches_exact_count() {
    let parser = char('a').times(2);
    let success = parser.parse("aaa").expect("two accepted");
    assert_eq!(success.position(), 2);
    assert!(!parser.accept("a"));
}

#[test]
#[should_panic(expected = "inverted")]
fn repeat_rejects_inverted_range() {
    let _ = char('a').repeat(3, 2);
}

#[test]
fn possessive_repetition_never_gives_back() {
    // the star blindly consumes every 'a', leaving none for the sequence tail
    let parser = char('a').star().seq(&char('a'));
    assert!(!parser.accept("aaa"));
}

#[test]
fn greedy_backtracks_until_limit_accepts() {
    let limit = char('a').seq(&char('b'));
    let parser = char('a').star_greedy(&limit);
    let success = parser.parse("aaab").expect("limit reachable");
    assert_eq!(success.position(), 2);
    assert_eq!(success.value, char_list("aa"));
}

#[test]
fn greedy_keeps_mandatory_elements() {
    let parser = char('a').repeat_greedy(&char('b'), 2, UNBOUNDED);
    let failure = parser.parse("aaa").expect_err("limit never accepts");
    assert_eq!(failure.message, "'b' expected");
}

#[test]
fn greedy_returns_limit_failure_when_nothing_matches() {
    let parser = char('a').star_greedy(&char('x'));
    let failure = parser.parse("bbb").expect_err("limit fails at start");
    assert_eq!(failure.message, "'x' expected");
    assert_eq!(failure.position(), 0);
}

#[test]
fn greedy_accepts_empty_match_when_limit_accepts() {
    let parser = char('a').star_greedy(&char('b'));
    let success = parser.parse("b").expect("empty repetition accepted");
    assert_eq!(success.position(), 0);
    assert_eq!(success.value, Value::List(Vec::new()));
}

#[test]
fn lazy_stops_as_soon_as_limit_accepts() {
    let parser = char('a').star_lazy(&char('b'));
    let success = parser.parse("aaab").expect("limit reachable");
    assert_eq!(success.position(), 3);
    assert_eq!(success.value, char_list("aaa"));
}

#[test]
fn lazy_accepts_empty_match_when_limit_accepts_at_start() {
    let parser = char('a').star_lazy(&char('a'));
    let success = parser.parse("a").expect("limit accepts immediately");
    assert_eq!(success.position(), 0);
    assert_eq!(success.value, Value::List(Vec::new()));
}

#[test]
fn lazy_fails_with_limit_failure_at_max() {
    let parser = char('a').repeat_lazy(&char('b'), 0, 2);
    let failure = parser.parse("aaab").expect_err("limit unreachable within max");
    assert_eq!(failure.message, "'b' expected");
    assert_eq!(failure.position(), 2);
}

#[test]
fn lazy_fails_with_limit_failure_when_delegate_dries_up() {
    let parser = char('a').star_lazy(&char('b'));
    let failure = parser.parse("aac").expect_err("neither limit nor delegate");
    assert_eq!(failure.message, "'b' expected");
    assert_eq!(failure.position(), 2);
}

#[test]
fn limit_is_not_consumed() {
    let greedy = char('a').star_greedy(&char('b')).seq(&char('b'));
    assert!(greedy.accept("aab"));
    let lazy = char('a').star_lazy(&char('b')).seq(&char('b'));
    assert!(lazy.accept("aab"));
}

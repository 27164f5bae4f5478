use parsekit::{digit, letter, Token, Value};

#[test]
fn token_captures_the_source_slice() {
    let parser = digit().plus().token();
    let success = parser.parse("42x").expect("digits expected");
    let token = match success.value {
        Value::Token(token) => token,
        other => panic!("expected token, got {other:?}"),
    };
    assert_eq!(token.start(), 0);
    assert_eq!(token.stop(), 2);
    assert_eq!(token.length(), 2);
    assert_eq!(token.text(), "42");
    assert_eq!(
        token.value(),
        &Value::List(vec![Value::Char('4'), Value::Char('2')])
    );
}

#[test]
fn token_round_trip_preserves_value_and_position() {
    let parser = digit().plus();
    let direct = parser.parse("42").expect("digits expected");
    let via_token = parser
        .token()
        .map(|value| match value {
            Value::Token(token) => token.into_value(),
            other => other,
        })
        .parse("42")
        .expect("digits expected");
    assert_eq!(direct.position(), via_token.position());
    assert_eq!(direct.value, via_token.value);
}

#[test]
fn flatten_round_trip_returns_the_matched_substring() {
    let input = "abc123";
    let success = letter().plus().flatten().parse(input).expect("letters");
    assert_eq!(success.value, Value::Str(input[0..3].to_owned()));
}

#[test]
fn token_equality_is_structural() {
    let a = digit().token().parse("1").expect("digit").value;
    let b = digit().token().parse("1x").expect("digit").value;
    assert_eq!(a, b);
    let c = digit().token().parse("2").expect("digit").value;
    assert_ne!(a, c);
}

#[test]
fn line_and_column_are_one_based() {
    let buffer = "one\ntwo\r\nthree\rfour";
    assert_eq!(Token::line_and_column_of(buffer, 0), (1, 1));
    assert_eq!(Token::line_and_column_of(buffer, 2), (1, 3));
    assert_eq!(Token::line_and_column_of(buffer, 3), (1, 4));
    assert_eq!(Token::line_and_column_of(buffer, 4), (2, 1));
    assert_eq!(Token::line_and_column_of(buffer, 5), (2, 2));
    assert_eq!(Token::line_and_column_of(buffer, 9), (3, 1));
    assert_eq!(Token::line_and_column_of(buffer, 15), (4, 1));
    assert_eq!(Token::line_and_column_of(buffer, 19), (4, 5));
}

#[test]
fn token_reports_its_own_line_and_column() {
    let parser = letter().plus().flatten().token();
    let matches = parser.matches_skipping("ab\ncd");
    let starts: Vec<_> = matches
        .iter()
        .filter_map(Value::as_token)
        .map(Token::line_and_column)
        .collect();
    assert_eq!(starts, vec![(1, 1), (2, 1)]);
}

//! Bracket-expression patterns compiled into character matchers.
//!
//! A pattern is an optional leading `^` for negation followed by one or
//! more items, each a single character or an `a-b` range: `pattern("a-z_")`,
//! `pattern("^0-9")`. The compiler is itself written with the library and
//! built once per thread.

use once_cell::unsync::OnceCell;

use super::{char, char_matcher, CharMatcher};
use crate::parser::{any, Parser};
use crate::value::Value;

pub fn pattern(expression: &str) -> Parser {
    pattern_with(expression, &format!("[{expression}] expected"))
}

/// Like [`pattern`] with an explicit failure message.
///
/// # Panics
///
/// Panics when `expression` is malformed or contains an inverted range.
pub fn pattern_with(expression: &str, message: &str) -> Parser {
    char_matcher(compile(expression), message)
}

thread_local! {
    static COMPILER: OnceCell<Parser> = OnceCell::new();
}

fn compile(expression: &str) -> CharMatcher {
    COMPILER.with(|cell| {
        let compiler = cell.get_or_init(compiler);
        match compiler.parse(expression) {
            Ok(success) => fold(success.value),
            Err(failure) => panic!("malformed character pattern '{expression}': {failure}"),
        }
    })
}

/// `'^'? (char '-' char | char)+`, with each production tagged for [`fold`].
fn compiler() -> Parser {
    let range = any().seq(&char('-')).seq(&any()).map(|value| match value {
        Value::List(items) if items.len() == 3 => Value::List(vec![
            Value::Str("range".into()),
            items[0].clone(),
            items[2].clone(),
        ]),
        other => other,
    });
    let single = any().map(|value| Value::List(vec![Value::Str("single".into()), value]));
    let positive = range.or(&single).plus().map(|value| match value {
        Value::List(items) => {
            let mut tagged = vec![Value::Str("any".into())];
            tagged.extend(items);
            Value::List(tagged)
        }
        other => other,
    });
    let negative = char('^').seq(&positive).map(|value| match value {
        Value::List(items) if items.len() == 2 => {
            Value::List(vec![Value::Str("not".into()), items[1].clone()])
        }
        other => other,
    });
    negative.or(&positive).end()
}

fn fold(value: Value) -> CharMatcher {
    let Value::List(mut items) = value else {
        panic!("unexpected shape in compiled character pattern");
    };
    let tag = match items.first() {
        Some(Value::Str(tag)) => tag.clone(),
        _ => panic!("unexpected shape in compiled character pattern"),
    };
    match tag.as_str() {
        "single" => match items.swap_remove(1) {
            Value::Char(value) => CharMatcher::Single(value),
            _ => panic!("unexpected shape in compiled character pattern"),
        },
        "range" => match (items.get(1), items.get(2)) {
            (Some(Value::Char(lo)), Some(Value::Char(hi))) => CharMatcher::range(*lo, *hi),
            _ => panic!("unexpected shape in compiled character pattern"),
        },
        "any" => {
            let mut matchers: Vec<CharMatcher> = items.drain(1..).map(fold).collect();
            if matchers.len() == 1 {
                matchers.remove(0)
            } else {
                CharMatcher::AnyOf(matchers)
            }
        }
        "not" => fold(items.swap_remove(1)).negate(),
        _ => panic!("unexpected shape in compiled character pattern"),
    }
}

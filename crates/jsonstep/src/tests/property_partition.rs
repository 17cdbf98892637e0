use quickcheck::QuickCheck;

use super::arbitrary::Container;
use crate::{JsonStream, JsonValue, parse_str};

fn tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

fn pad(pads: &[u8], next: &mut usize, out: &mut String) {
    let n = pads.get(*next % pads.len().max(1)).copied().unwrap_or(0);
    *next += 1;
    for i in 0..n % 4 {
        out.push([' ', '\t', '\n', '\r'][usize::from((n >> 2).wrapping_add(i)) % 4]);
    }
}

/// Render `value` with a whitespace run taken from `pads` around every
/// structural token.
fn spaced(value: &JsonValue, pads: &[u8], next: &mut usize, out: &mut String) {
    pad(pads, next, out);
    match value {
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    pad(pads, next, out);
                    out.push(',');
                }
                spaced(item, pads, next, out);
            }
            pad(pads, next, out);
            out.push(']');
        }
        JsonValue::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    pad(pads, next, out);
                    out.push(',');
                }
                pad(pads, next, out);
                out.push_str(&JsonValue::String(key.clone()).to_string());
                pad(pads, next, out);
                out.push(':');
                spaced(item, pads, next, out);
            }
            pad(pads, next, out);
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
    pad(pads, next, out);
}

/// Feeding a document in arbitrary chunks yields the same value as parsing
/// it in one go, and that value is the one that was rendered.
#[test]
fn partition_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: JsonValue, splits: Vec<usize>) -> bool {
        let src = value.to_string();
        let chars: Vec<char> = src.chars().collect();
        let mut stream = JsonStream::<JsonValue>::new();
        let mut idx = 0;
        for s in splits {
            if idx == chars.len() {
                break;
            }
            let end = idx + 1 + s % (chars.len() - idx);
            let chunk: String = chars[idx..end].iter().collect();
            if stream.feed(&chunk).is_err() {
                return false;
            }
            idx = end;
        }
        let rest: String = chars[idx..].iter().collect();
        if stream.feed(&rest).is_err() {
            return false;
        }
        let Ok(streamed) = stream.finish() else {
            return false;
        };
        parse_str(&src).is_ok_and(|bulk| bulk == streamed) && streamed == value
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(JsonValue, Vec<usize>) -> bool);
}

/// Whitespace between structural tokens never changes the result.
#[test]
fn whitespace_insertion_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: JsonValue, pads: Vec<u8>) -> bool {
        let mut src = String::new();
        spaced(&value, &pads, &mut 0, &mut src);
        parse_str(&src).is_ok_and(|parsed| parsed == value)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(JsonValue, Vec<u8>) -> bool);
}

/// Every proper prefix of a container document ends with "unexpected end of
/// data".
#[test]
fn truncated_container_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(container: Container) -> bool {
        let src = container.0.to_string();
        let chars: Vec<char> = src.chars().collect();
        (0..chars.len()).all(|len| {
            let prefix: String = chars[..len].iter().collect();
            let mut stream = JsonStream::<JsonValue>::new();
            stream.feed(&prefix).is_ok() && stream.finish().is_err_and(|err| err.reason().is_end_of_data())
        })
    }

    QuickCheck::new()
        .tests(tests() / 10)
        .quickcheck(prop as fn(Container) -> bool);
}

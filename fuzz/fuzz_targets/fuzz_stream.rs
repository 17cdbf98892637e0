#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use jsonstep::{JsonStream, JsonValue, ParseError, ParserOptions, SurrogateMode};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Number, Value};

/// One run: parser options, chunk lengths in characters, and the text.
#[derive(Debug)]
struct Case {
    options: ParserOptions,
    cuts: Vec<u8>,
    text: String,
}

impl<'a> Arbitrary<'a> for Case {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let flags: u8 = u.arbitrary()?;
        let options = ParserOptions {
            allow_extra_properties: flags & 1 != 0,
            surrogates: if flags & 2 != 0 {
                SurrogateMode::Replace
            } else {
                SurrogateMode::Strict
            },
            allow_byte_order_mark: flags & 4 != 0,
            max_depth: usize::from(u.int_in_range(1..=8u8)?),
        };
        let cuts = u.arbitrary()?;
        // Mostly well-formed documents, sometimes raw text.
        let text = if u.ratio(3, 4)? {
            let value = value(u, 6)?;
            let pad = " \t\r\n".repeat(usize::from(u.int_in_range(0..=2u8)?));
            format!("{pad}{value}{pad}")
        } else {
            u.arbitrary()?
        };
        Ok(Self { options, cuts, text })
    }
}

/// A generated JSON value, at most `depth` containers deep.
fn value(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Value> {
    let pick = if depth == 0 { u.int_in_range(0..=4u8)? } else { u.int_in_range(0..=6u8)? };
    Ok(match pick {
        0 => Value::Null,
        1 => Value::Bool(u.arbitrary()?),
        2 => Value::Number(u.arbitrary::<i64>()?.into()),
        3 => Number::from_f64(u.arbitrary()?).map_or(Value::Null, Value::Number),
        4 => Value::String(u.arbitrary()?),
        5 => {
            let len = u.int_in_range(0..=4usize)?;
            Value::Array((0..len).map(|_| value(u, depth - 1)).collect::<Result<_, _>>()?)
        }
        _ => {
            let len = u.int_in_range(0..=4usize)?;
            let mut members = Map::new();
            for _ in 0..len {
                members.insert(u.arbitrary()?, value(u, depth - 1)?);
            }
            Value::Object(members)
        }
    })
}

/// Split `text` into pieces of `cuts` characters, the rest in one piece.
fn chunks<'t>(text: &'t str, cuts: &[u8]) -> Vec<&'t str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    for &cut in cuts {
        if rest.is_empty() {
            break;
        }
        let at = rest.char_indices().nth(usize::from(cut)).map_or(rest.len(), |(i, _)| i);
        let (head, tail) = rest.split_at(at);
        pieces.push(head);
        rest = tail;
    }
    pieces.push(rest);
    pieces
}

fn parse(pieces: &[&str], options: ParserOptions) -> Result<JsonValue, ParseError> {
    let mut stream = JsonStream::<JsonValue>::with_options(options);
    for piece in pieces {
        stream.feed(piece)?;
    }
    stream.finish()
}

fuzz_target!(|case: Case| {
    let whole = parse(&[&case.text], case.options);
    let split = parse(&chunks(&case.text, &case.cuts), case.options);
    assert_eq!(whole, split, "chunking changed the outcome of {:?}", case.text);

    // Whatever is accepted renders as JSON that serde_json accepts too.
    if let Ok(value) = whole {
        let rendered = value.to_string();
        if let Err(err) = serde_json::from_str::<Value>(&rendered) {
            // Out-of-range floats are valid JSON that serde_json refuses.
            assert!(err.to_string().contains("out of range"), "{rendered}: {err}");
        }
    }
});

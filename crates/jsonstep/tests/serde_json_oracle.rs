#![expect(missing_docs)]

use jsonstep::{JsonStream, JsonValue};
use rstest::rstest;

fn ours(input: &str, chunk: usize) -> Result<JsonValue, jsonstep::ParseError> {
    let mut stream = JsonStream::<JsonValue>::new();
    let chars: Vec<char> = input.chars().collect();
    for piece in chars.chunks(chunk.max(1)) {
        stream.feed(&piece.iter().collect::<String>())?;
    }
    stream.finish()
}

#[rstest]
#[case("null")]
#[case("[true, false, null]")]
#[case("123456789012345678901234567890")]
#[case("[0.5, -1.25e-3, 6E+2, 0e0]")]
#[case(r#""\"\\\/\b\f\n\r\té 😂""#)]
#[case(r#"{"nested": {"list": [[], {}, [{"x": "y"}]]}, "n": 2147483648}"#)]
#[case(" \n\t\r[ 1 ,2\n]\r\n")]
fn accepted_values_agree(#[case] input: &str, #[values(1, 3, 64)] chunk: usize) {
    let expected: serde_json::Value = serde_json::from_str(input).unwrap();
    let value = ours(input, chunk).unwrap();
    let rendered: serde_json::Value = serde_json::from_str(&value.to_string()).unwrap();
    assert_eq!(rendered, expected, "{input}");
}

#[rstest]
#[case("")]
#[case("[")]
#[case("[1,]")]
#[case(r#"{"a":1,}"#)]
#[case("01")]
#[case("1.")]
#[case("-")]
#[case(".5")]
#[case("+1")]
#[case("1e")]
#[case("tru")]
#[case("nulll")]
#[case(r#""\x""#)]
#[case("\"\u{1}\"")]
#[case(r#""\ud800""#)]
#[case("[1] [2]")]
#[case("{1: 2}")]
#[case("'a'")]
fn rejected_inputs_agree(#[case] input: &str) {
    assert!(serde_json::from_str::<serde_json::Value>(input).is_err(), "{input}");
    assert!(ours(input, 1).is_err(), "{input}");
}

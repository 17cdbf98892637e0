use indexmap::IndexMap;
use num_bigint::BigInt;
use quickcheck_macros::quickcheck;
use rstest::rstest;

use crate::{Decimal, JsonStream, JsonValue, ParserOptions, SurrogateMode, parse_str, parse_str_as};

#[rstest]
#[case("null", "null")]
#[case(" true ", "true")]
#[case("false", "false")]
#[case("\"\"", "\"\"")]
#[case("[]", "[]")]
#[case("{}", "{}")]
#[case("[ 1 , -2 , 3.50 , 4e2 ]", "[1,-2,3.50,4e2]")]
#[case(r#"{"a":{"b":[{"c":null}]}}"#, r#"{"a":{"b":[{"c":null}]}}"#)]
#[case("\r\n\t{ \"k\" :\n\"v\" }\n", r#"{"k":"v"}"#)]
fn parses_to_compact_form(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(parse_str(input).unwrap().to_string(), expected);
}

#[test]
fn zero_in_three_categories() {
    assert_eq!(parse_str("0").unwrap(), JsonValue::Int(0));
    let JsonValue::Decimal(point) = parse_str("0.0").unwrap() else {
        panic!("0.0 should be a decimal");
    };
    let JsonValue::Decimal(exponent) = parse_str("0e0").unwrap() else {
        panic!("0e0 should be a decimal");
    };
    assert!(point.is_zero() && exponent.is_zero());
    assert_eq!((point.scale(), exponent.scale()), (1, 0));
    assert_ne!(point, exponent);
}

#[rstest]
#[case("2147483647", JsonValue::Int(i32::MAX))]
#[case("-2147483648", JsonValue::Int(i32::MIN))]
#[case("2147483648", JsonValue::Long(2_147_483_648))]
#[case("-9223372036854775808", JsonValue::Long(i64::MIN))]
#[case(
    "9223372036854775808",
    JsonValue::BigInteger("9223372036854775808".parse().unwrap())
)]
#[case("1.5", JsonValue::Decimal(Decimal::new(BigInt::from(15), 1)))]
fn integer_categories(#[case] input: &str, #[case] expected: JsonValue) {
    assert_eq!(parse_str(input).unwrap(), expected);
}

#[quickcheck]
fn integers_keep_category_and_value(n: i64) -> bool {
    parse_str(&n.to_string()) == Ok(JsonValue::from(n))
}

#[quickcheck]
fn typed_i32_accepts_exactly_its_range(n: i64) -> bool {
    parse_str_as::<i32>(&n.to_string()).ok() == i32::try_from(n).ok()
}

#[test]
fn surrogate_pair_equals_raw_emoji() {
    assert_eq!(parse_str(r#""\uD83D\uDE02""#).unwrap(), JsonValue::from("😂"));
    assert_eq!(parse_str(r#""😂""#).unwrap(), JsonValue::from("😂"));
}

#[test]
fn replacement_mode_substitutes_lone_surrogates() {
    let mut stream = JsonStream::<String>::with_options(ParserOptions {
        surrogates: SurrogateMode::Replace,
        ..Default::default()
    });
    stream.feed(r#""a\uDE02b""#).unwrap();
    assert_eq!(stream.finish().unwrap(), "a\u{FFFD}b");

    // Valid JSON that strict mode refuses.
    let input = r#""\uD800""#;
    assert!(parse_str(input).is_err());
    let mut stream = JsonStream::<String>::with_options(ParserOptions {
        surrogates: SurrogateMode::Replace,
        ..Default::default()
    });
    stream.feed(input).unwrap();
    assert_eq!(stream.finish().unwrap(), "\u{FFFD}");
}

#[test]
fn typed_scalars() {
    assert_eq!(parse_str_as::<i8>("-128").unwrap(), -128);
    assert_eq!(parse_str_as::<i16>("300").unwrap(), 300);
    assert_eq!(parse_str_as::<i64>("9007199254740993").unwrap(), 9_007_199_254_740_993);
    assert!((parse_str_as::<f64>("0.1").unwrap() - 0.1).abs() < f64::EPSILON);
    assert!((parse_str_as::<f32>("1e1").unwrap() - 10.0).abs() < f32::EPSILON);
    assert_eq!(parse_str_as::<BigInt>("123456789012345678901234567890").unwrap().to_string(), "123456789012345678901234567890");
    assert_eq!(parse_str_as::<Decimal>("7").unwrap(), Decimal::from(7));
    assert_eq!(parse_str_as::<char>(r#""é""#).unwrap(), 'é');
    assert!(parse_str_as::<bool>("true").unwrap());
    assert_eq!(parse_str_as::<Option<String>>("null").unwrap(), None);
}

#[test]
fn typed_containers() {
    assert_eq!(parse_str_as::<Vec<i32>>("[1,2,3]").unwrap(), [1, 2, 3]);
    assert_eq!(
        parse_str_as::<Vec<Option<bool>>>("[true, null, false]").unwrap(),
        [Some(true), None, Some(false)]
    );
    let map = parse_str_as::<IndexMap<String, Vec<i64>>>(r#"{"b": [1], "a": []}"#).unwrap();
    assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a"]);
    assert_eq!(map["b"], [1]);
    let nested = parse_str_as::<Vec<JsonValue>>(r#"[{"x": 1}, "y"]"#).unwrap();
    assert_eq!(nested[0].get("x"), Some(&JsonValue::Int(1)));
}

#[rstest]
#[case::i8_overflow("128", "cannot deserialize 128 as i8 at 1:4")]
#[case::decimal_as_integer("[1.5]", "[0]: cannot deserialize 1.5 as i8 at 1:5")]
#[case::null_as_integer("null", "cannot deserialize null as i8 at 1:4")]
#[case::object_as_integer("{}", "cannot deserialize object as i8 at 1:1")]
fn typed_mismatches(#[case] input: &str, #[case] msg: &str) {
    let err = if input.starts_with('[') {
        parse_str_as::<Vec<i8>>(input).map(drop).unwrap_err()
    } else {
        parse_str_as::<i8>(input).map(drop).unwrap_err()
    };
    assert_eq!(err.to_string(), msg);
}

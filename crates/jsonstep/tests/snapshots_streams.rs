#![expect(missing_docs)]

use core::fmt::Write;
use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;
use jsonstep::{ArrayStream, FromJson, JsonStream, JsonValue};

fn render_elements(chunks: &[&str]) -> String {
    let delivered = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&delivered);
    let mut stream = ArrayStream::new(move |v: JsonValue| sink.borrow_mut().push(v.to_string()));
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        stream.feed(chunk).expect("feed error");
        let batch: Vec<String> = delivered.borrow_mut().drain(..).collect();
        writeln!(
            out,
            "#{i} count={} complete={} [{}]",
            stream.count(),
            stream.is_complete(),
            batch.join(", ")
        )
        .unwrap();
    }
    stream.finish().expect("finish error");
    out
}

fn error<T: FromJson>(input: &str) -> String {
    let mut stream = JsonStream::<T>::new();
    if let Err(err) = stream.feed(input) {
        return err.to_string();
    }
    match stream.finish() {
        Ok(_) => "ok".into(),
        Err(err) => err.to_string(),
    }
}

#[test]
fn snapshot_element_delivery_per_chunk() {
    let chunks = [
        r#"[{"id":1,"tags":["a""#,
        r#"]},"#,
        r#" 2.50, "x\u00"#,
        r#"41", ["#,
        r#"]]"#,
    ];
    insta::assert_snapshot!(render_elements(&chunks), @r##"
    #0 count=0 complete=false []
    #1 count=1 complete=false [{"id":1,"tags":["a"]}]
    #2 count=2 complete=false [2.50]
    #3 count=3 complete=false ["xA"]
    #4 count=4 complete=true [[]]
    "##);
}

#[test]
fn snapshot_typed_errors() {
    let mut out = String::new();
    writeln!(out, "{}", error::<Vec<i16>>("[1, 70000]")).unwrap();
    writeln!(out, "{}", error::<IndexMap<String, bool>>(r#"{"a": 1}"#)).unwrap();
    writeln!(out, "{}", error::<char>(r#""ab""#)).unwrap();
    writeln!(out, "{}", error::<Option<Vec<String>>>("[null]")).unwrap();
    writeln!(out, "{}", error::<Vec<JsonValue>>("{}")).unwrap();
    writeln!(out, "{}", error::<Option<Vec<Option<String>>>>("[null]")).unwrap();
    insta::assert_snapshot!(out, @r##"
    [1]: cannot deserialize 70000 as i16 at 1:10
    a: cannot deserialize 1 as bool at 1:8
    cannot deserialize "ab" as char at 1:4
    [0]: cannot deserialize null as String at 1:5
    cannot deserialize object as Vec<JsonValue> at 1:1
    ok
    "##);
}

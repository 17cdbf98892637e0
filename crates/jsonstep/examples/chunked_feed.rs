//! Processes a JSON array of build events while it is still arriving.
//!
//! The payload is fed to an [`ArrayStream`] in small, irregular chunks, the
//! way a chunked HTTP body or a socket would deliver it. Each event is
//! materialized into a typed `BuildEvent` and handed to the consumer as soon
//! as its closing `}` has been seen, so the first events are reported before
//! the rest of the array exists.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsonstep --example chunked_feed
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use std::sync::{Arc, OnceLock};

use jsonstep::{ArrayStream, FromJson, ObjectSchema, Parameter, SchemaBuilder, Target};

#[derive(Debug)]
struct BuildEvent {
    step: String,
    status: String,
    duration_ms: Option<i64>,
    warnings: Vec<String>,
}

impl FromJson for BuildEvent {
    fn target() -> Target {
        static SCHEMA: OnceLock<Arc<ObjectSchema>> = OnceLock::new();
        Target::Object(Arc::clone(SCHEMA.get_or_init(|| {
            SchemaBuilder::<BuildEvent>::new("BuildEvent")
                .constructor(
                    [
                        Parameter::new::<String>("step"),
                        Parameter::new::<String>("status"),
                        Parameter::new::<Option<i64>>("duration_ms").alias("durationMs"),
                    ],
                    |args| {
                        Ok(BuildEvent {
                            step: args.take("step")?,
                            status: args.take("status")?,
                            duration_ms: args.take("duration_ms")?,
                            warnings: Vec::new(),
                        })
                    },
                )
                .property("warnings", |e: &mut BuildEvent, w: Vec<String>| e.warnings = w)
                .ignore("host")
                .build()
        })))
    }
}

fn main() {
    // In real life this would come from the network.
    let simulated_stream: [&str; 7] = [
        r#"[{"step":"fetch","sta"#,
        r#"tus":"ok","durationMs":412},"#,
        r#" {"step":"compile","status":"ok","duration_ms":9"#,
        r#"120,"warnings":["unused variable `x`"]}"#,
        r#", {"step":"test","status":"fail","host":{"name":"ci-3"}"#,
        r#"}, {"step":"publish","status":"skipped","duration_ms":null}"#,
        "]\n",
    ];

    let mut failures = 0;
    let mut stream = ArrayStream::new(|event: BuildEvent| {
        let duration = event
            .duration_ms
            .map_or_else(|| "-".to_string(), |ms| format!("{ms} ms"));
        println!("{:<8} {:<8} {duration}", event.step, event.status);
        for warning in &event.warnings {
            println!("         warning: {warning}");
        }
        if event.status == "fail" {
            failures += 1;
        }
    });

    for (i, chunk) in simulated_stream.iter().enumerate() {
        if let Err(err) = stream.feed(chunk) {
            eprintln!("chunk {i}: {err}");
            return;
        }
        println!("-- chunk {i} done, {} events so far", stream.count());
    }

    match stream.finish().map(drop) {
        Ok(()) => println!("{failures} failed step(s)"),
        Err(err) => eprintln!("{err}"),
    }
}

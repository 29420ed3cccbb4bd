use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;

use logfield_api::{ConvertError, Converter, Declared, Handler, Recognizer, TypeKey, short_type_name};
use serde_json::Value;

type BoxError = Box<dyn Error + Send + Sync>;

/// Render an error the way it would appear in a crash report.
///
/// Without a captured backtrace this is exactly `"{name}: {error}"`. With one,
/// the trimmed frames come first, then the headline, then one
/// `Caused by: ..` line per source.
pub fn describe(name: &str, error: &(dyn Error + 'static), backtrace: Option<&Backtrace>) -> String {
    let headline = format!("{name}: {error}");
    let Some(trace) = backtrace.filter(|bt| bt.status() == BacktraceStatus::Captured) else {
        return headline;
    };
    let mut out = format!("{}\n{headline}", trace.to_string().trim_end());
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str(&format!("\nCaused by: {cause}"));
        source = cause.source();
    }
    out
}

fn error_shape() -> Handler {
    Handler::shape(
        "error",
        "error",
        |s| s.as_error().is_some(),
        |subject| {
            let view = subject
                .as_error()
                .ok_or_else(|| ConvertError::mismatch("error", subject.type_name()))?;
            let name = short_type_name(subject.type_name());
            Ok(Value::String(describe(&name, view.error(), view.backtrace())))
        },
    )
}

/// Handler for one concrete error type. Keyed like [`Handler::exact`], but
/// the converter still sees the subject, so an attached backtrace is kept.
fn exact_error<E: Any>(name: &str, label: &'static str, as_error: fn(&E) -> &(dyn Error + 'static)) -> Handler {
    let key = TypeKey::of::<E>();
    let recognizer = Recognizer::new(format!("{name}::recognize"), Declared::Exact(key), |subject| {
        subject.is::<E>()
    });
    let converter = Converter::new(format!("{name}::convert"), Declared::Exact(key), move |subject| {
        let error = subject
            .downcast_ref::<E>()
            .ok_or_else(|| ConvertError::mismatch(key.name(), subject.type_name()))?;
        let backtrace = subject.as_error().and_then(|view| view.backtrace());
        Ok(Value::String(describe(label, as_error(error), backtrace)))
    });
    Handler::from_parts(name, recognizer, converter)
}

fn io_source(err: &std::io::Error) -> &(dyn Error + 'static) {
    err
}

fn boxed_source(err: &BoxError) -> &(dyn Error + 'static) {
    &**err
}

fn anyhow_error(err: &anyhow::Error) -> Value {
    let error: &(dyn Error + 'static) = &**err;
    Value::String(describe("anyhow::Error", error, Some(err.backtrace())))
}

/// Exact error types first, then any subject carrying an error.
pub fn handlers() -> Vec<Handler> {
    vec![
        exact_error::<std::io::Error>("io_error", "io::Error", io_source),
        Handler::exact::<anyhow::Error, _>("anyhow_error", anyhow_error),
        exact_error::<BoxError>("boxed_error", "Error", boxed_source),
        Handler::exact::<Backtrace, _>("backtrace", |bt| Value::String(bt.to_string().trim().to_string())),
        error_shape(),
    ]
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use logfield_api::Subject;
    use serde_json::json;

    use super::*;

    #[derive(Debug)]
    struct Timeout {
        after_ms: u64,
        source: std::io::Error,
    }

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "gave up after {}ms", self.after_ms)
        }
    }

    impl Error for Timeout {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.source)
        }
    }

    fn timeout() -> Timeout {
        Timeout {
            after_ms: 250,
            source: std::io::Error::other("socket closed"),
        }
    }

    #[test]
    fn without_backtrace_is_headline() {
        let err = timeout();
        let value = error_shape().converter().convert(&Subject::error(&err)).unwrap();
        assert_eq!(value, json!("Timeout: gave up after 250ms"));
    }

    #[test]
    fn captured_backtrace_leads_and_causes_follow() {
        let err = timeout();
        let trace = Backtrace::force_capture();
        let text = describe("Timeout", &err, Some(&trace));
        assert!(text.contains("Timeout: gave up after 250ms"));
        if trace.status() == BacktraceStatus::Captured {
            assert!(text.ends_with("Timeout: gave up after 250ms\nCaused by: socket closed"));
            assert!(text.len() > "Timeout: gave up after 250ms".len());
        }
    }

    #[test]
    fn disabled_backtrace_counts_as_none() {
        let err = timeout();
        let trace = Backtrace::disabled();
        assert_eq!(describe("Timeout", &err, Some(&trace)), "Timeout: gave up after 250ms");
    }

    #[test]
    fn exact_error_types() {
        let handlers = handlers();
        let io = std::io::Error::other("disk full");
        let boxed: BoxError = "plain message".into();
        assert_eq!(handlers[0].converter().convert(&Subject::new(&io)).unwrap(), json!("io::Error: disk full"));
        assert_eq!(handlers[2].converter().convert(&Subject::new(&boxed)).unwrap(), json!("Error: plain message"));
    }

    #[test]
    fn exact_error_types_keep_attached_backtrace() {
        let handlers = handlers();
        let io = std::io::Error::other("disk full");
        let trace = Backtrace::force_capture();
        let subject = Subject::error(&io).with_backtrace(&trace);
        assert_eq!(handlers[0].key(), Some(TypeKey::of::<std::io::Error>()));
        let value = handlers[0].converter().convert(&subject).unwrap();
        let text = value.as_str().unwrap();
        assert!(text.ends_with("io::Error: disk full"));
        if trace.status() == BacktraceStatus::Captured {
            assert!(text.lines().count() > 1);
        }
    }

    #[test]
    fn anyhow_keeps_outer_message() {
        let err = anyhow::Error::new(timeout()).context("fetching quotes");
        let text = anyhow_error(&err);
        let text = text.as_str().unwrap();
        assert!(text.contains("anyhow::Error: fetching quotes"));
    }
}

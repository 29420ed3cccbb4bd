use std::any::{Any, TypeId};
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;

use serde::Serialize;

/// Monomorphized `serde_json::to_value` for the subject's concrete type.
type RecordFn = fn(&dyn Any) -> Option<serde_json::Result<serde_json::Value>>;

/// An error value together with the backtrace captured when it was raised.
#[derive(Clone, Copy)]
pub struct ErrorView<'a> {
    error: &'a (dyn Error + 'static),
    backtrace: Option<&'a Backtrace>,
}

impl<'a> ErrorView<'a> {
    pub fn error(&self) -> &'a (dyn Error + 'static) {
        self.error
    }

    pub fn backtrace(&self) -> Option<&'a Backtrace> {
        self.backtrace
    }

    /// The chain of underlying causes, nearest first.
    pub fn sources(self) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
        std::iter::successors(self.error.source(), |current| {
            let current: &'a (dyn Error + 'static) = *current;
            current.source()
        })
    }
}

/// A value handed to the dispatcher.
///
/// Wraps a borrowed `&dyn Any` with its runtime type name and the optional
/// capabilities the caller attached: canonical text (`Display`),
/// representational text (`Debug`), error introspection, and serde
/// serialization. Structural recognizers and the fallback converter work
/// purely off these capabilities.
#[derive(Clone, Copy)]
pub struct Subject<'a> {
    value: &'a dyn Any,
    type_name: &'static str,
    display: Option<&'a dyn fmt::Display>,
    debug: Option<&'a dyn fmt::Debug>,
    error: Option<ErrorView<'a>>,
    record: Option<RecordFn>,
}

impl<'a> Subject<'a> {
    /// A value with representational (`Debug`) text only.
    pub fn new<T: Any + fmt::Debug>(value: &'a T) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
            display: None,
            debug: Some(value),
            error: None,
            record: None,
        }
    }

    /// A value with both canonical (`Display`) and representational text.
    pub fn displayed<T: Any + fmt::Display + fmt::Debug>(value: &'a T) -> Self {
        Self {
            display: Some(value),
            ..Self::new(value)
        }
    }

    /// A value with no text forms at all.
    pub fn opaque<T: Any>(value: &'a T) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
            display: None,
            debug: None,
            error: None,
            record: None,
        }
    }

    /// A structured record: anything serde can serialize.
    pub fn record<T: Any + Serialize + fmt::Debug>(value: &'a T) -> Self {
        Self {
            record: Some(record_to_json::<T>),
            ..Self::new(value)
        }
    }

    /// An error value. Use [`Subject::with_backtrace`] to attach the trace
    /// captured where it was raised.
    pub fn error<E: Error + 'static>(error: &'a E) -> Self {
        Self {
            display: Some(error),
            error: Some(ErrorView { error, backtrace: None }),
            ..Self::new(error)
        }
    }

    /// Attach a backtrace to an error subject. No effect on other subjects.
    pub fn with_backtrace(mut self, backtrace: &'a Backtrace) -> Self {
        if let Some(view) = &mut self.error {
            view.backtrace = Some(backtrace);
        }
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.value.type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn as_any(&self) -> &'a dyn Any {
        self.value
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }

    pub fn as_display(&self) -> Option<&'a dyn fmt::Display> {
        self.display
    }

    pub fn as_debug(&self) -> Option<&'a dyn fmt::Debug> {
        self.debug
    }

    pub fn as_error(&self) -> Option<ErrorView<'a>> {
        self.error
    }

    pub fn has_record(&self) -> bool {
        self.record.is_some()
    }

    /// Serialize the record capability, if present.
    pub fn record_json(&self) -> Option<serde_json::Result<serde_json::Value>> {
        self.record.and_then(|to_json| to_json(self.value))
    }
}

impl<'a, T: Any + fmt::Debug> From<&'a T> for Subject<'a> {
    fn from(value: &'a T) -> Self {
        Subject::new(value)
    }
}

impl fmt::Debug for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("type_name", &self.type_name)
            .field("display", &self.display.is_some())
            .field("debug", &self.debug.is_some())
            .field("error", &self.error.is_some())
            .field("record", &self.record.is_some())
            .finish()
    }
}

fn record_to_json<T: Any + Serialize>(value: &dyn Any) -> Option<serde_json::Result<serde_json::Value>> {
    value.downcast_ref::<T>().map(serde_json::to_value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::*;

    #[derive(Debug, Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Debug)]
    struct Wrapped(std::io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("wrapped failure")
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn new_exposes_type_and_debug_only() {
        let value = 7u16;
        let subject = Subject::new(&value);
        assert_eq!(subject.type_id(), TypeId::of::<u16>());
        assert_eq!(subject.type_name(), "u16");
        assert!(subject.is::<u16>());
        assert_eq!(subject.downcast_ref::<u16>(), Some(&7));
        assert!(subject.as_display().is_none());
        assert!(subject.as_debug().is_some());
        assert!(subject.as_error().is_none());
        assert!(!subject.has_record());
    }

    #[test]
    fn opaque_has_no_text_forms() {
        struct Hidden;
        let subject = Subject::opaque(&Hidden);
        assert!(subject.as_display().is_none());
        assert!(subject.as_debug().is_none());
    }

    #[test]
    fn record_serializes_through_serde() {
        let point = Point { x: 1, y: -2 };
        let subject = Subject::record(&point);
        let json = subject.record_json().map(|r| r.ok());
        assert_eq!(json, Some(Some(serde_json::json!({"x": 1, "y": -2}))));
    }

    #[test]
    fn error_walks_sources() {
        let err = Wrapped(std::io::Error::other("disk gone"));
        let subject = Subject::error(&err);
        let view = subject.as_error().map(|view| {
            let sources: Vec<String> = view.sources().map(|e| e.to_string()).collect();
            (view.error().to_string(), sources, view.backtrace().is_some())
        });
        assert_eq!(
            view,
            Some(("wrapped failure".to_string(), vec!["disk gone".to_string()], false))
        );
        assert!(subject.as_display().is_some());
    }

    #[test]
    fn backtrace_attaches_to_errors_only() {
        let trace = Backtrace::disabled();
        let err = std::io::Error::other("boom");
        let with = Subject::error(&err).with_backtrace(&trace);
        assert!(with.as_error().and_then(|v| v.backtrace()).is_some());

        let plain = Subject::new(&1u8).with_backtrace(&trace);
        assert!(plain.as_error().is_none());
    }

    #[test]
    fn from_reference_uses_debug_capability() {
        let text = String::from("hi");
        let subject: Subject<'_> = (&text).into();
        assert!(subject.is::<String>());
        assert!(subject.as_debug().is_some());
    }
}

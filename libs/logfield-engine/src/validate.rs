use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use logfield_api::{FnId, Handler};
use parking_lot::Mutex;

use crate::error::DispatchError;

/// Remembers which functions have already been checked for a declaration.
///
/// Only saves work when the same handlers are validated repeatedly, e.g. when
/// a registry is rebuilt from a cloned catalog.
#[derive(Debug, Default)]
pub struct ValidationCache {
    seen: Mutex<HashSet<FnId>>,
}

static SHARED: LazyLock<Arc<ValidationCache>> = LazyLock::new(|| Arc::new(ValidationCache::new()));

impl ValidationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by `Registry::build`.
    pub fn shared() -> Arc<ValidationCache> {
        Arc::clone(&SHARED)
    }

    pub fn is_validated(&self, id: FnId) -> bool {
        self.seen.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }

    fn check(&self, id: FnId, name: &str, declared: bool) -> Result<(), DispatchError> {
        let mut seen = self.seen.lock();
        if seen.contains(&id) {
            return Ok(());
        }
        if !declared {
            return Err(DispatchError::MissingDeclaredType {
                function: name.to_string(),
            });
        }
        seen.insert(id);
        Ok(())
    }
}

/// Confirm both functions of a handler declare what they accept.
///
/// The converter is checked first. Functions that pass are recorded in
/// `cache` and skipped next time.
pub fn validate(handler: &Handler, cache: &ValidationCache) -> Result<(), DispatchError> {
    let converter = handler.converter();
    cache.check(converter.id(), converter.name(), converter.declared().is_some())?;

    let recognizer = handler.recognizer();
    cache.check(recognizer.id(), recognizer.name(), recognizer.declared().is_some())
}

#[cfg(test)]
mod tests {
    use logfield_api::{Converter, Recognizer};
    use serde_json::Value;

    use super::*;

    #[test]
    fn declared_handler_is_cached() {
        let cache = ValidationCache::new();
        let handler = Handler::exact::<u8, _>("u8", |v| Value::from(*v));
        validate(&handler, &cache).unwrap();
        assert!(cache.is_validated(handler.converter().id()));
        assert!(cache.is_validated(handler.recognizer().id()));
        assert_eq!(cache.len(), 2);

        validate(&handler.clone(), &cache).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn undeclared_converter_is_named() {
        let cache = ValidationCache::new();
        let handler = Handler::from_parts(
            "loose",
            Recognizer::undeclared("loose::recognize", |_| true),
            Converter::undeclared("loose::convert", |_| Ok(Value::Null)),
        );
        match validate(&handler, &cache) {
            Err(DispatchError::MissingDeclaredType { function }) => {
                assert_eq!(function, "loose::convert");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn undeclared_recognizer_is_named() {
        let cache = ValidationCache::new();
        let declared = Handler::exact::<u8, _>("u8", |v| Value::from(*v));
        let handler = Handler::from_parts(
            "half",
            Recognizer::undeclared("half::recognize", |_| true),
            declared.converter().clone(),
        );
        let err = validate(&handler, &cache).unwrap_err();
        assert_eq!(err.to_string(), "missing declared type on `half::recognize`");
        assert!(cache.is_validated(declared.converter().id()));
    }

    #[test]
    fn shared_cache_is_one_instance() {
        assert!(Arc::ptr_eq(&ValidationCache::shared(), &ValidationCache::shared()));
    }
}

use std::sync::Arc;

use logfield_api::Subject;
use serde_json::{Map, Value};

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::fallback::unknown_default;
use crate::registry::Registry;

/// What `serialize` does with a value no handler recognizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnUnknown {
    /// Fail with `DispatchError::UnsupportedType`.
    #[default]
    Raise,
    /// Degrade to the value's text form. Never fails.
    Fallback,
}

/// Reduces arbitrary values to JSON through a built [`Registry`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    on_unknown: OnUnknown,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            on_unknown: OnUnknown::default(),
        }
    }

    pub fn with_config(registry: Arc<Registry>, config: &DispatchConfig) -> Self {
        Self {
            registry,
            on_unknown: config.on_unknown(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn on_unknown(&self) -> OnUnknown {
        self.on_unknown
    }

    /// Reduce `subject` to a serializable value.
    ///
    /// Exact-type handlers are tried first, then the structural chain in
    /// catalog order. Converter failures are returned as they are. A
    /// recognizer that panics is not contained; the panic unwinds out of
    /// this call.
    pub fn serialize(&self, subject: &Subject<'_>, on_unknown: OnUnknown) -> Result<Value, DispatchError> {
        if let Some(handler) = self.registry.resolve(subject) {
            return Ok(handler.converter().convert(subject)?);
        }
        match on_unknown {
            OnUnknown::Raise => Err(DispatchError::UnsupportedType(subject.type_name())),
            OnUnknown::Fallback => {
                tracing::trace!(type_name = %subject.type_name(), "no handler, falling back to text");
                Ok(Value::String(unknown_default(subject)))
            }
        }
    }

    /// Name of the handler that would reduce `subject`.
    pub fn resolve(&self, subject: &Subject<'_>) -> Option<&str> {
        self.registry.resolve(subject).map(|h| h.name())
    }

    /// Reduce a list of named log fields, using the configured
    /// [`OnUnknown`]. Later fields with a repeated name replace earlier ones.
    pub fn serialize_fields<'a, K, I>(&self, fields: I) -> Result<Map<String, Value>, DispatchError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Subject<'a>)>,
    {
        let mut out = Map::new();
        for (name, subject) in fields {
            let value = self.serialize(&subject, self.on_unknown)?;
            out.insert(name.into(), value);
        }
        Ok(out)
    }
}

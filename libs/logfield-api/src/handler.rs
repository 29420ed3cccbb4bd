use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::error::ConvertError;
use crate::subject::Subject;
use crate::types::{Declared, TypeKey};

/// Predicate classifying whether a subject belongs to a handled shape.
/// Must not panic for any input.
pub type RecognizeFn = dyn Fn(&Subject<'_>) -> bool + Send + Sync;

/// Transform reducing a recognized subject to a serializable value.
pub type ConvertFn = dyn Fn(&Subject<'_>) -> Result<Value, ConvertError> + Send + Sync;

/// Process-unique identity of a recognizer or converter function.
///
/// Clones of a `Recognizer`/`Converter` share their id, so a handler that is
/// validated once is not re-validated when the same catalog is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FnId(u64);

impl FnId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        FnId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone)]
pub struct Recognizer {
    id: FnId,
    name: Arc<str>,
    declared: Option<Declared>,
    func: Arc<RecognizeFn>,
}

impl Recognizer {
    pub fn new<F>(name: impl Into<Arc<str>>, declared: Declared, func: F) -> Self
    where
        F: Fn(&Subject<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            id: FnId::next(),
            name: name.into(),
            declared: Some(declared),
            func: Arc::new(func),
        }
    }

    /// A recognizer that does not say what it accepts. Rejected when a
    /// registry is built.
    pub fn undeclared<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&Subject<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            id: FnId::next(),
            name: name.into(),
            declared: None,
            func: Arc::new(func),
        }
    }

    pub fn id(&self) -> FnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> Option<&Declared> {
        self.declared.as_ref()
    }

    pub fn recognizes(&self, subject: &Subject<'_>) -> bool {
        (self.func)(subject)
    }
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("declared", &self.declared)
            .finish()
    }
}

#[derive(Clone)]
pub struct Converter {
    id: FnId,
    name: Arc<str>,
    declared: Option<Declared>,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: impl Into<Arc<str>>, declared: Declared, func: F) -> Self
    where
        F: Fn(&Subject<'_>) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        Self {
            id: FnId::next(),
            name: name.into(),
            declared: Some(declared),
            func: Arc::new(func),
        }
    }

    /// A converter that does not say what it accepts. Rejected when a
    /// registry is built.
    pub fn undeclared<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&Subject<'_>) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        Self {
            id: FnId::next(),
            name: name.into(),
            declared: None,
            func: Arc::new(func),
        }
    }

    pub fn id(&self) -> FnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> Option<&Declared> {
        self.declared.as_ref()
    }

    pub fn convert(&self, subject: &Subject<'_>) -> Result<Value, ConvertError> {
        (self.func)(subject)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("declared", &self.declared)
            .finish()
    }
}

/// A recognizer paired with the converter it selects.
#[derive(Debug, Clone)]
pub struct Handler {
    name: Arc<str>,
    recognizer: Recognizer,
    converter: Converter,
}

impl Handler {
    /// Pair hand-built functions. The only way to produce a handler with a
    /// missing declaration.
    pub fn from_parts(name: impl Into<Arc<str>>, recognizer: Recognizer, converter: Converter) -> Self {
        Self {
            name: name.into(),
            recognizer,
            converter,
        }
    }

    /// Handler for exactly one concrete type `T`.
    pub fn exact<T, F>(name: impl Into<Arc<str>>, convert: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self::try_exact::<T, _>(name, move |value| Ok(convert(value)))
    }

    /// Like [`Handler::exact`] for converters that can fail.
    pub fn try_exact<T, F>(name: impl Into<Arc<str>>, convert: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        let name: Arc<str> = name.into();
        let key = TypeKey::of::<T>();
        let recognizer = Recognizer::new(
            format!("{name}::recognize"),
            Declared::Exact(key),
            |subject| subject.is::<T>(),
        );
        let converter = Converter::new(format!("{name}::convert"), Declared::Exact(key), move |subject| {
            let value = subject
                .downcast_ref::<T>()
                .ok_or_else(|| ConvertError::mismatch(key.name(), subject.type_name()))?;
            convert(value)
        });
        Self { name, recognizer, converter }
    }

    /// Handler for a union of concrete types. Never keyable, so it is tried
    /// in catalog order after the exact-type lookup.
    pub fn one_of<F>(name: impl Into<Arc<str>>, types: Vec<TypeKey>, convert: F) -> Self
    where
        F: Fn(&Subject<'_>) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        let name: Arc<str> = name.into();
        let ids: Vec<TypeId> = types.iter().map(TypeKey::id).collect();
        let recognizer = Recognizer::new(
            format!("{name}::recognize"),
            Declared::OneOf(types.clone()),
            move |subject| ids.contains(&subject.type_id()),
        );
        let converter = Converter::new(format!("{name}::convert"), Declared::OneOf(types), convert);
        Self { name, recognizer, converter }
    }

    /// Handler for a structural capability rather than a type.
    pub fn shape<R, F>(name: impl Into<Arc<str>>, shape: &'static str, recognize: R, convert: F) -> Self
    where
        R: Fn(&Subject<'_>) -> bool + Send + Sync + 'static,
        F: Fn(&Subject<'_>) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        let name: Arc<str> = name.into();
        let recognizer = Recognizer::new(format!("{name}::recognize"), Declared::Shape(shape), recognize);
        let converter = Converter::new(format!("{name}::convert"), Declared::Shape(shape), convert);
        Self { name, recognizer, converter }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// The concrete type the converter can be keyed by, if it declares one.
    pub fn key(&self) -> Option<TypeKey> {
        self.converter.declared().and_then(Declared::exact)
    }
}

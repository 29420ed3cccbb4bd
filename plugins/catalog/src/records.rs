use std::any::Any;

use logfield_api::{ConvertError, Handler, Subject};
use serde::Serialize;
use serde_json::Value;

/// Any subject carrying the `record` capability, serialized through serde.
///
/// Structs become field-name mappings. Transparent newtypes over maps
/// surface their contents.
pub fn structural() -> Handler {
    Handler::shape("record", "record", |s| s.has_record(), |subject| {
        match subject.record_json() {
            Some(result) => result.map_err(|e| ConvertError::format(subject.type_name(), e.to_string())),
            None => Err(ConvertError::mismatch("record", subject.type_name())),
        }
    })
}

/// Exact-type handler for a caller's own serializable record type.
pub fn record_type<T: Any + Serialize>() -> Handler {
    let name = std::any::type_name::<T>();
    Handler::try_exact::<T, _>(name, move |v| {
        serde_json::to_value(v).map_err(|e| ConvertError::format(name, e.to_string()))
    })
}

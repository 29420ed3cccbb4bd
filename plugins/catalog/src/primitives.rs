use std::any::Any;
use std::borrow::Cow;
use std::fmt::Display;
use std::sync::Arc;

use logfield_api::{ConvertError, Handler, TypeTag};
use serde_json::{Map, Number, Value};

/// Handler reducing `T` to its `Display` text.
pub fn text<T: Any + Display>(name: &str) -> Handler {
    Handler::exact::<T, _>(name, |v| Value::String(v.to_string()))
}

/// A float as a JSON number, or its text form when it is not finite.
pub fn float(v: f64) -> Value {
    if v.is_finite() {
        Value::from(v)
    } else {
        Value::String(v.to_string())
    }
}

fn wide_signed(v: &i128) -> Result<Value, ConvertError> {
    i64::try_from(*v)
        .map(Value::from)
        .map_err(|_| ConvertError::range("i128", format!("{v} does not fit in 64 bits")))
}

fn wide_unsigned(v: &u128) -> Result<Value, ConvertError> {
    u64::try_from(*v)
        .map(Value::from)
        .map_err(|_| ConvertError::range("u128", format!("{v} does not fit in 64 bits")))
}

pub fn type_tag() -> Handler {
    Handler::exact::<TypeTag, _>("type_tag", |tag| Value::String(tag.short_name()))
}

pub fn handlers() -> Vec<Handler> {
    vec![
        Handler::exact::<(), _>("unit", |_| Value::Null),
        Handler::exact::<bool, _>("bool", |v| Value::Bool(*v)),
        Handler::exact::<i8, _>("i8", |v| Value::from(*v)),
        Handler::exact::<i16, _>("i16", |v| Value::from(*v)),
        Handler::exact::<i32, _>("i32", |v| Value::from(*v)),
        Handler::exact::<i64, _>("i64", |v| Value::from(*v)),
        Handler::exact::<isize, _>("isize", |v| Value::from(*v)),
        Handler::try_exact::<i128, _>("i128", wide_signed),
        Handler::exact::<u8, _>("u8", |v| Value::from(*v)),
        Handler::exact::<u16, _>("u16", |v| Value::from(*v)),
        Handler::exact::<u32, _>("u32", |v| Value::from(*v)),
        Handler::exact::<u64, _>("u64", |v| Value::from(*v)),
        Handler::exact::<usize, _>("usize", |v| Value::from(*v)),
        Handler::try_exact::<u128, _>("u128", wide_unsigned),
        Handler::exact::<f32, _>("f32", |v| float(f64::from(*v))),
        Handler::exact::<f64, _>("f64", |v| float(*v)),
        text::<char>("char"),
        Handler::exact::<String, _>("string", |v| Value::String(v.clone())),
        Handler::exact::<&'static str, _>("str", |v| Value::String((*v).to_string())),
        Handler::exact::<Box<str>, _>("boxed_str", |v| Value::String(v.to_string())),
        Handler::exact::<Arc<str>, _>("shared_str", |v| Value::String(v.to_string())),
        Handler::exact::<Cow<'static, str>, _>("cow_str", |v| Value::String(v.to_string())),
        Handler::exact::<Value, _>("json_value", Value::clone),
        Handler::exact::<Map<String, Value>, _>("json_map", |v| Value::Object(v.clone())),
        Handler::exact::<Number, _>("json_number", |v| Value::Number(v.clone())),
    ]
}

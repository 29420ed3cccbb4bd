use std::any::Any;
use std::cmp::Ordering;

use bitflags::Flags;
use logfield_api::{EnumType, Enumeration, Handler};
use serde_json::Value;

/// Members of `E` reduce to their underlying value.
pub fn enumeration<E: Enumeration>() -> Handler {
    Handler::exact::<E, _>(std::any::type_name::<E>(), E::value)
}

/// The enumeration type itself, as the list of all member values.
pub fn enumeration_members<E: Enumeration>() -> Handler {
    let name = format!("{}::members", std::any::type_name::<E>());
    Handler::exact::<EnumType<E>, _>(name, |_| Value::Array(E::members().iter().map(E::value).collect()))
}

/// A flag set reduces to its raw bits.
pub fn flags<F>() -> Handler
where
    F: Flags + Any,
    F::Bits: Into<Value>,
{
    Handler::exact::<F, _>(std::any::type_name::<F>(), |v| v.bits().into())
}

pub fn handlers() -> Vec<Handler> {
    vec![enumeration::<Ordering>(), enumeration_members::<Ordering>()]
}

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

/// A closed set of members, each carrying an underlying value.
///
/// Implemented by field-less enums that should log as their value rather
/// than their variant name.
pub trait Enumeration: Any + Sized {
    /// The member's underlying value.
    fn value(&self) -> Value;

    /// Every member, in declaration order.
    fn members() -> &'static [Self];
}

impl Enumeration for Ordering {
    fn value(&self) -> Value {
        Value::from(*self as i8)
    }

    fn members() -> &'static [Self] {
        &[Ordering::Less, Ordering::Equal, Ordering::Greater]
    }
}

/// Stands for the enumeration type `E` itself rather than one of its members.
pub struct EnumType<E>(PhantomData<fn() -> E>);

impl<E> EnumType<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EnumType<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EnumType<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EnumType<E> {}

impl<E> fmt::Debug for EnumType<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumType<{}>", std::any::type_name::<E>())
    }
}

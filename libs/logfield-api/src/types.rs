use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of one concrete Rust type.
///
/// Equality and hashing use the `TypeId` only. The name is kept for
/// diagnostics (error messages, catalog listings).
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped (`Vec<String>` rather than
    /// `alloc::vec::Vec<alloc::string::String>`).
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// What a recognizer or converter declares it accepts.
///
/// Only `Exact` can key the registry's direct table. The other two forms
/// are placed in the ordered fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declared {
    /// A single concrete type.
    Exact(TypeKey),
    /// Any of several concrete types.
    OneOf(Vec<TypeKey>),
    /// A structural capability, named for diagnostics (`"record"`, `"error"`).
    Shape(&'static str),
}

impl Declared {
    /// The concrete type this declaration can be keyed by, if any.
    pub fn exact(&self) -> Option<TypeKey> {
        match self {
            Declared::Exact(key) => Some(*key),
            Declared::OneOf(_) | Declared::Shape(_) => None,
        }
    }
}

impl fmt::Display for Declared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declared::Exact(key) => write!(f, "{}", key.short_name()),
            Declared::OneOf(keys) => {
                f.write_str("one of [")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&key.short_name())?;
                }
                f.write_str("]")
            }
            Declared::Shape(shape) => write!(f, "shape `{shape}`"),
        }
    }
}

/// A type itself, as opposed to a value of that type.
///
/// Lets callers log "which type" as a field: the catalog reduces it to the
/// short type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag(TypeKey);

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(TypeKey::of::<T>())
    }

    pub fn key(&self) -> TypeKey {
        self.0
    }

    pub fn short_name(&self) -> String {
        self.0.short_name()
    }
}

/// Strip module paths from every path segment of a type name.
///
/// `core::option::Option<alloc::string::String>` becomes `Option<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut start = 0;
    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*') {
            push_last_segment(&mut out, &full[start..i]);
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    push_last_segment(&mut out, &full[start..]);
    out
}

fn push_last_segment(out: &mut String, token: &str) {
    out.push_str(token.rsplit("::").next().unwrap_or(token));
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("u64", "u64")]
    #[case("alloc::string::String", "String")]
    #[case("alloc::vec::Vec<alloc::string::String>", "Vec<String>")]
    #[case(
        "std::collections::hash::map::HashMap<alloc::string::String, i64>",
        "HashMap<String, i64>"
    )]
    #[case("&'static [u8]", "&'static [u8]")]
    #[case("(i32, core::option::Option<f64>)", "(i32, Option<f64>)")]
    fn strips_module_paths(#[case] full: &str, #[case] short: &str) {
        assert_eq!(short_type_name(full), short);
    }

    #[test]
    fn keys_compare_by_type_only() {
        let a = TypeKey::of::<String>();
        let b = TypeKey::of::<String>();
        assert_eq!(a, b);
        assert_ne!(a, TypeKey::of::<&'static str>());

        let mut seen = HashMap::new();
        seen.insert(a, 1);
        assert_eq!(seen.get(&b), Some(&1));
    }

    #[test]
    fn only_exact_declarations_are_keyable() {
        let key = TypeKey::of::<u8>();
        assert_eq!(Declared::Exact(key).exact(), Some(key));
        assert_eq!(Declared::OneOf(vec![key]).exact(), None);
        assert_eq!(Declared::Shape("record").exact(), None);
    }

    #[test]
    fn declared_display() {
        let one_of = Declared::OneOf(vec![TypeKey::of::<Vec<u8>>(), TypeKey::of::<Box<[u8]>>()]);
        assert_eq!(one_of.to_string(), "one of [Vec<u8>, Box<[u8]>]");
        assert_eq!(Declared::Shape("error").to_string(), "shape `error`");
    }

    #[test]
    fn type_tag_short_name() {
        assert_eq!(TypeTag::of::<std::path::PathBuf>().short_name(), "PathBuf");
    }
}

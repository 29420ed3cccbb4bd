use std::fmt;

/// Category of a converter failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The converter was handed a value of a type it does not accept.
    Mismatch,
    /// The value is recognized but does not fit the serializable domain
    /// (e.g. an integer wider than 64 bits).
    Range,
    /// The value's own serialization reported an error.
    Format,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Mismatch => f.write_str("mismatch"),
            ErrorKind::Range => f.write_str("range"),
            ErrorKind::Format => f.write_str("format"),
        }
    }
}

/// Error returned by a converter while reducing a recognized value.
///
/// Carries the runtime type name of the value so the failure can be traced
/// back to the offending log field.
#[derive(Clone, PartialEq, Eq)]
pub struct ConvertError {
    kind: ErrorKind,
    type_name: &'static str,
    message: String,
}

impl ConvertError {
    /// The converter expected `expected` but was given a `found`.
    pub fn mismatch(expected: &'static str, found: &'static str) -> Self {
        Self {
            kind: ErrorKind::Mismatch,
            type_name: found,
            message: format!("expected a value of `{expected}`"),
        }
    }

    pub fn range(type_name: &'static str, msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Range, type_name, message: msg.into() }
    }

    pub fn format(type_name: &'static str, msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Format, type_name, message: msg.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.type_name, self.message)
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot convert `{}`: {}", self.type_name, self.message)
    }
}

impl std::error::Error for ConvertError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_both_types() {
        let err = ConvertError::mismatch("u64", "alloc::string::String");
        assert_eq!(err.kind(), ErrorKind::Mismatch);
        assert_eq!(err.type_name(), "alloc::string::String");
        assert_eq!(
            err.to_string(),
            "cannot convert `alloc::string::String`: expected a value of `u64`"
        );
    }

    #[test]
    fn debug_carries_kind() {
        let err = ConvertError::range("i128", "does not fit in 64 bits");
        assert_eq!(format!("{err:?}"), "[range] i128: does not fit in 64 bits");
    }
}

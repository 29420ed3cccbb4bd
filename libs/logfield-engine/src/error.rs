use logfield_api::ConvertError;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A recognizer or converter in the catalog does not declare what it
    /// accepts.
    #[error("missing declared type on `{function}`")]
    MissingDeclaredType { function: String },

    /// Two handlers key the same concrete type under `DuplicatePolicy::Reject`.
    #[error("type `{type_name}` is handled by both `{first}` and `{second}`")]
    DuplicateType {
        type_name: &'static str,
        first: String,
        second: String,
    },

    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("config error: {0}")]
    Config(String),
}

impl DispatchError {
    /// Add context to the error.
    ///
    /// Converter failures are passed through untouched. For the other
    /// message-carrying variants the context is prepended.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            DispatchError::Config(msg) => DispatchError::Config(format!("{ctx}: {msg}")),
            DispatchError::MissingDeclaredType { function } => DispatchError::MissingDeclaredType {
                function: format!("{ctx}: {function}"),
            },
            other => other,
        }
    }
}

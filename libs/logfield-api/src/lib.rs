pub mod enumeration;
pub mod error;
pub mod handler;
pub mod subject;
pub mod types;

pub use enumeration::{EnumType, Enumeration};
pub use error::{ConvertError, ErrorKind};
pub use handler::{ConvertFn, Converter, FnId, Handler, RecognizeFn, Recognizer};
pub use subject::{ErrorView, Subject};
pub use types::{Declared, TypeKey, TypeTag, short_type_name};

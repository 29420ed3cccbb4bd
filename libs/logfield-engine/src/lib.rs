pub mod config;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod registry;
pub mod validate;

pub use config::{DispatchConfig, DuplicatePolicy};
pub use dispatch::{Dispatcher, OnUnknown};
pub use error::DispatchError;
pub use fallback::{FAILED_TO_ENCODE, unknown_default};
pub use registry::{HandlerInfo, Partition, Registry, RegistryBuilder};
pub use validate::{ValidationCache, validate};

//! Reference catalog of recognizer/converter pairs.
//!
//! [`catalog`] returns every built-in handler in registration order. Order
//! matters for structural handlers: the first one that recognizes a value
//! wins. Callers add their own handlers (see [`enumeration`], [`flags`],
//! [`record_type`]) before building a registry.

pub mod binary;
pub mod collections;
pub mod enums;
pub mod errors;
pub mod ident;
pub mod net;
pub mod numeric;
pub mod paths;
pub mod pattern;
pub mod primitives;
pub mod records;
pub mod temporal;

use logfield_api::Handler;

pub use enums::{enumeration, enumeration_members, flags};
pub use errors::describe;
pub use net::{IpInterface, IpNetwork, NetError};
pub use numeric::{Complex, DecimalContext, DecimalParts, Rounding, Signals, decimal_parts};
pub use pattern::PatternMatch;
pub use primitives::text;
pub use records::record_type;

/// Every built-in handler, in registration order.
pub fn catalog() -> Vec<Handler> {
    let mut handlers = vec![primitives::type_tag()];
    handlers.extend(primitives::handlers());
    handlers.push(records::structural());
    handlers.extend(collections::handlers());
    handlers.push(binary::handler());
    handlers.extend(temporal::handlers());
    handlers.extend(enums::handlers());
    handlers.extend(numeric::handlers());
    handlers.extend(net::handlers());
    handlers.push(paths::handler());
    handlers.extend(pattern::handlers());
    handlers.extend(ident::handlers());
    handlers.extend(errors::handlers());
    handlers
}

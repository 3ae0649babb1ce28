//! Infrastructure adapters - concrete implementations of the outbound
//! ports plus in-process messaging.

pub mod http;
pub mod messaging;

//! HTTP transport shared by discovery, probing and generation calls.

mod http;

pub use http::{HttpReply, HttpTransport, TransportError};

//! API Module
//!
//! HTTP surface of a replog node.

mod http;

pub use http::{router, AppState, HttpServer};

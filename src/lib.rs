//! A small HTTP/1.1 server that parses requests and writes responses by hand.
//!
//! Each accepted connection gets one read of at most
//! [`server::READ_BUFFER_SIZE`] bytes, is answered once and then closed.

pub mod config;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;
pub mod service;
pub mod storage;

//! Model Context Protocol over JSON-RPC
//!
//! `rpc` formats responses and maps errors to JSON-RPC codes; `server` validates,
//! negotiates and routes methods to the tool pipeline.

pub mod rpc;
pub mod server;

//! Postman operations exposed over MCP
//!
//! `tools` holds one module per Postman resource family; `utils` the argument
//! validation and endpoint building they share.

pub mod tools;
pub mod utils;

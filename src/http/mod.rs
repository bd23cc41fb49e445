//! HTTP transport for the MCP server
//!
//! Public metadata routes and the bearer-protected `POST /mcp` JSON-RPC endpoint.

pub mod handlers;

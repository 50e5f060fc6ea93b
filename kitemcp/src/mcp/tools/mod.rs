//! MCP tools exposed by the Kite server
//!
//! Each tool lives in its own submodule with its implementation and a
//! `description.md` that is shown to the agent host.

pub mod auth;
pub mod orders;
pub mod profile;

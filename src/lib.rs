//! # Terraform MCP
//!
//! Terraform registry lookups (provider docs, modules, Sentinel policies) served as
//! MCP tools, plus the end-to-end harness that drives the server over stdio and
//! streamable HTTP against a containerized build.
//!
//! ## Features
//!
//! - **server** - the `terraform-mcp-server` tool server
//! - **e2e** - the container/transport/suite harness
//! - **full** - Enables all features
//!
//! ## Example
//!
//! ```rust,no_run,ignore
//! // terraform-mcp = { version = "0.1.0", features = ["server"] }
//! use terraform_mcp::tfmcp_server::{run, ServerConfig, TransportMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     run(ServerConfig::new().with_mode(TransportMode::Http)).await?;
//!     Ok(())
//! }
//! ```

// Re-export registry types (always available)
pub use tfmcp_registry::*;

// Re-export optional components based on features
#[cfg(feature = "server")]
pub use tfmcp_server;

#[cfg(feature = "e2e")]
pub use tfmcp_e2e;

// Re-export commonly used dependencies for convenience
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tokio;
pub use tracing;

/*!
* 文件名: lib.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: rmcp, hyper, tfmcp-registry
* 描述: Terraform MCP服务器 / Terraform MCP server exposing registry lookup tools
*/

pub mod config;
pub mod errors;
pub mod server;
pub mod tools;
pub mod transport;

pub use config::{ServerConfig, TransportMode};
pub use errors::{ServerError, ServerResult};
pub use server::{TerraformMcpServer, SERVER_NAME};
pub use transport::{run, serve_stdio, shutdown_signal, HttpTransport, HEALTH_PATH, MCP_PATH};

/// 服务器版本号 / Version of the server
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

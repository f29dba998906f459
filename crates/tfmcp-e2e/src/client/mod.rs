/*!
* 文件名: mod.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: async-trait, serde_json
* 描述: MCP协议客户端 / MCP protocol clients
*/

pub mod http_client;
pub mod model;
pub mod stdio_client;

pub use http_client::HttpMcpClient;
pub use model::*;
pub use stdio_client::{StdioMcpClient, StdioServerParameters};

use crate::errors::McpClientError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// MCP客户端trait / MCP client trait
///
/// 每次调用都带有截止时间，超时表现为错误而不是挂起 /
/// Every call carries a deadline; exceeding it is an error, never a hang.
#[async_trait]
pub trait McpClient: Send + Sync {
    /// 执行initialize握手，可重复调用 / Run the initialize handshake, may be repeated
    async fn initialize(&self) -> Result<InitializeResult, McpClientError>;

    /// 调用工具 / Call a tool
    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolResponse, McpClientError>;

    /// 关闭客户端 / Close the client
    async fn close(&self) -> Result<(), McpClientError>;
}

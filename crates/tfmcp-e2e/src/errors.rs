/*!
* 文件名: errors.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: thiserror
* 描述: E2E测试框架的错误定义 / Error definitions for the e2e harness
*/

use thiserror::Error;

/// E2E框架的Result类型别名 / Result type alias for the e2e harness
pub type E2eResult<T> = Result<T, E2eError>;

/// E2E框架错误 / E2e harness error
#[derive(Debug, Error)]
pub enum E2eError {
    #[error("Image build failed for {image}, output:\n{output}")]
    /// 镜像构建失败（整个运行终止） / Image build failed, the whole run aborts
    BuildFailed { image: String, output: String },

    #[error("Container error: {0}")]
    /// 容器操作失败 / Container operation failed
    ContainerError(String),

    #[error("Server at {url} not ready after {attempts} attempts")]
    /// 健康检查超时 / Health check never succeeded
    NotReady { url: String, attempts: u32 },

    #[error("Handshake failed: {0}")]
    /// 握手失败 / Initialize handshake failed
    HandshakeFailed(String),

    #[error("MCP client error: {0}")]
    /// MCP客户端错误 / MCP client error
    McpClientError(#[from] McpClientError),

    #[error("IO error: {0}")]
    /// IO错误 / IO error
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    /// 无效配置 / Invalid configuration
    InvalidConfiguration(String),
}

/// MCP客户端错误 / MCP client error
#[derive(Debug, Error)]
pub enum McpClientError {
    #[error("Connection error: {0}")]
    /// 连接错误 / Connection error
    ConnectionError(String),

    #[error("Timeout error: {0}")]
    /// 超时错误 / Timeout error
    TimeoutError(String),

    #[error("Protocol error: {0}")]
    /// 协议错误 / Protocol error
    ProtocolError(String),

    #[error("Server returned error {code}: {message}")]
    /// 服务器返回JSON-RPC错误 / JSON-RPC error returned by the server
    ServerError { code: i64, message: String },

    #[error("IO error: {0}")]
    /// IO错误 / IO error
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    /// 序列化错误 / Serialization error
    SerializationError(#[from] serde_json::Error),
}

impl From<reqwest::Error> for McpClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            McpClientError::TimeoutError(err.to_string())
        } else {
            McpClientError::ConnectionError(err.to_string())
        }
    }
}

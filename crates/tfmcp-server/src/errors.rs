/*!
* 文件名: errors.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: thiserror
* 描述: 服务器错误定义 / Error definitions for the server
*/

use thiserror::Error;

/// 服务器Result类型别名 / Result type alias for the server
pub type ServerResult<T> = Result<T, ServerError>;

/// 服务器错误类型 / Server error type
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    /// IO错误 / IO error
    IoError(#[from] std::io::Error),

    #[error("Registry error: {0}")]
    /// Registry错误 / Registry error
    RegistryError(#[from] tfmcp_registry::RegistryError),

    #[error("Transport error: {0}")]
    /// 传输层错误 / Transport error
    TransportError(String),

    #[error("Invalid configuration: {0}")]
    /// 无效配置 / Invalid configuration
    InvalidConfiguration(String),
}

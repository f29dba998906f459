/*!
* 文件名: error.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: thiserror
* 描述: Registry客户端错误定义 / Error definitions for the registry client
*/

use thiserror::Error;

/// Registry结果类型别名 / Result type alias for registry calls
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry调用错误 / Registry call error
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid registry URL: {0}")]
    /// 无效URL / Invalid URL
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    /// HTTP请求失败 / HTTP request failed
    Http(#[from] reqwest::Error),

    #[error("Registry returned status {status} for {url}")]
    /// 非成功状态码 / Non-success status code
    Status { status: u16, url: String },

    #[error("Failed to decode registry response from {url}: {source}")]
    /// 响应解码失败 / Response decoding failed
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryError {
    /// 是否为404 / Whether the registry answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::Status { status: 404, .. })
    }
}

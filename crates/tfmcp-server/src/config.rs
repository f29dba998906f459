/*!
* 文件名: config.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: clap
* 描述: 服务器配置 / Server configuration
*/

use crate::errors::{ServerError, ServerResult};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tfmcp_registry::DEFAULT_REGISTRY_URL;

/// 传输模式 / Transport mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TransportMode {
    /// 标准输入输出 / stdin/stdout
    #[default]
    Stdio,
    /// Streamable HTTP
    Http,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Stdio => write!(f, "stdio"),
            TransportMode::Http => write!(f, "http"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(TransportMode::Stdio),
            "http" | "streamable-http" => Ok(TransportMode::Http),
            other => Err(ServerError::InvalidConfiguration(format!(
                "unknown transport mode '{}', expected 'stdio' or 'http'",
                other
            ))),
        }
    }
}

/// 服务器配置 / Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 传输模式 / Transport mode
    pub mode: TransportMode,
    /// HTTP监听地址 / HTTP listen host
    pub host: String,
    /// HTTP监听端口 / HTTP listen port
    pub port: u16,
    /// Registry地址 / Registry base URL
    pub registry_url: String,
    /// Registry请求超时 / Registry request timeout
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::Stdio,
            host: "0.0.0.0".to_string(),
            port: 8080,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// 解析监听地址 / Resolve the HTTP listen address
    pub fn listen_addr(&self) -> ServerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ServerError::InvalidConfiguration(format!(
                    "invalid listen address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }
}

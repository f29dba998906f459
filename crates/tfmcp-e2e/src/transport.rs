/*!
* 文件名: transport.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: tokio, async-trait
* 描述: 传输客户端工厂与会话 / Transport client factories and sessions
*/

use crate::cleanup::CleanupStack;
use crate::client::{HttpMcpClient, McpClient, StdioMcpClient, StdioServerParameters};
use crate::config::{E2eConfig, DEFAULT_HOST_PORT, PORT_ENV};
use crate::container::{ContainerManager, ContainerMode};
use crate::errors::{E2eError, E2eResult};
use crate::readiness::{ReadinessPoller, HEALTH_PATH};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// MCP端点路径 / MCP endpoint path
pub const MCP_PATH: &str = "/mcp";

/// 传输类型 / Transport kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stdio,
    Http,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Stdio => write!(f, "Stdio"),
            TransportKind::Http => write!(f, "HTTP"),
        }
    }
}

/// 传输会话：客户端加释放动作 / Transport session: a client plus its release actions
pub struct Session {
    kind: TransportKind,
    client: Arc<dyn McpClient>,
    cleanup: CleanupStack,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("kind", &self.kind)
            .field("cleanup", &self.cleanup)
            .finish()
    }
}

impl Session {
    /// 创建会话并注册客户端关闭 / Create a session, registering the client close last
    pub fn new(kind: TransportKind, client: Arc<dyn McpClient>, mut cleanup: CleanupStack) -> Self {
        let closing = client.clone();
        cleanup.push(format!("close {} client", kind), move || async move {
            if let Err(e) = closing.close().await {
                warn!("Failed to close client: {}", e);
            }
        });
        Self {
            kind,
            client,
            cleanup,
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn client(&self) -> &dyn McpClient {
        self.client.as_ref()
    }

    /// 释放会话资源 / Release everything the session holds
    pub async fn close(mut self) {
        self.cleanup.release().await;
    }
}

/// 传输工厂 / Transport factory
#[async_trait]
pub trait TransportFactory: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// 创建会话，失败只影响当前子测试 / Create a session; failure only affects the calling sub-test
    async fn create(&self) -> E2eResult<Session>;
}

/// 进程管道工厂 / Process-pipe factory
#[derive(Debug, Clone)]
pub struct StdioFactory {
    params: StdioServerParameters,
    call_timeout: Duration,
}

impl StdioFactory {
    /// 默认以`docker run -i --rm <image>`启动 / Launch `docker run -i --rm <image>` by default
    pub fn new(config: &E2eConfig) -> Self {
        let params = StdioServerParameters::new(
            "docker",
            vec![
                "run".to_string(),
                "-i".to_string(),
                "--rm".to_string(),
                config.image.clone(),
            ],
        );
        Self::with_params(params, config.call_timeout)
    }

    pub fn with_params(params: StdioServerParameters, call_timeout: Duration) -> Self {
        Self { params, call_timeout }
    }

    pub fn params(&self) -> &StdioServerParameters {
        &self.params
    }
}

#[async_trait]
impl TransportFactory for StdioFactory {
    fn kind(&self) -> TransportKind {
        TransportKind::Stdio
    }

    async fn create(&self) -> E2eResult<Session> {
        info!("Starting Stdio MCP client: {} {:?}", self.params.command, self.params.args);
        let client = StdioMcpClient::spawn(self.params.clone(), self.call_timeout)?;
        Ok(Session::new(TransportKind::Stdio, Arc::new(client), CleanupStack::new()))
    }
}

/// HTTP端点 / HTTP endpoints of a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpEndpoints {
    pub base_url: String,
    pub health_url: String,
    pub mcp_url: String,
}

impl HttpEndpoints {
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            health_url: format!("{}{}", base_url, HEALTH_PATH),
            mcp_url: format!("{}{}", base_url, MCP_PATH),
            base_url,
        }
    }

    pub fn for_port(port: u16) -> Self {
        Self::for_base_url(format!("http://localhost:{}", port))
    }
}

/// 解析端口覆盖值 / Resolve the port override
pub fn test_port_from(value: Option<String>) -> E2eResult<u16> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(DEFAULT_HOST_PORT),
        Some(raw) => raw.parse().map_err(|_| {
            E2eError::InvalidConfiguration(format!("{}={} is not a valid port", PORT_ENV, raw))
        }),
    }
}

/// 从环境读取测试端口 / Read the test port from the environment
pub fn test_port() -> E2eResult<u16> {
    test_port_from(std::env::var(PORT_ENV).ok())
}

/// HTTP工厂：启动容器、等待就绪、连接/mcp / HTTP factory: start a container, wait, connect to /mcp
#[derive(Debug, Clone)]
pub struct HttpFactory {
    manager: Arc<ContainerManager>,
    poller: ReadinessPoller,
    port: u16,
}

impl HttpFactory {
    pub fn new(manager: Arc<ContainerManager>, port: u16) -> Self {
        Self {
            manager,
            poller: ReadinessPoller::default(),
            port,
        }
    }

    /// 端口取自`E2E_TEST_PORT` / Port taken from `E2E_TEST_PORT`
    pub fn from_env(manager: Arc<ContainerManager>) -> E2eResult<Self> {
        Ok(Self::new(manager, test_port()?))
    }

    pub fn with_poller(mut self, poller: ReadinessPoller) -> Self {
        self.poller = poller;
        self
    }

    pub fn endpoints(&self) -> HttpEndpoints {
        HttpEndpoints::for_port(self.port)
    }

    async fn connect(&self, cleanup: &mut CleanupStack) -> E2eResult<Arc<dyn McpClient>> {
        let endpoints = self.endpoints();
        info!("Starting HTTP MCP server on port {}", self.port);

        let handle = self.manager.start(ContainerMode::Http, self.port).await?;
        let manager = self.manager.clone();
        let stopping = handle.clone();
        cleanup.push(format!("stop container {}", handle.id), move || async move {
            manager.stop(&stopping).await;
        });

        self.poller.wait_ready(&endpoints.base_url).await?;

        let client = HttpMcpClient::new(endpoints.mcp_url, self.manager.config().call_timeout)?;
        Ok(Arc::new(client))
    }
}

#[async_trait]
impl TransportFactory for HttpFactory {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn create(&self) -> E2eResult<Session> {
        let mut cleanup = CleanupStack::new();
        match self.connect(&mut cleanup).await {
            Ok(client) => Ok(Session::new(TransportKind::Http, client, cleanup)),
            Err(e) => {
                cleanup.release().await;
                Err(e)
            }
        }
    }
}

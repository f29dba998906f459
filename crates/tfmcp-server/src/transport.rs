/*!
* 文件名: transport.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: rmcp, hyper, hyper-util, tower
* 描述: stdio与HTTP传输 / stdio and streamable HTTP transports
*/

use crate::config::{ServerConfig, TransportMode};
use crate::errors::{ServerError, ServerResult};
use crate::server::TerraformMcpServer;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::ServiceExt;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tfmcp_registry::RegistryClient;
use tokio::net::TcpListener;
use tower::ServiceExt as _;
use tracing::{debug, error, info, warn};

/// 健康检查路径 / Health check path
pub const HEALTH_PATH: &str = "/health";
/// MCP端点路径 / MCP endpoint path
pub const MCP_PATH: &str = "/mcp";

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type HttpBody = BoxBody<Bytes, BoxError>;
type McpService = StreamableHttpService<TerraformMcpServer, LocalSessionManager>;

/// 按配置运行服务器 / Run the server as configured
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    let registry = RegistryClient::new(&config.registry_url, config.request_timeout)?;
    let server = TerraformMcpServer::new(registry);
    info!(
        "Starting terraform-mcp-server {} in {} mode (registry: {})",
        crate::VERSION,
        config.mode,
        config.registry_url
    );

    match config.mode {
        TransportMode::Stdio => serve_stdio(server).await,
        TransportMode::Http => {
            let transport = HttpTransport::bind(config.listen_addr()?, server).await?;
            transport.run_until(shutdown_signal()).await
        }
    }
}

/// 等待ctrl-c或SIGTERM / Wait for ctrl-c or, on unix, SIGTERM
///
/// 容器内以PID 1运行时只有SIGTERM会送达 / Inside a container running as PID 1 only SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("ctrl-c received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}

/// 在stdin/stdout上运行 / Serve over stdin/stdout until EOF
pub async fn serve_stdio(server: TerraformMcpServer) -> ServerResult<()> {
    let service = server
        .serve(rmcp::transport::io::stdio())
        .await
        .map_err(|e| ServerError::TransportError(format!("Error starting stdio server: {}", e)))?;

    let reason = service
        .waiting()
        .await
        .map_err(|e| ServerError::TransportError(e.to_string()))?;
    info!("stdio server stopped: {:?}", reason);
    Ok(())
}

/// Streamable HTTP传输 / Streamable HTTP transport with a health endpoint
pub struct HttpTransport {
    listener: TcpListener,
    mcp_service: McpService,
}

impl HttpTransport {
    /// 绑定监听地址 / Bind the listen address
    pub async fn bind(addr: SocketAddr, server: TerraformMcpServer) -> ServerResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::from_listener(listener, server))
    }

    /// 使用已有监听器 / Use an existing listener
    pub fn from_listener(listener: TcpListener, server: TerraformMcpServer) -> Self {
        let mcp_service = StreamableHttpService::new(
            move || Ok(server.clone()),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig::default(),
        );
        Self {
            listener,
            mcp_service,
        }
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// 运行直到关闭信号 / Accept connections until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!("HTTP transport listening on {} (MCP at {}, health at {})", addr, MCP_PATH, HEALTH_PATH);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            debug!("Accepted connection from {}", remote_addr);
                            let mcp_service = self.mcp_service.clone();
                            let io = TokioIo::new(stream);

                            tokio::spawn(async move {
                                let svc = tower::service_fn(move |req: Request<Incoming>| {
                                    let mcp_service = mcp_service.clone();
                                    async move { Ok::<_, std::convert::Infallible>(route(req, mcp_service).await) }
                                });
                                let svc = hyper_util::service::TowerToHyperService::new(svc);

                                if let Err(e) = hyper::server::conn::http1::Builder::new()
                                    .serve_connection(io, svc)
                                    .await
                                {
                                    debug!("Connection from {} closed with error: {}", remote_addr, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Server accept error: {}", e);
                            return Err(ServerError::IoError(e));
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("HTTP transport shutdown signal received");
                    break;
                }
            }
        }
        Ok(())
    }
}

/// 请求路由 / Route a request to health, MCP or 404
async fn route(req: Request<Incoming>, mcp_service: McpService) -> Response<HttpBody> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, HEALTH_PATH) => text_response(
            StatusCode::OK,
            "application/json",
            r#"{"status":"ok"}"#,
        ),
        (_, path) if path == MCP_PATH || path.starts_with("/mcp/") => {
            match mcp_service.oneshot(req).await {
                Ok(response) => response.map(|body| body.map_err(|e| -> BoxError { e.into() }).boxed()),
                Err(never) => match never {},
            }
        }
        _ => text_response(StatusCode::NOT_FOUND, "text/plain", "Not found"),
    }
}

fn text_response(status: StatusCode, content_type: &str, body: &'static str) -> Response<HttpBody> {
    let mut response = Response::new(
        Full::new(Bytes::from_static(body.as_bytes()))
            .map_err(|never| -> BoxError { match never {} })
            .boxed(),
    );
    *response.status_mut() = status;
    if let Ok(value) = content_type.parse() {
        response.headers_mut().insert(hyper::header::CONTENT_TYPE, value);
    }
    response
}

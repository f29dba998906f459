/*!
* 文件名: http_client.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: reqwest, sse-stream, futures-util, serde_json
* 描述: Streamable HTTP类型的MCP客户端实现 / MCP client over streamable HTTP
*/

use super::model::*;
use super::McpClient;
use crate::errors::McpClientError;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::{json, Map, Value};
use sse_stream::SseStream;
use std::pin::pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// 会话ID头 / Session id header
pub const SESSION_HEADER: &str = "mcp-session-id";
/// 协议版本头 / Protocol version header
pub const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

#[derive(Debug, Default, Clone)]
struct SessionState {
    session_id: Option<String>,
    protocol_version: Option<String>,
}

/// HTTP MCP客户端 / Streamable HTTP MCP client
#[derive(Debug)]
pub struct HttpMcpClient {
    http_client: Client,
    url: String,
    session: Mutex<SessionState>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl HttpMcpClient {
    /// 创建客户端 / Create a client bound to the MCP endpoint URL
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, McpClientError> {
        let http_client = Client::builder()
            .build()
            .map_err(|e| McpClientError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            url: url.into(),
            session: Mutex::new(SessionState::default()),
            next_id: AtomicU64::new(1),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// 当前会话ID / Current session id
    pub async fn session_id(&self) -> Option<String> {
        self.session.lock().await.session_id.clone()
    }

    async fn post(&self, body: &Value, session: &SessionState) -> Result<Response, McpClientError> {
        let mut request = self
            .http_client
            .post(&self.url)
            .header(ACCEPT, "application/json, text/event-stream")
            .header(CONTENT_TYPE, "application/json");
        if let Some(id) = &session.session_id {
            request = request.header(SESSION_HEADER, id);
        }
        if let Some(version) = &session.protocol_version {
            request = request.header(PROTOCOL_VERSION_HEADER, version);
        }

        debug!("POST {}: {}", self.url, body);
        let response = request.json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(McpClientError::ConnectionError(format!(
                "HTTP error {}: {}",
                status, text
            )));
        }
        Ok(response)
    }

    /// 发送请求，返回响应和会话ID / Send a request; returns the response and any session id
    async fn exchange(
        &self,
        method: &str,
        params: Value,
        session: &SessionState,
    ) -> Result<(Value, Option<String>), McpClientError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let body = jsonrpc_request(id, method, params);

        let call = async {
            let response = self.post(&body, session).await?;
            let session_id = response
                .headers()
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let message = read_response(response, id).await?;
            Ok((message, session_id))
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(McpClientError::TimeoutError(format!(
                "No response to {} within {:?}",
                method, self.timeout
            ))),
        }
    }

    async fn notify(&self, method: &str, session: &SessionState) -> Result<(), McpClientError> {
        let body = jsonrpc_notification(method);
        match tokio::time::timeout(self.timeout, self.post(&body, session)).await {
            Ok(result) => result.map(|_| ()),
            Err(_) => Err(McpClientError::TimeoutError(format!(
                "Notification {} not accepted within {:?}",
                method, self.timeout
            ))),
        }
    }

    /// 结束服务端会话 / End a server-side session
    ///
    /// 使用不复用连接池的独立客户端：清理栈在`Drop`中会换运行时执行本方法，
    /// 原运行时上的池化连接此时无法推进。
    /// Uses a standalone client without pooled connections: the cleanup stack may run
    /// this on a different runtime from `Drop`, where connections owned by the blocked
    /// runtime cannot make progress.
    async fn delete_session(&self, session_id: &str) {
        let client = match Client::builder()
            .pool_max_idle_per_host(0)
            .timeout(self.timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to build client to close session {}: {}", session_id, e);
                return;
            }
        };

        match client
            .delete(&self.url)
            .header(SESSION_HEADER, session_id)
            .send()
            .await
        {
            Ok(response) => debug!("Closed HTTP session {}: {}", session_id, response.status()),
            Err(e) => warn!("Failed to close HTTP session {}: {}", session_id, e),
        }
    }
}

/// 从JSON或SSE响应中读取匹配id的消息 / Read the message answering `id` from a JSON or SSE body
///
/// SSE按字节流解码，完整事件才转为文本 / The event stream is decoded from raw bytes, so
/// text split across network chunks arrives intact.
async fn read_response(response: Response, id: u64) -> Result<Value, McpClientError> {
    let is_sse = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("text/event-stream"))
        .unwrap_or(false);

    if !is_sse {
        let message: Value = response.json().await?;
        if is_response_to(&message, id) {
            return Ok(message);
        }
        return Err(McpClientError::ProtocolError(format!(
            "Unexpected response body: {}",
            message
        )));
    }

    let mut events = pin!(SseStream::from_bytes_stream(response.bytes_stream()));
    while let Some(event) = events.next().await {
        let event = event
            .map_err(|e| McpClientError::ProtocolError(format!("Invalid event stream: {}", e)))?;
        let Some(data) = event.data.filter(|data| !data.trim().is_empty()) else {
            continue;
        };
        match serde_json::from_str::<Value>(&data) {
            Ok(message) if is_response_to(&message, id) => return Ok(message),
            Ok(message) => debug!("Skipping unrelated SSE message: {}", message),
            Err(_) => debug!("Skipping non-JSON SSE data: {:?}", data),
        }
    }
    Err(McpClientError::ProtocolError(format!(
        "Event stream ended without a response to request {}",
        id
    )))
}

#[async_trait]
impl McpClient for HttpMcpClient {
    async fn initialize(&self) -> Result<InitializeResult, McpClientError> {
        // 重新握手总是开启新会话，旧会话先关闭 / A repeated handshake closes the old session and opens a fresh one
        let previous = std::mem::take(&mut *self.session.lock().await);
        if let Some(session_id) = previous.session_id {
            self.delete_session(&session_id).await;
        }
        let fresh = SessionState::default();
        let (message, session_id) = self.exchange("initialize", initialize_params(), &fresh).await?;
        let result: InitializeResult = parse_response(message)?;

        let session = SessionState {
            session_id,
            protocol_version: Some(result.protocol_version.clone()),
        };
        self.notify("notifications/initialized", &session).await?;
        info!(
            "Initialized HTTP session {:?} with {} {}",
            session.session_id, result.server_info.name, result.server_info.version
        );
        *self.session.lock().await = session;
        Ok(result)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolResponse, McpClientError> {
        let session = self.session.lock().await.clone();
        let (message, _) = self
            .exchange("tools/call", json!({ "name": name, "arguments": arguments }), &session)
            .await?;
        parse_response(message)
    }

    async fn close(&self) -> Result<(), McpClientError> {
        let session = std::mem::take(&mut *self.session.lock().await);
        if let Some(session_id) = session.session_id {
            self.delete_session(&session_id).await;
        }
        Ok(())
    }
}

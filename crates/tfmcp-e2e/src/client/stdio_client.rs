/**
* 文件名: stdio_client
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: tokio, serde_json
* 描述: STDIO类型的MCP客户端实现 / MCP client over a child process's stdio
*/
use super::model::*;
use super::McpClient;
use crate::errors::McpClientError;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// STDIO服务器参数 / Parameters of a stdio server process
#[derive(Debug, Clone)]
pub struct StdioServerParameters {
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

impl StdioServerParameters {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: HashMap::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

struct StdioChannel {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// STDIO MCP客户端 / STDIO MCP client
pub struct StdioMcpClient {
    params: StdioServerParameters,
    child: Mutex<Option<Child>>,
    /// 请求与响应串行化 / Requests and their responses are serialized
    channel: Mutex<Option<StdioChannel>>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl std::fmt::Debug for StdioMcpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdioMcpClient")
            .field("command", &self.params.command)
            .field("args", &self.params.args)
            .finish()
    }
}

impl StdioMcpClient {
    /// 启动子进程并连接 / Spawn the child process and wire its pipes
    pub fn spawn(params: StdioServerParameters, timeout: Duration) -> Result<Self, McpClientError> {
        let mut cmd = Command::new(&params.command);
        cmd.args(&params.args);
        for (key, value) in &params.env {
            cmd.env(key, value);
        }
        // stderr不参与协议，直接继承 / stderr is not framed, inherit it
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        debug!("Starting command: {} {:?}", params.command, params.args);
        let mut child = cmd.spawn().map_err(|e| {
            McpClientError::ConnectionError(format!(
                "Failed to start process {}: {}",
                params.command, e
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpClientError::ConnectionError("Process stdin not available".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpClientError::ConnectionError("Process stdout not available".to_string()))?;

        Ok(Self {
            params,
            child: Mutex::new(Some(child)),
            channel: Mutex::new(Some(StdioChannel {
                stdin,
                stdout: BufReader::new(stdout),
            })),
            next_id: AtomicU64::new(1),
            timeout,
        })
    }

    async fn write_message(channel: &mut StdioChannel, message: &Value) -> Result<(), McpClientError> {
        let line = serde_json::to_string(message)?;
        channel.stdin.write_all(line.as_bytes()).await?;
        channel.stdin.write_all(b"\n").await?;
        channel.stdin.flush().await?;
        debug!("Sent message: {}", line);
        Ok(())
    }

    /// 发送请求并读取匹配id的响应 / Send a request and read until the matching response
    async fn send_request(&self, method: &str, params: Value) -> Result<Value, McpClientError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = jsonrpc_request(id, method, params);

        let mut guard = self.channel.lock().await;
        let channel = guard
            .as_mut()
            .ok_or_else(|| McpClientError::ConnectionError("Client is closed".to_string()))?;

        let exchange = async {
            Self::write_message(channel, &request).await?;
            let mut line = String::new();
            loop {
                line.clear();
                if channel.stdout.read_line(&mut line).await? == 0 {
                    return Err(McpClientError::ConnectionError(
                        "Process closed stdout without response".to_string(),
                    ));
                }
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(message) if is_response_to(&message, id) => return Ok(message),
                    Ok(message) => debug!("Skipping unrelated message: {}", message),
                    Err(e) => warn!("Skipping non-JSON line from server ({}): {}", e, trimmed),
                }
            }
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(McpClientError::TimeoutError(format!(
                "No response to {} within {:?}",
                method, self.timeout
            ))),
        }
    }

    async fn send_notification(&self, method: &str) -> Result<(), McpClientError> {
        let mut guard = self.channel.lock().await;
        let channel = guard
            .as_mut()
            .ok_or_else(|| McpClientError::ConnectionError("Client is closed".to_string()))?;
        Self::write_message(channel, &jsonrpc_notification(method)).await
    }
}

#[async_trait]
impl McpClient for StdioMcpClient {
    async fn initialize(&self) -> Result<InitializeResult, McpClientError> {
        let response = self.send_request("initialize", initialize_params()).await?;
        let result: InitializeResult = parse_response(response)?;
        self.send_notification("notifications/initialized").await?;
        info!(
            "Initialized stdio session with {} {}",
            result.server_info.name, result.server_info.version
        );
        Ok(result)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolResponse, McpClientError> {
        let response = self
            .send_request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;
        parse_response(response)
    }

    async fn close(&self) -> Result<(), McpClientError> {
        // 先关闭stdin让服务器自然退出 / Drop stdin first so the server exits on EOF
        self.channel.lock().await.take();

        if let Some(mut child) = self.child.lock().await.take() {
            match tokio::time::timeout(Duration::from_secs(5), child.wait()).await {
                Ok(Ok(status)) => debug!("Stdio server exited with {}", status),
                Ok(Err(e)) => warn!("Failed to wait for stdio server: {}", e),
                Err(_) => {
                    warn!("Stdio server did not exit after stdin closed, killing it");
                    child.kill().await?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// 用sh模拟一个只回答一次的服务器 / A shell script that answers a single request
    fn scripted_server(reply: &str) -> StdioServerParameters {
        let script = format!(
            "read line; echo '{{\"jsonrpc\":\"2.0\",\"method\":\"notifications/message\"}}'; echo 'not json'; echo '{}'; cat > /dev/null",
            reply
        );
        StdioServerParameters::new("sh", vec!["-c".to_string(), script])
    }

    #[tokio::test]
    async fn test_initialize_skips_unrelated_lines() {
        let params = scripted_server(
            r#"{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2025-03-26","serverInfo":{"name":"terraform-mcp-server","version":"0.1.0"},"capabilities":{}}}"#,
        );
        let client = StdioMcpClient::spawn(params, Duration::from_secs(5)).unwrap();

        let result = client.initialize().await.unwrap();
        assert_eq!(result.server_info.name, "terraform-mcp-server");
        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let params = StdioServerParameters::new("sh", vec!["-c".to_string(), "cat > /dev/null".to_string()]);
        let client = StdioMcpClient::spawn(params, Duration::from_millis(200)).unwrap();

        let err = client.initialize().await.unwrap_err();
        assert!(matches!(err, McpClientError::TimeoutError(_)), "unexpected error: {err}");
        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_connection_error() {
        let params = StdioServerParameters::new("/definitely/not/a/binary", vec![]);
        let err = StdioMcpClient::spawn(params, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, McpClientError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_calls_after_close_fail() {
        let params = StdioServerParameters::new("sh", vec!["-c".to_string(), "cat > /dev/null".to_string()]);
        let client = StdioMcpClient::spawn(params, Duration::from_secs(1)).unwrap();
        client.close().await.unwrap();

        let err = client.call_tool("searchModules", Map::new()).await.unwrap_err();
        assert!(matches!(err, McpClientError::ConnectionError(_)));
    }
}

/*!
* 文件名: model.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: serde, serde_json
* 描述: MCP客户端消息模型 / MCP client message models
*/

use crate::errors::McpClientError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// 客户端声明的最新协议版本 / Latest protocol version offered by the client
pub const LATEST_PROTOCOL_VERSION: &str = "2025-03-26";
/// 客户端名称 / Client name
pub const CLIENT_NAME: &str = "e2e-test-client";
/// 客户端版本 / Client version
pub const CLIENT_VERSION: &str = "0.0.1";

/// 实现信息 / Implementation info
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// initialize结果 / Result of the initialize request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: Implementation,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// 工具返回的内容项 / Content item returned by a tool
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image")]
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    #[serde(rename = "resource")]
    Resource { resource: Value },
    #[serde(other)]
    Other,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    /// 文本内容 / Text of a text item
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// 工具调用响应 / Tool call response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolResponse {
    #[serde(default)]
    pub content: Vec<Content>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

/// initialize请求参数 / Params of the initialize request
pub fn initialize_params() -> Value {
    json!({
        "protocolVersion": LATEST_PROTOCOL_VERSION,
        "capabilities": {},
        "clientInfo": {
            "name": CLIENT_NAME,
            "version": CLIENT_VERSION
        }
    })
}

/// 构造JSON-RPC请求 / Build a JSON-RPC request
pub fn jsonrpc_request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// 构造JSON-RPC通知 / Build a JSON-RPC notification
pub fn jsonrpc_notification(method: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method
    })
}

/// 消息是否是给定id的响应 / Whether a message answers the request `id`
pub fn is_response_to(message: &Value, id: u64) -> bool {
    message.get("id").and_then(Value::as_u64) == Some(id)
        && (message.get("result").is_some() || message.get("error").is_some())
}

/// 解析JSON-RPC响应 / Unwrap a JSON-RPC response into its result
pub fn parse_response<T: DeserializeOwned>(message: Value) -> Result<T, McpClientError> {
    if let Some(error) = message.get("error") {
        return Err(McpClientError::ServerError {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }
    let result = message
        .get("result")
        .cloned()
        .ok_or_else(|| McpClientError::ProtocolError(format!("Response without result: {}", message)))?;
    Ok(serde_json::from_value(result)?)
}

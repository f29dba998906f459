/*!
* 文件名: utils.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: rmcp, tracing
* 描述: 工具公共函数 / Shared helpers for tool handlers
*/

use rmcp::ErrorData as McpError;
use tfmcp_registry::RegistryError;
use tracing::error;

/// 参数校验失败 / Argument validation failure
pub fn invalid_argument(message: impl Into<String>) -> McpError {
    let message = message.into();
    error!("{}", message);
    McpError::invalid_params(message, None)
}

/// Registry调用失败 / Registry call failure
///
/// 404 counts as a caller mistake (unknown id), anything else as an internal error.
pub fn registry_failure(message: impl Into<String>, err: &RegistryError) -> McpError {
    let message = format!("{}: {}", message.into(), err);
    error!("{}", message);
    if err.is_not_found() {
        McpError::invalid_params(message, None)
    } else {
        McpError::internal_error(message, None)
    }
}

/// 取必填字符串参数 / Take a required, non-empty string argument
pub fn require_string(value: Option<String>, name: &str, hint: &str) -> Result<String, McpError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(invalid_argument(format!("{} cannot be empty, {}", name, hint))),
        None => Err(invalid_argument(format!(
            "{} is required and must be a string, {}",
            name, hint
        ))),
    }
}

/// 截取README的介绍部分 / Keep the introduction of a README
///
/// Everything up to (not including) the second markdown heading.
pub fn extract_readme(readme: &str) -> String {
    let mut kept = Vec::new();
    let mut headings = 0;
    for line in readme.lines() {
        if line.trim_start().starts_with('#') {
            headings += 1;
            if headings > 1 {
                break;
            }
        }
        kept.push(line);
    }
    kept.join("\n").trim().to_string()
}

/// 转义Markdown表格单元格 / Escape a markdown table cell
pub fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/*!
* 文件名: suite.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: tracing
* 描述: 工具测试套件执行器 / Tool test suite runner
*/

use crate::cases::{default_tables, ContentType, TestCase, ToolTable, SEARCH_MODULES};
use crate::cases::{GET_PROVIDER_DOCS, MODULE_DETAILS, RESOLVE_PROVIDER_DOC_ID};
use crate::client::{Content, InitializeResult, McpClient, ToolResponse};
use crate::errors::{E2eError, E2eResult, McpClientError};
use std::fmt;
use tracing::{error, info};

/// 期望的服务器名称 / Server name expected from the handshake
pub const EXPECTED_SERVER_NAME: &str = "terraform-mcp-server";

/// 单个用例结果 / Outcome of one case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    /// `<transport>_<tool>/<case>`
    pub name: String,
    pub error: Option<String>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// 套件报告 / Suite report
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn record(&mut self, name: String, result: Result<(), String>) {
        match &result {
            Ok(()) => info!("PASS {}", name),
            Err(message) => error!("FAIL {}: {}", name, message),
        }
        self.outcomes.push(CaseOutcome {
            name,
            error: result.err(),
        });
    }

    pub fn failures(&self) -> Vec<&CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed()).collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    pub fn merge(&mut self, other: SuiteReport) {
        self.outcomes.extend(other.outcomes);
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failures = self.failures();
        writeln!(
            f,
            "{} passed, {} failed",
            self.outcomes.len() - failures.len(),
            failures.len()
        )?;
        for failure in failures {
            writeln!(
                f,
                "  {}: {}",
                failure.name,
                failure.error.as_deref().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

/// 执行握手并校验服务器名称 / Run the handshake and check the server name
pub async fn handshake(client: &dyn McpClient) -> E2eResult<InitializeResult> {
    let result = client
        .initialize()
        .await
        .map_err(|e| E2eError::HandshakeFailed(format!("Failed to initialize MCP client: {}", e)))?;
    info!(
        "Initialized with server: {} {}",
        result.server_info.name, result.server_info.version
    );
    if result.server_info.name != EXPECTED_SERVER_NAME {
        return Err(E2eError::HandshakeFailed(format!(
            "expected server name {}, got {}",
            EXPECTED_SERVER_NAME, result.server_info.name
        )));
    }
    Ok(result)
}

/// 套件执行器 / Suite runner
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    transport: String,
    tables: Vec<ToolTable>,
}

impl SuiteRunner {
    pub fn new(transport: impl Into<String>) -> Self {
        Self::with_tables(transport, default_tables())
    }

    pub fn with_tables(transport: impl Into<String>, tables: Vec<ToolTable>) -> Self {
        Self {
            transport: transport.into(),
            tables,
        }
    }

    /// 执行套件；握手失败终止本次子测试 / Run the suite; a failed handshake aborts this sub-test
    pub async fn run(&self, client: &dyn McpClient) -> E2eResult<SuiteReport> {
        handshake(client).await?;

        let mut report = SuiteReport::default();
        for table in &self.tables {
            for case in &table.cases {
                let name = format!("{}_{}/{}", self.transport, table.tool, case.name);
                let result = self.run_case(client, table.tool, case).await;
                report.record(name, result);
            }
        }
        Ok(report)
    }

    async fn run_case(&self, client: &dyn McpClient, tool: &str, case: &TestCase) -> Result<(), String> {
        // 每个用例重新握手 / Re-run the handshake before every case
        handshake(client).await.map_err(|e| e.to_string())?;
        info!("TOOL {} {}", tool, case.description);
        info!("Test payload: {:?}", case.payload);

        let result = client.call_tool(tool, case.payload.clone()).await;
        check_response(tool, case, result)
    }
}

/// 校验工具响应 / Check a tool response against a case
pub fn check_response(
    tool: &str,
    case: &TestCase,
    result: Result<ToolResponse, McpClientError>,
) -> Result<(), String> {
    if case.should_fail {
        return match result {
            Err(e) => {
                info!("Error: {}", e);
                Ok(())
            }
            Ok(_) => Err(format!("expected to call '{}' tool with error", tool)),
        };
    }

    let response =
        result.map_err(|e| format!("expected to call '{}' tool successfully: {}", tool, e))?;
    if response.is_error {
        return Err("expected result not to be an error".to_string());
    }

    if tool == SEARCH_MODULES {
        // 搜索允许零结果 / A search may legitimately return nothing
        return match response.content.first() {
            None => {
                info!("Response content is empty for successful call.");
                Ok(())
            }
            Some(item) => text_of(item).map(|text| info!("Content length: {}", text.len())),
        };
    }

    if response.content.len() != 1 {
        return Err(format!(
            "expected content to have one item, got {}",
            response.content.len()
        ));
    }
    let text = text_of(&response.content[0])?;
    info!("Content length: {}", text.len());

    match tool {
        RESOLVE_PROVIDER_DOC_ID => match case.content_type {
            ContentType::DataSource => require_contains(text, "Category: data-sources"),
            ContentType::Resource => require_contains(text, "Category: resources"),
            ContentType::Guides => require_contains(text, "guide"),
            ContentType::Functions => require_contains(text, "functions"),
            ContentType::Unspecified => Ok(()),
        },
        GET_PROVIDER_DOCS => require_contains(text, "page_title"),
        MODULE_DETAILS => match case.content_type {
            ContentType::DataSource => require_absent(text, "**Category:** resources"),
            ContentType::Resource => require_absent(text, "**Category:** data-sources"),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

fn text_of(item: &Content) -> Result<&str, String> {
    item.as_text()
        .ok_or_else(|| format!("expected content to be of type text, got {:?}", item))
}

fn require_contains(text: &str, needle: &str) -> Result<(), String> {
    if text.contains(needle) {
        Ok(())
    } else {
        Err(format!("expected content to contain {:?}", needle))
    }
}

fn require_absent(text: &str, needle: &str) -> Result<(), String> {
    if text.contains(needle) {
        Err(format!("expected content not to contain {:?}", needle))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Implementation;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 按工具名返回预设结果的客户端 / Client answering with canned results per tool
    struct FakeClient {
        server_name: &'static str,
        initializations: AtomicUsize,
    }

    impl FakeClient {
        fn new(server_name: &'static str) -> Self {
            Self {
                server_name,
                initializations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl McpClient for FakeClient {
        async fn initialize(&self) -> Result<InitializeResult, McpClientError> {
            self.initializations.fetch_add(1, Ordering::SeqCst);
            Ok(InitializeResult {
                protocol_version: "2025-03-26".to_string(),
                server_info: Implementation {
                    name: self.server_name.to_string(),
                    version: "0.1.0".to_string(),
                },
                capabilities: Value::Null,
                instructions: None,
            })
        }

        async fn call_tool(
            &self,
            name: &str,
            arguments: Map<String, Value>,
        ) -> Result<ToolResponse, McpClientError> {
            if arguments.is_empty() {
                return Err(McpClientError::ServerError {
                    code: -32602,
                    message: format!("{} requires arguments", name),
                });
            }
            let text = match name {
                "resolveProviderDocID" => "- providerDocID: 1\n- Category: data-sources\n",
                "getProviderDocs" => "---\npage_title: aws_s3_bucket\n---",
                "moduleDetails" => "# terraform-aws-modules/vpc/aws\n**Category:** data-sources",
                _ => return Ok(ToolResponse::default()),
            };
            Ok(ToolResponse {
                content: vec![Content::text(text)],
                is_error: false,
            })
        }

        async fn close(&self) -> Result<(), McpClientError> {
            Ok(())
        }
    }

    fn table(tool: &'static str, cases: Vec<TestCase>) -> ToolTable {
        ToolTable { tool, cases }
    }

    #[tokio::test]
    async fn test_runner_records_every_case_and_continues() {
        let tables = vec![
            table(
                "resolveProviderDocID",
                vec![
                    TestCase::failing("empty_payload", "empty", json!({})),
                    TestCase::ok("data", "data sources", json!({"providerName": "aws"}), ContentType::DataSource),
                    TestCase::ok("resources", "resources", json!({"providerName": "aws"}), ContentType::Resource),
                ],
            ),
            table(
                "searchModules",
                vec![TestCase::ok("empty_result", "no matches", json!({"moduleQuery": "zz"}), ContentType::Unspecified)],
            ),
            table(
                "moduleDetails",
                vec![TestCase::ok("vpc", "resource module", json!({"moduleID": "a/b/c"}), ContentType::Resource)],
            ),
        ];
        let client = FakeClient::new(EXPECTED_SERVER_NAME);
        let report = SuiteRunner::with_tables("Stdio", tables).run(&client).await.unwrap();

        let names: Vec<&str> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Stdio_resolveProviderDocID/empty_payload",
                "Stdio_resolveProviderDocID/data",
                "Stdio_resolveProviderDocID/resources",
                "Stdio_searchModules/empty_result",
                "Stdio_moduleDetails/vpc",
            ]
        );
        let failed: Vec<&str> = report.failures().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            failed,
            vec!["Stdio_resolveProviderDocID/resources", "Stdio_moduleDetails/vpc"]
        );
        // 初始握手加每个用例一次 / One initial handshake plus one per case
        assert_eq!(client.initializations.load(Ordering::SeqCst), 6);
        assert!(report.to_string().starts_with("3 passed, 2 failed"));
    }

    #[tokio::test]
    async fn test_wrong_server_name_aborts() {
        let client = FakeClient::new("some-other-server");
        let err = SuiteRunner::new("HTTP").run(&client).await.unwrap_err();
        assert!(matches!(err, E2eError::HandshakeFailed(_)));
    }

    #[test]
    fn test_expected_failure_requires_error() {
        let case = TestCase::failing("empty", "empty", json!({}));
        assert!(check_response("getProviderDocs", &case, Ok(ToolResponse::default())).is_err());
        let err = McpClientError::ServerError {
            code: -32602,
            message: "providerDocID is required".to_string(),
        };
        assert!(check_response("getProviderDocs", &case, Err(err)).is_ok());
    }

    #[test]
    fn test_success_requires_exactly_one_text_item() {
        let case = TestCase::ok("doc", "doc", json!({"providerDocID": "1"}), ContentType::Unspecified);
        let two = ToolResponse {
            content: vec![Content::text("page_title"), Content::text("page_title")],
            is_error: false,
        };
        assert!(check_response("getProviderDocs", &case, Ok(two)).is_err());

        let image = ToolResponse {
            content: vec![Content::Image {
                data: String::new(),
                mime_type: "image/png".to_string(),
            }],
            is_error: false,
        };
        assert!(check_response("getProviderDocs", &case, Ok(image)).is_err());

        let flagged = ToolResponse {
            content: vec![Content::text("page_title")],
            is_error: true,
        };
        assert!(check_response("getProviderDocs", &case, Ok(flagged)).is_err());

        let one = ToolResponse {
            content: vec![Content::text("---\npage_title: x\n---")],
            is_error: false,
        };
        assert!(check_response("getProviderDocs", &case, Ok(one)).is_ok());
    }

    #[test]
    fn test_provider_category_checks() {
        let text = |t: &str| -> Result<ToolResponse, McpClientError> {
            Ok(ToolResponse {
                content: vec![Content::text(t)],
                is_error: false,
            })
        };
        let guides = TestCase::ok("g", "g", json!({"a": 1}), ContentType::Guides);
        assert!(check_response("resolveProviderDocID", &guides, text("- Category: guides")).is_ok());
        let functions = TestCase::ok("f", "f", json!({"a": 1}), ContentType::Functions);
        assert!(check_response("resolveProviderDocID", &functions, text("- Category: guides")).is_err());
        let data = TestCase::ok("m", "m", json!({"a": 1}), ContentType::DataSource);
        assert!(check_response("moduleDetails", &data, text("**Category:** resources")).is_err());
        assert!(check_response("moduleDetails", &data, text("**Category:** data-sources")).is_ok());
    }
}

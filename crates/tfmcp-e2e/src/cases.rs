/*!
* 文件名: cases.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: serde_json
* 描述: 工具测试用例表 / Tool test case tables
*/

use serde_json::{json, Map, Value};

/// 期望的内容类别 / Expected content category of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Unspecified,
    Resource,
    DataSource,
    Guides,
    Functions,
}

/// 测试用例 / Test case
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: &'static str,
    pub description: &'static str,
    pub payload: Map<String, Value>,
    pub should_fail: bool,
    pub content_type: ContentType,
}

impl TestCase {
    /// 期望成功的用例 / Case expected to succeed
    pub fn ok(name: &'static str, description: &'static str, payload: Value, content_type: ContentType) -> Self {
        Self {
            name,
            description,
            payload: into_map(payload),
            should_fail: false,
            content_type,
        }
    }

    /// 期望失败的用例 / Case expected to fail
    pub fn failing(name: &'static str, description: &'static str, payload: Value) -> Self {
        Self {
            name,
            description,
            payload: into_map(payload),
            should_fail: true,
            content_type: ContentType::Unspecified,
        }
    }
}

fn into_map(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// 一个工具的用例表 / Case table of one tool
#[derive(Debug, Clone)]
pub struct ToolTable {
    pub tool: &'static str,
    pub cases: Vec<TestCase>,
}

pub const RESOLVE_PROVIDER_DOC_ID: &str = "resolveProviderDocID";
pub const GET_PROVIDER_DOCS: &str = "getProviderDocs";
pub const SEARCH_MODULES: &str = "searchModules";
pub const MODULE_DETAILS: &str = "moduleDetails";

pub fn provider_cases() -> Vec<TestCase> {
    vec![
        TestCase::failing("empty_payload", "Testing resolveProviderDocID with an empty payload", json!({})),
        TestCase::failing(
            "missing_service_slug",
            "Testing resolveProviderDocID without serviceSlug",
            json!({"providerName": "aws", "providerNamespace": "hashicorp"}),
        ),
        TestCase::failing(
            "invalid_provider_data_type",
            "Testing resolveProviderDocID with an unsupported providerDataType",
            json!({"providerName": "aws", "serviceSlug": "s3_bucket", "providerDataType": "modules"}),
        ),
        TestCase::failing(
            "unknown_provider",
            "Testing resolveProviderDocID with a provider that does not exist",
            json!({"providerName": "this-provider-does-not-exist", "serviceSlug": "bucket"}),
        ),
        TestCase::ok(
            "without_provider_namespace",
            "Testing resolveProviderDocID with the default namespace",
            json!({"providerName": "aws", "serviceSlug": "s3_bucket", "providerDataType": "resources"}),
            ContentType::Resource,
        ),
        TestCase::ok(
            "provider_data_sources",
            "Testing resolveProviderDocID for data sources",
            json!({
                "providerName": "aws",
                "providerNamespace": "hashicorp",
                "serviceSlug": "s3_bucket",
                "providerDataType": "data-sources"
            }),
            ContentType::DataSource,
        ),
        TestCase::ok(
            "pinned_provider_version",
            "Testing resolveProviderDocID with a specific provider version",
            json!({
                "providerName": "aws",
                "providerNamespace": "hashicorp",
                "serviceSlug": "instance",
                "providerDataType": "resources",
                "providerVersion": "5.0.0"
            }),
            ContentType::Resource,
        ),
        TestCase::ok(
            "provider_guides",
            "Testing resolveProviderDocID for guides",
            json!({
                "providerName": "aws",
                "providerNamespace": "hashicorp",
                "serviceSlug": "custom-service-endpoints",
                "providerDataType": "guides"
            }),
            ContentType::Guides,
        ),
        TestCase::ok(
            "provider_functions",
            "Testing resolveProviderDocID for provider functions",
            json!({
                "providerName": "google",
                "providerNamespace": "hashicorp",
                "serviceSlug": "name_from_id",
                "providerDataType": "functions"
            }),
            ContentType::Functions,
        ),
    ]
}

pub fn provider_docs_cases() -> Vec<TestCase> {
    vec![
        TestCase::failing("empty_payload", "Testing getProviderDocs with an empty payload", json!({})),
        TestCase::failing(
            "non_numeric_doc_id",
            "Testing getProviderDocs with a resource name instead of a providerDocID",
            json!({"providerDocID": "aws_s3_bucket"}),
        ),
        TestCase::failing(
            "unknown_doc_id",
            "Testing getProviderDocs with a providerDocID that does not exist",
            json!({"providerDocID": "0"}),
        ),
        TestCase::ok(
            "valid_doc_id",
            "Testing getProviderDocs with a known providerDocID",
            json!({"providerDocID": "8894603"}),
            ContentType::Unspecified,
        ),
    ]
}

pub fn search_modules_cases() -> Vec<TestCase> {
    vec![
        TestCase::failing("missing_query", "Testing searchModules without moduleQuery", json!({})),
        TestCase::failing("empty_query", "Testing searchModules with an empty moduleQuery", json!({"moduleQuery": ""})),
        TestCase::failing(
            "negative_offset",
            "Testing searchModules with a negative currentOffset",
            json!({"moduleQuery": "vpc", "currentOffset": -1}),
        ),
        TestCase::ok(
            "vpc_query",
            "Testing searchModules with a common query",
            json!({"moduleQuery": "vpc"}),
            ContentType::Unspecified,
        ),
        TestCase::ok(
            "query_with_offset",
            "Testing searchModules with pagination",
            json!({"moduleQuery": "aws eks", "currentOffset": 10}),
            ContentType::Unspecified,
        ),
        TestCase::ok(
            "no_matches",
            "Testing searchModules with a query that matches nothing",
            json!({"moduleQuery": "zz-no-such-terraform-module-zz"}),
            ContentType::Unspecified,
        ),
    ]
}

pub fn module_details_cases() -> Vec<TestCase> {
    vec![
        TestCase::failing("empty_payload", "Testing moduleDetails with an empty payload", json!({})),
        TestCase::failing("malformed_module_id", "Testing moduleDetails with a malformed moduleID", json!({"moduleID": "vpc"})),
        TestCase::failing(
            "unknown_module",
            "Testing moduleDetails with a module that does not exist",
            json!({"moduleID": "no-such-namespace/no-such-module/aws/0.0.1"}),
        ),
        TestCase::ok(
            "vpc_module",
            "Testing moduleDetails with a resource-oriented module",
            json!({"moduleID": "terraform-aws-modules/vpc/aws/5.19.0"}),
            ContentType::Resource,
        ),
        TestCase::ok(
            "label_module",
            "Testing moduleDetails with a module that declares no resources",
            json!({"moduleID": "cloudposse/label/null/0.25.0"}),
            ContentType::DataSource,
        ),
    ]
}

/// 全部工具表（固定顺序） / Every tool table, in a fixed order
pub fn default_tables() -> Vec<ToolTable> {
    vec![
        ToolTable {
            tool: RESOLVE_PROVIDER_DOC_ID,
            cases: provider_cases(),
        },
        ToolTable {
            tool: GET_PROVIDER_DOCS,
            cases: provider_docs_cases(),
        },
        ToolTable {
            tool: SEARCH_MODULES,
            cases: search_modules_cases(),
        },
        ToolTable {
            tool: MODULE_DETAILS,
            cases: module_details_cases(),
        },
    ]
}

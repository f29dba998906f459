/*!
* 文件名: module.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: rmcp, tfmcp-registry, url
* 描述: 模块搜索与详情工具 / Module search and details tools
*/

use super::utils::{extract_readme, invalid_argument, registry_failure, require_string, table_cell};
use lazy_static::lazy_static;
use regex::Regex;
use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write;
use tfmcp_registry::{ApiVersion, ModuleDetails, ModuleSearchResponse, ModuleSummary, RegistryClient};
use tracing::{debug, info};

lazy_static! {
    /// namespace/name/provider[/version]
    static ref MODULE_ID: Regex = Regex::new(r"^[^/\s]+/[^/\s]+/[^/\s]+(/[^/\s]+)?$").unwrap();
}

/// searchModules参数 / Arguments of searchModules
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchModulesArgs {
    /// The query to search for Terraform modules, e.g. 'vpc' or 'aws eks'
    pub module_query: Option<String>,
    /// Pagination offset, 0 for the first page
    pub current_offset: Option<u64>,
}

/// moduleDetails参数 / Arguments of moduleDetails
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ModuleDetailsArgs {
    /// Exact moduleID returned by 'searchModules' (namespace/name/provider/version)
    #[serde(rename = "moduleID")]
    pub module_id: Option<String>,
}

/// 搜索模块 / Search modules
pub async fn search_modules(
    registry: &RegistryClient,
    args: SearchModulesArgs,
) -> Result<CallToolResult, McpError> {
    let query = require_string(
        args.module_query,
        "moduleQuery",
        "it is the text used to search the Terraform registry for modules",
    )?;
    let offset = args.current_offset.unwrap_or(0);

    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    let path = format!("modules/search?q={}&offset={}", encoded, offset);
    let response: ModuleSearchResponse = registry
        .get_json(ApiVersion::V1, &path)
        .await
        .map_err(|e| registry_failure(format!("Failed to search modules for '{}'", query), &e))?;

    debug!(
        "searchModules '{}' offset {}: {} modules",
        query,
        offset,
        response.modules.len()
    );
    // 没有匹配不是错误 / Zero matches is a legitimate, successful answer
    if response.modules.is_empty() {
        info!("searchModules '{}' returned no modules", query);
        return Ok(CallToolResult::success(vec![]));
    }

    let text = format_module_search(&query, &response);
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// 格式化搜索结果 / Format search results
pub fn format_module_search(query: &str, response: &ModuleSearchResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Available Terraform Modules (top matches) for {}\n", query);
    out.push_str("Each result includes:\n");
    out.push_str("- moduleID: The module ID (format: namespace/name/provider-name/module-version)\n");
    out.push_str("- Name: The name of the module\n");
    out.push_str("- Description: A short description of the module\n");
    out.push_str("- Downloads: The total number of times the module has been downloaded\n");
    out.push_str("- Verified: Verification status of the module\n");
    out.push_str("- Published: The date and time when the module was published\n\n---\n\n");

    for module in &response.modules {
        write_module_summary(&mut out, module);
    }

    if let Some(next) = response.meta.next_offset {
        let _ = writeln!(out, "\nMore results are available, use currentOffset {} for the next page.", next);
    }
    out
}

fn write_module_summary(out: &mut String, module: &ModuleSummary) {
    let _ = writeln!(out, "- moduleID: {}", module.id);
    let _ = writeln!(out, "- Name: {}", module.name);
    let _ = writeln!(out, "- Description: {}", module.description);
    let _ = writeln!(out, "- Downloads: {}", module.downloads);
    let _ = writeln!(out, "- Verified: {}", module.verified);
    match module.published_at {
        Some(published) => {
            let _ = writeln!(out, "- Published: {}", published.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        None => out.push_str("- Published: unknown\n"),
    }
    out.push_str("---\n\n");
}

/// 获取模块详情 / Fetch module details
pub async fn module_details(
    registry: &RegistryClient,
    args: ModuleDetailsArgs,
) -> Result<CallToolResult, McpError> {
    let module_id = require_string(
        args.module_id,
        "moduleID",
        "it is fetched by running the searchModules tool",
    )?;
    if !MODULE_ID.is_match(&module_id) {
        return Err(invalid_argument(format!(
            "moduleID '{}' is invalid, expected namespace/name/provider/version",
            module_id
        )));
    }

    let details: ModuleDetails = registry
        .get_json(ApiVersion::V1, &format!("modules/{}", module_id))
        .await
        .map_err(|e| registry_failure(format!("Failed to fetch module details for {}", module_id), &e))?;

    Ok(CallToolResult::success(vec![Content::text(format_module_details(&details))]))
}

fn default_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 格式化模块详情为Markdown / Render module details as markdown
pub fn format_module_details(details: &ModuleDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", details.id);
    let _ = writeln!(out, "**Description:** {}\n", details.description);
    let _ = writeln!(out, "**Source:** {}\n", details.source);
    let _ = write!(
        out,
        "**Downloads:** {} | **Verified:** {}",
        details.downloads, details.verified
    );
    if let Some(published) = details.published_at {
        let _ = write!(out, " | **Published:** {}", published.format("%Y-%m-%d"));
    }
    out.push_str("\n\n");

    let root = &details.root;
    if !root.inputs.is_empty() {
        out.push_str("### Inputs\n\n| Name | Type | Description | Default | Required |\n|---|---|---|---|---|\n");
        for input in &root.inputs {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                table_cell(&input.name),
                table_cell(&input.kind),
                table_cell(&input.description),
                table_cell(&default_value(&input.default)),
                input.required
            );
        }
        out.push('\n');
    }

    if !root.outputs.is_empty() {
        out.push_str("### Outputs\n\n| Name | Description |\n|---|---|\n");
        for output in &root.outputs {
            let _ = writeln!(out, "| {} | {} |", table_cell(&output.name), table_cell(&output.description));
        }
        out.push('\n');
    }

    if !root.provider_dependencies.is_empty() {
        out.push_str("### Provider Dependencies\n\n| Name | Namespace | Source | Version |\n|---|---|---|---|\n");
        for dep in &root.provider_dependencies {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                dep.name, dep.namespace, dep.source, dep.version
            );
        }
        out.push('\n');
    }

    if !details.examples.is_empty() {
        out.push_str("### Examples\n\n");
        for example in &details.examples {
            let _ = writeln!(out, "- {} ({})", example.name, example.path);
        }
        out.push('\n');
    }

    let readme = extract_readme(&root.readme);
    if !readme.is_empty() {
        out.push_str("### Readme\n\n");
        out.push_str(&readme);
        out.push('\n');
    }
    out
}

/*!
* 文件名: policy.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: rmcp, tfmcp-registry
* 描述: Sentinel策略工具 / Sentinel policy tools
*/

use super::utils::{extract_readme, invalid_argument, registry_failure, require_string};
use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt::Write;
use tfmcp_registry::{ApiVersion, PolicyDetailsResponse, PolicyListResponse, RegistryClient};
use tracing::debug;

/// search_policies参数 / Arguments of search_policies
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchPoliciesArgs {
    /// Text to look for in policy library names and titles, e.g. 'cis aws'
    #[serde(rename = "policyQuery")]
    pub policy_query: Option<String>,
}

/// policy_details参数 / Arguments of policy_details
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PolicyDetailsArgs {
    /// terraform_policy_id from 'search_policies', e.g. 'policies/hashicorp/CIS-Policy-Set-for-AWS-Terraform/1.0.1'
    pub terraform_policy_id: Option<String>,
}

/// 搜索策略库 / Search policy libraries
pub async fn search_policies(
    registry: &RegistryClient,
    args: SearchPoliciesArgs,
) -> Result<CallToolResult, McpError> {
    let query = require_string(
        args.policy_query,
        "policyQuery",
        "it is the text used to search Sentinel policy libraries",
    )?;

    let listing: PolicyListResponse = registry
        .get_json(ApiVersion::V2, "policies?page[size]=100&include=latest-version")
        .await
        .map_err(|e| registry_failure("Failed to fetch policies from the registry", &e))?;

    let ids = matching_policy_ids(&listing, &query);
    debug!("search_policies '{}': {} matches", query, ids.len());
    if ids.is_empty() {
        return Err(invalid_argument(format!(
            "No policies found matching '{}', try a broader policyQuery",
            query
        )));
    }

    let mut out = String::new();
    let _ = writeln!(out, "Matching Terraform policy libraries for '{}'\n", query);
    out.push_str("Use the terraform_policy_id with the policy_details tool.\n\n---\n\n");
    for (id, title, downloads) in ids {
        let _ = writeln!(out, "- terraform_policy_id: {}", id);
        let _ = writeln!(out, "- Title: {}", title);
        let _ = writeln!(out, "- Downloads: {}", downloads);
        out.push_str("---\n");
    }
    Ok(CallToolResult::success(vec![Content::text(out)]))
}

/// 匹配策略库，返回(id, 标题, 下载量) / Match libraries, returning (id, title, downloads)
pub fn matching_policy_ids(listing: &PolicyListResponse, query: &str) -> Vec<(String, String, u64)> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();

    listing
        .data
        .iter()
        .filter(|library| {
            let haystack = format!(
                "{} {} {}",
                library.attributes.name, library.attributes.title, library.attributes.full_name
            )
            .to_ascii_lowercase();
            terms.iter().all(|term| haystack.contains(term))
        })
        .filter_map(|library| {
            let version_id = library
                .relationships
                .latest_version
                .as_ref()
                .and_then(|rel| rel.data.as_ref())
                .map(|data| data.id.as_str())?;
            let version = listing
                .included
                .iter()
                .find(|inc| inc.id == version_id)
                .map(|inc| inc.attributes.version.clone())
                .filter(|v| !v.is_empty())?;
            Some((
                format!("policies/{}/{}", library.attributes.full_name, version),
                library.attributes.title.clone(),
                library.attributes.downloads,
            ))
        })
        .collect()
}

/// 获取策略详情 / Fetch policy details
pub async fn policy_details(
    registry: &RegistryClient,
    args: PolicyDetailsArgs,
) -> Result<CallToolResult, McpError> {
    let policy_id = require_string(
        args.terraform_policy_id,
        "terraform_policy_id",
        "it is fetched by running the search_policies tool",
    )?;
    let policy_id = policy_id.trim_start_matches('/').to_string();

    let details: PolicyDetailsResponse = registry
        .get_json(
            ApiVersion::V2,
            &format!("{}?include=policies,policy-modules,policy-library", policy_id),
        )
        .await
        .map_err(|e| {
            registry_failure(
                "Failed to fetch policy details: registry API did not return a successful response",
                &e,
            )
        })?;

    Ok(CallToolResult::success(vec![Content::text(format_policy_details(&policy_id, &details))]))
}

/// 渲染策略详情与HCL用法 / Render policy details and HCL usage
pub fn format_policy_details(policy_id: &str, details: &PolicyDetailsResponse) -> String {
    let readme = extract_readme(&details.data.attributes.readme);

    let mut modules = String::new();
    let mut policies = String::new();
    for item in &details.included {
        match item.kind.as_str() {
            "policy-modules" => {
                let _ = write!(
                    modules,
                    "\nmodule \"{name}\" {{\nsource = \"https://registry.terraform.io/v2/{id}/policy-module/{name}.sentinel?checksum=sha256:{sha}\"\n}}\n",
                    name = item.attributes.name,
                    id = policy_id,
                    sha = item.attributes.shasum
                );
            }
            "policies" => {
                let _ = writeln!(policies, "- POLICY_NAME: {}", item.attributes.name);
                let _ = writeln!(policies, "- POLICY_CHECKSUM: sha256:{}", item.attributes.shasum);
                policies.push_str("\n---\n");
            }
            _ => {}
        }
    }

    let mut out = String::new();
    let _ = write!(out, "## Policy details about {} \n\n{}", policy_id, readme);
    out.push_str("---\n");
    out.push_str("## Usage\n\n");
    out.push_str("Generate the content for a HashiCorp Configuration Language (HCL) file named policies.hcl. This file should define a set of policies. For each policy provided, create a distinct policy block using the following template.\n");
    out.push_str("\n```hcl\n");
    let _ = write!(
        out,
        "\n{modules}\npolicy \"<<POLICY_NAME>>\" {{\nsource = \"https://registry.terraform.io/v2/{id}/policy/<<POLICY_NAME>>.sentinel?checksum=<<POLICY_CHECKSUM>>\"\nenforcement_level = \"advisory\"\n}}\n",
        modules = modules,
        id = policy_id
    );
    out.push_str("\n```\n");
    let _ = write!(out, "Available policies with SHA for {} are: \n\n", policy_id);
    out.push_str(&policies);
    out
}

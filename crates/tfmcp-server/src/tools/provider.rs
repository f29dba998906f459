/*!
* 文件名: provider.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: rmcp, tfmcp-registry
* 描述: Provider文档工具 / Provider documentation tools
*/

use super::utils::{invalid_argument, registry_failure, require_string};
use lazy_static::lazy_static;
use regex::Regex;
use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt;
use std::fmt::Write;
use std::str::FromStr;
use tfmcp_registry::{ApiVersion, ProviderDetails, ProviderDoc, ProviderDocResponse, RegistryClient};
use tracing::{debug, info};

lazy_static! {
    static ref PROVIDER_DOC_ID: Regex = Regex::new(r"^\d+$").unwrap();
}

/// 文档类别 / Provider documentation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderDataType {
    #[default]
    Resources,
    DataSources,
    Functions,
    Guides,
    Overview,
}

impl ProviderDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderDataType::Resources => "resources",
            ProviderDataType::DataSources => "data-sources",
            ProviderDataType::Functions => "functions",
            ProviderDataType::Guides => "guides",
            ProviderDataType::Overview => "overview",
        }
    }
}

impl fmt::Display for ProviderDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resources" | "resource" => Ok(ProviderDataType::Resources),
            "data-sources" | "data-source" | "data_sources" => Ok(ProviderDataType::DataSources),
            "functions" | "function" => Ok(ProviderDataType::Functions),
            "guides" | "guide" => Ok(ProviderDataType::Guides),
            "overview" => Ok(ProviderDataType::Overview),
            other => Err(format!(
                "providerDataType '{}' is not supported, use one of: resources, data-sources, functions, guides, overview",
                other
            )),
        }
    }
}

/// resolveProviderDocID参数 / Arguments of resolveProviderDocID
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveProviderDocIdArgs {
    /// The name of the Terraform provider, e.g. 'aws', 'azurerm', 'google'
    pub provider_name: Option<String>,
    /// The publisher of the provider, e.g. 'hashicorp' (default)
    pub provider_namespace: Option<String>,
    /// The service or resource slug to look for, e.g. 's3_bucket' or 'ec2'
    pub service_slug: Option<String>,
    /// One of: resources (default), data-sources, functions, guides, overview
    pub provider_data_type: Option<String>,
    /// Provider version, e.g. '5.0.0'; 'latest' when omitted
    pub provider_version: Option<String>,
}

/// getProviderDocs参数 / Arguments of getProviderDocs
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetProviderDocsArgs {
    /// Exact providerDocID returned by the 'resolveProviderDocID' tool
    #[serde(rename = "providerDocID")]
    pub provider_doc_id: Option<String>,
}

/// 解析Provider文档ID / Resolve provider doc ids for a service slug
pub async fn resolve_provider_doc_id(
    registry: &RegistryClient,
    args: ResolveProviderDocIdArgs,
) -> Result<CallToolResult, McpError> {
    let provider_name = require_string(
        args.provider_name,
        "providerName",
        "it names the Terraform provider, e.g. 'aws'",
    )?
    .to_ascii_lowercase();
    let service_slug = require_string(
        args.service_slug,
        "serviceSlug",
        "it names the service or resource to look up, e.g. 's3_bucket'",
    )?;
    let namespace = args
        .provider_namespace
        .map(|ns| ns.trim().to_ascii_lowercase())
        .filter(|ns| !ns.is_empty())
        .unwrap_or_else(|| "hashicorp".to_string());
    let data_type = match args.provider_data_type.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse().map_err(invalid_argument)?,
        _ => ProviderDataType::default(),
    };
    let version = args
        .provider_version
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "latest");

    let path = match &version {
        Some(version) => format!("providers/{}/{}/{}", namespace, provider_name, version),
        None => format!("providers/{}/{}", namespace, provider_name),
    };
    let details: ProviderDetails = registry
        .get_json(ApiVersion::V1, &path)
        .await
        .map_err(|e| {
            registry_failure(
                format!(
                    "Failed to fetch provider {}/{} from the registry",
                    namespace, provider_name
                ),
                &e,
            )
        })?;

    let matches = filter_provider_docs(&details.docs, data_type, &provider_name, &service_slug);
    debug!(
        "resolveProviderDocID {}/{} {} '{}': {} matches",
        namespace,
        provider_name,
        data_type,
        service_slug,
        matches.len()
    );
    if matches.is_empty() {
        return Err(invalid_argument(format!(
            "No {} documentation found for serviceSlug '{}' in provider {}/{} version {}, provide a more relevant serviceSlug",
            data_type, service_slug, namespace, provider_name, details.version
        )));
    }

    let text = format_provider_doc_matches(&namespace, &provider_name, &details.version, data_type, &matches);
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// 按类别和slug过滤文档 / Filter the docs index by category and slug
pub fn filter_provider_docs<'a>(
    docs: &'a [ProviderDoc],
    data_type: ProviderDataType,
    provider_name: &str,
    service_slug: &str,
) -> Vec<&'a ProviderDoc> {
    let slug = service_slug.trim().to_ascii_lowercase();
    let prefix = format!("{}_", provider_name);
    let slug = slug.strip_prefix(&prefix).unwrap_or(&slug).to_string();

    docs.iter()
        .filter(|doc| doc.category == data_type.as_str())
        .filter(|doc| doc.language.is_empty() || doc.language == "hcl")
        .filter(|doc| {
            doc.slug.to_ascii_lowercase().contains(&slug)
                || doc.title.to_ascii_lowercase().contains(&slug)
        })
        .collect()
}

/// 格式化匹配结果 / Format the matching docs
pub fn format_provider_doc_matches(
    namespace: &str,
    provider_name: &str,
    version: &str,
    data_type: ProviderDataType,
    matches: &[&ProviderDoc],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Available Documentation (top matches) for {} in Terraform provider {}/{} version: {}\n",
        data_type, namespace, provider_name, version
    );
    out.push_str("Each result includes:\n");
    out.push_str("- providerDocID: tfprovider-compatible identifier\n");
    out.push_str("- Title: Service or resource name\n");
    out.push_str("- Category: Type of document\n");
    out.push_str(
        "For best results, select libraries based on the serviceSlug match and category of information requested.\n\n---\n\n",
    );
    for doc in matches {
        let _ = writeln!(out, "- providerDocID: {}", doc.id);
        let _ = writeln!(out, "- Title: {}", doc.title);
        let _ = writeln!(out, "- Category: {}", doc.category);
        out.push_str("---\n");
    }
    out
}

/// 获取Provider文档内容 / Fetch a provider document
pub async fn get_provider_docs(
    registry: &RegistryClient,
    args: GetProviderDocsArgs,
) -> Result<CallToolResult, McpError> {
    let doc_id = require_string(
        args.provider_doc_id,
        "providerDocID",
        "it is fetched by running the resolveProviderDocID tool",
    )?;
    if !PROVIDER_DOC_ID.is_match(&doc_id) {
        return Err(invalid_argument(format!(
            "providerDocID '{}' is invalid, it must be the numeric id returned by resolveProviderDocID",
            doc_id
        )));
    }

    let doc: ProviderDocResponse = registry
        .get_json(ApiVersion::V2, &format!("provider-docs/{}", doc_id))
        .await
        .map_err(|e| registry_failure(format!("Failed to fetch provider doc {}", doc_id), &e))?;

    if doc.data.attributes.content.trim().is_empty() {
        return Err(invalid_argument(format!(
            "Provider doc {} has no content",
            doc_id
        )));
    }
    info!(
        "getProviderDocs {}: {} ({} bytes)",
        doc_id,
        doc.data.attributes.title,
        doc.data.attributes.content.len()
    );
    Ok(CallToolResult::success(vec![Content::text(doc.data.attributes.content)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str, slug: &str, category: &str) -> ProviderDoc {
        ProviderDoc {
            id: id.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            category: category.to_string(),
            language: "hcl".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_data_type_parsing() {
        assert_eq!("data-sources".parse::<ProviderDataType>().unwrap(), ProviderDataType::DataSources);
        assert_eq!("Guides".parse::<ProviderDataType>().unwrap(), ProviderDataType::Guides);
        assert!("modules".parse::<ProviderDataType>().is_err());
    }

    #[test]
    fn test_filter_matches_category_and_slug() {
        let docs = vec![
            doc("1", "aws_s3_bucket", "s3_bucket", "resources"),
            doc("2", "aws_s3_bucket", "s3_bucket", "data-sources"),
            doc("3", "aws_instance", "instance", "resources"),
            ProviderDoc {
                language: "python".to_string(),
                ..doc("4", "aws_s3_object", "s3_object", "resources")
            },
        ];

        let found = filter_provider_docs(&docs, ProviderDataType::Resources, "aws", "aws_s3");
        let ids: Vec<&str> = found.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        let found = filter_provider_docs(&docs, ProviderDataType::DataSources, "aws", "S3_BUCKET");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "2");
    }

    #[test]
    fn test_format_lists_every_match() {
        let docs = vec![
            doc("11", "aws_s3_bucket", "s3_bucket", "data-sources"),
            doc("12", "aws_s3_objects", "s3_objects", "data-sources"),
        ];
        let refs: Vec<&ProviderDoc> = docs.iter().collect();
        let text = format_provider_doc_matches("hashicorp", "aws", "5.0.0", ProviderDataType::DataSources, &refs);

        assert!(text.contains("Terraform provider hashicorp/aws version: 5.0.0"));
        assert!(text.contains("- providerDocID: 11"));
        assert!(text.contains("- providerDocID: 12"));
        assert!(text.contains("Category: data-sources"));
        assert!(!text.contains("Category: resources"));
    }
}

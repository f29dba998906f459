/*!
* 文件名: model.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: serde, chrono
* 描述: Registry响应数据模型 / Registry response data models
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========== Providers (v1) ==========

/// Provider详情（含文档列表） / Provider details including the docs index
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderDetails {
    pub id: String,
    pub namespace: String,
    pub name: String,
    /// 当前版本 / Version described by this payload
    pub version: String,
    pub versions: Vec<String>,
    pub docs: Vec<ProviderDoc>,
}

/// Provider文档索引项 / Provider doc index entry
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderDoc {
    pub id: String,
    pub title: String,
    pub path: String,
    pub slug: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub language: String,
}

// ========== Provider docs (v2) ==========

/// 单个Provider文档 / A single provider document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDocResponse {
    pub data: ProviderDocData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDocData {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: ProviderDocAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderDocAttributes {
    pub category: String,
    pub content: String,
    pub language: String,
    pub path: String,
    pub slug: String,
    pub subcategory: Option<String>,
    pub title: String,
    pub truncated: bool,
}

// ========== Modules (v1) ==========

/// 模块搜索结果 / Module search result
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModuleSearchResponse {
    pub meta: ModuleSearchMeta,
    pub modules: Vec<ModuleSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModuleSearchMeta {
    pub limit: u32,
    pub current_offset: u32,
    pub next_offset: Option<u32>,
    pub prev_offset: Option<u32>,
}

/// 模块摘要 / Module summary
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModuleSummary {
    pub id: String,
    pub owner: String,
    pub namespace: String,
    pub name: String,
    pub version: String,
    pub provider: String,
    pub description: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub downloads: u64,
    pub verified: bool,
}

/// 模块详情 / Module details
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModuleDetails {
    pub id: String,
    pub owner: String,
    pub namespace: String,
    pub name: String,
    pub version: String,
    pub provider: String,
    pub description: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub downloads: u64,
    pub verified: bool,
    pub root: ModulePart,
    pub submodules: Vec<ModulePart>,
    pub examples: Vec<ModulePart>,
    pub providers: Vec<String>,
    pub versions: Vec<String>,
}

/// 模块的根/子模块/示例部分 / Root, submodule or example part of a module
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModulePart {
    pub path: String,
    pub name: String,
    pub readme: String,
    pub empty: bool,
    pub inputs: Vec<ModuleInput>,
    pub outputs: Vec<ModuleOutput>,
    pub dependencies: Vec<Value>,
    pub provider_dependencies: Vec<ProviderDependency>,
    pub resources: Vec<ModuleResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModuleInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub default: Value,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModuleOutput {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderDependency {
    pub name: String,
    pub namespace: String,
    pub source: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModuleResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

// ========== Policies (v2, JSON:API) ==========

/// 策略库列表 / Policy library listing
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyListResponse {
    pub data: Vec<PolicyLibrary>,
    pub included: Vec<PolicyIncluded>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyLibrary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: PolicyLibraryAttributes,
    pub relationships: PolicyLibraryRelationships,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct PolicyLibraryAttributes {
    pub name: String,
    pub namespace: String,
    pub title: String,
    pub full_name: String,
    pub downloads: u64,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct PolicyLibraryRelationships {
    pub latest_version: Option<Relationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Relationship {
    pub data: Option<ResourceIdentifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// JSON:API included资源 / JSON:API included resource
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyIncluded {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: PolicyIncludedAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct PolicyIncludedAttributes {
    pub name: String,
    pub version: String,
    pub description: String,
    pub shasum: String,
    pub readme: String,
}

/// 策略详情 / Policy details
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyDetailsResponse {
    pub data: PolicyDetailsData,
    pub included: Vec<PolicyIncluded>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyDetailsData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: PolicyIncludedAttributes,
}

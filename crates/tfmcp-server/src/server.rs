/*!
* 文件名: server.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: rmcp, tfmcp-registry
* 描述: Terraform MCP服务器实现 / Terraform MCP server implementation
*/

use crate::tools::{self, *};
use rmcp::{
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
        ServerHandler,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router, ErrorData as McpError,
};
use tfmcp_registry::RegistryClient;

/// 服务器名称（客户端握手时可见） / Server name reported during the handshake
pub const SERVER_NAME: &str = "terraform-mcp-server";

/// Terraform MCP服务器 / Terraform MCP server
#[derive(Debug, Clone)]
pub struct TerraformMcpServer {
    registry: RegistryClient,
    tool_router: ToolRouter<Self>,
}

impl TerraformMcpServer {
    pub fn new(registry: RegistryClient) -> Self {
        Self {
            registry,
            tool_router: Self::tool_router(),
        }
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// 已注册的工具名 / Names of the registered tools
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }
}

#[tool_router]
impl TerraformMcpServer {
    #[tool(
        name = "resolveProviderDocID",
        description = "Lists documentation ids of a Terraform provider matching a service slug. Call this first to obtain the providerDocID required by 'getProviderDocs'. Supports resources, data-sources, functions, guides and overview documents."
    )]
    async fn resolve_provider_doc_id(
        &self,
        Parameters(args): Parameters<ResolveProviderDocIdArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::provider::resolve_provider_doc_id(&self.registry, args).await
    }

    #[tool(
        name = "getProviderDocs",
        description = "Fetches the up-to-date documentation of a provider resource, data source, function or guide. You must call 'resolveProviderDocID' first to obtain the exact providerDocID."
    )]
    async fn get_provider_docs(
        &self,
        Parameters(args): Parameters<GetProviderDocsArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::provider::get_provider_docs(&self.registry, args).await
    }

    #[tool(
        name = "searchModules",
        description = "Searches the Terraform registry for modules and lists their moduleIDs, descriptions, download counts and verification status. Use the moduleID with 'moduleDetails'."
    )]
    async fn search_modules(
        &self,
        Parameters(args): Parameters<SearchModulesArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::module::search_modules(&self.registry, args).await
    }

    #[tool(
        name = "moduleDetails",
        description = "Fetches the inputs, outputs, provider dependencies, examples and readme of a Terraform module. You must call 'searchModules' first to obtain the exact moduleID."
    )]
    async fn module_details(
        &self,
        Parameters(args): Parameters<ModuleDetailsArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::module::module_details(&self.registry, args).await
    }

    #[tool(
        name = "search_policies",
        description = "Searches Sentinel policy libraries in the Terraform registry and lists their terraform_policy_id values for use with 'policy_details'."
    )]
    async fn search_policies(
        &self,
        Parameters(args): Parameters<SearchPoliciesArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::policy::search_policies(&self.registry, args).await
    }

    #[tool(
        name = "policy_details",
        description = "Fetches up-to-date documentation for a specific policy from the Terraform registry. You must call 'search_policies' first to obtain the exact terraform_policy_id required to use this tool."
    )]
    async fn policy_details(
        &self,
        Parameters(args): Parameters<PolicyDetailsArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::policy::policy_details(&self.registry, args).await
    }
}

impl ServerHandler for TerraformMcpServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                meta: None,
                tools: self.tool_router.list_all(),
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            tracing::info!("tools/call {}", request.name);
            let tool_context = ToolCallContext::new(self, request, context);
            self.tool_router.call(tool_context).await
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: crate::VERSION.to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Terraform registry lookups: resolve provider doc ids, read provider docs, search and inspect modules, and fetch Sentinel policy details."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}

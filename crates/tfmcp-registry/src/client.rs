/*!
* 文件名: client.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: reqwest, url, serde_json
* 描述: Terraform Registry HTTP客户端 / Terraform registry HTTP client
*/

use crate::error::{RegistryError, RegistryResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// 公共Registry地址 / Public registry address
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.terraform.io";

/// Registry API版本 / Registry API version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry客户端 / Registry client
///
/// 只做GET与JSON解码，内部`reqwest::Client`可廉价克隆。
/// Only issues GET requests and decodes JSON; the inner `reqwest::Client` is cheap to clone.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http_client: Client,
    base_url: String,
}

impl RegistryClient {
    /// 创建新的客户端 / Create a new client
    pub fn new(base_url: &str, timeout: Duration) -> RegistryResult<Self> {
        // 提前校验地址 / Validate the address up front
        Url::parse(base_url)?;

        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("terraform-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 使用公共Registry / Use the public registry
    pub fn public(timeout: Duration) -> RegistryResult<Self> {
        Self::new(DEFAULT_REGISTRY_URL, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 构建完整URL / Build the full request URL
    ///
    /// `path` may carry a query string and an optional leading slash.
    pub fn endpoint(&self, version: ApiVersion, path: &str) -> RegistryResult<Url> {
        let raw = format!(
            "{}/{}/{}",
            self.base_url,
            version,
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&raw)?)
    }

    /// 发送GET请求并返回原始字节 / Send a GET request and return the raw body
    pub async fn get_raw(&self, version: ApiVersion, path: &str) -> RegistryResult<Vec<u8>> {
        let url = self.endpoint(version, path)?;
        debug!("Registry call: GET {}", url);

        let response = self
            .http_client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("Registry response from {}: {} bytes", url, body.len());
        Ok(body.to_vec())
    }

    /// 发送GET请求并解码JSON / Send a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        version: ApiVersion,
        path: &str,
    ) -> RegistryResult<T> {
        let body = self.get_raw(version, path).await?;
        serde_json::from_slice(&body).map_err(|source| RegistryError::Decode {
            url: format!("{}/{}/{}", self.base_url, version, path.trim_start_matches('/')),
            source,
        })
    }
}

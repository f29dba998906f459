/*!
* 文件名: lib.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: reqwest, serde, url
* 描述: Terraform Registry客户端与数据模型 / Terraform registry client and data models
*/

pub mod client;
pub mod error;
pub mod model;

pub use client::{ApiVersion, RegistryClient, DEFAULT_REGISTRY_URL};
pub use error::{RegistryError, RegistryResult};
pub use model::*;

/*!
* 文件名: mod.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: None
* 描述: 工具处理函数 / Tool handlers
*/

pub mod module;
pub mod policy;
pub mod provider;
pub mod utils;

pub use module::{ModuleDetailsArgs, SearchModulesArgs};
pub use policy::{PolicyDetailsArgs, SearchPoliciesArgs};
pub use provider::{GetProviderDocsArgs, ProviderDataType, ResolveProviderDocIdArgs};

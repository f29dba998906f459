/*!
* 文件名: lib.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: tokio, reqwest, async-trait
* 描述: terraform-mcp-server端到端测试框架 / End-to-end harness for terraform-mcp-server
*
* 流程：构建镜像一次，为每种传输创建会话，执行相同的工具套件，最后清扫残留容器。
* Flow: build the image once, create a session per transport, run the same tool
* suite against each, then sweep leftover containers.
*/

pub mod cases;
pub mod cleanup;
pub mod client;
pub mod config;
pub mod container;
pub mod errors;
pub mod readiness;
pub mod suite;
pub mod transport;

pub use cases::{default_tables, ContentType, TestCase, ToolTable};
pub use cleanup::CleanupStack;
pub use client::{HttpMcpClient, McpClient, StdioMcpClient, StdioServerParameters, ToolResponse};
pub use config::E2eConfig;
pub use container::{ContainerHandle, ContainerManager, ContainerMode, ContainerRuntime, DockerCli};
pub use errors::{E2eError, E2eResult, McpClientError};
pub use readiness::ReadinessPoller;
pub use suite::{handshake, SuiteReport, SuiteRunner, EXPECTED_SERVER_NAME};
pub use transport::{
    test_port, test_port_from, HttpEndpoints, HttpFactory, Session, StdioFactory, TransportFactory,
    TransportKind,
};

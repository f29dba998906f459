/*!
* 文件名: config.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: 无
* 描述: E2E运行配置 / E2e run configuration
*/

use std::path::PathBuf;
use std::time::Duration;

/// 测试镜像标签 / Test image reference
pub const DEFAULT_IMAGE: &str = "terraform-mcp-server:test-e2e";
/// 构建版本号 / Version tag passed to the build
pub const DEFAULT_VERSION: &str = "test-e2e";
/// 容器内HTTP端口 / HTTP port inside the container
pub const CONTAINER_PORT: u16 = 8080;
/// 默认宿主机端口 / Default host port
pub const DEFAULT_HOST_PORT: u16 = 8080;
/// 端口覆盖环境变量 / Environment variable overriding the host port
pub const PORT_ENV: &str = "E2E_TEST_PORT";
/// 单次协议调用超时 / Deadline of one protocol round-trip
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// E2E配置 / E2e configuration
#[derive(Debug, Clone)]
pub struct E2eConfig {
    /// 镜像标签 / Image reference used to launch and sweep
    pub image: String,
    /// 构建版本 / Build version tag
    pub version: String,
    /// 仓库根目录，构建在此执行 / Repository root, the build runs here
    pub repo_root: PathBuf,
    /// 构建命令 / Build command (program followed by its arguments)
    pub build_command: Vec<String>,
    pub container_port: u16,
    pub default_host_port: u16,
    pub call_timeout: Duration,
}

impl Default for E2eConfig {
    fn default() -> Self {
        let version = DEFAULT_VERSION.to_string();
        Self {
            image: DEFAULT_IMAGE.to_string(),
            build_command: default_build_command(&version),
            version,
            repo_root: PathBuf::from("."),
            container_port: CONTAINER_PORT,
            default_host_port: DEFAULT_HOST_PORT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

fn default_build_command(version: &str) -> Vec<String> {
    vec![
        "make".to_string(),
        format!("VERSION={}", version),
        "docker-build".to_string(),
    ]
}

impl E2eConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// 设置版本并同步默认构建命令 / Set the version and refresh the default build command
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self.build_command = default_build_command(&self.version);
        self
    }

    pub fn with_repo_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.repo_root = root.into();
        self
    }

    pub fn with_build_command(mut self, command: Vec<String>) -> Self {
        self.build_command = command;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

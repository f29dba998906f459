/*!
* 文件名: container.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: tokio, async-trait
* 描述: 容器生命周期管理 / Container lifecycle management
*/

use crate::config::E2eConfig;
use crate::errors::{E2eError, E2eResult};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// 容器ID短格式长度 / Length of the short container id
pub const SHORT_ID_LEN: usize = 12;

/// 服务器运行模式 / Server operating mode inside the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMode {
    Stdio,
    Http,
}

impl ContainerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerMode::Stdio => "stdio",
            ContainerMode::Http => "http",
        }
    }
}

impl fmt::Display for ContainerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 运行容器的句柄 / Handle of a running container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    /// 短ID，运行时接受前缀 / Short id; runtimes accept id prefixes
    pub id: String,
    pub host_port: u16,
}

/// 截断为短ID / Truncate a container id to its short form
pub fn short_id(raw: &str) -> String {
    raw.trim().chars().take(SHORT_ID_LEN).collect()
}

/// 容器运行时抽象 / Container runtime abstraction
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// 在`workdir`执行构建命令，失败时返回合并输出 / Run the build in `workdir`; the error carries combined output
    async fn build(&self, command: &[String], workdir: &Path) -> Result<(), String>;

    /// 后台启动容器并返回完整ID / Launch a detached container and return its full id
    async fn run_detached(
        &self,
        image: &str,
        env: &[(String, String)],
        host_port: u16,
        container_port: u16,
    ) -> E2eResult<String>;

    /// 一次性停止多个容器 / Stop several containers in one call
    async fn stop(&self, ids: &[String]) -> E2eResult<()>;

    async fn kill(&self, id: &str) -> E2eResult<()>;

    /// 列出由镜像启动的运行中容器 / List live containers started from `image`
    async fn list_by_ancestor(&self, image: &str) -> E2eResult<Vec<String>>;
}

/// 基于docker命令行的运行时 / Runtime driving the docker CLI
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: PathBuf,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("docker"),
        }
    }
}

impl DockerCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定的可执行文件 / Use a specific docker executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn exec(&self, args: &[String]) -> E2eResult<std::process::Output> {
        debug!("Running {} {}", self.program.display(), args.join(" "));
        Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                E2eError::ContainerError(format!(
                    "failed to execute {} {}: {}",
                    self.program.display(),
                    args.first().map(String::as_str).unwrap_or_default(),
                    e
                ))
            })
    }

    fn failure(action: &str, output: &std::process::Output) -> E2eError {
        E2eError::ContainerError(format!(
            "{} exited with {}: {}",
            action,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn build(&self, command: &[String], workdir: &Path) -> Result<(), String> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| "empty build command".to_string())?;

        let output = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .output()
            .await
            .map_err(|e| format!("failed to execute {}: {}", program, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            ))
        }
    }

    async fn run_detached(
        &self,
        image: &str,
        env: &[(String, String)],
        host_port: u16,
        container_port: u16,
    ) -> E2eResult<String> {
        let mut args = vec!["run".to_string(), "-d".to_string(), "--rm".to_string()];
        for (key, value) in env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push("-p".to_string());
        args.push(format!("{}:{}", host_port, container_port));
        args.push(image.to_string());

        let output = self.exec(&args).await?;
        if !output.status.success() {
            return Err(Self::failure("docker run", &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn stop(&self, ids: &[String]) -> E2eResult<()> {
        let mut args = vec!["stop".to_string()];
        args.extend(ids.iter().cloned());
        let output = self.exec(&args).await?;
        if !output.status.success() {
            return Err(Self::failure("docker stop", &output));
        }
        Ok(())
    }

    async fn kill(&self, id: &str) -> E2eResult<()> {
        let output = self.exec(&["kill".to_string(), id.to_string()]).await?;
        if !output.status.success() {
            return Err(Self::failure("docker kill", &output));
        }
        Ok(())
    }

    async fn list_by_ancestor(&self, image: &str) -> E2eResult<Vec<String>> {
        let args = vec![
            "ps".to_string(),
            "-q".to_string(),
            "--filter".to_string(),
            format!("ancestor={}", image),
        ];
        let output = self.exec(&args).await?;
        if !output.status.success() {
            return Err(Self::failure("docker ps", &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// 容器生命周期管理器 / Container lifecycle manager
pub struct ContainerManager {
    runtime: Arc<dyn ContainerRuntime>,
    config: E2eConfig,
    /// 构建结果只计算一次 / The build outcome is computed once per run
    build_outcome: OnceCell<Result<(), String>>,
}

impl fmt::Debug for ContainerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerManager")
            .field("image", &self.config.image)
            .field("built", &self.build_outcome.initialized())
            .finish()
    }
}

impl ContainerManager {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, config: E2eConfig) -> Self {
        Self {
            runtime,
            config,
            build_outcome: OnceCell::new(),
        }
    }

    /// 使用docker命令行 / Manager backed by the docker CLI
    pub fn docker(config: E2eConfig) -> Self {
        Self::new(Arc::new(DockerCli::new()), config)
    }

    pub fn config(&self) -> &E2eConfig {
        &self.config
    }

    /// 构建镜像（每次运行一次） / Build the image, once per run
    pub async fn build(&self) -> E2eResult<()> {
        let outcome = self
            .build_outcome
            .get_or_init(|| async {
                info!(
                    "Building image {} with `{}` in {}",
                    self.config.image,
                    self.config.build_command.join(" "),
                    self.config.repo_root.display()
                );
                self.runtime
                    .build(&self.config.build_command, &self.config.repo_root)
                    .await
            })
            .await;

        outcome.clone().map_err(|output| E2eError::BuildFailed {
            image: self.config.image.clone(),
            output,
        })
    }

    /// 启动容器 / Start a detached container
    pub async fn start(&self, mode: ContainerMode, host_port: u16) -> E2eResult<ContainerHandle> {
        let env = vec![("MODE".to_string(), mode.to_string())];
        let raw_id = self
            .runtime
            .run_detached(&self.config.image, &env, host_port, self.config.container_port)
            .await?;

        let id = short_id(&raw_id);
        if id.is_empty() {
            return Err(E2eError::ContainerError(format!(
                "starting {} returned no container id",
                self.config.image
            )));
        }
        info!("Started {} container {} on port {}", mode, id, host_port);
        Ok(ContainerHandle { id, host_port })
    }

    /// 停止容器，失败时强杀，错误只记录警告 / Stop a container, kill on failure; errors are only warnings
    pub async fn stop(&self, handle: &ContainerHandle) {
        if handle.id.is_empty() {
            return;
        }
        info!("Stopping container: {}", handle.id);
        match self.runtime.stop(std::slice::from_ref(&handle.id)).await {
            Ok(()) => info!("Successfully stopped container: {}", handle.id),
            Err(e) => {
                warn!("Failed to stop container {}: {}", handle.id, e);
                if let Err(kill_err) = self.runtime.kill(&handle.id).await {
                    warn!("Failed to kill container {}: {}", handle.id, kill_err);
                }
            }
        }
    }

    /// 停止所有测试镜像的容器，返回数量 / Stop every container of the test image, returning how many
    pub async fn sweep_all(&self) -> usize {
        info!("Cleaning up all {} containers", self.config.image);
        let ids = match self.runtime.list_by_ancestor(&self.config.image).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Failed to list test containers: {}", e);
                return 0;
            }
        };
        if ids.is_empty() {
            info!("No test containers found to clean up");
            return 0;
        }

        match self.runtime.stop(&ids).await {
            Ok(()) => info!("Cleaned up {} test container(s)", ids.len()),
            Err(e) => warn!("Failed to stop some test containers: {}", e),
        }
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct FakeContainer {
        id: String,
        image: String,
        running: bool,
    }

    /// 内存中的运行时 / In-memory runtime
    #[derive(Default)]
    struct FakeRuntime {
        containers: Mutex<Vec<FakeContainer>>,
        builds: AtomicUsize,
        kills: AtomicUsize,
        fail_build: bool,
        fail_list: bool,
        empty_run_output: bool,
    }

    impl FakeRuntime {
        fn with_containers(containers: &[(&str, &str)]) -> Self {
            let runtime = Self::default();
            *runtime.containers.lock().unwrap() = containers
                .iter()
                .map(|(id, image)| FakeContainer {
                    id: id.to_string(),
                    image: image.to_string(),
                    running: true,
                })
                .collect();
            runtime
        }

        fn running(&self, image: &str) -> usize {
            self.containers
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.running && c.image == image)
                .count()
        }
    }

    #[async_trait]
    impl ContainerRuntime for FakeRuntime {
        async fn build(&self, _command: &[String], _workdir: &Path) -> Result<(), String> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            if self.fail_build {
                Err("Step 3/7 : RUN go build\nerror: exit status 2".to_string())
            } else {
                Ok(())
            }
        }

        async fn run_detached(
            &self,
            image: &str,
            _env: &[(String, String)],
            _host_port: u16,
            _container_port: u16,
        ) -> E2eResult<String> {
            if self.empty_run_output {
                return Ok("\n".to_string());
            }
            let mut containers = self.containers.lock().unwrap();
            let id = format!("{:064x}", containers.len() + 0xabc);
            containers.push(FakeContainer {
                id: id.clone(),
                image: image.to_string(),
                running: true,
            });
            Ok(id)
        }

        async fn stop(&self, ids: &[String]) -> E2eResult<()> {
            let mut containers = self.containers.lock().unwrap();
            for id in ids {
                let container = containers
                    .iter_mut()
                    .find(|c| c.running && c.id.starts_with(id.as_str()))
                    .ok_or_else(|| E2eError::ContainerError(format!("No such container: {}", id)))?;
                container.running = false;
            }
            Ok(())
        }

        async fn kill(&self, id: &str) -> E2eResult<()> {
            self.kills.fetch_add(1, Ordering::SeqCst);
            Err(E2eError::ContainerError(format!("No such container: {}", id)))
        }

        async fn list_by_ancestor(&self, image: &str) -> E2eResult<Vec<String>> {
            if self.fail_list {
                return Err(E2eError::ContainerError("Cannot connect to the Docker daemon".to_string()));
            }
            Ok(self
                .containers
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.running && c.image == image)
                .map(|c| c.id.clone())
                .collect())
        }
    }

    const IMAGE: &str = "terraform-mcp-server:test-e2e";

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef0123\n"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("  \n"), "");
    }

    #[tokio::test]
    async fn test_sweep_stops_only_test_image_containers() {
        let runtime = Arc::new(FakeRuntime::with_containers(&[
            ("aaa111", IMAGE),
            ("bbb222", IMAGE),
            ("ccc333", "postgres:16"),
        ]));
        let manager = ContainerManager::new(runtime.clone(), E2eConfig::default());

        assert_eq!(manager.sweep_all().await, 2);
        assert_eq!(runtime.running(IMAGE), 0);
        assert_eq!(runtime.running("postgres:16"), 1);

        // 再次清扫无事可做 / A second sweep finds nothing
        assert_eq!(manager.sweep_all().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_listing_failure_is_not_fatal() {
        let runtime = Arc::new(FakeRuntime {
            fail_list: true,
            ..FakeRuntime::with_containers(&[("aaa111", IMAGE)])
        });
        let manager = ContainerManager::new(runtime.clone(), E2eConfig::default());

        assert_eq!(manager.sweep_all().await, 0);
        assert_eq!(runtime.running(IMAGE), 1);
    }

    #[tokio::test]
    async fn test_start_then_stop_twice() {
        let runtime = Arc::new(FakeRuntime::default());
        let manager = ContainerManager::new(runtime.clone(), E2eConfig::default());

        let handle = manager.start(ContainerMode::Http, 9191).await.unwrap();
        assert_eq!(handle.id.len(), SHORT_ID_LEN);
        assert_eq!(handle.host_port, 9191);
        assert_eq!(runtime.running(IMAGE), 1);

        manager.stop(&handle).await;
        assert_eq!(runtime.running(IMAGE), 0);
        assert_eq!(runtime.kills.load(Ordering::SeqCst), 0);

        // 第二次停止回退到kill，仍然只是警告 / The second stop falls back to kill and stays a warning
        manager.stop(&handle).await;
        assert_eq!(runtime.kills.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_start_without_id_fails() {
        let runtime = Arc::new(FakeRuntime {
            empty_run_output: true,
            ..Default::default()
        });
        let manager = ContainerManager::new(runtime, E2eConfig::default());

        let err = manager.start(ContainerMode::Http, 8080).await.unwrap_err();
        assert!(matches!(err, E2eError::ContainerError(_)));
    }

    #[tokio::test]
    async fn test_build_runs_once() {
        let runtime = Arc::new(FakeRuntime::default());
        let manager = ContainerManager::new(runtime.clone(), E2eConfig::default());

        manager.build().await.unwrap();
        manager.build().await.unwrap();
        assert_eq!(runtime.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_build_failure_carries_output() {
        let runtime = Arc::new(FakeRuntime {
            fail_build: true,
            ..Default::default()
        });
        let manager = ContainerManager::new(runtime.clone(), E2eConfig::default());

        for _ in 0..2 {
            match manager.build().await.unwrap_err() {
                E2eError::BuildFailed { image, output } => {
                    assert_eq!(image, IMAGE);
                    assert!(output.contains("exit status 2"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(runtime.builds.load(Ordering::SeqCst), 1);
    }
}

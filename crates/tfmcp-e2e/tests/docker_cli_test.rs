/*!
* 文件名: docker_cli_test
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: tokio, tempfile
* 描述: 用假docker脚本测试DockerCli / DockerCli against a fake docker script
*/
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tfmcp_e2e::*;

const FAKE_DOCKER: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
case "$1" in
  run)
    echo "4f2c9d1e8a7b6c5d4e3f2a1b0c9d8e7f6a5b4c3d2e1f0a9b8c7d6e5f4a3b2c1d"
    ;;
  ps)
    echo "aaa111bbb222"
    echo "ccc333ddd444"
    ;;
  stop)
    if [ "$2" = "gone" ]; then
      echo "Error response from daemon: No such container: gone" >&2
      exit 1
    fi
    ;;
  kill)
    echo "Error response from daemon: No such container: $2" >&2
    exit 1
    ;;
esac
"#;

fn install_fake_docker(dir: &Path) -> PathBuf {
    let path = dir.join("docker");
    std::fs::write(&path, FAKE_DOCKER).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn manager(dir: &TempDir) -> ContainerManager {
    let docker = DockerCli::with_program(install_fake_docker(dir.path()));
    ContainerManager::new(Arc::new(docker), E2eConfig::default())
}

#[tokio::test]
async fn test_start_passes_mode_and_port_mapping() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir);

    let handle = manager.start(ContainerMode::Http, 9191).await.unwrap();

    assert_eq!(handle.id, "4f2c9d1e8a7b");
    assert_eq!(handle.host_port, 9191);
    assert_eq!(
        calls(dir.path()),
        vec!["run -d --rm -e MODE=http -p 9191:8080 terraform-mcp-server:test-e2e"]
    );
}

#[tokio::test]
async fn test_sweep_stops_listed_containers_in_one_call() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir);

    assert_eq!(manager.sweep_all().await, 2);
    assert_eq!(
        calls(dir.path()),
        vec![
            "ps -q --filter ancestor=terraform-mcp-server:test-e2e",
            "stop aaa111bbb222 ccc333ddd444",
        ]
    );
}

#[tokio::test]
async fn test_failed_stop_falls_back_to_kill() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir);
    let handle = ContainerHandle {
        id: "gone".to_string(),
        host_port: 8080,
    };

    manager.stop(&handle).await;

    assert_eq!(calls(dir.path()), vec!["stop gone", "kill gone"]);
}

#[tokio::test]
async fn test_build_reports_combined_output() {
    let dir = TempDir::new().unwrap();
    let config = E2eConfig::default()
        .with_repo_root(dir.path())
        .with_build_command(vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo building; echo 'no Makefile here' >&2; exit 2".to_string(),
        ]);
    let manager = ContainerManager::new(Arc::new(DockerCli::new()), config);

    match manager.build().await.unwrap_err() {
        E2eError::BuildFailed { output, .. } => {
            assert!(output.contains("building"));
            assert!(output.contains("no Makefile here"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_docker_binary_is_a_container_error() {
    let docker = DockerCli::with_program("/nonexistent/docker");
    let err = docker.kill("abc").await.unwrap_err();
    assert!(matches!(err, E2eError::ContainerError(_)));
}

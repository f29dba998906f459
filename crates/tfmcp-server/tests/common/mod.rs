//! Common test utilities for tfmcp-server integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper_util::rt::TokioIo;
use tfmcp_registry::RegistryClient;
use tfmcp_server::{HttpTransport, TerraformMcpServer};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Test timeout duration
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

const PROVIDER_AWS: &str = r#"{
  "id": "hashicorp/aws/5.0.0",
  "namespace": "hashicorp",
  "name": "aws",
  "version": "5.0.0",
  "docs": [
    {"id": "101", "title": "aws_s3_bucket", "slug": "s3_bucket", "category": "resources", "language": "hcl"},
    {"id": "102", "title": "aws_s3_bucket", "slug": "s3_bucket", "category": "data-sources", "language": "hcl"},
    {"id": "103", "title": "Custom Service Endpoints", "slug": "custom-service-endpoints", "category": "guides", "language": "hcl"}
  ]
}"#;

const PROVIDER_DOC: &str = r#"{
  "data": {
    "id": "101",
    "type": "provider-docs",
    "attributes": {
      "category": "resources",
      "title": "aws_s3_bucket",
      "slug": "s3_bucket",
      "language": "hcl",
      "content": "---\nsubcategory: \"S3\"\npage_title: \"AWS: aws_s3_bucket\"\n---\n\n# Resource: aws_s3_bucket\n"
    }
  }
}"#;

const MODULE_SEARCH: &str = r#"{
  "meta": {"limit": 15, "current_offset": 0},
  "modules": [{
    "id": "terraform-aws-modules/vpc/aws/5.19.0",
    "namespace": "terraform-aws-modules",
    "name": "vpc",
    "provider": "aws",
    "description": "Terraform module to create AWS VPC resources",
    "downloads": 1000,
    "verified": true,
    "published_at": "2025-02-14T10:11:12Z"
  }]
}"#;

const MODULE_DETAILS: &str = r##"{
  "id": "terraform-aws-modules/vpc/aws/5.19.0",
  "description": "Terraform module to create AWS VPC resources",
  "source": "https://github.com/terraform-aws-modules/terraform-aws-vpc",
  "downloads": 1000,
  "verified": true,
  "root": {
    "readme": "# AWS VPC Terraform module\n\nCreates VPC resources.\n\n## Usage\n\n...",
    "inputs": [{"name": "cidr", "type": "string", "description": "The IPv4 CIDR block", "default": "10.0.0.0/16", "required": false}],
    "outputs": [{"name": "vpc_id", "description": "The ID of the VPC"}],
    "provider_dependencies": [{"name": "aws", "namespace": "hashicorp", "source": "hashicorp/aws", "version": ">= 5.0"}]
  }
}"##;

const EMPTY_SEARCH: &str = r#"{"meta": {"limit": 15, "current_offset": 0}, "modules": []}"#;

fn route(path: &str, query: &str) -> (u16, &'static str) {
    match path {
        "/v1/providers/hashicorp/aws" => (200, PROVIDER_AWS),
        "/v2/provider-docs/101" => (200, PROVIDER_DOC),
        "/v1/modules/search" if query.contains("q=vpc") => (200, MODULE_SEARCH),
        "/v1/modules/search" => (200, EMPTY_SEARCH),
        "/v1/modules/terraform-aws-modules/vpc/aws/5.19.0" => (200, MODULE_DETAILS),
        _ => (404, r#"{"errors":["Not Found"]}"#),
    }
}

/// 启动模拟registry / Start a mock registry serving canned responses
pub async fn start_mock_registry() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let io = TokioIo::new(stream);
            tokio::spawn(async move {
                let svc = tower::service_fn(|req: hyper::Request<hyper::body::Incoming>| async move {
                    let (status, body) = route(req.uri().path(), req.uri().query().unwrap_or_default());
                    Ok::<_, std::convert::Infallible>(
                        hyper::Response::builder()
                            .status(status)
                            .header("content-type", "application/json")
                            .body(Full::new(Bytes::from_static(body.as_bytes())))
                            .unwrap(),
                    )
                });
                let svc = hyper_util::service::TowerToHyperService::new(svc);
                let _ = hyper::server::conn::http1::Builder::new()
                    .serve_connection(io, svc)
                    .await;
            });
        }
    });

    addr
}

/// 指向模拟registry的服务器 / Server backed by the mock registry
pub fn server_for(registry: SocketAddr) -> TerraformMcpServer {
    let client = RegistryClient::new(&format!("http://{}", registry), Duration::from_secs(5)).unwrap();
    TerraformMcpServer::new(client)
}

/// 进程内HTTP服务器 / In-process HTTP server
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl RunningServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(TEST_TIMEOUT, &mut self.task).await;
    }
}

/// 在随机端口启动HTTP传输 / Start the HTTP transport on a random port
pub async fn start_http_server(server: TerraformMcpServer) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let transport = HttpTransport::from_listener(listener, server);
    let addr = transport.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let _ = transport
            .run_until(async {
                let _ = rx.await;
            })
            .await;
    });

    RunningServer {
        addr,
        shutdown: Some(tx),
        task,
    }
}

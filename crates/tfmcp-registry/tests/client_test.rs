/**
* 文件名: client_test
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: tokio, hyper
* 描述: Registry客户端集成测试 / Registry client integration tests
*/
use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper_util::rt::TokioIo;
use tfmcp_registry::*;
use tokio::net::TcpListener;

/// 启动一个只回放固定响应的服务器 / Start a server that replays canned responses
async fn start_mock_registry() -> SocketAddr {
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
                    let (status, body) = match req.uri().path() {
                        "/v1/providers/hashicorp/aws" => (
                            200,
                            r#"{"namespace":"hashicorp","name":"aws","version":"5.0.0","docs":[{"id":"10","title":"aws_s3_bucket","slug":"s3_bucket","category":"resources","language":"hcl"}]}"#,
                        ),
                        "/v2/provider-docs/broken" => (200, "{not json"),
                        _ => (404, r#"{"errors":["Not Found"]}"#),
                    };
                    Ok::<_, std::convert::Infallible>(
                        hyper::Response::builder()
                            .status(status)
                            .header("content-type", "application/json")
                            .body(Full::new(Bytes::from(body)))
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

#[tokio::test]
async fn test_get_json_decodes_provider_details() {
    let addr = start_mock_registry().await;
    let client = RegistryClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    let details: ProviderDetails = client
        .get_json(ApiVersion::V1, "providers/hashicorp/aws")
        .await
        .expect("provider details");

    assert_eq!(details.version, "5.0.0");
    assert_eq!(details.docs[0].category, "resources");
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let addr = start_mock_registry().await;
    let client = RegistryClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    let err = client
        .get_json::<ProviderDetails>(ApiVersion::V1, "providers/hashicorp/nope")
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {err}");
    assert!(err.to_string().contains("/v1/providers/hashicorp/nope"));
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let addr = start_mock_registry().await;
    let client = RegistryClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    let err = client
        .get_json::<ProviderDocResponse>(ApiVersion::V2, "provider-docs/broken")
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Decode { .. }));
}

/*!
* 文件名: main.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: clap, tokio, tracing-subscriber
* 描述: terraform-mcp-server入口 / terraform-mcp-server entry point
*/

use clap::Parser;
use std::time::Duration;
use tfmcp_registry::DEFAULT_REGISTRY_URL;
use tfmcp_server::{ServerConfig, TransportMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "terraform-mcp-server", version, about = "Terraform registry tools served over MCP")]
struct Cli {
    /// 传输模式 / Transport mode
    #[arg(long, env = "MODE", value_enum, default_value_t = TransportMode::Stdio)]
    mode: TransportMode,

    /// HTTP监听地址 / HTTP listen host
    #[arg(long, env = "TRANSPORT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP监听端口 / HTTP listen port
    #[arg(long, env = "TRANSPORT_PORT", default_value_t = 8080)]
    port: u16,

    /// Terraform registry地址 / Terraform registry base URL
    #[arg(long, env = "TF_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// Registry请求超时（秒） / Registry request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout承载stdio协议，日志写stderr / stdout carries the stdio protocol, so logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();

    let cli = Cli::parse();
    let config = ServerConfig::new()
        .with_mode(cli.mode)
        .with_host(cli.host)
        .with_port(cli.port)
        .with_registry_url(cli.registry_url)
        .with_request_timeout(Duration::from_secs(cli.request_timeout));

    tfmcp_server::run(config).await?;
    Ok(())
}

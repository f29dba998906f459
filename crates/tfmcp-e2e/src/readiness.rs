/*!
* 文件名: readiness.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: reqwest, tokio
* 描述: 健康检查轮询 / Health endpoint polling
*/

use crate::errors::{E2eError, E2eResult};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

/// 健康检查路径 / Health check path
pub const HEALTH_PATH: &str = "/health";

/// 就绪轮询器 / Readiness poller
#[derive(Debug, Clone)]
pub struct ReadinessPoller {
    pub max_attempts: u32,
    pub interval: Duration,
    pub request_timeout: Duration,
}

impl Default for ReadinessPoller {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(2),
        }
    }
}

impl ReadinessPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// 健康检查URL / Health URL for a base URL
    pub fn health_url(base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), HEALTH_PATH)
    }

    /// 轮询直到返回200，返回成功的尝试序号 / Poll until a 200, returning the successful attempt number
    ///
    /// 每次失败后等待`interval`，全部失败时恰好在`max_attempts * interval`后返回错误 /
    /// Sleeps `interval` after every failed attempt, so exhausting the budget takes
    /// `max_attempts * interval`.
    pub async fn wait_ready(&self, base_url: &str) -> E2eResult<u32> {
        let url = Self::health_url(base_url);
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| E2eError::InvalidConfiguration(format!("health client: {}", e)))?;

        for attempt in 1..=self.max_attempts {
            match client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status();
                    // 丢弃响应以释放连接 / Dropping the response releases the connection
                    drop(response);
                    if status == StatusCode::OK {
                        info!("Server at {} is ready (attempt {})", url, attempt);
                        return Ok(attempt);
                    }
                    debug!("Health attempt {}/{}: status {}", attempt, self.max_attempts, status);
                }
                Err(e) => debug!("Health attempt {}/{}: {}", attempt, self.max_attempts, e),
            }
            tokio::time::sleep(self.interval).await;
        }

        Err(E2eError::NotReady {
            url,
            attempts: self.max_attempts,
        })
    }
}

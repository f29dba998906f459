/*!
* 文件名: cleanup.rs
* 作者: JQQ
* 创建日期: 2026/10/18
* 最后修改日期: 2026/10/18
* 版权: 2023 JQQ. All rights reserved.
* 依赖: tokio, futures
* 描述: 逆序释放的清理栈 / Cleanup stack released in reverse order
*/

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use tracing::{debug, warn};

type ReleaseFn = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// 清理栈 / Cleanup stack
///
/// 资源获取成功后立即注册释放动作，按注册的逆序执行且只执行一次。
/// 未显式调用 [`CleanupStack::release`] 时由 `Drop` 兜底。
///
/// Release actions are registered right after a resource is acquired and run
/// exactly once in reverse registration order. `Drop` runs whatever
/// [`CleanupStack::release`] did not.
#[derive(Default)]
pub struct CleanupStack {
    actions: Vec<(String, ReleaseFn)>,
}

impl std::fmt::Debug for CleanupStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.actions.iter().map(|(label, _)| label.as_str()).collect();
        f.debug_struct("CleanupStack").field("pending", &labels).finish()
    }
}

impl CleanupStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册释放动作 / Register a release action
    pub fn push<F, Fut>(&mut self, label: impl Into<String>, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let label = label.into();
        debug!("Registered cleanup: {}", label);
        self.actions.push((label, Box::new(move || action().boxed())));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// 逆序执行全部释放动作 / Run every pending action in reverse order
    pub async fn release(&mut self) {
        while let Some((label, action)) = self.actions.pop() {
            debug!("Running cleanup: {}", label);
            action().await;
        }
    }
}

impl Drop for CleanupStack {
    fn drop(&mut self) {
        if self.actions.is_empty() {
            return;
        }
        warn!(
            "CleanupStack dropped with {} pending action(s), releasing synchronously",
            self.actions.len()
        );

        let actions = std::mem::take(&mut self.actions);
        let release = async move {
            for (label, action) in actions.into_iter().rev() {
                debug!("Running cleanup: {}", label);
                action().await;
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle)
                if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread =>
            {
                tokio::task::block_in_place(|| handle.block_on(release));
            }
            _ => {
                // 当前线程无法阻塞运行时，换独立线程 / Cannot block here, use a dedicated thread.
                // 动作不得依赖原运行时上的连接 / Actions must not rely on connections owned by the blocked runtime.
                std::thread::scope(|scope| {
                    scope.spawn(|| {
                        match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                            Ok(runtime) => runtime.block_on(release),
                            Err(e) => warn!("Failed to build cleanup runtime: {}", e),
                        }
                    });
                });
            }
        }
    }
}

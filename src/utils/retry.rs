use crate::log_warn;
use rand::Rng;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// 有界重试策略：最多 `max_attempts` 次，指数退避 + 0~10% 抖动
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// 只尝试一次，不重试
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// 第 attempt 次重试前的等待时间（attempt 从 1 开始）
    pub fn delay_for(&self, attempt: usize) -> Duration {
        // 指数最高限制在 2^10
        let exponent = (attempt.saturating_sub(1)).min(10) as u32;
        let base_ms = self.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64 << exponent);
        // 抖动避免多个重试任务同时打到节点
        let jitter = rand::thread_rng().gen_range(0..=(delay_ms / 10));
        Duration::from_millis(delay_ms + jitter)
    }

    /// 执行 `f` 直到成功或用尽次数，返回最后一次错误
    pub async fn run<T, E, F, Fut>(&self, what: &str, mut f: F) -> Result<T, E>
    where
        E: Debug,
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            match f(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 >= self.max_attempts => return Err(e),
                Err(e) => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    log_warn!(
                        "{} 失败 (第 {}/{} 次): {:?}，{:?} 后重试",
                        what,
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}

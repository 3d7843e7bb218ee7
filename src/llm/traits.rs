//! LLM 客户端抽象
//!
//! 所有后端（Ollama / Mock）实现 LlmClient：generate(system_prompt, user_prompt)。
//! RetryingLlmClient 为任意实现追加瞬时错误重试（仅 5xx / 超时 / 连接错误）。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// LLM 调用错误
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("请求超时（{0} 秒）")]
    Timeout(u64),

    #[error("HTTP 状态错误: {status}")]
    Status { status: u16 },

    #[error("网络错误: {0}")]
    Transport(String),

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// 是否为可重试的瞬时错误（服务端 5xx、超时、连接失败）。
    /// 客户端错误（4xx、响应体异常）不重试。
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Timeout(_) | LlmError::Transport(_) => true,
            LlmError::Status { status } => matches!(status, 500 | 502 | 503 | 504),
            LlmError::InvalidResponse(_) => false,
        }
    }
}

/// LLM 客户端 trait：给定系统提示词与用户提示词，返回生成文本
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

/// 重试配置：最多 max_attempts 次尝试，第 n 次失败后线性等待 n * backoff
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// 重试包装：仅对瞬时错误重试，其余错误立即返回
pub struct RetryingLlmClient {
    inner: Arc<dyn LlmClient>,
    config: RetryConfig,
}

impl RetryingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl LlmClient for RetryingLlmClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.inner.generate(system_prompt, user_prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    let wait = self.config.backoff * attempt;
                    tracing::warn!(
                        "LLM 调用失败（第 {}/{} 次尝试）：{}，{:?} 后重试",
                        attempt,
                        self.config.max_attempts,
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedLlmClient;

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::Timeout(300).is_transient());
        assert!(LlmError::Status { status: 503 }.is_transient());
        assert!(!LlmError::Status { status: 400 }.is_transient());
        assert!(!LlmError::InvalidResponse("bad json".into()).is_transient());
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_errors() {
        let mock = Arc::new(ScriptedLlmClient::with_results(vec![
            Err(LlmError::Status { status: 502 }),
            Err(LlmError::Timeout(300)),
            Ok("第三次成功".to_string()),
        ]));
        let client = RetryingLlmClient::new(
            mock.clone(),
            RetryConfig {
                max_attempts: 3,
                backoff: Duration::from_millis(1),
            },
        );

        let out = client.generate("s", "u").await.unwrap();
        assert_eq!(out, "第三次成功");
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_no_retry_on_client_error() {
        let mock = Arc::new(ScriptedLlmClient::with_results(vec![
            Err(LlmError::Status { status: 400 }),
            Ok("不应到达".to_string()),
        ]));
        let client = RetryingLlmClient::new(mock.clone(), RetryConfig::default());

        assert!(client.generate("s", "u").await.is_err());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let mock = Arc::new(ScriptedLlmClient::with_results(vec![
            Err(LlmError::Status { status: 500 }),
            Err(LlmError::Status { status: 500 }),
            Err(LlmError::Status { status: 500 }),
        ]));
        let client = RetryingLlmClient::new(
            mock.clone(),
            RetryConfig {
                max_attempts: 3,
                backoff: Duration::from_millis(1),
            },
        );

        assert!(client.generate("s", "u").await.is_err());
        assert_eq!(mock.calls(), 3);
    }
}

//! 脚本化 LLM 客户端（用于测试，无需 API）
//!
//! 按入队顺序返回预置的响应（或错误），并记录调用次数，
//! 便于断言「某阶段恰好发起 N 次生成调用」。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};

/// 脚本化客户端：按顺序吐出预置响应，脚本耗尽后返回错误
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: AtomicUsize,
}

impl ScriptedLlmClient {
    /// 以一组成功响应创建
    pub fn new(responses: Vec<impl Into<String>>) -> Self {
        Self::with_results(responses.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// 以一组成功/失败结果创建
    pub fn with_results(results: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(results.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// 已发起的 generate 调用次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut script = self
                .script
                .lock()
                .map_err(|_| LlmError::InvalidResponse("脚本锁中毒".to_string()))?;
            script.pop_front()
        };
        next.unwrap_or_else(|| Err(LlmError::InvalidResponse("脚本响应已耗尽".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_order_and_exhaustion() {
        let mock = ScriptedLlmClient::new(vec!["一", "二"]);
        assert_eq!(mock.generate("s", "u").await.unwrap(), "一");
        assert_eq!(mock.generate("s", "u").await.unwrap(), "二");
        assert!(mock.generate("s", "u").await.is_err());
        assert_eq!(mock.calls(), 3);
    }
}

//! LLM 层：客户端抽象与实现（Ollama / 重试包装 / 脚本化 Mock）

pub mod mock;
pub mod ollama;
pub mod traits;

pub use mock::ScriptedLlmClient;
pub use ollama::OllamaClient;
pub use traits::{LlmClient, LlmError, RetryConfig, RetryingLlmClient};

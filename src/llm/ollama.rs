//! Ollama API 客户端
//!
//! 调用本地或远程 Ollama 的 /api/generate 接口（非流式）。
//! 超时与生成参数（temperature / num_ctx / num_predict）均来自配置。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::LlmSection;
use crate::llm::{LlmClient, LlmError};

/// Ollama 客户端：持有 reqwest::Client 与生成参数
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    context_size: u32,
    num_predict: i32,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(config: &LlmSection) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}:{}", config.host, config.port),
            model: config.model.clone(),
            temperature: config.temperature,
            context_size: config.context_size,
            num_predict: config.num_predict,
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn map_request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            tracing::error!("调用 Ollama API 超时（{} 秒）", self.timeout_secs);
            LlmError::Timeout(self.timeout_secs)
        } else {
            tracing::error!("调用 Ollama API 失败: {}", e);
            LlmError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        // Ollama generate 接口不区分角色，系统与用户提示词拼接为一段
        let full_prompt = format!("{}\n\n{}", system_prompt, user_prompt);
        tracing::debug!("提示词长度: {} 字符", full_prompt.chars().count());

        let data = serde_json::json!({
            "model": self.model,
            "prompt": full_prompt,
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "num_ctx": self.context_size,
                "num_predict": self.num_predict,
            }
        });

        tracing::debug!("开始调用 Ollama API...");
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&data)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Ollama API 返回错误状态: {}", status);
            return Err(LlmError::Status {
                status: status.as_u16(),
            });
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        tracing::debug!("API 调用成功，响应长度: {} 字符", result.response.chars().count());
        Ok(result.response)
    }
}

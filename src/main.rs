//! Quill - 小说生成器入口
//!
//! 初始化日志、加载配置、构建带重试的 Ollama 客户端并运行完整流水线。
//! 任何失败都会以非零退出码结束进程。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use quill::config::load_config;
use quill::llm::{OllamaClient, RetryConfig, RetryingLlmClient};
use quill::NovelGenerator;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    // 解析可选的 -c/--config 参数
    let mut config_path: Option<PathBuf> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => config_path = args.next().map(PathBuf::from),
            other => anyhow::bail!("未知参数: {}（用法: quill [-c 配置文件]）", other),
        }
    }

    let config = load_config(config_path).context("加载配置文件失败")?;

    let retry = RetryConfig {
        max_attempts: config.llm.retry.max_attempts,
        backoff: Duration::from_secs(config.llm.retry.backoff_secs),
    };
    let ollama = OllamaClient::new(&config.llm).context("创建 Ollama 客户端失败")?;
    let llm = Arc::new(RetryingLlmClient::new(Arc::new(ollama), retry));

    let generator = NovelGenerator::new(config, llm).context("初始化小说生成器失败")?;
    generator.generate().await.context("小说生成失败")?;

    Ok(())
}

//! Quill - Rust 小说生成引擎
//!
//! 流水线：大纲 -> 人物设定 -> 四部分正文（开篇/发展/高潮/结局）-> 最终重写与评分。
//! 每个阶段可按配置进行多轮「生成 -> 自评 -> 打分 -> 选优」迭代。
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML/YAML + 环境变量）
//! - **llm**: LLM 客户端抽象与实现（Ollama / 重试包装 / 脚本化 Mock）
//! - **prompts**: 提示词模板（系统 / 故事 / 人物 / 重写与评分）
//! - **score**: 反馈质量打分与评分报告解析
//! - **storage**: 输出目录与文件持久化
//! - **writer**: 精炼循环、阶段流水线与多篇选优

pub mod config;
pub mod llm;
pub mod prompts;
pub mod score;
pub mod storage;
pub mod writer;

pub use writer::{NovelGenerator, NovelWriter, RunSet};

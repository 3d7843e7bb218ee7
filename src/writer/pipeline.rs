//! 阶段流水线：大纲 -> 人物设定 -> 正文四部分 -> 最终重写
//!
//! 每篇小说的输出目录放在显式的 RunContext 里随调用链传递，不修改共享配置。
//! 正文按 开篇/发展/高潮/结局 固定顺序累积，后面的部分能看到前文，反之不能。

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::llm::LlmClient;
use crate::prompts;
use crate::score;
use crate::storage;
use crate::writer::error::GenError;
use crate::writer::refine::{with_feedback, RefinementLoop, SelectionMode};
use crate::writer::types::{StageName, StageResult};

/// 单篇运行的输出上下文
#[derive(Debug, Clone)]
pub struct RunContext {
    /// 该篇小说的专属输出目录
    pub dir: PathBuf,
}

impl RunContext {
    /// 正文进度临时文件（每部分完成后覆写，整篇完成后删除）
    pub fn temp_path(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}_temp.md", title))
    }
}

/// 小说写作器：持有配置与 LLM，按阶段产出内容
pub struct NovelWriter<'a> {
    config: &'a AppConfig,
    llm: &'a dyn LlmClient,
}

impl<'a> NovelWriter<'a> {
    pub fn new(config: &'a AppConfig, llm: &'a dyn LlmClient) -> Self {
        Self { config, llm }
    }

    /// 生成故事大纲（在线选优），保存到 ctx 目录下的 outline.md
    pub async fn generate_outline(&self, ctx: &RunContext) -> Result<StageResult, GenError> {
        tracing::info!("开始生成故事大纲...");
        let result = RefinementLoop::new(self.llm)
            .refine(
                StageName::Outline,
                SelectionMode::Online,
                self.config.rewrite.outline_rewrites,
                |feedback| with_feedback(prompts::story::outline_prompt(self.config), feedback),
            )
            .await?;

        let path = storage::unique_path(&ctx.dir.join("outline.md"));
        storage::save_content(&result.best.text, &path)?;
        Ok(result)
    }

    /// 生成人物设定（在线选优，见过大纲），保存到 characters.md
    pub async fn generate_characters(
        &self,
        ctx: &RunContext,
        outline: &str,
    ) -> Result<StageResult, GenError> {
        tracing::info!("开始生成人物设定...");
        let result = RefinementLoop::new(self.llm)
            .refine(
                StageName::Characters,
                SelectionMode::Online,
                self.config.rewrite.character_rewrites,
                |feedback| {
                    with_feedback(
                        prompts::character::character_prompt(self.config, outline),
                        feedback,
                    )
                },
            )
            .await?;

        let path = storage::unique_path(&ctx.dir.join("characters.md"));
        storage::save_content(&result.best.text, &path)?;
        Ok(result)
    }

    /// 生成正文四部分（批量选优），返回各阶段结果与拼接后的全文
    pub async fn generate_sections(
        &self,
        ctx: &RunContext,
        outline: &str,
        characters: &str,
    ) -> Result<(Vec<StageResult>, String), GenError> {
        tracing::info!("开始生成小说内容...");
        let temp_path = ctx.temp_path(&self.config.novel.title);
        let max_rewrites = self.config.rewrite.content_rewrites;

        let mut sections = Vec::with_capacity(StageName::SECTIONS.len());
        let mut content = String::new();

        for (part_index, stage) in StageName::SECTIONS.iter().enumerate() {
            tracing::info!(
                "正在生成第 {}/{} 部分：{}...",
                part_index + 1,
                StageName::SECTIONS.len(),
                stage
            );

            // 本部分可见的前文快照；后续部分的内容绝不会出现在这里
            let context = content.clone();
            let result = RefinementLoop::new(self.llm)
                .refine(*stage, SelectionMode::Batch, max_rewrites, |feedback| {
                    let prior = if context.is_empty() {
                        None
                    } else {
                        Some(context.as_str())
                    };
                    with_feedback(
                        prompts::story::section_prompt(
                            self.config,
                            outline,
                            characters,
                            prior,
                            stage.label(),
                        ),
                        feedback,
                    )
                })
                .await?;

            content.push_str(&result.best.text);
            content.push_str("\n\n");
            storage::save_content(&content, &temp_path)?;
            sections.push(result);
        }

        tracing::info!("小说内容生成完成！总长度: {} 字符", content.chars().count());
        Ok((sections, content))
    }

    /// 最终重写并评分；本阶段不失败，任何错误都降级为对原文的尽力评分
    pub async fn final_rewrite(
        &self,
        outline: &str,
        characters: &str,
        content: &str,
    ) -> (String, f64) {
        match self.final_rewrite_inner(outline, characters, content).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!("最终重写过程中发生错误: {}", e);
                (content.to_string(), self.rate_content(content).await)
            }
        }
    }

    async fn final_rewrite_inner(
        &self,
        outline: &str,
        characters: &str,
        content: &str,
    ) -> Result<(String, f64), GenError> {
        tracing::info!("开始进行最终重写分析...");
        let max_rewrites = self.config.rewrite.final_rewrites;
        let min_score = self.config.rewrite.final_rewrite_min_score;

        if max_rewrites == 0 {
            tracing::info!("未配置最终重写，直接进行评分...");
            let score = self.rate_content(content).await;
            return Ok((content.to_string(), score));
        }

        tracing::info!(
            "最终重写次数设置为：{} 次，最低评分要求：{}",
            max_rewrites,
            min_score
        );

        let mut best_content = content.to_string();
        let mut best_score = 0.0f64;

        for i in 0..max_rewrites {
            tracing::info!("开始第 {}/{} 次最终重写...", i + 1, max_rewrites);

            let analysis = self
                .llm
                .generate(
                    &prompts::rewrite::final_analysis_prompt(),
                    &prompts::rewrite::final_analysis_user_prompt(
                        outline,
                        characters,
                        &best_content,
                    ),
                )
                .await
                .map_err(|source| GenError::Generation {
                    stage: StageName::FinalRewrite,
                    iteration: i,
                    source,
                })?;

            let analysis_score = score::evaluate_feedback(&analysis);
            tracing::info!("当前分析评分：{:.2}", analysis_score);

            if analysis_score < min_score {
                // 低质量分析照常消耗轮次预算，不补轮
                tracing::info!(
                    "分析质量（{:.2}）未达到最低要求（{}），跳过本次重写",
                    analysis_score,
                    min_score
                );
                continue;
            }

            tracing::info!("开始根据分析结果重写...");
            let new_content = self
                .llm
                .generate(&prompts::rewrite::final_fix_prompt(&best_content, &analysis), "")
                .await
                .map_err(|source| GenError::Generation {
                    stage: StageName::FinalRewrite,
                    iteration: i,
                    source,
                })?;

            let new_score = self.rate_content(&new_content).await;
            tracing::info!("重写后的评分：{:.2}", new_score);

            if new_score > best_score {
                tracing::info!(
                    "发现更好的版本（评分：{:.2} > {:.2}），更新...",
                    new_score,
                    best_score
                );
                best_content = new_content;
                best_score = new_score;
            } else {
                tracing::info!(
                    "当前版本（{:.2}）未超过最佳版本（{:.2}），保持不变",
                    new_score,
                    best_score
                );
            }
        }

        if best_score > 0.0 {
            tracing::info!("最终重写完成，最终评分：{:.2}", best_score);
            Ok((best_content, best_score))
        } else {
            // 没有任何一轮胜出：退回原文并为其评分，绝不返回被否决的重写稿
            let score = self.rate_content(content).await;
            tracing::warn!("未能生成更好的版本，使用原文（评分：{:.2}）", score);
            Ok((content.to_string(), score))
        }
    }

    /// 对全文评分；调用或解析失败降级为 0 分，不向上传播
    async fn rate_content(&self, content: &str) -> f64 {
        let system = prompts::base::rating_prompt();
        let user = prompts::base::rating_user_prompt(content);
        match self.llm.generate(&system, &user).await {
            Ok(report) => score::parse_rating(&report).score(),
            Err(e) => {
                tracing::error!("评分调用失败: {}", e);
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::llm::{LlmError, ScriptedLlmClient};

    fn config(final_rewrites: usize, min_score: f64) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.rewrite.final_rewrites = final_rewrites;
        cfg.rewrite.final_rewrite_min_score = min_score;
        cfg
    }

    /// 三节各 n 条的分析文本，n>=4 时得分 0.9 以上
    fn analysis_with_lines(n: usize) -> String {
        let mut s = String::new();
        for title in ["优点", "需要改进", "修改建议"] {
            s.push_str(&format!("## {}\n", title));
            for i in 0..n {
                s.push_str(&format!("- 第 {} 条\n", i + 1));
            }
        }
        s
    }

    #[tokio::test]
    async fn test_zero_final_rewrites_rates_original_once() {
        let cfg = config(0, 0.8);
        let mock = ScriptedLlmClient::new(vec!["……\n总分：73/100"]);
        let writer = NovelWriter::new(&cfg, &mock);

        let (content, score) = writer.final_rewrite("大纲", "人物", "原文").await;
        assert_eq!(content, "原文");
        assert_eq!(score, 73.0);
        // 除一次评分外没有任何生成调用
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_analyses_below_threshold_keeps_original() {
        let cfg = config(2, 0.8);
        // 两轮分析均不足 0.8，均不触发重写；随后对原文评分
        let mock = ScriptedLlmClient::new(vec![
            analysis_with_lines(1),
            analysis_with_lines(1),
            "总分：60/100".to_string(),
        ]);
        let writer = NovelWriter::new(&cfg, &mock);

        let (content, score) = writer.final_rewrite("大纲", "人物", "原文").await;
        assert_eq!(content, "原文");
        assert_eq!(score, 60.0);
        // 2 次分析 + 1 次评分，0 次重写生成
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_winning_rewrite_replaces_original() {
        let cfg = config(1, 0.8);
        let mock = ScriptedLlmClient::new(vec![
            analysis_with_lines(5),
            "重写后全文".to_string(),
            "总分：88/100".to_string(),
        ]);
        let writer = NovelWriter::new(&cfg, &mock);

        let (content, score) = writer.final_rewrite("大纲", "人物", "原文").await;
        assert_eq!(content, "重写后全文");
        assert_eq!(score, 88.0);
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_rejected_rewrite_falls_back_to_original() {
        let cfg = config(1, 0.8);
        // 重写稿评分解析失败（0 分），不超过 0 分的基线不算胜出，退回原文评分
        let mock = ScriptedLlmClient::new(vec![
            analysis_with_lines(5),
            "重写后全文".to_string(),
            "没有总分标记的报告".to_string(),
            "总分：50/100".to_string(),
        ]);
        let writer = NovelWriter::new(&cfg, &mock);

        let (content, score) = writer.final_rewrite("大纲", "人物", "原文").await;
        assert_eq!(content, "原文");
        assert_eq!(score, 50.0);
        assert_eq!(mock.calls(), 4);
    }

    #[tokio::test]
    async fn test_stage_error_degrades_to_rating_original() {
        let cfg = config(1, 0.8);
        let mock = ScriptedLlmClient::with_results(vec![
            Err(LlmError::Status { status: 500 }),
            Ok("总分：45/100".to_string()),
        ]);
        let writer = NovelWriter::new(&cfg, &mock);

        let (content, score) = writer.final_rewrite("大纲", "人物", "原文").await;
        assert_eq!(content, "原文");
        assert_eq!(score, 45.0);
    }

    #[tokio::test]
    async fn test_rating_failure_degrades_to_zero() {
        let cfg = config(0, 0.8);
        let mock =
            ScriptedLlmClient::with_results(vec![Err(LlmError::Transport("连接拒绝".into()))]);
        let writer = NovelWriter::new(&cfg, &mock);

        let (content, score) = writer.final_rewrite("大纲", "人物", "原文").await;
        assert_eq!(content, "原文");
        assert_eq!(score, 0.0);
    }
}

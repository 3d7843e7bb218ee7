//! 精炼循环：单阶段的「生成 -> 自评 -> 打分 -> 选优」
//!
//! 每个阶段恰好发起 max_rewrites + 1 次生成调用。除最后一轮外，每一版都立即
//! 送去自评并按反馈质量打分；最后一轮不评审（反馈只对后续轮次有用，最后一轮
//! 之后没有后续）。下一轮提示词携带的永远是**历史最佳**的反馈而非最新反馈，
//! 避免把退步版本的意见带进下一轮。
//!
//! 两种选优语义：
//! - Online（大纲、人物设定）：严格更优才替换当前最佳；最后一轮无条件成为最佳。
//! - Batch（正文四部分）：保留全部候选，结束后对全集取最大值，先出现者胜。

use crate::llm::LlmClient;
use crate::prompts;
use crate::score;
use crate::writer::error::GenError;
use crate::writer::types::{best_candidate, Candidate, StageName, StageResult};

/// 选优模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// 在线贪心：更优即替换，一旦被超越不再回头
    Online,
    /// 离线批量：全集保留，最后统一取最大
    Batch,
}

/// 把历史最佳反馈追加到阶段提示词末尾
pub fn with_feedback(mut prompt: String, feedback: Option<&str>) -> String {
    if let Some(fb) = feedback {
        prompt.push_str(&format!("\n\n参考以下修改建议：\n{}", fb));
    }
    prompt
}

/// 精炼循环：持有 LLM 引用，refine 驱动一个阶段
pub struct RefinementLoop<'a> {
    llm: &'a dyn LlmClient,
}

impl<'a> RefinementLoop<'a> {
    pub fn new(llm: &'a dyn LlmClient) -> Self {
        Self { llm }
    }

    /// 驱动一个阶段；build_prompt 以历史最佳反馈（首轮为 None）构造本轮提示词
    pub async fn refine<F>(
        &self,
        stage: StageName,
        mode: SelectionMode,
        max_rewrites: usize,
        build_prompt: F,
    ) -> Result<StageResult, GenError>
    where
        F: Fn(Option<&str>) -> String,
    {
        tracing::info!("{}重写次数设置为：{} 次", stage, max_rewrites);

        let mut candidates: Vec<Candidate> = Vec::with_capacity(max_rewrites + 1);
        let mut best_index: Option<usize> = None;
        let mut best_score = 0.0f64;
        let mut best_feedback = String::new();

        for i in 0..=max_rewrites {
            if i == 0 {
                tracing::info!("生成初始版本{}...", stage);
            } else {
                tracing::info!("开始第 {}/{} 次重写{}...", i, max_rewrites, stage);
            }

            let prompt = if i > 0 {
                build_prompt(Some(best_feedback.as_str()))
            } else {
                build_prompt(None)
            };

            let text = self
                .llm
                .generate(&prompt, "")
                .await
                .map_err(|source| GenError::Generation {
                    stage,
                    iteration: i,
                    source,
                })?;
            tracing::info!(
                "{}第 {} 版生成完成，长度: {} 字符",
                stage,
                i,
                text.chars().count()
            );

            let mut candidate = Candidate {
                text,
                feedback: None,
                score: 0.0,
            };

            if i < max_rewrites {
                let feedback = self.request_feedback(stage, &candidate.text).await;
                let current_score = score::evaluate_feedback(&feedback);
                candidate.score = current_score;
                candidate.feedback = Some(feedback.clone());

                if best_index.is_none() || current_score > best_score {
                    tracing::info!(
                        "发现更好的{}版本（评分：{:.2} > {:.2}），更新最佳版本",
                        stage,
                        current_score,
                        best_score
                    );
                    best_index = Some(i);
                    best_score = current_score;
                    best_feedback = feedback;
                } else {
                    tracing::info!(
                        "当前{}版本评分（{:.2}）未超过最佳版本（{:.2}），保留之前的最佳版本",
                        stage,
                        current_score,
                        best_score
                    );
                }
            } else if mode == SelectionMode::Online {
                // 最后一轮无条件胜出：它已吸收了历史最佳反馈，且没有下一轮可用反馈
                best_index = Some(i);
                tracing::info!("完成所有重写，使用{}最终版本", stage);
            }

            candidates.push(candidate);
        }

        let winner = match mode {
            SelectionMode::Online => best_index.unwrap_or(candidates.len() - 1),
            SelectionMode::Batch => {
                let idx = best_candidate(&candidates).unwrap_or(0);
                tracing::info!(
                    "选择评分最高的{}版本（评分：{:.2}）作为最终版本",
                    stage,
                    candidates[idx].score
                );
                idx
            }
        };

        Ok(StageResult {
            stage,
            best: candidates[winner].clone(),
            candidates,
        })
    }

    /// 获取自评反馈；失败不致命，降级为空反馈（得 0 分）
    async fn request_feedback(&self, stage: StageName, content: &str) -> String {
        tracing::info!("正在获取{}的重写反馈...", stage.feedback_kind());
        let system = prompts::rewrite::feedback_prompt(stage.feedback_kind());
        let user = prompts::rewrite::feedback_user_prompt(stage.feedback_kind(), content);
        match self.llm.generate(&system, &user).await {
            Ok(feedback) => feedback,
            Err(e) => {
                tracing::error!("获取重写反馈时发生错误: {}", e);
                String::new()
            }
        }
    }
}

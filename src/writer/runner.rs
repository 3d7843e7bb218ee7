//! 多篇选优：独立跑 novel_count 篇，取 final_score 最高者
//!
//! 各篇之间不共享任何状态或候选。单篇失败只记录并剔除该篇，不中断批次；
//! 全部失败才向顶层报错。运行序号在派发前确定，选优并列时取序号最小者。

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmClient;
use crate::storage;
use crate::writer::error::GenError;
use crate::writer::pipeline::{NovelWriter, RunContext};
use crate::writer::types::{NovelRun, RunSet};

/// 小说生成器：顶层编排，一次调用产出一个 RunSet
pub struct NovelGenerator {
    config: AppConfig,
    llm: Arc<dyn LlmClient>,
    novels_dir: PathBuf,
}

impl NovelGenerator {
    /// 创建生成器并准备输出目录
    pub fn new(config: AppConfig, llm: Arc<dyn LlmClient>) -> Result<Self, GenError> {
        let output_dir = config.output.output_dir.clone();
        let novels_dir = output_dir.join("novels");
        storage::ensure_dir(&output_dir)?;
        storage::ensure_dir(&novels_dir)?;
        tracing::info!("输出根目录: {}", output_dir.display());
        tracing::info!("小说存放目录: {}", novels_dir.display());

        Ok(Self {
            config,
            llm,
            novels_dir,
        })
    }

    /// 生成全部小说并选优；最佳篇另存为 {title}_best.md
    pub async fn generate(&self) -> Result<RunSet, GenError> {
        let novel = &self.config.novel;
        tracing::info!("开始生成小说:{}", novel.title);
        tracing::info!("类型:{}", novel.genre);
        tracing::info!("主题:{}", novel.theme);
        tracing::info!("目标字数:{}", novel.word_count);

        let novel_count = self.config.output.novel_count;
        tracing::info!("计划生成 {} 篇小说...", novel_count);

        let mut runs = Vec::with_capacity(novel_count);
        for index in 0..novel_count {
            tracing::info!("开始生成第 {}/{} 篇小说...", index + 1, novel_count);
            match self.run_one(index).await {
                Ok(run) => {
                    tracing::info!(
                        "第 {} 篇小说生成完成，评分：{}",
                        index + 1,
                        run.final_score
                    );
                    runs.push(run);
                }
                Err(e) => {
                    // 单篇失败只剔除该篇，批次继续
                    tracing::error!("第 {} 篇小说生成失败，跳过该篇: {}", index + 1, e);
                }
            }
        }

        if runs.is_empty() {
            return Err(GenError::AllRunsFailed(novel_count));
        }

        let set = RunSet::new(runs);
        if let Some(best) = set.best() {
            tracing::info!("评分最高的小说：{} 分（第 {} 篇）", best.final_score, best.index + 1);
            let best_path = self
                .novels_dir
                .join(format!("{}_best.md", self.config.novel.title));
            storage::save_content(&best.final_content, &best_path)?;
            tracing::info!("已将最佳小说保存至: {}", best_path.display());
        }

        tracing::info!("所有小说生成完成！共生成 {} 篇", set.runs.len());
        Ok(set)
    }

    /// 单篇完整流水线：专属目录 -> 大纲 -> 人物 -> 正文 -> 最终重写 -> 落盘
    async fn run_one(&self, index: usize) -> Result<NovelRun, GenError> {
        let title = &self.config.novel.title;
        let dir = self.novels_dir.join(format!("{}_{}", title, index + 1));
        storage::ensure_dir(&dir)?;
        tracing::info!("创建小说目录: {}", dir.display());

        let ctx = RunContext { dir: dir.clone() };
        let writer = NovelWriter::new(&self.config, self.llm.as_ref());

        let outline = writer.generate_outline(&ctx).await?;
        let characters = writer.generate_characters(&ctx, &outline.best.text).await?;
        let (sections, content) = writer
            .generate_sections(&ctx, &outline.best.text, &characters.best.text)
            .await?;
        let (final_content, final_score) = writer
            .final_rewrite(&outline.best.text, &characters.best.text, &content)
            .await;

        let path = dir.join(format!("{}.md", title));
        storage::save_content(&final_content, &path)?;
        storage::remove_file_if_exists(&ctx.temp_path(title));

        Ok(NovelRun {
            index,
            outline,
            characters,
            sections,
            final_content,
            final_score,
            dir,
            path,
        })
    }
}

//! 全流程集成测试：脚本化 LLM 驱动完整流水线

use std::sync::Arc;

use quill::config::AppConfig;
use quill::llm::{LlmError, ScriptedLlmClient};
use quill::NovelGenerator;

/// 优点小节 n 条的反馈文本
fn feedback_with_lines(n: usize) -> String {
    let mut s = String::from("## 优点\n");
    for i in 0..n {
        s.push_str(&format!("- 第 {} 条\n", i + 1));
    }
    s
}

fn test_config(dir: &std::path::Path, novel_count: usize) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.novel.title = "灯塔".to_string();
    cfg.output.output_dir = dir.to_path_buf();
    cfg.output.novel_count = novel_count;
    // 各阶段重写轮数默认全 0，单篇恰好 7 次生成调用（6 次内容 + 1 次评分）
    cfg
}

/// 一篇全零重写小说的脚本响应：大纲、人物、四部分正文、评分报告
fn run_script(tag: &str, rating: &str) -> Vec<String> {
    vec![
        format!("{}大纲", tag),
        format!("{}人物", tag),
        format!("{}开篇", tag),
        format!("{}发展", tag),
        format!("{}高潮", tag),
        format!("{}结局", tag),
        format!("总分：{}/100", rating),
    ]
}

#[tokio::test]
async fn test_deterministic_single_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(dir.path(), 1);
    cfg.rewrite.outline_rewrites = 1;

    // 大纲阶段 2 次生成 + 1 次评审，其余阶段各 1 次，最后 1 次评分
    let mock = Arc::new(ScriptedLlmClient::new(vec![
        "大纲初版".to_string(),
        feedback_with_lines(3),
        "大纲终稿".to_string(),
        "人物设定".to_string(),
        "第一部".to_string(),
        "第二部".to_string(),
        "第三部".to_string(),
        "第四部".to_string(),
        "总分：66/100".to_string(),
    ]));

    let generator = NovelGenerator::new(cfg, mock.clone()).unwrap();
    let set = generator.generate().await.unwrap();

    assert_eq!(mock.calls(), 9);
    assert_eq!(set.runs.len(), 1);

    let run = &set.runs[0];
    // 大纲最终轮无条件胜出
    assert_eq!(run.outline.best.text, "大纲终稿");
    // 正文按固定顺序拼接，顺序与评分无关
    assert_eq!(run.final_content, "第一部\n\n第二部\n\n第三部\n\n第四部\n\n");
    assert_eq!(run.final_score, 66.0);

    // 落盘检查：单篇目录、最终稿、最佳稿；临时文件已删除
    let novel_dir = dir.path().join("novels").join("灯塔_1");
    assert!(novel_dir.join("outline.md").exists());
    assert!(novel_dir.join("characters.md").exists());
    let saved = std::fs::read_to_string(novel_dir.join("灯塔.md")).unwrap();
    assert_eq!(saved, run.final_content);
    assert!(!novel_dir.join("灯塔_temp.md").exists());

    let best = std::fs::read_to_string(dir.path().join("novels").join("灯塔_best.md")).unwrap();
    assert_eq!(best, run.final_content);
}

#[tokio::test]
async fn test_multi_run_tie_breaks_to_lower_index() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path(), 3);

    // 三篇评分 [55, 82, 82]：并列最高时取序号较小的第二篇
    let mut script = Vec::new();
    script.extend(run_script("甲", "55"));
    script.extend(run_script("乙", "82"));
    script.extend(run_script("丙", "82"));
    let mock = Arc::new(ScriptedLlmClient::new(script));

    let generator = NovelGenerator::new(cfg, mock.clone()).unwrap();
    let set = generator.generate().await.unwrap();

    assert_eq!(mock.calls(), 21);
    assert_eq!(set.runs.len(), 3);

    let best = set.best().unwrap();
    assert_eq!(best.index, 1);
    assert_eq!(best.final_score, 82.0);

    let saved = std::fs::read_to_string(dir.path().join("novels").join("灯塔_best.md")).unwrap();
    assert!(saved.starts_with("乙开篇"));
}

#[tokio::test]
async fn test_failed_run_excluded_without_aborting_batch() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path(), 2);

    // 第一篇在大纲生成时失败；第二篇完整成功
    let mut results: Vec<Result<String, LlmError>> =
        vec![Err(LlmError::InvalidResponse("响应体异常".to_string()))];
    results.extend(run_script("乙", "70").into_iter().map(Ok));
    let mock = Arc::new(ScriptedLlmClient::with_results(results));

    let generator = NovelGenerator::new(cfg, mock.clone()).unwrap();
    let set = generator.generate().await.unwrap();

    assert_eq!(set.runs.len(), 1);
    assert_eq!(set.runs[0].index, 1);
    assert_eq!(set.best().unwrap().final_score, 70.0);
}

#[tokio::test]
async fn test_all_runs_failed_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path(), 2);

    let mock = Arc::new(ScriptedLlmClient::with_results(vec![
        Err(LlmError::Status { status: 500 }),
        Err(LlmError::Status { status: 500 }),
    ]));

    let generator = NovelGenerator::new(cfg, mock).unwrap();
    assert!(generator.generate().await.is_err());
}

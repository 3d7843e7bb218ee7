//! 核心数据类型：候选版本、阶段结果、单篇运行与多篇结果集
//!
//! 选优一律用纯函数（严格大于，先出现者胜），便于对并列名次做确定性断言。

use std::fmt;
use std::path::PathBuf;

/// 阶段名：固定顺序，正文四部分的拼接顺序永远不受评分影响
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    Outline,
    Characters,
    Opening,
    Development,
    Climax,
    Resolution,
    FinalRewrite,
}

impl StageName {
    /// 正文四部分，固定顺序
    pub const SECTIONS: [StageName; 4] = [
        StageName::Opening,
        StageName::Development,
        StageName::Climax,
        StageName::Resolution,
    ];

    /// 中文名（用于日志与提示词）
    pub fn label(&self) -> &'static str {
        match self {
            StageName::Outline => "大纲",
            StageName::Characters => "人物设定",
            StageName::Opening => "开篇",
            StageName::Development => "发展",
            StageName::Climax => "高潮",
            StageName::Resolution => "结局",
            StageName::FinalRewrite => "最终重写",
        }
    }

    /// 自评反馈提示词中的内容类型
    pub fn feedback_kind(&self) -> &'static str {
        match self {
            StageName::Outline => "大纲",
            StageName::Characters => "人物设定",
            StageName::FinalRewrite => "全文",
            _ => "正文",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 一次迭代产出的候选版本；创建后不再修改
#[derive(Debug, Clone)]
pub struct Candidate {
    pub text: String,
    /// 自评反馈；最后一轮不评审，为 None（评审失败时为 Some("")，得 0 分）
    pub feedback: Option<String>,
    /// 反馈质量分，[0, 1]
    pub score: f64,
}

/// 一个阶段的结果：胜出版本与全部候选
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage: StageName,
    pub best: Candidate,
    pub candidates: Vec<Candidate>,
}

/// 一篇小说的完整运行结果
#[derive(Debug, Clone)]
pub struct NovelRun {
    /// 运行序号（派发前确定，与完成顺序无关）
    pub index: usize,
    pub outline: StageResult,
    pub characters: StageResult,
    /// 固定顺序：开篇、发展、高潮、结局
    pub sections: Vec<StageResult>,
    pub final_content: String,
    /// 评分报告解析出的原始分值（0-100 刻度）
    pub final_score: f64,
    pub dir: PathBuf,
    pub path: PathBuf,
}

/// 多篇运行的结果集
#[derive(Debug)]
pub struct RunSet {
    pub runs: Vec<NovelRun>,
    best_index: Option<usize>,
}

impl RunSet {
    pub fn new(runs: Vec<NovelRun>) -> Self {
        let best_index = best_run(&runs);
        Self { runs, best_index }
    }

    /// 全局最优的一篇；并列时取序号最小者
    pub fn best(&self) -> Option<&NovelRun> {
        self.best_index.map(|i| &self.runs[i])
    }
}

/// 候选选优：最高分，严格大于才替换，并列取先出现者
pub fn best_candidate(candidates: &[Candidate]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) if c.score > candidates[b].score => best = Some(i),
            Some(_) => {}
        }
    }
    best
}

/// 运行选优：最高 final_score，严格大于才替换，并列取序号最小者
pub fn best_run(runs: &[NovelRun]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, r) in runs.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) if r.final_score > runs[b].final_score => best = Some(i),
            Some(_) => {}
        }
    }
    best
}

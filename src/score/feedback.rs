//! 反馈质量打分
//!
//! 对自评反馈文本按四个小节（优点 / 需要改进 / 修改建议 / 深化建议）加权打分。
//! 衡量的是反馈的**条理与具体程度**，不是正文质量：逐条、多点的反馈得分高，
//! 该分数只用来决定「下一轮提示词采信哪一版反馈」。

/// 小节标记与权重；权重之和为 1.0
pub const SECTION_WEIGHTS: [(&str, f64); 4] = [
    ("优点", 0.3),
    ("需要改进", 0.3),
    ("修改建议", 0.3),
    ("深化建议", 0.1),
];

/// 每条有效内容 0.2 分，单节封顶 1.0
const LINE_SCORE: f64 = 0.2;

/// 提取小节正文：标记之后、下一个 "##" 标题（或文本结尾）之前。
/// 标记不存在时返回 None（类型化的「缺失」，调用方按 0 分处理）。
fn section_body<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let rest = &text[start..];
    match rest.find("##") {
        Some(end) => Some(&rest[..end]),
        None => Some(rest),
    }
}

/// 评估反馈质量，返回 [0, 1] 内的分数
///
/// 每个出现的小节贡献 weight * min(有效行数 * 0.2, 1.0)；缺失的小节贡献 0。
/// 空文本或无任何标记得 0.0。纯字符串扫描，任何输入都不会失败。
pub fn evaluate(feedback: &str) -> f64 {
    let mut score = 0.0;
    for (marker, weight) in SECTION_WEIGHTS {
        if let Some(body) = section_body(feedback, marker) {
            let lines = body.lines().filter(|line| !line.trim().is_empty()).count();
            let line_score = (lines as f64 * LINE_SCORE).min(1.0);
            score += weight * line_score;
        }
    }
    tracing::debug!("反馈质量评分：{:.2}", score);
    score
}

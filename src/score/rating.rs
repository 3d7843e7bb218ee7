//! 评分报告解析
//!
//! 评分提示词要求模型以 "总分：x/100" 收尾；这里用宽松的正则把 x 提取为 f64，
//! 解析失败不报错，降级为 0 分（0 分只会让该版本落选，不会中断流程）。

use std::sync::OnceLock;

use regex::Regex;

/// 解析结果：成功携带原始分值（0-100 刻度，不归一化），
/// 失败时区分「标记缺失」与「标记存在但数值不可解析」，便于测试断言失败原因。
#[derive(Debug, Clone, PartialEq)]
pub enum RatingOutcome {
    Parsed(f64),
    MarkerMissing,
    Malformed,
}

impl RatingOutcome {
    /// 坍缩为分值：未解析出的情况一律 0.0
    pub fn score(&self) -> f64 {
        match self {
            RatingOutcome::Parsed(v) => *v,
            _ => 0.0,
        }
    }
}

const MARKER: &str = "总分";

fn rating_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 全角/半角冒号均接受，分值后须跟 "/"
    RE.get_or_init(|| {
        Regex::new(r"总分\s*[：:]\s*([0-9]+(?:\.[0-9]+)?)\s*/").expect("rating regex is valid")
    })
}

/// 从评分报告中提取总分
pub fn parse_rating(report: &str) -> RatingOutcome {
    if let Some(caps) = rating_re().captures(report) {
        match caps[1].parse::<f64>() {
            Ok(v) => return RatingOutcome::Parsed(v),
            Err(_) => {
                tracing::warn!("解析评分失败（数值不合法），设置为 0 分");
                return RatingOutcome::Malformed;
            }
        }
    }
    if report.contains(MARKER) {
        tracing::warn!("解析评分失败（总分格式不合法），设置为 0 分");
        RatingOutcome::Malformed
    } else {
        tracing::warn!("解析评分失败（未找到总分标记），设置为 0 分");
        RatingOutcome::MarkerMissing
    }
}

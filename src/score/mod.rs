//! 打分层：反馈质量打分与评分报告解析

pub mod feedback;
pub mod rating;

pub use feedback::evaluate as evaluate_feedback;
pub use rating::{parse_rating, RatingOutcome};

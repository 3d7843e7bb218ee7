//! 写作层：精炼循环、阶段流水线与多篇选优
//!
//! 调用链：NovelGenerator（多篇）-> NovelWriter（阶段）-> RefinementLoop（单阶段迭代）。

pub mod error;
pub mod pipeline;
pub mod refine;
pub mod runner;
pub mod types;

pub use error::GenError;
pub use pipeline::{NovelWriter, RunContext};
pub use refine::{RefinementLoop, SelectionMode};
pub use runner::NovelGenerator;
pub use types::{best_candidate, best_run, Candidate, NovelRun, RunSet, StageName, StageResult};

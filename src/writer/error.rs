//! 生成流程错误
//!
//! 生成调用失败对当前运行是致命的，携带阶段与轮次上下文向上冒泡；
//! 持久化失败单独成类，内存中的内容仍然有效。

use thiserror::Error;

use crate::llm::LlmError;
use crate::storage::StorageError;
use crate::writer::types::StageName;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("{stage}阶段第 {iteration} 轮生成失败: {source}")]
    Generation {
        stage: StageName,
        iteration: usize,
        #[source]
        source: LlmError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("所有 {0} 篇小说均生成失败")]
    AllRunsFailed(usize),
}

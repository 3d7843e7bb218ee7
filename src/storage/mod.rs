//! 输出目录与文件持久化
//!
//! 所有产物都是新建的唯一命名文件（追加式，不覆盖），unique_path 通过数字后缀避让。
//! 持久化失败会向上抛出，但不影响内存中已生成的内容。

use std::path::{Path, PathBuf};

use thiserror::Error;

/// 持久化错误：与生成错误区分开，内容本身仍然有效
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("创建目录失败 {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("保存文件失败 {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 确保目录存在，不存在则创建
pub fn ensure_dir(path: &Path) -> Result<(), StorageError> {
    std::fs::create_dir_all(path).map_err(|source| StorageError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// 保存内容到文件
pub fn save_content(content: &str, path: &Path) -> Result<(), StorageError> {
    std::fs::write(path, content).map_err(|source| {
        tracing::error!("保存文件失败: {}", path.display());
        StorageError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::info!("内容已保存至: {}", path.display());
    Ok(())
}

/// 获取不重复的文件路径：base 已存在时依次尝试 name_1.ext、name_2.ext …
pub fn unique_path(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }

    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let dir = base.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// 删除文件（不存在或失败仅告警，不报错）
pub fn remove_file_if_exists(path: &Path) {
    if path.exists() {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!("已删除文件: {}", path.display()),
            Err(e) => tracing::warn!("删除文件失败: {}, 错误: {}", path.display(), e),
        }
    }
}

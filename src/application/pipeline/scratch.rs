//! Scratch Area - 单次运行的临时文件区
//!
//! 每次运行创建一个临时目录，片段音频在调用后端之前登记；
//! `cleanup` 在任何退出路径上都会被调用，目录本身由 `TempDir` 兜底删除

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::application::error::CleanupWarning;

/// 临时文件区
#[derive(Debug)]
pub struct ScratchArea {
    dir: TempDir,
    files: Vec<PathBuf>,
}

/// 清理结果
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: usize,
    pub warnings: Vec<CleanupWarning>,
}

impl ScratchArea {
    /// 在 `root`（或系统临时目录）下创建临时区
    pub async fn create(root: Option<&Path>, label: &str) -> std::io::Result<Self> {
        let prefix = format!("mixtts-{}-", label);
        let root = root.map(Path::to_path_buf);
        if let Some(root) = &root {
            tokio::fs::create_dir_all(root).await?;
        }

        // tempfile 只提供同步接口
        let dir = tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix(&prefix);
            match root {
                Some(root) => builder.tempdir_in(root),
                None => builder.tempdir(),
            }
        })
        .await
        .map_err(|e| std::io::Error::new(ErrorKind::Other, e))??;

        tracing::debug!(path = %dir.path().display(), "Scratch area created");

        Ok(Self {
            dir,
            files: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 分配并登记一个片段文件路径
    pub fn allocate(&mut self, index: usize, extension: &str) -> PathBuf {
        let path = self
            .dir
            .path()
            .join(format!("segment_{:03}.{}", index, extension));
        self.files.push(path.clone());
        path
    }

    /// 已登记的文件
    pub fn registered(&self) -> &[PathBuf] {
        &self.files
    }

    /// 删除所有登记文件和临时目录
    ///
    /// 已被移走（例如直接作为产物）的文件视为已清理
    pub async fn cleanup(self) -> CleanupReport {
        let mut report = CleanupReport::default();

        for path in &self.files {
            match tokio::fs::remove_file(path).await {
                Ok(()) => report.removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => report.warnings.push(CleanupWarning {
                    path: path.clone(),
                    message: e.to_string(),
                }),
            }
        }

        let dir_path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            report.warnings.push(CleanupWarning {
                path: dir_path,
                message: e.to_string(),
            });
        }

        for warning in &report.warnings {
            tracing::warn!("Resource cleanup warning: {}", warning);
        }
        tracing::debug!(
            removed = report.removed,
            warnings = report.warnings.len(),
            "Scratch area cleaned up"
        );

        report
    }
}

//! Assembler - 将有序片段拼接为最终产物

use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{AudioConcatPort, ConcatError};

/// 音频拼接器
///
/// 产物先写入输出目录下的暂存文件，成功后再重命名到目标路径；
/// 失败时只删除暂存文件，目标路径上已有的文件保持不变
pub struct Assembler {
    concat: Arc<dyn AudioConcatPort>,
}

impl Assembler {
    pub fn new(concat: Arc<dyn AudioConcatPort>) -> Self {
        Self { concat }
    }

    /// 按顺序拼接输入文件
    ///
    /// 前置条件：至少一个输入，且全部存在
    pub async fn assemble(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ConcatError> {
        if inputs.is_empty() {
            return Err(ConcatError::NoInputs);
        }
        for input in inputs {
            if tokio::fs::metadata(input).await.is_err() {
                return Err(ConcatError::MissingInput(input.display().to_string()));
            }
        }
        ensure_parent_dir(output).await?;

        tracing::info!(
            backend = %self.concat.name(),
            "Merging {} segments into {}",
            inputs.len(),
            output.display()
        );

        let staging = staging_path(output);
        match self.concat.concat(inputs, &staging).await {
            Ok(()) => promote(&staging, output).await,
            Err(e) => {
                discard_partial_output(&staging).await;
                Err(e)
            }
        }
    }

    /// 单个片段直接作为产物（移动，跨文件系统时经暂存文件复制）
    pub async fn adopt_single(&self, input: &Path, output: &Path) -> Result<(), ConcatError> {
        ensure_parent_dir(output).await?;

        if tokio::fs::rename(input, output).await.is_ok() {
            return Ok(());
        }

        let staging = staging_path(output);
        match tokio::fs::copy(input, &staging).await {
            Ok(_) => promote(&staging, output).await,
            Err(e) => {
                discard_partial_output(&staging).await;
                Err(ConcatError::IoError(format!(
                    "failed to move {} to {}: {}",
                    input.display(),
                    output.display(),
                    e
                )))
            }
        }
    }

    /// 生成静音片段
    pub async fn silence(&self, duration_secs: f64, output: &Path) -> Result<(), ConcatError> {
        self.concat.silence(duration_secs, output).await
    }

    pub fn backend_name(&self) -> &str {
        self.concat.name()
    }
}

async fn ensure_parent_dir(path: &Path) -> Result<(), ConcatError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// 与目标同目录的暂存路径，保留扩展名以便后端按扩展名选择格式
fn staging_path(output: &Path) -> PathBuf {
    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let tag = &Uuid::new_v4().simple().to_string()[..8];
    output.with_file_name(format!(".mixtts-{}-{}", tag, file_name))
}

/// 暂存文件就位到目标路径
async fn promote(staging: &Path, output: &Path) -> Result<(), ConcatError> {
    if let Err(e) = tokio::fs::rename(staging, output).await {
        discard_partial_output(staging).await;
        return Err(ConcatError::IoError(format!(
            "failed to move {} to {}: {}",
            staging.display(),
            output.display(),
            e
        )));
    }
    Ok(())
}

/// 删除失败后残留的输出文件
pub(crate) async fn discard_partial_output(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove partial output"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{FfmpegConcat, ScriptedCommandRunner};
    use tempfile::tempdir;

    fn assembler(runner: Arc<ScriptedCommandRunner>, scratch: &Path) -> Assembler {
        Assembler::new(Arc::new(
            FfmpegConcat::new(runner, "ffmpeg").with_scratch_dir(scratch),
        ))
    }

    #[tokio::test]
    async fn test_assemble_in_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        let b = dir.path().join("b.mp3");
        std::fs::write(&a, b"AAA").unwrap();
        std::fs::write(&b, b"BBB").unwrap();
        let output = dir.path().join("out").join("merged.mp3");

        let runner = Arc::new(ScriptedCommandRunner::new());
        assembler(runner, dir.path())
            .assemble(&[b.clone(), a.clone()], &output)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"BBBAAA");
    }

    #[tokio::test]
    async fn test_single_element_list_is_valid() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        std::fs::write(&a, b"AAA").unwrap();
        let output = dir.path().join("merged.mp3");

        let runner = Arc::new(ScriptedCommandRunner::new());
        assembler(runner, dir.path())
            .assemble(&[a], &output)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"AAA");
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(ScriptedCommandRunner::new());
        let err = assembler(runner.clone(), dir.path())
            .assemble(&[], &dir.path().join("out.mp3"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConcatError::NoInputs));
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_rejected() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(ScriptedCommandRunner::new());
        let err = assembler(runner, dir.path())
            .assemble(&[dir.path().join("nope.mp3")], &dir.path().join("out.mp3"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConcatError::MissingInput(ref p) if p.contains("nope.mp3")));
    }

    #[tokio::test]
    async fn test_failed_concat_leaves_no_output() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        std::fs::write(&a, b"AAA").unwrap();
        let output = dir.path().join("merged.mp3");

        let runner = Arc::new(ScriptedCommandRunner::new().fail_program("ffmpeg"));
        let err = assembler(runner, dir.path())
            .assemble(&[a], &output)
            .await
            .unwrap_err();

        assert!(matches!(err, ConcatError::BackendFailed { .. }));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_failed_concat_keeps_existing_output() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        let b = dir.path().join("b.mp3");
        std::fs::write(&a, b"AAA").unwrap();
        std::fs::write(&b, b"BBB").unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();
        let output = out_dir.join("merged.mp3");
        std::fs::write(&output, b"USER DATA").unwrap();

        let runner = Arc::new(ScriptedCommandRunner::new().fail_program("ffmpeg"));
        assembler(runner, dir.path())
            .assemble(&[a, b], &output)
            .await
            .unwrap_err();

        assert_eq!(std::fs::read(&output).unwrap(), b"USER DATA");
        // 暂存文件已删除
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_backend_keeps_existing_output() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        std::fs::write(&a, b"AAA").unwrap();
        let output = dir.path().join("merged.mp3");
        std::fs::write(&output, b"USER DATA").unwrap();

        let runner = Arc::new(ScriptedCommandRunner::new().missing_program("ffmpeg"));
        let err = assembler(runner, dir.path())
            .assemble(&[a], &output)
            .await
            .unwrap_err();

        assert!(matches!(err, ConcatError::ProcessError(_)));
        assert_eq!(std::fs::read(&output).unwrap(), b"USER DATA");
    }

    #[tokio::test]
    async fn test_successful_concat_replaces_existing_output() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        std::fs::write(&a, b"AAA").unwrap();
        let output = dir.path().join("merged.mp3");
        std::fs::write(&output, b"OLD").unwrap();

        let runner = Arc::new(ScriptedCommandRunner::new());
        assembler(runner, dir.path())
            .assemble(&[a.clone()], &output)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"AAA");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".mixtts-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_staging_path_keeps_directory_and_extension() {
        let staging = staging_path(Path::new("/tmp/out/speech.mp3"));
        assert_eq!(staging.parent(), Some(Path::new("/tmp/out")));
        let name = staging.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".mixtts-"));
        assert!(name.ends_with("-speech.mp3"));
    }

    #[tokio::test]
    async fn test_adopt_single_moves_file() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("segment_000.mp3");
        std::fs::write(&a, b"AAA").unwrap();
        let output = dir.path().join("nested").join("final.mp3");

        let runner = Arc::new(ScriptedCommandRunner::new());
        assembler(runner.clone(), dir.path())
            .adopt_single(&a, &output)
            .await
            .unwrap();

        assert!(!a.exists());
        assert_eq!(std::fs::read(&output).unwrap(), b"AAA");
        assert!(runner.invocations().is_empty());
    }
}

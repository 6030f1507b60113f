//! FFmpeg Concat - 基于 ffmpeg concat demuxer 的无损拼接
//!
//! 清单文件格式（每行一个）：`file '<绝对路径>'`
//! 调用形式：`ffmpeg -f concat -safe 0 -i <清单> -c copy <输出> -y`

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{AudioConcatPort, CommandRunnerPort, CommandSpec, ConcatError};

/// 静音片段采样率
const SILENCE_SAMPLE_RATE: u32 = 24000;

/// ffmpeg 拼接器
pub struct FfmpegConcat {
    runner: Arc<dyn CommandRunnerPort>,
    program: String,
    /// 清单文件所在目录，None 时使用系统临时目录
    scratch_dir: Option<PathBuf>,
}

impl FfmpegConcat {
    pub fn new(runner: Arc<dyn CommandRunnerPort>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            scratch_dir: None,
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    fn write_manifest(&self, inputs: &[PathBuf]) -> Result<tempfile::NamedTempFile, ConcatError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("mixtts-manifest-").suffix(".txt");
        let mut manifest = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let cwd = std::env::current_dir()?;
        for input in inputs {
            writeln!(manifest, "{}", manifest_line(&cwd.join(input)))?;
        }
        manifest.flush()?;
        Ok(manifest)
    }
}

/// 清单中的一行，单引号按 concat demuxer 规则转义
fn manifest_line(path: &Path) -> String {
    format!("file '{}'", path.display().to_string().replace('\'', "'\\''"))
}

#[async_trait]
impl AudioConcatPort for FfmpegConcat {
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ConcatError> {
        if inputs.is_empty() {
            return Err(ConcatError::NoInputs);
        }

        let manifest = self.write_manifest(inputs)?;
        let command = CommandSpec::new(&self.program)
            .args(["-f", "concat", "-safe", "0", "-i"])
            .arg(manifest.path().display().to_string())
            .args(["-c", "copy"])
            .arg(output.display().to_string())
            .arg("-y");

        let result = self.runner.run(&command).await;

        let manifest_path = manifest.path().to_path_buf();
        if let Err(e) = manifest.close() {
            tracing::warn!(
                path = %manifest_path.display(),
                error = %e,
                "Failed to remove concat manifest"
            );
        }

        let output_status = result?;
        if !output_status.success() {
            return Err(ConcatError::BackendFailed {
                code: output_status.exit_code,
                stderr: output_status.diagnostic(),
            });
        }
        if tokio::fs::metadata(output).await.is_err() {
            return Err(ConcatError::OutputMissing(output.display().to_string()));
        }
        Ok(())
    }

    async fn silence(&self, duration_secs: f64, output: &Path) -> Result<(), ConcatError> {
        let command = CommandSpec::new(&self.program)
            .args(["-f", "lavfi", "-i"])
            .arg(format!("anullsrc=r={}:cl=mono", SILENCE_SAMPLE_RATE))
            .arg("-t")
            .arg(duration_secs.to_string())
            .args(["-c:a", "libmp3lame"])
            .arg(output.display().to_string())
            .arg("-y");

        let result = self.runner.run(&command).await?;
        if !result.success() {
            return Err(ConcatError::BackendFailed {
                code: result.exit_code,
                stderr: result.diagnostic(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

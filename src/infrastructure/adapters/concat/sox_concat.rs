//! SoX Concat - `sox in1 in2 ... out`
//!
//! 会重新编码，不支持生成静音

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{AudioConcatPort, CommandRunnerPort, CommandSpec, ConcatError};

pub struct SoxConcat {
    runner: Arc<dyn CommandRunnerPort>,
    program: String,
}

impl SoxConcat {
    pub fn new(runner: Arc<dyn CommandRunnerPort>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }
}

#[async_trait]
impl AudioConcatPort for SoxConcat {
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ConcatError> {
        if inputs.is_empty() {
            return Err(ConcatError::NoInputs);
        }

        let command = CommandSpec::new(&self.program)
            .args(inputs.iter().map(|p| p.display().to_string()))
            .arg(output.display().to_string());

        let result = self.runner.run(&command).await?;
        if !result.success() {
            return Err(ConcatError::BackendFailed {
                code: result.exit_code,
                stderr: result.diagnostic(),
            });
        }
        if tokio::fs::metadata(output).await.is_err() {
            return Err(ConcatError::OutputMissing(output.display().to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

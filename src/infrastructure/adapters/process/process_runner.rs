//! Process Command Runner - 基于 tokio::process 的 CommandRunnerPort 实现

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{CommandError, CommandOutput, CommandRunnerPort, CommandSpec};

/// 真实进程执行器
///
/// 子进程 stdin 置空，stdout/stderr 捕获后返回
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandRunner;

impl ProcessCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunnerPort for ProcessCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError> {
        tracing::debug!(command = %command.display(), "Running external command");

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandError::NotFound(command.program.clone())
                } else {
                    CommandError::SpawnFailed {
                        program: command.program.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            tracing::debug!(
                program = %command.program,
                exit_code = ?result.exit_code,
                stderr = %result.diagnostic(),
                "External command failed"
            );
        }

        Ok(result)
    }
}

//! Command TTS Backend - 通过 edge-tts 命令行合成
//!
//! 调用形式：
//! `edge-tts --voice=<voice> --text=<text> --write-media=<path> [--rate=+N%] [--pitch=+NHz]`
//!
//! 参数统一使用 `--flag=value` 形式，避免以 `-` 开头的文本被当作选项

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    CommandRunnerPort, CommandSpec, ProsodyOptions, SynthesisBackendPort, SynthesisError,
    SynthesisRequest,
};

/// edge-tts 命令行后端
pub struct CommandTtsBackend {
    runner: Arc<dyn CommandRunnerPort>,
    program: String,
}

impl CommandTtsBackend {
    pub fn new(runner: Arc<dyn CommandRunnerPort>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    fn build_command(&self, request: &SynthesisRequest, output_path: &Path) -> CommandSpec {
        let mut command = CommandSpec::new(&self.program).args([
            format!("--voice={}", request.voice),
            format!("--text={}", request.text),
            format!("--write-media={}", output_path.display()),
        ]);
        command = command.args(prosody_args(&request.prosody));
        command
    }
}

/// 语速/音调参数，带显式符号
fn prosody_args(prosody: &ProsodyOptions) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(rate) = prosody.rate {
        args.push(format!("--rate={:+}%", rate));
    }
    if let Some(pitch) = prosody.pitch {
        args.push(format!("--pitch={:+}Hz", pitch));
    }
    args
}

#[async_trait]
impl SynthesisBackendPort for CommandTtsBackend {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError> {
        let command = self.build_command(request, output_path);

        tracing::debug!(
            program = %self.program,
            voice = %request.voice,
            text_len = request.text.chars().count(),
            "Invoking synthesis command"
        );

        let output = self.runner.run(&command).await?;
        if !output.success() {
            return Err(SynthesisError::BackendFailed {
                code: output.exit_code,
                stderr: output.diagnostic(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

//! Scripted Command Runner - 用于测试的进程执行器
//!
//! 不启动任何子进程，按参数模拟 edge-tts / ffmpeg / sox / osascript 的行为：
//! - 合成（`--write-media=`）：写入 `[{voice}:{text}]`
//! - ffmpeg concat：按清单顺序拼接文件内容
//! - ffmpeg lavfi：写入 `<silence {secs}s>`
//! - sox：把除最后一个参数外的所有文件拼接到最后一个参数
//! - osascript：音量查询返回 42，静音查询返回 false

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::ports::{CommandError, CommandOutput, CommandRunnerPort, CommandSpec};

const SCRIPTED_VOLUME: &str = "42";

/// 脚本化进程执行器
#[derive(Debug, Default)]
pub struct ScriptedCommandRunner {
    failing_texts: Vec<String>,
    failing_programs: HashSet<String>,
    missing_programs: HashSet<String>,
    invocations: Mutex<Vec<CommandSpec>>,
}

impl ScriptedCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合成文本包含 `needle` 时失败
    pub fn fail_on_text(mut self, needle: &str) -> Self {
        self.failing_texts.push(needle.to_string());
        self
    }

    /// 指定程序总是以非零状态退出
    pub fn fail_program(mut self, program: &str) -> Self {
        self.failing_programs.insert(program.to_string());
        self
    }

    /// 指定程序不存在
    pub fn missing_program(mut self, program: &str) -> Self {
        self.missing_programs.insert(program.to_string());
        self
    }

    /// 已记录的调用（按顺序）
    pub fn invocations(&self) -> Vec<CommandSpec> {
        self.invocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn count_for(&self, program: &str) -> usize {
        self.invocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| c.program == program)
            .count()
    }

    fn record(&self, command: &CommandSpec) {
        self.invocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command.clone());
    }

    async fn synthesize(&self, command: &CommandSpec, media: &str) -> CommandOutput {
        let voice = flag_value(command, "--voice=").unwrap_or_default();
        let text = flag_value(command, "--text=").unwrap_or_default();

        if self.failing_texts.iter().any(|needle| text.contains(needle.as_str())) {
            return failure("scripted synthesis failure");
        }

        let content = format!("[{}:{}]", voice, text);
        match tokio::fs::write(media, content).await {
            Ok(()) => ok(""),
            Err(e) => failure(&e.to_string()),
        }
    }

    async fn ffmpeg_concat(&self, command: &CommandSpec) -> CommandOutput {
        let (Some(manifest), Some(output)) = (arg_after(command, "-i"), arg_after(command, "copy"))
        else {
            return failure("malformed concat command");
        };

        let listing = match tokio::fs::read_to_string(manifest).await {
            Ok(listing) => listing,
            Err(e) => return failure(&e.to_string()),
        };

        let mut merged = Vec::new();
        for path in manifest_entries(&listing) {
            match tokio::fs::read(&path).await {
                Ok(bytes) => merged.extend(bytes),
                Err(e) => return failure(&format!("{}: {}", path.display(), e)),
            }
        }

        write_output(Path::new(output), &merged).await
    }

    async fn ffmpeg_silence(&self, command: &CommandSpec) -> CommandOutput {
        let (Some(secs), Some(output)) = (arg_after(command, "-t"), arg_after(command, "libmp3lame"))
        else {
            return failure("malformed silence command");
        };
        let content = format!("<silence {}s>", secs);
        write_output(Path::new(output), content.as_bytes()).await
    }

    async fn sox(&self, command: &CommandSpec) -> CommandOutput {
        let Some((output, inputs)) = command.args.split_last() else {
            return failure("sox needs an output file");
        };
        let mut merged = Vec::new();
        for input in inputs {
            match tokio::fs::read(input).await {
                Ok(bytes) => merged.extend(bytes),
                Err(e) => return failure(&format!("{}: {}", input, e)),
            }
        }
        write_output(Path::new(output), &merged).await
    }

    fn osascript(&self, command: &CommandSpec) -> CommandOutput {
        if command.args.iter().any(|a| a.contains("output volume of")) {
            ok(&format!("{}\n", SCRIPTED_VOLUME))
        } else if command.args.iter().any(|a| a.contains("output muted of")) {
            ok("false\n")
        } else {
            ok("")
        }
    }
}

#[async_trait]
impl CommandRunnerPort for ScriptedCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError> {
        if self.missing_programs.contains(&command.program) {
            return Err(CommandError::NotFound(command.program.clone()));
        }
        self.record(command);

        let is_concat = command.program == "ffmpeg" && command.args.iter().any(|a| a == "concat");

        if self.failing_programs.contains(&command.program) {
            // 模拟进程中途退出留下的半成品
            if is_concat {
                if let Some(output) = arg_after(command, "copy") {
                    let _ = tokio::fs::write(output, b"partial").await;
                }
            }
            return Ok(failure("scripted failure"));
        }

        if let Some(media) = flag_value(command, "--write-media=") {
            return Ok(self.synthesize(command, &media).await);
        }

        let output = match command.program.as_str() {
            "ffmpeg" if is_concat => self.ffmpeg_concat(command).await,
            "ffmpeg" if command.args.iter().any(|a| a == "lavfi") => {
                self.ffmpeg_silence(command).await
            }
            "sox" => self.sox(command).await,
            "osascript" => self.osascript(command),
            _ => ok(""),
        };
        Ok(output)
    }
}

fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn failure(stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

async fn write_output(path: &Path, bytes: &[u8]) -> CommandOutput {
    match tokio::fs::write(path, bytes).await {
        Ok(()) => ok(""),
        Err(e) => failure(&e.to_string()),
    }
}

fn flag_value(command: &CommandSpec, prefix: &str) -> Option<String> {
    command
        .args
        .iter()
        .find_map(|a| a.strip_prefix(prefix))
        .map(str::to_string)
}

fn arg_after<'a>(command: &'a CommandSpec, flag: &str) -> Option<&'a str> {
    command
        .args
        .iter()
        .position(|a| a == flag)
        .and_then(|i| command.args.get(i + 1))
        .map(String::as_str)
}

/// 解析 ffmpeg concat 清单中的 `file '...'` 行
fn manifest_entries(listing: &str) -> Vec<PathBuf> {
    listing
        .lines()
        .filter_map(|line| line.trim().strip_prefix("file "))
        .map(|quoted| {
            let inner = quoted
                .trim()
                .strip_prefix('\'')
                .and_then(|q| q.strip_suffix('\''))
                .unwrap_or(quoted);
            PathBuf::from(inner.replace("'\\''", "'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_records_and_fakes_synthesis() {
        let dir = tempdir().unwrap();
        let media = dir.path().join("a.mp3");
        let runner = ScriptedCommandRunner::new();

        let output = runner
            .run(&CommandSpec::new("edge-tts").args([
                "--voice=v1".to_string(),
                "--text=hi".to_string(),
                format!("--write-media={}", media.display()),
            ]))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(std::fs::read_to_string(media).unwrap(), "[v1:hi]");
        assert_eq!(runner.count_for("edge-tts"), 1);
    }

    #[tokio::test]
    async fn test_missing_program_not_recorded() {
        let runner = ScriptedCommandRunner::new().missing_program("sox");
        let err = runner.run(&CommandSpec::new("sox")).await.unwrap_err();
        assert!(matches!(err, CommandError::NotFound(_)));
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn test_manifest_entries_unescape_quotes() {
        let entries = manifest_entries("file '/a/b.mp3'\nfile '/a/it'\\''s.mp3'\n");
        assert_eq!(
            entries,
            vec![PathBuf::from("/a/b.mp3"), PathBuf::from("/a/it's.mp3")]
        );
    }
}

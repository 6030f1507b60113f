//! Command Runner Port - 外部进程调用抽象
//!
//! 合成、拼接、播放、音量控制都通过这一个窄接口调用外部程序，
//! 测试时替换为脚本化实现

use async_trait::async_trait;
use thiserror::Error;

/// 进程调用错误（进程没能正常启动）
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Program not found: {0}")]
    NotFound(String),

    #[error("Failed to run {program}: {message}")]
    SpawnFailed { program: String, message: String },
}

/// 待执行的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// 命令行形式，仅用于日志
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 进程退出结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 退出码，被信号终止时为 None
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stderr 的精简形式，用于错误信息
    pub fn diagnostic(&self) -> String {
        self.stderr.trim().to_string()
    }
}

/// Command Runner Port
///
/// 阻塞直到子进程退出
#[async_trait]
pub trait CommandRunnerPort: Send + Sync {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

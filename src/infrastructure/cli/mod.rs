//! CLI - 命令行入口
//!
//! 参数解析（clap）与命令分发

mod args;
mod dispatch;

pub use args::{Cli, Commands, MergeArgs, MergeMethodArg, PlayArgs, SpeakArgs, VolumeCommand};
pub use dispatch::{apply_overrides, AppServices};

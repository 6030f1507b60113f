//! 应用层 - 命令
//!
//! 每个命令对应一个 Handler

mod merge_commands;
mod playback_commands;
mod speak_commands;

pub mod handlers;

pub use merge_commands::*;
pub use playback_commands::*;
pub use speak_commands::*;

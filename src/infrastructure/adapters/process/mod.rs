//! Process Adapter - 外部进程执行

mod process_runner;
mod scripted_runner;

pub use process_runner::ProcessCommandRunner;
pub use scripted_runner::ScriptedCommandRunner;

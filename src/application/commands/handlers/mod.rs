//! Command Handlers 实现

mod merge_handlers;
mod playback_handlers;
mod speak_handlers;

pub use merge_handlers::*;
pub use playback_handlers::*;
pub use speak_handlers::*;

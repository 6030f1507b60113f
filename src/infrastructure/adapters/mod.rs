//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod concat;
pub mod playback;
pub mod process;
pub mod tts;

pub use concat::*;
pub use playback::*;
pub use process::*;
pub use tts::*;

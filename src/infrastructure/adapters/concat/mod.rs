//! Concat Adapter - 音频拼接实现

mod ffmpeg_concat;
mod sox_concat;

pub use ffmpeg_concat::FfmpegConcat;
pub use sox_concat::SoxConcat;

//! Merge Commands

use std::path::PathBuf;

/// 待拼接文件来源
#[derive(Debug, Clone)]
pub enum MergeSource {
    Files(Vec<PathBuf>),
    /// 播放列表文件（ffmpeg concat 格式或每行一个路径）
    Playlist(PathBuf),
}

/// 拼接方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMethod {
    #[default]
    Ffmpeg,
    Sox,
}

/// 拼接音频命令
#[derive(Debug, Clone)]
pub struct MergeAudio {
    pub source: MergeSource,
    pub output: PathBuf,
    /// 文件之间插入的静音时长（秒）
    pub pause_secs: f64,
    pub method: MergeMethod,
}

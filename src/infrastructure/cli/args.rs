//! 命令行参数定义

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::commands::{
    MergeAudio, MergeMethod, MergeSource, PlayAudio, SpeakCommand, VolumeAction,
};
use crate::application::pipeline::SpeechInput;
use crate::application::ports::ProsodyOptions;
use crate::domain::VoiceOverrides;

/// mixtts - 中英文混合文本转语音
#[derive(Parser, Debug)]
#[command(name = "mixtts")]
#[command(version, about = "Mixed Chinese/English text-to-speech")]
#[command(long_about = "
Splits mixed Chinese/English text into single-language runs, synthesizes each
run with a voice for its language, and merges the results into one audio file.

Examples:
  # Speak mixed text with the default voices
  mixtts speak --text \"Hello 你好 world\" --play

  # Save to a file with custom voices
  mixtts speak --text \"今天天气 is great\" --voice-zh zh-CN-YunxiNeural -o out.mp3

  # Merge existing files with a half-second pause
  mixtts merge a.mp3 b.mp3 -o merged.mp3 --pause 0.5
")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize speech from mixed-language text
    Speak(SpeakArgs),

    /// Merge existing audio files into one
    Merge(MergeArgs),

    /// Play an audio file
    Play(PlayArgs),

    /// Get or change the system output volume
    Volume {
        #[command(subcommand)]
        action: Option<VolumeCommand>,
    },

    /// Stop all audio playback
    Stop,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["text", "ssml"])))]
pub struct SpeakArgs {
    /// Text to speak (Chinese, English or mixed)
    #[arg(short, long, allow_hyphen_values = true)]
    pub text: Option<String>,

    /// SSML markup, sent to the backend as a single unit
    #[arg(long)]
    pub ssml: Option<String>,

    /// Output audio file path (a temporary file is used if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Play the audio after synthesis
    #[arg(short, long)]
    pub play: bool,

    /// Voice for all languages
    #[arg(long)]
    pub voice: Option<String>,

    /// Voice for English runs
    #[arg(long)]
    pub voice_en: Option<String>,

    /// Voice for Chinese runs
    #[arg(long)]
    pub voice_zh: Option<String>,

    /// Number of times to play
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub loops: u32,

    /// Playback volume (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,

    /// Speech rate adjustment in percent, e.g. 20 or -10
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<i32>,

    /// Pitch adjustment in Hz, e.g. 5 or -5
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<i32>,
}

impl SpeakArgs {
    pub fn into_command(self) -> SpeakCommand {
        let input = match (self.ssml, self.text) {
            (Some(markup), _) => SpeechInput::Markup(markup),
            (None, text) => SpeechInput::Text(text.unwrap_or_default()),
        };
        SpeakCommand {
            input,
            output: self.output,
            play: self.play,
            voices: VoiceOverrides {
                global: self.voice,
                en: self.voice_en,
                zh: self.voice_zh,
            },
            loops: self.loops,
            volume: self.volume,
            prosody: ProsodyOptions {
                rate: self.rate,
                pitch: self.pitch,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MergeMethodArg {
    /// Lossless container-level concat (supports pauses)
    #[default]
    Ffmpeg,
    /// Re-encoding concat with SoX
    Sox,
}

impl From<MergeMethodArg> for MergeMethod {
    fn from(arg: MergeMethodArg) -> Self {
        match arg {
            MergeMethodArg::Ffmpeg => MergeMethod::Ffmpeg,
            MergeMethodArg::Sox => MergeMethod::Sox,
        }
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["files", "playlist"])))]
pub struct MergeArgs {
    /// Audio files to merge, in order
    pub files: Vec<PathBuf>,

    /// Playlist file (one path per line, or ffmpeg `file '...'` lines)
    #[arg(short = 'l', long)]
    pub playlist: Option<PathBuf>,

    /// Output audio file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Pause between files in seconds (ffmpeg only)
    #[arg(long, default_value_t = 0.0)]
    pub pause: f64,

    /// Merge method
    #[arg(long, value_enum, default_value_t = MergeMethodArg::Ffmpeg)]
    pub method: MergeMethodArg,
}

impl MergeArgs {
    pub fn into_command(self) -> MergeAudio {
        let source = match self.playlist {
            Some(playlist) => MergeSource::Playlist(playlist),
            None => MergeSource::Files(self.files),
        };
        MergeAudio {
            source,
            output: self.output,
            pause_secs: self.pause,
            method: self.method.into(),
        }
    }
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Audio file to play
    pub path: PathBuf,

    /// Number of times to play
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub loops: u32,

    /// Playback volume (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,
}

impl PlayArgs {
    pub fn into_command(self) -> PlayAudio {
        PlayAudio {
            path: self.path,
            loops: self.loops,
            volume: self.volume,
        }
    }
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum VolumeCommand {
    /// Show the current volume and mute state
    Get,
    /// Set the output volume (0-100)
    Set {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },
    /// Mute system output
    Mute,
    /// Unmute system output
    Unmute,
}

impl From<VolumeCommand> for VolumeAction {
    fn from(command: VolumeCommand) -> Self {
        match command {
            VolumeCommand::Get => VolumeAction::Get,
            VolumeCommand::Set { level } => VolumeAction::Set(level),
            VolumeCommand::Mute => VolumeAction::Mute,
            VolumeCommand::Unmute => VolumeAction::Unmute,
        }
    }
}

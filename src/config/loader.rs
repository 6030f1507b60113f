//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 命令行参数（由 CLI 层覆盖）
//! 2. 环境变量
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, SynthesisBackendKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "MIXTTS";

/// 加载应用配置
///
/// # 环境变量示例
/// - `MIXTTS_VOICES__ZH=zh-CN-YunxiNeural`
/// - `MIXTTS_SYNTHESIS__BACKEND=http`
/// - `MIXTTS_SYNTHESIS__HTTP_URL=http://tts-server:8000`
/// - `MIXTTS_STORAGE__SCRATCH_DIR=/var/tmp/mixtts`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("synthesis.backend", "command")?
        .set_default("synthesis.program", "edge-tts")?
        .set_default("synthesis.timeout_secs", 120)?
        .set_default("concat.program", "ffmpeg")?
        .set_default("concat.sox_program", "sox")?
        .set_default("playback.player", "afplay")?
        .set_default("playback.volume_program", "osascript")?
        .set_default("playback.stop_program", "pkill")?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量，例如 MIXTTS_CONCAT__PROGRAM=/opt/bin/ffmpeg
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let voices = [
        ("voices.en", &config.voices.en),
        ("voices.zh", &config.voices.zh),
        ("voices.default", &config.voices.default),
    ];
    for (key, value) in voices {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                key
            )));
        }
    }

    let programs = [
        ("synthesis.program", &config.synthesis.program),
        ("concat.program", &config.concat.program),
        ("concat.sox_program", &config.concat.sox_program),
        ("playback.player", &config.playback.player),
        ("playback.volume_program", &config.playback.volume_program),
        ("playback.stop_program", &config.playback.stop_program),
    ];
    for (key, value) in programs {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                key
            )));
        }
    }

    if config.synthesis.backend == SynthesisBackendKind::Http
        && config.synthesis.http_url.trim().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "synthesis.http_url is required for the http backend".to_string(),
        ));
    }

    if config.synthesis.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "synthesis.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印生效配置（debug 级别）
pub fn print_config(config: &AppConfig) {
    tracing::debug!("=== Application Configuration ===");
    tracing::debug!(
        "Voices: en={} zh={} default={}",
        config.voices.en,
        config.voices.zh,
        config.voices.default
    );
    tracing::debug!("Synthesis Backend: {}", config.synthesis.backend);
    match config.synthesis.backend {
        SynthesisBackendKind::Command => {
            tracing::debug!("Synthesis Program: {}", config.synthesis.program)
        }
        SynthesisBackendKind::Http => {
            tracing::debug!("Synthesis URL: {}", config.synthesis.http_url);
            tracing::debug!("Synthesis Timeout: {}s", config.synthesis.timeout_secs);
        }
    }
    tracing::debug!(
        "Concat: {} (sox: {})",
        config.concat.program,
        config.concat.sox_program
    );
    tracing::debug!(
        "Playback: {} (volume: {})",
        config.playback.player,
        config.playback.volume_program
    );
    match &config.storage.scratch_dir {
        Some(dir) => tracing::debug!("Scratch Directory: {:?}", dir),
        None => tracing::debug!("Scratch Directory: <system temp>"),
    }
    tracing::debug!("Log Level: {}", config.log.level);
    tracing::debug!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.voices.en, "en-US-JennyNeural");
        assert_eq!(config.voices.zh, "zh-CN-XiaoxiaoNeural");
        assert_eq!(config.synthesis.backend, SynthesisBackendKind::Command);
        assert_eq!(config.synthesis.program, "edge-tts");
        assert_eq!(config.concat.program, "ffmpeg");
        assert!(config.storage.scratch_dir.is_none());
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_voice() {
        let mut config = AppConfig::default();
        config.voices.zh = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("voices.zh"));
    }

    #[test]
    fn test_validation_error_for_empty_program() {
        let mut config = AppConfig::default();
        config.concat.program = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_requires_url_for_http_backend() {
        let mut config = AppConfig::default();
        config.synthesis.backend = SynthesisBackendKind::Http;
        assert!(validate_config(&config).is_ok());
        config.synthesis.http_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.synthesis.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[voices]\nzh = \"zh-CN-YunxiNeural\"\n\n[synthesis]\nbackend = \"http\"\nhttp_url = \"http://tts:9000\"\n\n[storage]\nscratch_dir = \"/var/tmp/mixtts\""
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.voices.zh, "zh-CN-YunxiNeural");
        assert_eq!(config.voices.en, "en-US-JennyNeural");
        assert_eq!(config.synthesis.backend, SynthesisBackendKind::Http);
        assert_eq!(config.synthesis.http_url, "http://tts:9000");
        assert_eq!(
            config.storage.scratch_dir,
            Some(std::path::PathBuf::from("/var/tmp/mixtts"))
        );
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_config_from_path(Some(Path::new("/no/such/mixtts.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}

//! HTTP TTS Client - 调用外部 TTS HTTP 服务
//!
//! 实现 SynthesisBackendPort trait，通过 HTTP 调用外部合成服务
//!
//! 外部 TTS API:
//! POST {base_url}/api/tts/synthesize
//! Request: {"text": "...", "voice": "...", "rate": 10, "pitch": -2}  (JSON)
//! Response: 音频二进制

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::application::ports::{SynthesisBackendPort, SynthesisError, SynthesisRequest};

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest<'a> {
    text: &'a str,
    voice: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pitch: Option<i32>,
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn synthesize_url(&self) -> String {
        format!(
            "{}/api/tts/synthesize",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl SynthesisBackendPort for HttpTtsClient {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError> {
        let body = TtsHttpRequest {
            text: &request.text,
            voice: &request.voice,
            rate: request.prosody.rate,
            pitch: request.prosody.pitch,
        };

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = request.text.len(),
            voice = %request.voice,
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(self.synthesize_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else if e.is_connect() {
                    SynthesisError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    SynthesisError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::ServiceError(format!("Failed to read audio: {}", e)))?;

        if audio_data.is_empty() {
            return Err(SynthesisError::ServiceError(
                "TTS service returned empty audio".to_string(),
            ));
        }

        tokio::fs::write(output_path, &audio_data)
            .await
            .map_err(|e| SynthesisError::IoError(e.to_string()))?;

        tracing::debug!(
            audio_size = audio_data.len(),
            path = %output_path.display(),
            "TTS synthesis completed"
        );

        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ProsodyOptions;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// 单次应答的本地 HTTP 服务，返回收到的原始请求
    async fn serve_once(status: &'static str, body: &'static [u8]) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if request_complete(&received) {
                    break;
                }
            }

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: audio/mpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&received).into_owned()
        });

        (base_url, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    fn hello_request() -> SynthesisRequest {
        SynthesisRequest {
            text: "hello".to_string(),
            voice: "en-US-JennyNeural".to_string(),
            prosody: ProsodyOptions {
                rate: Some(10),
                pitch: None,
            },
        }
    }

    #[test]
    fn test_config_default() {
        let config = HttpTtsClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpTtsClientConfig::new("http://example.com:9000").with_timeout(60);
        assert_eq!(config.base_url, "http://example.com:9000");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = HttpTtsClient::new(HttpTtsClientConfig::new("http://tts.local/")).unwrap();
        assert_eq!(client.synthesize_url(), "http://tts.local/api/tts/synthesize");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a.mp3");
        let client =
            HttpTtsClient::new(HttpTtsClientConfig::new("http://127.0.0.1:1").with_timeout(5))
                .unwrap();

        let result = client
            .synthesize(
                &SynthesisRequest {
                    text: "hello".to_string(),
                    voice: "en-US-JennyNeural".to_string(),
                    prosody: ProsodyOptions::default(),
                },
                &out,
            )
            .await;

        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_success_writes_response_bytes() {
        let (base_url, server) = serve_once("200 OK", b"ID3-AUDIO").await;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("segment_000.mp3");

        let client = HttpTtsClient::new(HttpTtsClientConfig::new(base_url).with_timeout(5)).unwrap();
        client.synthesize(&hello_request(), &out).await.unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"ID3-AUDIO");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/tts/synthesize "));
        assert!(raw.contains("\"voice\":\"en-US-JennyNeural\""));
        assert!(raw.contains("\"rate\":10"));
        assert!(!raw.contains("\"pitch\""));
    }

    #[tokio::test]
    async fn test_server_error_is_service_error() {
        let (base_url, server) = serve_once("500 Internal Server Error", b"engine down").await;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("segment_000.mp3");

        let client = HttpTtsClient::new(HttpTtsClientConfig::new(base_url).with_timeout(5)).unwrap();
        let err = client.synthesize(&hello_request(), &out).await.unwrap_err();

        assert!(matches!(err, SynthesisError::ServiceError(ref m) if m.contains("500") && m.contains("engine down")));
        assert!(!out.exists());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_body_is_service_error() {
        let (base_url, server) = serve_once("200 OK", b"").await;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("segment_000.mp3");

        let client = HttpTtsClient::new(HttpTtsClientConfig::new(base_url).with_timeout(5)).unwrap();
        let err = client.synthesize(&hello_request(), &out).await.unwrap_err();

        assert!(matches!(err, SynthesisError::ServiceError(ref m) if m.contains("empty audio")));
        assert!(!out.exists());
        server.await.unwrap();
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::errors::{AppError, AppResult};

pub const MAX_FRAME_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    pub captured_at: DateTime<Utc>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Something a frame analyzer considered suspicious.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameFinding {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl FrameFinding {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            confidence: None,
        }
    }
}

/// Handle on a candidate's camera stream.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn latest_frame(&self) -> Option<CapturedFrame>;
    /// Stops the stream. Idempotent.
    async fn release(&self);
    fn is_released(&self) -> bool;
}

/// Camera stream fed by frames the browser uploads. Only the most recent
/// frame is kept; sampling reads whatever is current at tick time.
#[derive(Default)]
pub struct UploadedFrameSource {
    latest: Mutex<Option<CapturedFrame>>,
    released: AtomicBool,
}

impl UploadedFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, frame: CapturedFrame) -> AppResult<()> {
        if self.is_released() {
            return Err(AppError::InvalidState(
                "camera stream has been released".to_string(),
            ));
        }
        if frame.data.is_empty() {
            return Err(AppError::ValidationError("frame is empty".to_string()));
        }
        if frame.data.len() > MAX_FRAME_BYTES {
            return Err(AppError::ValidationError(format!(
                "frame is {} bytes, limit is {}",
                frame.data.len(),
                MAX_FRAME_BYTES
            )));
        }

        *self.latest.lock().await = Some(frame);
        Ok(())
    }
}

#[async_trait]
impl FrameSource for UploadedFrameSource {
    async fn latest_frame(&self) -> Option<CapturedFrame> {
        if self.is_released() {
            return None;
        }
        self.latest.lock().await.take()
    }

    async fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.latest.lock().await.take();
    }

    fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameAnalyzer: Send + Sync {
    async fn analyze(&self, frame: &CapturedFrame) -> AppResult<Option<FrameFinding>>;
}

/// Used when no anomaly-detection service is configured. Never flags.
pub struct DisabledFrameAnalyzer;

#[async_trait]
impl FrameAnalyzer for DisabledFrameAnalyzer {
    async fn analyze(&self, _frame: &CapturedFrame) -> AppResult<Option<FrameFinding>> {
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzerResponse {
    anomaly: bool,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
}

/// Posts raw frames to an external anomaly-detection service.
pub struct HttpFrameAnalyzer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFrameAnalyzer {
    pub fn new(endpoint: &str) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(4))
            .build()
            .map_err(|e| AppError::InternalError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl FrameAnalyzer for HttpFrameAnalyzer {
    async fn analyze(&self, frame: &CapturedFrame) -> AppResult<Option<FrameFinding>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, frame.content_type.as_str())
            .header("x-captured-at", frame.captured_at.to_rfc3339())
            .body(frame.data.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamError(format!(
                "frame analyzer returned {}",
                status
            )));
        }

        let body: AnalyzerResponse = response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(format!("frame analyzer response: {}", e)))?;

        Ok(body.anomaly.then(|| FrameFinding {
            detail: body
                .detail
                .unwrap_or_else(|| "Frame analyzer reported an anomaly".to_string()),
            confidence: body.confidence,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(bytes: usize) -> CapturedFrame {
        CapturedFrame {
            captured_at: Utc::now(),
            content_type: "image/jpeg".to_string(),
            data: vec![0xFF; bytes],
        }
    }

    #[tokio::test]
    async fn uploaded_source_keeps_only_latest_frame() {
        let source = UploadedFrameSource::new();
        source.push(frame(10)).await.expect("push");
        source.push(frame(20)).await.expect("push");

        let sampled = source.latest_frame().await.expect("frame available");
        assert_eq!(sampled.data.len(), 20);
        assert!(source.latest_frame().await.is_none());
    }

    #[tokio::test]
    async fn released_source_rejects_frames() {
        let source = UploadedFrameSource::new();
        source.push(frame(10)).await.expect("push");
        source.release().await;
        source.release().await;

        assert!(source.is_released());
        assert!(source.latest_frame().await.is_none());
        assert!(matches!(
            source.push(frame(10)).await,
            Err(AppError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn oversized_and_empty_frames_are_rejected() {
        let source = UploadedFrameSource::new();
        assert!(matches!(
            source.push(frame(0)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            source.push(frame(MAX_FRAME_BYTES + 1)).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn disabled_analyzer_never_flags() {
        let finding = DisabledFrameAnalyzer
            .analyze(&frame(10))
            .await
            .expect("analysis");
        assert!(finding.is_none());
    }

    #[test]
    fn analyzer_response_defaults_optional_fields() {
        let parsed: AnalyzerResponse =
            serde_json::from_str(r#"{"anomaly": false}"#).expect("parse");
        assert!(!parsed.anomaly);
        assert!(parsed.detail.is_none());
    }
}

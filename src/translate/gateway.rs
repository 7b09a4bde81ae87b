use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// One outbound translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(rename = "targetLang")]
    pub target_lang: String,
    pub id: Uuid,
}

/// A gateway reply carrying either a translation or an error
///
/// Errors and missing text are non-fatal: the caption stays untranslated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateReply {
    pub id: Uuid,
    #[serde(rename = "translatedText", skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslateReply {
    pub fn ok(id: Uuid, translated_text: impl Into<String>) -> Self {
        Self {
            id,
            translated_text: Some(translated_text.into()),
            error: None,
        }
    }

    pub fn failed(id: Uuid, error: impl Into<String>) -> Self {
        Self {
            id,
            translated_text: None,
            error: Some(error.into()),
        }
    }
}

/// Hand-off point to the process that actually talks to the translation
/// vendor
///
/// Dispatch is fire-and-forget: `translate` returns once the request has been
/// handed over, and the eventual [`TranslateReply`] arrives through the
/// session's event channel whenever the host delivers it. The vendor call,
/// its credentials, and its retry policy all live on the host side.
#[async_trait::async_trait]
pub trait TranslationGateway: Send + Sync {
    async fn translate(&self, request: TranslateRequest) -> Result<()>;

    /// Gateway name for logging
    fn name(&self) -> &str;
}

/// Gateway that forwards requests over a channel to the surrounding host
///
/// The in-process analog of a background message port: the host consumes
/// requests from the paired receiver and pushes replies back into the
/// session.
pub struct ChannelGateway {
    requests: mpsc::Sender<TranslateRequest>,
}

impl ChannelGateway {
    /// Create a gateway and the receiver the host services
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<TranslateRequest>) {
        let (requests, rx) = mpsc::channel(capacity);
        (Self { requests }, rx)
    }
}

#[async_trait::async_trait]
impl TranslationGateway for ChannelGateway {
    async fn translate(&self, request: TranslateRequest) -> Result<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| anyhow!("translation host is gone"))
    }

    fn name(&self) -> &str {
        "channel"
    }
}

//! Discovery-call requests: the free intro call form.

use crate::coach::CoachId;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::i18n::{translate, Language};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Path of the discovery-call endpoint under the API base URL.
pub const DISCOVERY_CALL_PATH: &str = "/api/discovery-call";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryCallRequest {
    pub coach_id: CoachId,
    pub client_name: String,
    pub client_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_message: Option<String>,
    pub time_preference: String,
}

#[derive(Debug, Deserialize)]
struct DiscoveryCallResponse {
    success: bool,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl DiscoveryCallRequest {
    /// Check required fields, with messages in the user's language.
    /// Optional fields that are blank are dropped.
    pub fn validate(mut self, language: Language) -> AppResult<Self> {
        let fail = |key: &str| Err(AppError::Validation(translate(language, key)));

        if matches!(&self.coach_id, CoachId::Text(s) if s.trim().is_empty()) {
            return fail("discovery.coach_required");
        }
        if self.client_name.trim().is_empty() {
            return fail("discovery.name_required");
        }
        if self.client_phone.trim().is_empty() {
            return fail("discovery.phone_required");
        }
        if self.time_preference.trim().is_empty() {
            return fail("discovery.time_required");
        }

        self.client_email = self
            .client_email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        if let Some(email) = &self.client_email {
            if !looks_like_email(email) {
                return fail("discovery.email_invalid");
            }
        }

        self.client_message = self
            .client_message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        self.client_name = self.client_name.trim().to_string();
        self.client_phone = self.client_phone.trim().to_string();

        Ok(self)
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    client: reqwest::Client,
    endpoint: String,
}

impl DiscoveryClient {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", api_base_url.trim_end_matches('/'), DISCOVERY_CALL_PATH),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_base_url)
    }

    /// Validate and submit. A single attempt; failures are for the UI to show.
    pub async fn submit(&self, request: DiscoveryCallRequest, language: Language) -> AppResult<()> {
        let request = request.validate(language)?;

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let parsed: Option<DiscoveryCallResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(DiscoveryCallResponse { success: true, .. }) if status.is_success() => {
                info!("Discovery call requested for coach {}", request.coach_id);
                Ok(())
            }
            Some(DiscoveryCallResponse { error, .. }) => {
                let message = error
                    .map(|e| e.message)
                    .unwrap_or_else(|| format!("request rejected ({})", status));
                warn!("Discovery call for coach {} failed: {}", request.coach_id, message);
                Err(AppError::Remote(message))
            }
            None => {
                warn!("Discovery call endpoint returned {}: {}", status, body);
                Err(AppError::Remote(format!("unexpected response ({})", status)))
            }
        }
    }
}

//! Explanation-service client.
//!
//! Turns the current metrics record into a natural-language analysis
//! prompt and sends it to a generative-language API. The prompt covers
//! five fixed discussion points: far-from-equilibrium framing, heat
//! flux, gradient meaning, entropy production, and emergent structure.
//!
//! Degrade path: with no API key configured, [`ExplainClient::request_explanation`]
//! returns a fixed advisory string synchronously and performs no
//! network I/O. An attempted request that fails collapses into the
//! generic [`ExplainError`] with the cause logged - the caller displays,
//! never retries.
//!
//! The call blocks and may be slow; hosts run it off the tick thread,
//! at most one request in flight per session (disable the trigger until
//! the previous call resolves). A failed call leaves simulation state
//! untouched - the client never holds references into the steppers.

use crate::error::ExplainError;
use crate::metrics::SimulationData;
use crate::params::SimulationParams;
use log::{debug, warn};
use serde_json::json;
use std::time::Duration;

/// Environment variable holding the service API key.
pub const API_KEY_ENV: &str = "FLUXSIM_API_KEY";

/// Fixed advisory returned when no credential is configured.
pub const ADVISORY_NO_CREDENTIAL: &str = "Live analysis is unavailable because no \
explanation-service API key is configured. Set FLUXSIM_API_KEY to enable narrated \
thermodynamic analysis of the running simulation.";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection settings for the explanation service.
#[derive(Clone, Debug)]
pub struct ExplainConfig {
    /// API key; `None` selects the advisory degrade path.
    pub api_key: Option<String>,
    /// Base endpoint URL, without a trailing slash.
    pub endpoint: String,
    /// Model name appended to the endpoint.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ExplainConfig {
    /// Read the key from [`API_KEY_ENV`], defaults for everything else.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }

    /// Set an explicit API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the endpoint (self-hosted gateways, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Blocking client for explanation requests.
pub struct ExplainClient {
    config: ExplainConfig,
    http: reqwest::blocking::Client,
}

impl ExplainClient {
    /// Build a client. Fails only if the HTTP stack cannot initialize.
    pub fn new(config: ExplainConfig) -> Result<Self, ExplainError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// Whether a credential is configured (lets a UI gray out its trigger).
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Request a plain-text explanation of the current simulation state.
    pub fn request_explanation(
        &self,
        params: &SimulationParams,
        data: &SimulationData,
    ) -> Result<String, ExplainError> {
        let Some(api_key) = &self.config.api_key else {
            debug!("explanation request skipped: no API key configured");
            return Ok(ADVISORY_NO_CREDENTIAL.to_string());
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, api_key
        );
        let body = json!({
            "contents": [{
                "parts": [{ "text": build_prompt(params, data) }]
            }]
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("explanation request failed: {e}");
                ExplainError::from(e)
            })?;

        let payload: serde_json::Value = response.json().map_err(|e| {
            warn!("explanation response unreadable: {e}");
            ExplainError::from(e)
        })?;

        match extract_text(&payload) {
            Some(text) => Ok(text),
            None => {
                warn!("explanation response carried no generated text");
                Err(ExplainError::Malformed(
                    "response carried no generated text".into(),
                ))
            }
        }
    }
}

/// Concatenate the text parts of the first candidate, if any.
fn extract_text(payload: &serde_json::Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Format the analysis prompt from a metrics record.
///
/// Numeric fields are rendered to 4 decimal places so the prompt is
/// stable and compact regardless of raw float noise.
pub fn build_prompt(params: &SimulationParams, data: &SimulationData) -> String {
    let gradient = data
        .temperature_gradient
        .iter()
        .map(|g| format!("{g:.4}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are observing a real-time simulation of a gas in a box with a hot wall \
and a cold wall, a classic driven dissipative system.\n\
\n\
Current measurements:\n\
- Particle count: {count}\n\
- Heat input level: {heat:.4}\n\
- System state classification: {state}\n\
- Entropy production estimate: {entropy:.4}\n\
- Temperature gradient, cold wall to hot wall: [{gradient}]\n\
\n\
In plain language accessible to a non-physicist, discuss:\n\
1. Why this system is far from thermodynamic equilibrium.\n\
2. The flux of heat from the hot wall through the gas to the cold wall.\n\
3. What the temperature gradient reveals about how energy is distributed.\n\
4. What the entropy production estimate says about irreversibility.\n\
5. Any emergent structure or self-organization these numbers suggest.",
        count = params.particle_count,
        heat = params.heat,
        state = data.system_state,
        entropy = data.entropy_production,
        gradient = gradient,
    )
}

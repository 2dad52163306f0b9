//! OCR client abstraction and the Baidu implementation.
//!
//! [`BaiduOcrClient`] talks to the public REST API: it trades the API key
//! and secret for an OAuth access token once, then posts base64-encoded
//! images to the recognition endpoints.

use std::cell::RefCell;
use std::time::Duration;

use base64::Engine;
use serde_json::Value;

use super::credentials::OcrCredentials;
use crate::error::{Error, Result};

pub const DEFAULT_TOKEN_URL: &str = "https://aip.baidubce.com/oauth/2.0/token";
pub const DEFAULT_API_BASE: &str = "https://aip.baidubce.com/rest/2.0/ocr/v1";

/// Recognition endpoints used by the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrEndpoint {
    /// General text recognition, high-accuracy edition
    AccurateBasic,
    /// General text recognition, standard edition
    GeneralBasic,
}

impl OcrEndpoint {
    /// Path segment under the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            OcrEndpoint::AccurateBasic => "accurate_basic",
            OcrEndpoint::GeneralBasic => "general_basic",
        }
    }
}

/// Sends one image to an OCR service and returns its JSON answer.
pub trait OcrClient {
    /// Recognize text in an encoded image (PNG, JPEG, ...).
    ///
    /// A vendor error payload is returned as [`Error::Ocr`].
    fn recognize(&self, endpoint: OcrEndpoint, image: &[u8]) -> Result<Value>;
}

/// Options for OCR requests and batch output.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Ask the service to detect image orientation
    pub detect_direction: bool,

    /// Ask for per-line confidence values
    pub probability: bool,

    /// Ask the service to detect the text language
    pub detect_language: bool,

    /// Recognized lines printed per image
    pub preview_lines: usize,

    /// OAuth token endpoint
    pub token_url: String,

    /// Base URL of the recognition endpoints
    pub api_base: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl OcrOptions {
    /// Create new OCR options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of preview lines.
    pub fn with_preview_lines(mut self, lines: usize) -> Self {
        self.preview_lines = lines;
        self
    }

    /// Point the client at another token endpoint and API base.
    pub fn with_endpoints(mut self, token_url: impl Into<String>, api_base: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.api_base = api_base.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Form fields sent with every recognition request.
    pub fn request_fields(&self) -> Vec<(&'static str, &'static str)> {
        let flag = |on: bool| if on { "true" } else { "false" };
        vec![
            ("detect_direction", flag(self.detect_direction)),
            ("probability", flag(self.probability)),
            ("detect_language", flag(self.detect_language)),
        ]
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            detect_direction: true,
            probability: true,
            detect_language: true,
            preview_lines: 10,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking client for the Baidu OCR REST API.
pub struct BaiduOcrClient {
    http: reqwest::blocking::Client,
    credentials: OcrCredentials,
    options: OcrOptions,
    token: RefCell<Option<String>>,
}

impl BaiduOcrClient {
    pub fn new(credentials: OcrCredentials, options: OcrOptions) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            http,
            credentials,
            options,
            token: RefCell::new(None),
        })
    }

    /// Options in use.
    pub fn options(&self) -> &OcrOptions {
        &self.options
    }

    /// Fetch (once) and return the OAuth access token.
    pub fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.borrow().as_ref() {
            return Ok(token.clone());
        }

        let response: Value = self
            .http
            .post(&self.options.token_url)
            .query(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.api_key.as_str()),
                ("client_secret", self.credentials.secret_key.as_str()),
            ])
            .send()?
            .json()?;

        let token = parse_token_response(&response)?;
        log::debug!("obtained OCR access token for app {}", self.credentials.app_id);
        *self.token.borrow_mut() = Some(token.clone());
        Ok(token)
    }
}

impl OcrClient for BaiduOcrClient {
    fn recognize(&self, endpoint: OcrEndpoint, image: &[u8]) -> Result<Value> {
        let token = self.access_token()?;
        let url = format!(
            "{}/{}",
            self.options.api_base.trim_end_matches('/'),
            endpoint.path()
        );

        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let mut form: Vec<(&str, &str)> = vec![("image", encoded.as_str())];
        form.extend(self.options.request_fields());

        let response = self
            .http
            .post(&url)
            .query(&[("access_token", token.as_str())])
            .form(&form)
            .send()?;
        let status_error = response.error_for_status_ref().err();
        let body = response.bytes()?;

        decode_response(&body, status_error)
    }
}

/// Decode a recognition answer.
///
/// A vendor `error_code` payload wins over the HTTP status, so error
/// bodies sent with a non-2xx status still become [`Error::Ocr`].
pub fn decode_response<E>(body: &[u8], status_error: Option<E>) -> Result<Value>
where
    E: Into<Error>,
{
    match (serde_json::from_slice::<Value>(body), status_error) {
        (Ok(value), _) if value.get("error_code").is_some() => check_response(value),
        (Ok(value), None) => Ok(value),
        (_, Some(e)) => Err(e.into()),
        (Err(e), None) => Err(e.into()),
    }
}

/// Pull the access token out of a token endpoint answer.
pub fn parse_token_response(response: &Value) -> Result<String> {
    if let Some(token) = response.get("access_token").and_then(Value::as_str) {
        return Ok(token.to_string());
    }
    let error = response
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown_error");
    let description = response
        .get("error_description")
        .and_then(Value::as_str)
        .unwrap_or("no description");
    Err(Error::Auth(format!("{}: {}", error, description)))
}

/// Turn a vendor error payload (`error_code`/`error_msg`) into [`Error::Ocr`].
pub fn check_response(response: Value) -> Result<Value> {
    match response.get("error_code").and_then(Value::as_i64) {
        Some(code) => Err(Error::Ocr {
            code,
            message: response
                .get("error_msg")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| response.to_string()),
        }),
        None => Ok(response),
    }
}

//! OCR credentials loaded from the environment.

use std::fmt;

use crate::error::{Error, Result};

pub const APP_ID_VAR: &str = "BAIDU_OCR_APP_ID";
pub const API_KEY_VAR: &str = "BAIDU_OCR_API_KEY";
pub const SECRET_KEY_VAR: &str = "BAIDU_OCR_SECRET_KEY";

/// Application credentials for the Baidu OCR service.
#[derive(Clone, PartialEq, Eq)]
pub struct OcrCredentials {
    pub app_id: String,
    pub api_key: String,
    pub secret_key: String,
}

impl OcrCredentials {
    pub fn new(
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read credentials from the process environment, loading `.env` first
    /// when one is present.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("no .env loaded: {}", e);
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`; unset or empty values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::MissingCredential(name.to_string()))
        };
        Ok(Self {
            app_id: get(APP_ID_VAR)?,
            api_key: get(API_KEY_VAR)?,
            secret_key: get(SECRET_KEY_VAR)?,
        })
    }

    /// `(variable, masked value)` pairs for display.
    pub fn masked(&self) -> [(&'static str, String); 3] {
        [
            (APP_ID_VAR, mask(&self.app_id)),
            (API_KEY_VAR, mask(&self.api_key)),
            (SECRET_KEY_VAR, mask(&self.secret_key)),
        ]
    }
}

impl fmt::Debug for OcrCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrCredentials")
            .field("app_id", &mask(&self.app_id))
            .field("api_key", &mask(&self.api_key))
            .field("secret_key", &mask(&self.secret_key))
            .finish()
    }
}

/// First four characters followed by `...`.
pub fn mask(value: &str) -> String {
    if value.is_empty() {
        return "not set".to_string();
    }
    let head: String = value.chars().take(4).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_lookup() {
        let vars = env(&[
            (APP_ID_VAR, "11223344"),
            (API_KEY_VAR, "abcdEFGHijkl"),
            (SECRET_KEY_VAR, "s3cr3tvalue"),
        ]);
        let creds = OcrCredentials::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(creds, OcrCredentials::new("11223344", "abcdEFGHijkl", "s3cr3tvalue"));
    }

    #[test]
    fn test_missing_or_blank_variable() {
        let vars = env(&[(APP_ID_VAR, "1"), (API_KEY_VAR, "  ")]);
        let err = OcrCredentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        match err {
            Error::MissingCredential(name) => assert_eq!(name, API_KEY_VAR),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_masking() {
        assert_eq!(mask("abcdEFGH"), "abcd...");
        assert_eq!(mask("ab"), "ab...");
        assert_eq!(mask(""), "not set");

        let creds = OcrCredentials::new("11223344", "abcdEFGHijkl", "s3cr3tvalue");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("EFGH"));
        assert!(!debug.contains("tvalue"));
        assert_eq!(creds.masked()[1], (API_KEY_VAR, "abcd...".to_string()));
    }
}

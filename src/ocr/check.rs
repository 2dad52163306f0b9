//! Credential check against a synthetic blank image.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;

use super::client::{OcrClient, OcrEndpoint};
use crate::error::{Error, Result};

/// Console pages worth checking when the service rejects the credentials.
pub const QUOTA_CHECKLIST: &[&str] = &[
    "Text Recognition > Overview > call statistics",
    "Account Center > resource package management",
    "Text Recognition > Applications > application status",
    "Account Center > Security > IP allowlist",
];

/// Follow-up steps printed after a failed check.
pub const TROUBLESHOOTING: &[&str] = &[
    "Check the service status in the cloud console",
    "Confirm the text recognition service is enabled for the application",
    "Check that the API key and secret key are correct",
    "Confirm the account balance and quota are sufficient",
    "Check whether the caller IP is on the allowlist (if IP restriction is on)",
];

/// Outcome of a credential check.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialReport {
    /// The service answered with a recognition result
    Accepted {
        lines: Option<u64>,
        response: Value,
    },

    /// The service refused the request
    Rejected {
        code: Option<i64>,
        message: String,
        explanation: Option<&'static str>,
    },
}

impl CredentialReport {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CredentialReport::Accepted { .. })
    }
}

/// A 200x100 white RGB image encoded as PNG.
pub fn blank_probe_png() -> Result<Vec<u8>> {
    let canvas = RgbImage::from_pixel(200, 100, Rgb([255, 255, 255]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(canvas).write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Plain-language meaning of a vendor error code.
pub fn explain_error_code(code: i64) -> Option<&'static str> {
    let text = match code {
        1 => "unknown error",
        2 => "service temporarily unavailable",
        3 => "the requested API does not exist",
        4 => "cluster overloaded",
        6 => "no permission to access this user's data",
        14 => "IAM authentication failed",
        15 => "application does not exist; check that the app id is correct",
        17 => "daily request quota exceeded",
        18 => "QPS limit exceeded",
        19 => "total request quota exceeded",
        100 => "invalid parameter",
        216015 => "module closed",
        282000 => "internal server error",
        282003 => "required request parameter missing",
        282005 => "processing failed",
        282006 => "batch task partially succeeded",
        282007 => "batch task failed entirely",
        282114 => "API capability not enabled or already closed",
        _ => return None,
    };
    Some(text)
}

/// Send the blank probe to the general recognition endpoint.
///
/// Vendor and authentication errors become [`CredentialReport::Rejected`];
/// transport failures are returned as errors.
pub fn check_credentials(client: &dyn OcrClient) -> Result<CredentialReport> {
    let probe = blank_probe_png()?;
    match client.recognize(OcrEndpoint::GeneralBasic, &probe) {
        Ok(response) => Ok(CredentialReport::Accepted {
            lines: response.get("words_result_num").and_then(Value::as_u64),
            response,
        }),
        Err(Error::Ocr { code, message }) => Ok(CredentialReport::Rejected {
            code: Some(code),
            message,
            explanation: explain_error_code(code),
        }),
        Err(Error::Auth(message)) => Ok(CredentialReport::Rejected {
            code: None,
            message,
            explanation: None,
        }),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Answer(fn() -> Result<Value>);

    impl OcrClient for Answer {
        fn recognize(&self, endpoint: OcrEndpoint, image: &[u8]) -> Result<Value> {
            assert_eq!(endpoint, OcrEndpoint::GeneralBasic);
            assert!(image.starts_with(b"\x89PNG"));
            (self.0)()
        }
    }

    #[test]
    fn test_probe_is_blank_png() {
        let bytes = blank_probe_png().unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (200, 100));
        assert!(!crate::raster::is_meaningful(&img));
    }

    #[test]
    fn test_accepted() {
        let client = Answer(|| Ok(json!({"log_id": 1, "words_result_num": 0, "words_result": []})));
        let report = check_credentials(&client).unwrap();
        assert!(report.is_accepted());
        match report {
            CredentialReport::Accepted { lines, .. } => assert_eq!(lines, Some(0)),
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_rejected_with_known_code() {
        let client = Answer(|| {
            Err(Error::Ocr {
                code: 18,
                message: "Open api qps request limit reached".to_string(),
            })
        });
        assert_eq!(
            check_credentials(&client).unwrap(),
            CredentialReport::Rejected {
                code: Some(18),
                message: "Open api qps request limit reached".to_string(),
                explanation: Some("QPS limit exceeded"),
            }
        );
    }

    #[test]
    fn test_rejected_token() {
        let client = Answer(|| Err(Error::Auth("invalid_client: unknown client id".to_string())));
        let report = check_credentials(&client).unwrap();
        assert!(!report.is_accepted());
    }

    #[test]
    fn test_transport_errors_propagate() {
        let client = Answer(|| {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )))
        });
        assert!(matches!(check_credentials(&client), Err(Error::Io(_))));
    }

    #[test]
    fn test_error_code_table() {
        assert_eq!(explain_error_code(14), Some("IAM authentication failed"));
        assert_eq!(
            explain_error_code(282114),
            Some("API capability not enabled or already closed")
        );
        assert_eq!(explain_error_code(216201), None);
    }
}

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Credentials for authenticating with an external booking channel.
///
/// Each variant carries the secret material for its header scheme. Which
/// variant a source uses depends on its kind: PMS, channel-manager, and
/// direct endpoints take a bearer token; OTAs use an API-key/secret-key
/// header pair.
#[derive(Debug, Clone)]
pub enum RequestAuth {
    /// `Authorization: Bearer <token>`
    Bearer { token: SecretString },

    /// `X-API-Key` + `X-Secret-Key` header pair.
    ApiKeyPair {
        api_key: SecretString,
        secret_key: SecretString,
    },
}

impl RequestAuth {
    /// Build the default headers for this auth scheme.
    ///
    /// Fails if the secret material contains bytes invalid in an HTTP
    /// header (control characters, non-ASCII).
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();

        match self {
            Self::Bearer { token } => {
                let value = format!("Bearer {}", token.expose_secret());
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    sensitive_header(&value)?,
                );
            }
            Self::ApiKeyPair {
                api_key,
                secret_key,
            } => {
                headers.insert("X-API-Key", sensitive_header(api_key.expose_secret())?);
                headers.insert(
                    "X-Secret-Key",
                    sensitive_header(secret_key.expose_secret())?,
                );
            }
        }

        Ok(headers)
    }
}

/// Parse a header value and mark it sensitive so it never shows up in
/// debug output.
fn sensitive_header(value: &str) -> Result<HeaderValue, Error> {
    let mut header = HeaderValue::from_str(value).map_err(|_| Error::Authentication {
        message: "credential contains characters invalid in an HTTP header".into(),
    })?;
    header.set_sensitive(true);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_headers() {
        let auth = RequestAuth::Bearer {
            token: SecretString::from("tok-123"),
        };
        let headers = auth.headers().expect("valid header");
        assert_eq!(
            headers.get(reqwest::header::AUTHORIZATION).map(|v| v.is_sensitive()),
            Some(true)
        );
    }

    #[test]
    fn key_pair_headers() {
        let auth = RequestAuth::ApiKeyPair {
            api_key: SecretString::from("key"),
            secret_key: SecretString::from("secret"),
        };
        let headers = auth.headers().expect("valid headers");
        assert!(headers.contains_key("X-API-Key"));
        assert!(headers.contains_key("X-Secret-Key"));
    }

    #[test]
    fn invalid_credential_bytes_rejected() {
        let auth = RequestAuth::Bearer {
            token: SecretString::from("bad\ntoken"),
        };
        assert!(auth.headers().is_err());
    }
}

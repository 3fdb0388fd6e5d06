// Shared response handling for the channel clients.
//
// Status interpretation is uniform across vendors: 401/403 means bad
// credentials, any other non-2xx is fatal for the current sync cycle.
// Body decoding keeps the raw text around for debugging.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::Error;

const BODY_SNIPPET_LEN: usize = 512;

/// Map a send error, distinguishing client-side timeouts.
pub(crate) fn send_error(err: reqwest::Error, timeout_secs: u64) -> Error {
    if err.is_timeout() {
        Error::Timeout { timeout_secs }
    } else {
        Error::Transport(err)
    }
}

/// Check the HTTP status and decode the JSON body.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let resp = check_status(resp).await?;
    let body = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// Reject non-2xx responses, reading a snippet of the body for context.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            message: format!("endpoint rejected credentials (HTTP {status})"),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message: snippet(&body),
        });
    }

    Ok(resp)
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= BODY_SNIPPET_LEN {
        trimmed.to_owned()
    } else {
        let mut end = BODY_SNIPPET_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

//! Shared JSON-over-HTTP transport.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: every call fails with
//! `AuthError::Network` since these endpoints only exist from the browser.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde::de::DeserializeOwned;

use crate::error::AuthError;

/// HTTP verbs the console issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// GET and DELETE never carry a body.
    pub fn allows_body(self) -> bool {
        !matches!(self, Self::Get | Self::Delete)
    }
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn transport_failed_message(method: Method, url: &str, err: &str) -> String {
    format!("{} {url} failed: {err}", method.as_str())
}

/// Send a JSON request and decode the JSON response body.
///
/// # Errors
///
/// `Network` when no response arrives, `Rejected` for non-2xx statuses,
/// `Decode` when the body is not the expected JSON.
pub(crate) async fn send_json<T: DeserializeOwned>(
    method: Method,
    url: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> Result<T, AuthError> {
    #[cfg(feature = "hydrate")]
    {
        use gloo_net::http::Request;

        let mut builder = match method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Patch => Request::patch(url),
            Method::Delete => Request::delete(url),
        }
        .header("Accept", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", &bearer_header(token));
        }

        let request = match body.filter(|_| method.allows_body()) {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| AuthError::Network(transport_failed_message(method, url, &e.to_string())))?;

        let resp = request
            .send()
            .await
            .map_err(|e| AuthError::Network(transport_failed_message(method, url, &e.to_string())))?;
        if !resp.ok() {
            let text = resp.text().await.unwrap_or_default();
            log::warn!("{} {url} -> {}", method.as_str(), resp.status());
            return Err(AuthError::rejected(resp.status(), &text));
        }
        resp.json::<T>().await.map_err(|e| AuthError::Decode(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (method, url, token, body);
        Err(AuthError::Network("not available on server".to_owned()))
    }
}

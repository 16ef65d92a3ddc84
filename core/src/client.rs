//! Blocking HTTP client for the Books API.
//!
//! # Design
//! `ApiClient` joins a base URL with an endpoint name, turns the call into an
//! `HttpRequest` (`build_request`), and hands it to a `Transport`. The default
//! transport wraps a single `ureq::Agent`, which pools connections across
//! calls and enforces the per-request timeout. Any non-2xx status is turned
//! into `ApiError::Http`; there are no retries.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ApiError;
use crate::http::{Body, HttpMethod, HttpRequest, HttpResponse};
use crate::settings::Settings;

/// Executes a prepared request and returns whatever the server answered,
/// including error statuses.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a pooled `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are interpreted by `ApiClient`, not by ureq.
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), &request.headers).call(),
            HttpMethod::Post => send_body(
                with_headers(self.agent.post(url), &request.headers),
                request.body.as_deref(),
            ),
            HttpMethod::Put => send_body(
                with_headers(self.agent.put(url), &request.headers),
                request.body.as_deref(),
            ),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

/// Client for one Books API deployment.
///
/// Endpoints are relative to `base_url`, e.g. `manipulation` or `ids`.
pub struct ApiClient<T: Transport = UreqTransport> {
    base_url: String,
    transport: T,
}

impl ApiClient<UreqTransport> {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Self::with_transport(base_url, UreqTransport::new(timeout))
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(&settings.base_url, settings.timeout())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            base_url,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a call into an `HttpRequest` without sending it.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Body,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let raw = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        let mut all_headers = Vec::with_capacity(headers.len() + 1);
        let body = match body {
            Body::Empty => None,
            Body::Json(value) => {
                all_headers.push(("content-type".to_string(), "application/json".to_string()));
                let encoded = serde_json::to_string(&value)
                    .map_err(|e| ApiError::Serialization(e.to_string()))?;
                Some(encoded)
            }
            Body::Form(pairs) => {
                all_headers.push((
                    "content-type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ));
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&pairs)
                    .finish();
                Some(encoded)
            }
        };
        all_headers.extend(
            headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: all_headers,
            body,
        })
    }

    /// Send a prepared request. A non-2xx answer comes back as `ApiError::Http`.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::info!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(&request).map_err(|e| {
            tracing::warn!(method = %request.method, url = %request.url, error = %e, "request failed");
            e
        })?;
        tracing::info!(status = response.status, body = %response.body, "received response");

        if !response.is_success() {
            return Err(ApiError::from_response(response.status, response.body));
        }
        Ok(response)
    }

    pub fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(HttpMethod::Get, endpoint, params, Body::Empty, headers)?;
        self.send(request)
    }

    pub fn post(
        &self,
        endpoint: &str,
        body: Body,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(HttpMethod::Post, endpoint, &[], body, headers)?;
        self.send(request)
    }

    pub fn put(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Body,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(HttpMethod::Put, endpoint, params, body, headers)?;
        self.send(request)
    }

    pub fn delete(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request =
            self.build_request(HttpMethod::Delete, endpoint, params, Body::Empty, headers)?;
        self.send(request)
    }
}

impl<T: Transport> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records every request and answers with a fixed response.
    struct StubTransport {
        status: u16,
        body: String,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl StubTransport {
        fn answering(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for StubTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    fn client() -> ApiClient<StubTransport> {
        ApiClient::with_transport(
            "http://localhost:3000/v1/books",
            StubTransport::answering(200, "{}"),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_is_joined_to_base_url() {
        let req = client()
            .build_request(HttpMethod::Get, "latest", &[], Body::Empty, &[])
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/v1/books/latest");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn slashes_are_normalized() {
        let client = ApiClient::with_transport(
            "http://localhost:3000/v1/books/",
            StubTransport::answering(200, "{}"),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/v1/books");
        let req = client
            .build_request(HttpMethod::Get, "/info", &[], Body::Empty, &[])
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/v1/books/info");
    }

    #[test]
    fn params_are_encoded_into_query() {
        let req = client()
            .build_request(
                HttpMethod::Get,
                "ids",
                &[("book_type", "Action and Adventure")],
                Body::Empty,
                &[],
            )
            .unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/v1/books/ids?book_type=Action+and+Adventure"
        );
    }

    #[test]
    fn json_body_sets_content_type() {
        let req = client()
            .build_request(
                HttpMethod::Put,
                "manipulation",
                &[("id", "abc")],
                Body::Json(serde_json::json!({"title": "New"})),
                &[("x-trace", "1")],
            )
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/v1/books/manipulation?id=abc");
        assert_eq!(
            req.headers,
            vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("x-trace".to_string(), "1".to_string()),
            ]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "New"}));
    }

    #[test]
    fn form_body_is_url_encoded() {
        let req = client()
            .build_request(
                HttpMethod::Post,
                "manipulation",
                &[],
                Body::Form(vec![
                    ("title".to_string(), "War & Peace".to_string()),
                    ("type".to_string(), "Drama".to_string()),
                ]),
                &[],
            )
            .unwrap();
        assert_eq!(
            req.headers,
            vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string()
            )]
        );
        assert_eq!(req.body.as_deref(), Some("title=War+%26+Peace&type=Drama"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::with_transport("not a url", StubTransport::answering(200, "{}"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn send_returns_response_on_success() {
        let client = client();
        let resp = client.get("latest", &[("limit", "5")], &[]).unwrap();
        assert_eq!(resp.status, 200);
        let seen = client.transport().seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "http://localhost:3000/v1/books/latest?limit=5");
    }

    #[test]
    fn send_maps_error_status_to_http_error() {
        let client = ApiClient::with_transport(
            "http://localhost:3000/v1/books",
            StubTransport::answering(405, r#"{"message":"No implementation for `GET` method"}"#),
        )
        .unwrap();
        let err = client.get("manipulation", &[], &[]).unwrap_err();
        assert_eq!(err.status(), Some(405));
        assert_eq!(err.message(), Some("No implementation for `GET` method"));
    }

    #[test]
    fn debug_shows_base_url() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("http://localhost:3000/v1/books"));
    }
}

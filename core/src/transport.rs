//! Blocking transports that execute an `HttpRequest`.

use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations must return 4xx/5xx responses as data; only failures to
/// obtain a response at all are errors.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// `Transport` backed by a `ureq` agent. One attempt per call.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap an existing agent. It must have `http_status_as_error` disabled.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().map(str::as_bytes);

        let result = match request.method {
            HttpMethod::Get => decorate(self.agent.get(url), request).call(),
            HttpMethod::Delete => decorate(self.agent.delete(url), request).call(),
            HttpMethod::Post => send_body(decorate(self.agent.post(url), request), body),
            HttpMethod::Put => send_body(decorate(self.agent.put(url), request), body),
            HttpMethod::Patch => send_body(decorate(self.agent.patch(url), request), body),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        // Any reply is data: no size ceiling, invalid UTF-8 replaced.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn decorate<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (name, value) in &request.query {
        builder = builder.query(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Recording {
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Transport for Recording {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: 204,
                headers: Vec::new(),
                body: String::new(),
            })
        }
    }

    #[test]
    fn references_are_transports() {
        let recording = Recording {
            seen: RefCell::new(Vec::new()),
        };
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/account".to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        };
        fn send_via<T: Transport>(transport: T, request: &HttpRequest) -> HttpResponse {
            transport.send(request).unwrap()
        }
        let response = send_via(&recording, &request);
        assert_eq!(response.status, 204);
        assert_eq!(recording.seen.borrow().len(), 1);
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/developer_api/v1/account".to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        };
        assert!(UreqTransport::new().send(&request).is_err());
    }
}

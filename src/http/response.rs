//! Outbound response carrier.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Response, StatusCode};
use indexmap::IndexMap;

/// The response a controller builds up while handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientResponse {
    status: StatusCode,
    headers: IndexMap<String, String>,
    body: String,
}

impl Default for ClientResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: IndexMap::new(),
            body: String::new(),
        }
    }

    /// Turn this response into a `302 Found` redirect to `url`.
    pub fn redirect(self, url: impl Into<String>) -> Self {
        self.redirect_with_status(url, StatusCode::FOUND)
    }

    pub fn redirect_with_status(mut self, url: impl Into<String>, status: StatusCode) -> Self {
        self.status = status;
        self.headers.insert("location".to_string(), url.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// The redirect target, if this is a redirect.
    pub fn location(&self) -> Option<&str> {
        if self.status.is_redirection() {
            self.header("location")
        } else {
            None
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = body.into();
        self
    }

    pub fn append_body(&mut self, chunk: &str) -> &mut Self {
        self.body.push_str(chunk);
        self
    }

    /// Convert into a hyper response for the HTTP server.
    ///
    /// Headers that are not valid HTTP header names or values are dropped.
    pub fn into_hyper(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;

        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => log::warn!("Dropping invalid response header '{}'", name),
            }
        }

        response
    }
}

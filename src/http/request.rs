//! Inbound request carrier.

use hyper::{Method, Request};
use indexmap::IndexMap;
use serde_json::Value;

/// An inbound request as seen by a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerRequest {
    method: Method,
    path: String,
    query: IndexMap<String, String>,
    headers: IndexMap<String, String>,
    params: IndexMap<String, Value>,
    body: String,
}

impl Default for ServerRequest {
    fn default() -> Self {
        Self::new(Method::GET, "/")
    }
}

impl ServerRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: IndexMap::new(),
            headers: IndexMap::new(),
            params: IndexMap::new(),
            body: String::new(),
        }
    }

    /// Build a request from a hyper request and its collected body.
    pub fn from_hyper<B>(req: &Request<B>, body: impl Into<String>) -> Self {
        let mut request = Self::new(req.method().clone(), req.uri().path());

        if let Some(query) = req.uri().query() {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                request.query.insert(decode_component(key), decode_component(value));
            }
        }

        for (name, value) in req.headers() {
            if let Ok(value) = value.to_str() {
                request
                    .headers
                    .insert(name.as_str().to_ascii_lowercase(), value.to_string());
            }
        }

        request.body = body.into();
        request
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Attach a route parameter (set by the router before dispatch).
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Header lookup, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Percent-decode a query string component, treating `+` as a space.
/// Malformed sequences are kept as written.
fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let req = ServerRequest::default().with_header("X-Request-Id", "abc");
        assert_eq!(req.header("x-request-id"), Some("abc"));
        assert_eq!(req.header("X-REQUEST-ID"), Some("abc"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn test_from_hyper_splits_query_string() {
        let hyper_req = Request::builder()
            .method(Method::POST)
            .uri("/posts/7?draft=1&tag=rust&empty")
            .header("Content-Type", "text/plain")
            .body(())
            .unwrap();

        let req = ServerRequest::from_hyper(&hyper_req, "hello");
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.path(), "/posts/7");
        assert_eq!(req.query_param("draft"), Some("1"));
        assert_eq!(req.query_param("tag"), Some("rust"));
        assert_eq!(req.query_param("empty"), Some(""));
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.body(), "hello");
    }

    #[test]
    fn test_from_hyper_decodes_query_values() {
        let hyper_req = Request::builder()
            .uri("/search?q=soli+lang%21&page%5B1%5D=2&bad=%E0%A4%A")
            .body(())
            .unwrap();

        let req = ServerRequest::from_hyper(&hyper_req, "");
        assert_eq!(req.query_param("q"), Some("soli lang!"));
        assert_eq!(req.query_param("page[1]"), Some("2"));
        assert_eq!(req.query_param("bad"), Some("%E0%A4%A"));
    }
}

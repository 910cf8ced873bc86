use super::body::{parse_form, parse_json, parse_query};
use crate::error::FrameworkError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;

/// HTTP Request wrapper with a fully buffered body
///
/// The server collects the body (bounded by the configured limit) before the
/// pipeline runs, so every stage and handler can inspect it synchronously.
#[derive(Debug)]
pub struct Request {
    parts: http::request::Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub fn new(inner: http::Request<Bytes>) -> Self {
        let (parts, body) = inner.into_parts();
        Self {
            parts,
            body,
            params: HashMap::new(),
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> &http::Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &http::Uri {
        &self.parts.uri
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn query_string(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Get a route parameter by name (e.g., /products/{id})
    pub fn param(&self, name: &str) -> Result<&str, FrameworkError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| FrameworkError::param(name))
    }

    /// Get a route parameter parsed into `T`
    ///
    /// A value that does not parse is a binding error (400 validation response).
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<T, FrameworkError> {
        let raw = self.param(name)?;
        raw.parse::<T>()
            .map_err(|_| FrameworkError::param_parse(name, raw))
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Host the client addressed, from the Host header or the absolute URI
    pub fn host(&self) -> Option<&str> {
        self.header("host")
            .or_else(|| self.parts.uri.authority().map(|a| a.as_str()))
    }

    /// Whether the request reached us over TLS
    ///
    /// TLS terminates upstream, so this trusts `X-Forwarded-Proto` and falls
    /// back to the URI scheme.
    pub fn is_secure(&self) -> bool {
        if let Some(proto) = self.header("x-forwarded-proto") {
            return proto
                .split(',')
                .next()
                .map(|p| p.trim().eq_ignore_ascii_case("https"))
                .unwrap_or(false);
        }
        self.parts.uri.scheme_str() == Some("https")
    }

    /// Token from an `Authorization: Bearer <token>` header
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.header("authorization")?;
        let (scheme, token) = value.split_once(' ')?;
        if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
            Some(token.trim())
        } else {
            None
        }
    }

    pub fn extensions(&self) -> &http::Extensions {
        &self.parts.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut http::Extensions {
        &mut self.parts.extensions
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_json(&self.body)
    }

    /// Deserialize the body as form-urlencoded
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_form(&self.body)
    }

    /// Deserialize the body based on Content-Type (form or JSON)
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        let is_form = self
            .content_type()
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            self.form()
        } else {
            self.json()
        }
    }

    /// Deserialize the query string; a missing query binds as empty
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_query(self.query_string().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRequest;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_param_as_reports_binding_error() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "five".to_string());
        let request = TestRequest::get("/api/products/five").build().with_params(params);

        let err = request.param_as::<i32>("id").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "The value 'five' is not valid for id.");
        assert!(matches!(
            request.param("missing"),
            Err(FrameworkError::ParamError { .. })
        ));
    }

    #[test]
    fn test_is_secure_reads_forwarded_proto() {
        let plain = TestRequest::get("/").build();
        let forwarded = TestRequest::get("/")
            .header("X-Forwarded-Proto", "https, http")
            .build();
        let absolute = TestRequest::get("https://shop.example/api").build();

        assert!(!plain.is_secure());
        assert!(forwarded.is_secure());
        assert!(absolute.is_secure());
    }

    #[test]
    fn test_bearer_token() {
        let request = TestRequest::get("/")
            .header("Authorization", "Bearer abc123")
            .build();
        assert_eq!(request.bearer_token(), Some("abc123"));

        let basic = TestRequest::get("/")
            .header("Authorization", "Basic dXNlcg==")
            .build();
        assert_eq!(basic.bearer_token(), None);
    }
}

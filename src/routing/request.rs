/// Source of the current URL path and HTTP method.
pub trait RequestSource {
    /// Request path without query string or fragment.
    fn uri(&self) -> String;
    /// Lowercase HTTP method.
    fn method(&self) -> String;
}

/// A minimal owned request, also used to bind a router to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    path: String,
    method: String,
}

impl Request {
    /// Builds a request, dropping any query string or fragment from `uri`.
    pub fn new(uri: impl AsRef<str>, method: impl AsRef<str>) -> Self {
        let uri = uri.as_ref();
        let path = uri.split(['?', '#']).next().unwrap_or_default();
        Self {
            path: if path.is_empty() { "/".into() } else { path.into() },
            method: method.as_ref().to_ascii_lowercase(),
        }
    }

    pub fn get(uri: impl AsRef<str>) -> Self {
        Self::new(uri, "get")
    }

    pub fn from_source(source: &(impl RequestSource + ?Sized)) -> Self {
        Self::new(source.uri(), source.method())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method_name(&self) -> &str {
        &self.method
    }
}

impl RequestSource for Request {
    fn uri(&self) -> String {
        self.path.clone()
    }

    fn method(&self) -> String {
        self.method.clone()
    }
}

impl<B> RequestSource for http::Request<B> {
    fn uri(&self) -> String {
        self.uri().path().to_string()
    }

    fn method(&self) -> String {
        self.method().as_str().to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_strips_query_and_lowercases_method() {
        let request = Request::new("/search?q=rust#top", "POST");
        assert_eq!(request.path(), "/search");
        assert_eq!(request.method_name(), "post");
    }

    #[test]
    fn test_empty_uri_becomes_root() {
        assert_eq!(Request::get("?x=1").path(), "/");
    }

    #[test]
    fn test_http_request_source() {
        let request = http::Request::builder()
            .method(http::Method::PUT)
            .uri("https://example.com/items/3?full=1")
            .body(())
            .unwrap();
        assert_eq!(RequestSource::uri(&request), "/items/3");
        assert_eq!(RequestSource::method(&request), "put");
        assert_eq!(Request::from_source(&request), Request::new("/items/3", "put"));
    }
}

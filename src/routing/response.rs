use {
    http::{HeaderValue, StatusCode, header},
    std::ops::{Deref, DerefMut},
};

/// Assets announced to the client ahead of the response (`Link: rel=preload`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushLink {
    pub links: Vec<String>,
    pub kind: String,
}

/// Destination for everything a route produces.
pub trait ResponseSink {
    fn add(&mut self, content: &str);
    fn body(&self) -> String;
    fn status(&mut self, code: StatusCode, message: &str);
    fn content_type(&mut self, mime: &str);
    fn push(&mut self, links: &[String], kind: &str);
    fn send(&mut self);
}

/// In-memory response.
#[derive(Debug, Clone)]
pub struct Response {
    body: String,
    status: StatusCode,
    status_message: Option<String>,
    content_type: Option<String>,
    pushes: Vec<PushLink>,
    sent: usize,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            body: String::new(),
            status: StatusCode::OK,
            status_message: None,
            content_type: None,
            pushes: Vec::new(),
            sent: 0,
        }
    }
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn mime(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn pushes(&self) -> &[PushLink] {
        &self.pushes
    }

    pub fn is_sent(&self) -> bool {
        self.sent > 0
    }

    /// Number of times the response was flushed.
    pub fn send_count(&self) -> usize {
        self.sent
    }

    /// Converts into an `http::Response`, emitting one `Link` header per pushed asset.
    pub fn into_http(self) -> http::Response<String> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        if let Some(mime) = self.content_type
            && let Ok(value) = HeaderValue::from_str(&mime)
        {
            headers.insert(header::CONTENT_TYPE, value);
        }
        for push in &self.pushes {
            for link in &push.links {
                let value = format!("<{link}>; rel=preload; as={}", push.kind);
                if let Ok(value) = HeaderValue::from_str(&value) {
                    headers.append(header::LINK, value);
                }
            }
        }
        response
    }
}

impl ResponseSink for Response {
    fn add(&mut self, content: &str) {
        self.body.push_str(content);
    }

    fn body(&self) -> String {
        self.body.clone()
    }

    fn status(&mut self, code: StatusCode, message: &str) {
        self.status = code;
        self.status_message = Some(message.to_string());
    }

    fn content_type(&mut self, mime: &str) {
        self.content_type = Some(mime.to_string());
    }

    fn push(&mut self, links: &[String], kind: &str) {
        self.pushes.push(PushLink {
            links: links.to_vec(),
            kind: kind.to_string(),
        });
    }

    fn send(&mut self) {
        self.sent += 1;
        tracing::trace!(status = %self.status, bytes = self.body.len(), "response sent");
    }
}

/// Sends the wrapped sink when dropped, unless disabled.
pub struct AutoSend<'a, S: ResponseSink + ?Sized> {
    sink: &'a mut S,
    enabled: bool,
}

impl<'a, S: ResponseSink + ?Sized> AutoSend<'a, S> {
    pub fn new(sink: &'a mut S, enabled: bool) -> Self {
        Self { sink, enabled }
    }
}

impl<S: ResponseSink + ?Sized> Deref for AutoSend<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.sink
    }
}

impl<S: ResponseSink + ?Sized> DerefMut for AutoSend<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.sink
    }
}

impl<S: ResponseSink + ?Sized> Drop for AutoSend<'_, S> {
    fn drop(&mut self) {
        if self.enabled {
            self.sink.send();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_accumulates_body() {
        let mut response = Response::new();
        response.add("a");
        response.add("b");
        assert_eq!(response.body(), "ab");
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[test]
    fn test_autosend_sends_on_drop() {
        let mut response = Response::new();
        {
            let mut guard = AutoSend::new(&mut response, true);
            guard.add("x");
        }
        assert_eq!(response.send_count(), 1);

        {
            let _guard = AutoSend::new(&mut response, false);
        }
        assert_eq!(response.send_count(), 1);
    }

    #[test]
    fn test_into_http_sets_headers() {
        let mut response = Response::new();
        response.status(StatusCode::NOT_FOUND, "404 Resource not found.");
        response.content_type("text/plain");
        response.push(&["/app.css".to_string()], "style");
        response.add("missing");

        let http = response.into_http();
        assert_eq!(http.status(), StatusCode::NOT_FOUND);
        assert_eq!(http.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(http.headers()[header::LINK], "</app.css>; rel=preload; as=style");
        assert_eq!(http.body(), "missing");
    }
}

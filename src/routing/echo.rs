use std::fmt;

/// Output buffer handed to handlers and middleware.
///
/// Anything printed here is treated as echoed text: it is appended to the
/// response when `core.route.append_echoed_text` is enabled and dropped otherwise.
#[derive(Debug, Default)]
pub struct Echo {
    buffer: String,
}

impl Echo {
    pub fn print(&mut self, text: impl AsRef<str>) {
        self.buffer.push_str(text.as_ref());
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl fmt::Write for Echo {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

/// Runs `f` with a fresh buffer and returns what it printed along with its result.
pub(crate) fn capture<R>(f: impl FnOnce(&mut Echo) -> R) -> (String, R) {
    let mut echo = Echo::default();
    let result = f(&mut echo);
    (echo.into_string(), result)
}

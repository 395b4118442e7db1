use {
    super::{echo::Echo, params::Params},
    std::{collections::HashMap, fmt, sync::Arc},
};

/// What a handler or middleware hands back to the route runner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reply {
    /// Nothing to append.
    #[default]
    Empty,
    /// Stop the middleware chain. Returned by a handler it simply appends nothing.
    Halt,
    /// Text appended to the response body.
    Content(String),
}

impl Reply {
    pub fn is_halt(&self) -> bool {
        matches!(self, Reply::Halt)
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Empty
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Content(text.to_string())
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Content(text)
    }
}

impl From<Option<String>> for Reply {
    fn from(text: Option<String>) -> Self {
        text.map_or(Reply::Empty, Reply::Content)
    }
}

/// `false` aborts the chain, `true` continues without output.
impl From<bool> for Reply {
    fn from(proceed: bool) -> Self {
        if proceed { Reply::Empty } else { Reply::Halt }
    }
}

pub type HandlerFn = dyn Fn(&Params, &mut Echo) -> Reply + Send + Sync;
pub type MiddlewareFn = dyn Fn(&mut Echo) -> Reply + Send + Sync;

/// A value rendered to text when used as a route handler.
pub trait Render: Send + Sync {
    fn render(&self) -> String;
}

impl<T> Render for T
where
    T: fmt::Display + Send + Sync,
{
    fn render(&self) -> String {
        self.to_string()
    }
}

/// A route handler.
#[derive(Clone)]
pub enum Handler {
    /// Invoked with the extracted parameters.
    Callable(Arc<HandlerFn>),
    /// One handler per lowercase HTTP method.
    MethodMap(HashMap<String, Handler>),
    /// Rendered to its string form.
    View(Arc<dyn Render>),
    /// Appended verbatim.
    Literal(String),
}

impl Handler {
    pub fn func<F, R>(f: F) -> Self
    where
        F: Fn(&Params, &mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        Handler::Callable(Arc::new(move |params, echo| f(params, echo).into()))
    }

    pub fn view<V>(view: V) -> Self
    where
        V: Render + 'static,
    {
        Handler::View(Arc::new(view))
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Handler::Literal(text.into())
    }

    /// Builds a per-method handler; method names are lowercased.
    pub fn methods<I, K>(handlers: I) -> Self
    where
        I: IntoIterator<Item = (K, Handler)>,
        K: AsRef<str>,
    {
        Handler::MethodMap(
            handlers
                .into_iter()
                .map(|(method, handler)| (method.as_ref().to_ascii_lowercase(), handler))
                .collect(),
        )
    }

    /// Picks the handler to execute for `method`.
    ///
    /// A method map resolves to its entry for the method, if any; nested maps are not followed.
    pub(crate) fn resolve(&self, method: &str) -> Option<&Handler> {
        match self {
            Handler::MethodMap(map) => map
                .get(method)
                .filter(|handler| !matches!(handler, Handler::MethodMap(_))),
            other => Some(other),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Callable(_) => f.write_str("Handler::Callable"),
            Handler::MethodMap(map) => {
                let mut methods: Vec<_> = map.keys().collect();
                methods.sort();
                f.debug_tuple("Handler::MethodMap").field(&methods).finish()
            }
            Handler::View(_) => f.write_str("Handler::View"),
            Handler::Literal(text) => f.debug_tuple("Handler::Literal").field(text).finish(),
        }
    }
}

/// A before or after callback attached to a route.
#[derive(Clone)]
pub struct Middleware(Arc<MiddlewareFn>);

impl Middleware {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        Middleware(Arc::new(move |echo| f(echo).into()))
    }

    pub(crate) fn call(&self, echo: &mut Echo) -> Reply {
        (self.0)(echo)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware")
    }
}

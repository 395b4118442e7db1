//! Request dispatch and route execution.

use {
    super::{
        echo::capture,
        events::{EVENT_AFTER, EVENT_BEFORE, EVENT_END, EVENT_NOT_FOUND, EVENT_START, RouteEvent},
        group::Member,
        handler::{Handler, Middleware, Reply},
        params::Params,
        request::RequestSource,
        response::{AutoSend, ResponseSink},
        route::{Route, RouteId},
        router::Router,
    },
    crate::{Error, Result},
    http::StatusCode,
    tracing::{debug, trace},
};

/// Status message set on the response when no route matches.
pub const NOT_FOUND_MESSAGE: &str = "404 Resource not found.";

impl Router {
    /// Finds the route that would serve `url` and `method`, without side effects.
    ///
    /// Uses the segment tree when it holds routes, otherwise scans the buckets in
    /// registration order.
    pub fn resolve(&self, url: &str, method: &str) -> Option<&Route> {
        let method = method.to_ascii_lowercase();
        if self.tree.is_empty() {
            trace!(url, "linear route scan");
            return self
                .buckets
                .iter()
                .flat_map(|(_, members)| members.iter())
                .filter_map(|member| match member {
                    Member::Route(id) => self.routes.get(id.0),
                    Member::Group(_) => None,
                })
                .find(|route| route.matches(url, &method));
        }

        self.tree
            .candidates(url)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.routes.get(id.0))
            .find(|route| route.matches(url, &method))
    }

    /// Dispatches `url` and `method`, writing the result into `response`.
    ///
    /// Returns `false` when no route matched; the response then carries a 404
    /// status and any non-empty output of the `"404"` listeners. The response is
    /// sent on return when `core.response.autosend` is enabled.
    pub fn dispatch(
        &self,
        url: &str,
        method: &str,
        response: &mut (dyn ResponseSink + '_),
    ) -> bool {
        self.dispatch_inner(url, method, response, true).is_some()
    }

    /// Like [`Router::dispatch`] but returns the matched route instead of running it.
    pub fn dispatch_route(
        &self,
        url: &str,
        method: &str,
        response: &mut (dyn ResponseSink + '_),
    ) -> Option<&Route> {
        self.dispatch_inner(url, method, response, false)
            .and_then(|id| self.routes.get(id.0))
    }

    /// Dispatches the URL and method of `request`.
    pub fn dispatch_request(
        &self,
        request: &(impl RequestSource + ?Sized),
        response: &mut (dyn ResponseSink + '_),
    ) -> bool {
        self.dispatch(&request.uri(), &request.method(), response)
    }

    /// Dispatches the request bound with [`Router::with_request`].
    pub fn dispatch_current(&self, response: &mut (dyn ResponseSink + '_)) -> Result<bool> {
        let request = self
            .request
            .as_ref()
            .ok_or_else(|| Error::invalid_input("no request bound to the router"))?;
        Ok(self.dispatch(request.path(), request.method_name(), response))
    }

    fn dispatch_inner(
        &self,
        url: &str,
        method: &str,
        response: &mut (dyn ResponseSink + '_),
        run: bool,
    ) -> Option<RouteId> {
        let mut response = AutoSend::new(response, self.config.response.autosend);
        let method = method.to_ascii_lowercase();

        if let Some(route) = self.resolve(url, &method) {
            debug!(url, method = %method, pattern = %route.url_pattern(), "route matched");
            if run {
                let args = route.extract_args(url);
                self.execute(route, &args, &method, &mut *response);
            }
            return Some(route.id());
        }

        debug!(url, method = %method, "no route matched");
        response.status(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
        let event = RouteEvent {
            name: EVENT_NOT_FOUND,
            route: None,
            args: None,
            method: &method,
        };
        for output in self.events.trigger(&event) {
            if !output.is_empty() {
                response.add(&output);
            }
        }
        None
    }

    /// Runs a registered route with explicit arguments and returns the filtered body.
    pub fn run(
        &self,
        id: RouteId,
        args: &Params,
        method: &str,
        response: &mut (dyn ResponseSink + '_),
    ) -> Result<String> {
        let route = self
            .find_route(id)
            .ok_or_else(|| Error::invalid_input(format!("unknown route {}", id.index())))?;
        Ok(self.execute(route, args, &method.to_ascii_lowercase(), response))
    }

    /// Runs the route when it matches `url` and `method`, returning `None` otherwise.
    pub fn run_if_match(
        &self,
        id: RouteId,
        url: &str,
        method: &str,
        response: &mut (dyn ResponseSink + '_),
    ) -> Result<Option<String>> {
        let route = self
            .find_route(id)
            .ok_or_else(|| Error::invalid_input(format!("unknown route {}", id.index())))?;
        if !route.matches(url, method) {
            return Ok(None);
        }
        let args = route.extract_args(url);
        Ok(Some(self.execute(route, &args, &method.to_ascii_lowercase(), response)))
    }

    /// Executes befores, the handler and afters for `route`.
    ///
    /// Befores run in reverse order of attachment, afters in order. A middleware
    /// returning [`Reply::Halt`] stops the chain and the result is an empty string;
    /// output already written to the response stays there.
    fn execute(
        &self,
        route: &Route,
        args: &Params,
        method: &str,
        response: &mut (dyn ResponseSink + '_),
    ) -> String {
        let options = &self.config.route;
        self.emit(EVENT_START, route, Some(args), method);

        for push in route.pushes() {
            response.push(&push.links, &push.kind);
        }

        for middleware in route.befores().iter().rev() {
            self.emit(EVENT_BEFORE, route, None, method);
            if !self.invoke(middleware, response) {
                debug!(pattern = %route.url_pattern(), "before middleware halted the route");
                return String::new();
            }
        }

        match route.handler().and_then(|handler| handler.resolve(method)) {
            Some(Handler::Callable(f)) => {
                response.content_type(&options.response_default_type);
                let (echoed, reply) = capture(|echo| f(args, echo));
                if options.append_echoed_text {
                    response.add(&echoed);
                }
                if let Reply::Content(content) = reply {
                    response.add(&content);
                }
            }
            Some(Handler::View(view)) => {
                response.content_type(&options.response_default_type);
                response.add(&view.render());
            }
            Some(Handler::Literal(text)) => response.add(text),
            Some(Handler::MethodMap(_)) | None => {}
        }

        for middleware in route.afters() {
            self.emit(EVENT_AFTER, route, None, method);
            if !self.invoke(middleware, response) {
                debug!(pattern = %route.url_pattern(), "after middleware halted the route");
                return String::new();
            }
        }

        self.emit(EVENT_END, route, Some(args), method);
        self.filters.with(&options.response_filter, response.body())
    }

    /// Runs one middleware, appending its output. Returns `false` when it halted.
    fn invoke(&self, middleware: &Middleware, response: &mut (dyn ResponseSink + '_)) -> bool {
        let (echoed, reply) = capture(|echo| middleware.call(echo));
        if self.config.route.append_echoed_text {
            response.add(&echoed);
        }
        match reply {
            Reply::Halt => false,
            Reply::Content(content) => {
                response.add(&content);
                true
            }
            Reply::Empty => true,
        }
    }

    fn emit(&self, name: &str, route: &Route, args: Option<&Params>, method: &str) {
        self.events.trigger(&RouteEvent {
            name,
            route: Some(route),
            args,
            method,
        });
    }
}

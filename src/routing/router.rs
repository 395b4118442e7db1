//! The route registry.
//!
//! [`Router`] owns every route and group in arenas, the tag map, the prefix
//! buckets and the segment tree. Registration happens through `&mut self`;
//! dispatch, in the `dispatch` module, only needs `&self`, so a fully
//! registered router can be shared across threads.
//!
//! Groups open a scope: routes registered inside the body inherit the group's
//! prefix and join the group. With pruning on and a request bound, a group whose
//! prefix cannot match the request skips its body entirely.

use {
    super::{
        echo::Echo,
        events::{Events, Filters, RouteEvent},
        group::{self, GroupId, GroupMut, Member, RouteGroup},
        handler::{Handler, Reply},
        params::Params,
        pattern::{self, Rules},
        request::{Request, RequestSource},
        route::{Route, RouteId, RouteMut},
        tree::SegmentTree,
    },
    crate::{Config, Result},
    std::collections::HashMap,
    tracing::debug,
};

/// Route registry and dispatcher.
///
/// Routes are registered in insertion order into buckets keyed by the prefix
/// active at registration time. With `core.route.auto_optimize` enabled they are
/// also indexed in a segment tree that dispatch walks instead of scanning every
/// bucket.
///
/// # Examples
///
/// ```
/// use route_core::{Config, Response, ResponseSink, Router};
///
/// let mut router = Router::new(Config::builtin().with_autosend(false)).unwrap();
/// router.on("/hello/:name", |args, _echo| {
///     format!("Hello, {}!", args.get("name").unwrap_or("stranger"))
/// }).unwrap();
///
/// let mut response = Response::new();
/// assert!(router.dispatch("/hello/world", "get", &mut response));
/// assert_eq!(response.body(), "Hello, world!");
/// ```
#[derive(Debug)]
pub struct Router {
    pub(crate) config: Config,
    pub(crate) request: Option<Request>,
    pub(crate) routes: Vec<Route>,
    pub(crate) groups: Vec<RouteGroup>,
    pub(crate) buckets: Vec<(String, Vec<Member>)>,
    pub(crate) bucket_index: HashMap<String, usize>,
    pub(crate) tags: HashMap<String, RouteId>,
    pub(crate) tree: SegmentTree,
    pub(crate) prefixes: Vec<String>,
    pub(crate) scopes: Vec<GroupId>,
    pub(crate) events: Events,
    pub(crate) filters: Filters,
}

impl Default for Router {
    fn default() -> Self {
        Self::from_config(Config::builtin())
    }
}

impl Router {
    /// Creates a router after validating `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: Config) -> Self {
        Self {
            config,
            request: None,
            routes: Vec::new(),
            groups: Vec::new(),
            buckets: Vec::new(),
            bucket_index: HashMap::new(),
            tags: HashMap::new(),
            tree: SegmentTree::new(),
            prefixes: vec![String::new()],
            scopes: Vec::new(),
            events: Events::default(),
            filters: Filters::default(),
        }
    }

    /// Binds the router to the current request.
    ///
    /// Group pruning and [`Router::dispatch_current`] use the bound request.
    pub fn with_request(mut self, source: &(impl RequestSource + ?Sized)) -> Self {
        self.set_request(source);
        self
    }

    /// Binds the current request in place.
    pub fn set_request(&mut self, source: &(impl RequestSource + ?Sized)) {
        self.request = Some(Request::from_source(source));
    }

    /// Unbinds the current request. Every group body runs again.
    pub fn clear_request(&mut self) {
        self.request = None;
    }

    /// The bound request, if any.
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// Configuration the router was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lifecycle event listeners.
    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut Events {
        &mut self.events
    }

    /// Registers an event listener, e.g. for `"404"`.
    pub fn on_event<F>(&mut self, name: impl Into<String>, listener: F) -> &mut Self
    where
        F: Fn(&RouteEvent<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.events.on(name, listener);
        self
    }

    /// Registers a filter, e.g. for the response filter named by `core.route.response`.
    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.filters.add(name, filter);
        self
    }

    /// Named output filters.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Registers a route for a single method.
    pub fn route(
        &mut self,
        method: &str,
        schema: &str,
        handler: impl Into<Option<Handler>>,
    ) -> Result<RouteMut<'_>> {
        let id = RouteId(self.routes.len());
        let route = Route::new(id, &self.current_prefix(), schema, handler.into(), method)?;
        debug!(
            pattern = %route.url_pattern(),
            dynamic = route.is_dynamic(),
            method = %method.to_ascii_lowercase(),
            "route registered"
        );
        self.routes.push(route);
        self.register(Member::Route(id));
        Ok(RouteMut { router: self, id })
    }

    /// Registers a callable handler for GET.
    pub fn on<F, R>(&mut self, schema: &str, f: F) -> Result<RouteMut<'_>>
    where
        F: Fn(&Params, &mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.route("get", schema, Handler::func(f))
    }

    /// Registers a callable handler for GET.
    pub fn get<F, R>(&mut self, schema: &str, f: F) -> Result<RouteMut<'_>>
    where
        F: Fn(&Params, &mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.route("get", schema, Handler::func(f))
    }

    /// Registers a callable handler for POST.
    pub fn post<F, R>(&mut self, schema: &str, f: F) -> Result<RouteMut<'_>>
    where
        F: Fn(&Params, &mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.route("post", schema, Handler::func(f))
    }

    /// Registers a callable handler for PUT.
    pub fn put<F, R>(&mut self, schema: &str, f: F) -> Result<RouteMut<'_>>
    where
        F: Fn(&Params, &mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.route("put", schema, Handler::func(f))
    }

    /// Registers a callable handler for DELETE.
    pub fn delete<F, R>(&mut self, schema: &str, f: F) -> Result<RouteMut<'_>>
    where
        F: Fn(&Params, &mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.route("delete", schema, Handler::func(f))
    }

    /// Registers a callable handler accepting every method.
    pub fn any<F, R>(&mut self, schema: &str, f: F) -> Result<RouteMut<'_>>
    where
        F: Fn(&Params, &mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.route("*", schema, Handler::func(f))
    }

    /// Registers one handler per method; the route accepts exactly those methods.
    pub fn map<I, K>(&mut self, schema: &str, handlers: I) -> Result<RouteMut<'_>>
    where
        I: IntoIterator<Item = (K, Handler)>,
        K: AsRef<str>,
    {
        let handler = Handler::methods(handlers);
        let methods: Vec<String> = match &handler {
            Handler::MethodMap(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };
        Ok(self.route("get", schema, handler)?.via(methods))
    }

    /// Opens a route group under `prefix` and runs `body` inside it.
    ///
    /// A dynamic prefix is matched against the bound request and its parameters
    /// are burned into the concrete prefix; the values are passed to `body`.
    /// With pruning enabled and a request bound, `body` only runs when the
    /// request path lies under the group prefix; otherwise an empty group that
    /// is not registered anywhere is returned.
    pub fn group<F>(&mut self, prefix: &str, body: F) -> Result<GroupMut<'_>>
    where
        F: FnOnce(&mut Router, &Params) -> Result<()>,
    {
        pattern::validate_schema(prefix)?;
        let mut prefix = match prefix.trim_matches('/') {
            "" => String::new(),
            trimmed => format!("/{trimmed}"),
        };
        let outer = self.prefixes.concat();
        let pre_prefix = outer.trim_end_matches('/').to_string();
        let request_path = self.request.as_ref().map(|r| r.path().to_string());
        let mut args = Params::new();

        if pattern::is_dynamic(&prefix) {
            let cut = pattern::compile_cut(&format!("{pre_prefix}{prefix}"), &Rules::new())?;
            if let Some(path) = &request_path {
                let normalized = crate::utils::normalize_path(path);
                if let Some(caps) = cut.captures(&normalized) {
                    args = pattern::named_captures(&cut, &caps);
                    let matched = caps.get(0).map_or("", |m| m.as_str());
                    prefix = matched
                        .strip_prefix(outer.as_str())
                        .or_else(|| matched.strip_prefix(pre_prefix.as_str()))
                        .unwrap_or(matched)
                        .to_string();
                }
            }
        }

        let proceed = match &request_path {
            Some(path) if self.config.route.pruning => {
                format!("{path}/").starts_with(&format!("{pre_prefix}{prefix}/"))
            }
            _ => true,
        };

        if !proceed {
            debug!(prefix = %format!("{pre_prefix}{prefix}"), "route group pruned");
            let id = self.detached_group(prefix);
            return Ok(GroupMut { router: self, id });
        }

        let id = GroupId(self.groups.len());
        self.groups.push(RouteGroup::new(id, prefix.clone()));
        self.register(Member::Group(id));
        debug!(prefix = %format!("{pre_prefix}{prefix}"), args = %args, "route group opened");

        self.prefixes.push(prefix);
        self.scopes.push(id);
        let result = body(self, &args);
        self.scopes.pop();
        self.prefixes.pop();
        if self.prefixes.is_empty() {
            self.prefixes.push(String::new());
        }
        result?;

        Ok(GroupMut { router: self, id })
    }

    /// Creates an empty group registered in the enclosing scope.
    pub fn add_group(&mut self) -> GroupMut<'_> {
        let id = GroupId(self.groups.len());
        self.groups.push(RouteGroup::new(id, self.current_prefix()));
        self.register(Member::Group(id));
        GroupMut { router: self, id }
    }

    fn detached_group(&mut self, prefix: String) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(RouteGroup::new(id, prefix));
        id
    }

    /// Adds a member to the active bucket and group scope, and indexes routes in the tree.
    fn register(&mut self, member: Member) {
        if let Member::Route(id) = member
            && self.config.route.auto_optimize
        {
            self.tree.insert(self.routes[id.0].url_pattern(), id);
        }
        if let Some(scope) = self.scopes.last() {
            self.groups[scope.0].add(member);
        }
        let key = self.prefixes.concat();
        match self.bucket_index.get(&key) {
            Some(&index) => self.buckets[index].1.push(member),
            None => {
                self.bucket_index.insert(key.clone(), self.buckets.len());
                self.buckets.push((key, vec![member]));
            }
        }
    }

    /// Concatenated prefix of the open group scopes, without a trailing slash.
    pub(crate) fn current_prefix(&self) -> String {
        self.prefixes.concat().trim_end_matches('/').to_string()
    }

    pub(crate) fn for_each_member_route(&mut self, group: GroupId, mut apply: impl FnMut(&mut Route)) {
        for id in group::collect_routes(&self.groups, group) {
            if let Some(route) = self.routes.get_mut(id.0) {
                apply(route);
            }
        }
    }

    /// Route with identifier `id`.
    pub fn find_route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id.0)
    }

    /// Group with identifier `id`.
    pub fn find_group(&self, id: GroupId) -> Option<&RouteGroup> {
        self.groups.get(id.0)
    }

    /// Fluent handle on an already registered route.
    pub fn route_mut(&mut self, id: RouteId) -> Option<RouteMut<'_>> {
        (id.0 < self.routes.len()).then_some(RouteMut { router: self, id })
    }

    /// Fluent handle on an existing group.
    pub fn group_mut(&mut self, id: GroupId) -> Option<GroupMut<'_>> {
        (id.0 < self.groups.len()).then_some(GroupMut { router: self, id })
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Bucket keys in the order they were first used.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(key, _)| key.as_str())
    }

    /// Members registered under the prefix `key`.
    pub fn bucket(&self, key: &str) -> Option<&[Member]> {
        self.bucket_index
            .get(key)
            .map(|&index| self.buckets[index].1.as_slice())
    }

    /// Route most recently tagged `name`.
    pub fn tagged(&self, name: &str) -> Option<&Route> {
        self.tags.get(name).and_then(|id| self.routes.get(id.0))
    }

    /// URL of the route tagged `name`, or an empty string when no route carries the tag.
    pub fn url(&self, name: &str, params: &Params) -> String {
        self.tagged(name)
            .map(|route| route.url_for(params))
            .unwrap_or_default()
    }

    /// Drops every route, group, tag and the segment tree.
    ///
    /// Event listeners, filters, the configuration and the bound request survive.
    pub fn reset(&mut self) {
        self.routes.clear();
        self.groups.clear();
        self.buckets.clear();
        self.bucket_index.clear();
        self.tags.clear();
        self.tree.clear();
        self.prefixes = vec![String::new()];
        self.scopes.clear();
        debug!("router reset");
    }
}

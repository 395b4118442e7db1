//! Registered routes and their fluent handle.
//!
//! A [`Route`] owns its normalized URL pattern, the compiled matchers when the
//! pattern is dynamic, the accepted methods, the handler and both middleware
//! lists. [`RouteMut`] is returned by every registration call on the router and
//! edits the route in place.

use {
    super::{
        handler::{Handler, Middleware, Reply},
        params::Params,
        pattern::{self, CompiledPattern, Rules},
        response::PushLink,
        router::Router,
        echo::Echo,
    },
    crate::{
        Result,
        utils::{collapse_slashes, normalize_path},
    },
    std::collections::HashSet,
};

/// Index of a route inside its router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub(crate) usize);

impl RouteId {
    /// Position of the route in registration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Joins the active prefix and a schema into the stored URL pattern.
///
/// Trailing slashes are removed, `/(` is lifted to `(/` so an optional group owns
/// its separator, and runs of slashes collapse. A leading `/(` is kept so that
/// `/(:x)` still matches the root; a root group written as `(/:x)` takes the
/// same form.
pub(crate) fn build_url_pattern(prefix: &str, schema: &str) -> String {
    let joined = format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        schema.trim_matches('/')
    );
    let joined = collapse_slashes(joined.trim_end_matches('/'));
    let lifted = match joined.strip_prefix("/(") {
        Some(rest) => format!("/({}", rest.trim_start_matches('/').replace("/(", "(/")),
        None => joined.replace("/(", "(/"),
    };
    collapse_slashes(&lifted)
}

/// A registered URL pattern with its handler, middleware and metadata.
#[derive(Debug, Clone)]
pub struct Route {
    id: RouteId,
    url_pattern: String,
    compiled: Option<CompiledPattern>,
    methods: HashSet<String>,
    handler: Option<Handler>,
    befores: Vec<Middleware>,
    afters: Vec<Middleware>,
    rules: Rules,
    tag: Option<String>,
    pushes: Vec<PushLink>,
}

impl Route {
    pub(crate) fn new(
        id: RouteId,
        prefix: &str,
        schema: &str,
        handler: Option<Handler>,
        method: &str,
    ) -> Result<Self> {
        pattern::validate_schema(schema)?;
        let url_pattern = build_url_pattern(prefix, schema);
        let rules = Rules::new();
        let compiled = if pattern::is_dynamic(&url_pattern) {
            Some(CompiledPattern::new(&url_pattern, &rules)?)
        } else {
            None
        };
        Ok(Self {
            id,
            url_pattern,
            compiled,
            methods: HashSet::from([method.to_ascii_lowercase()]),
            handler,
            befores: Vec::new(),
            afters: Vec::new(),
            rules,
            tag: None,
            pushes: Vec::new(),
        })
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Prefix and schema joined and normalized, as used for matching and
    /// reverse routing.
    pub fn url_pattern(&self) -> &str {
        &self.url_pattern
    }

    /// Whether the pattern needs regex matching.
    pub fn is_dynamic(&self) -> bool {
        self.compiled.is_some()
    }

    /// Compiled matchers, `None` for static patterns.
    pub fn compiled(&self) -> Option<&CompiledPattern> {
        self.compiled.as_ref()
    }

    /// Accepted methods, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.methods.iter().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Whether `method` is accepted, either listed or through the `*` wildcard.
    pub fn accepts(&self, method: &str) -> bool {
        self.methods.contains("*") || self.methods.contains(&method.to_ascii_lowercase())
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Regex fragments merged so far, keyed by parameter name.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Name used for reverse routing, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Before middleware in attachment order. They run in reverse.
    pub fn befores(&self) -> &[Middleware] {
        &self.befores
    }

    /// After middleware in attachment order.
    pub fn afters(&self) -> &[Middleware] {
        &self.afters
    }

    /// Push declarations forwarded to the response when the route runs.
    pub fn pushes(&self) -> &[PushLink] {
        &self.pushes
    }

    /// Tests a URL and a method against this route.
    ///
    /// Static patterns compare the URL and the pattern with trailing slashes removed.
    /// Dynamic patterns run the match-only regex against the normalized URL.
    pub fn matches(&self, url: &str, method: &str) -> bool {
        if !self.accepts(method) {
            return false;
        }
        match &self.compiled {
            Some(compiled) => compiled.is_match(&normalize_path(url)),
            None => url.trim_end_matches('/') == self.url_pattern.trim_end_matches('/'),
        }
    }

    /// Named parameters of `url`, only those that participated in the match.
    pub fn extract_args(&self, url: &str) -> Params {
        match &self.compiled {
            Some(compiled) => compiled.captures(&normalize_path(url)),
            None => Params::new(),
        }
    }

    /// Builds a concrete URL from this route's pattern.
    ///
    /// Optional markers are dropped, parameters are substituted and missing ones
    /// vanish with their separator.
    pub fn url_for(&self, params: &Params) -> String {
        let stripped: String = self
            .url_pattern
            .chars()
            .filter(|c| *c != '(' && *c != ')')
            .collect();
        let url = collapse_slashes(&pattern::substitute_params(&stripped, params));
        match url.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        }
    }

    /// Replaces the rule map. Every fragment must compile, even on a static
    /// route where nothing is recompiled.
    fn set_rules(&mut self, rules: Rules) -> Result<()> {
        pattern::validate_rules(&rules)?;
        if self.compiled.is_some() {
            self.compiled = Some(CompiledPattern::new(&self.url_pattern, &rules)?);
        }
        self.rules = rules;
        Ok(())
    }

    pub(crate) fn add_before(&mut self, middleware: Middleware) {
        self.befores.push(middleware);
    }

    pub(crate) fn add_after(&mut self, middleware: Middleware) {
        self.afters.push(middleware);
    }

    pub(crate) fn add_push(&mut self, push: PushLink) {
        self.pushes.push(push);
    }
}

/// Fluent handle on a freshly registered route.
pub struct RouteMut<'a> {
    pub(crate) router: &'a mut Router,
    pub(crate) id: RouteId,
}

impl<'a> RouteMut<'a> {
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Read access to the route being edited.
    pub fn route(&self) -> &Route {
        &self.router.routes[self.id.0]
    }

    fn inner(&mut self) -> &mut Route {
        &mut self.router.routes[self.id.0]
    }

    /// Replaces the accepted methods. `*` accepts any method.
    pub fn via<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner().methods = methods
            .into_iter()
            .map(|m| m.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    /// Merges per-parameter regex fragments into the route and recompiles it.
    pub fn rules<I, K, V>(mut self, rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut merged = self.route().rules.clone();
        merged.extend(rules.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.inner().set_rules(merged)?;
        Ok(self)
    }

    /// Replaces the handler with a callable.
    pub fn with<F, R>(self, f: F) -> Self
    where
        F: Fn(&Params, &mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.with_handler(Handler::func(f))
    }

    /// Replaces the handler with any handler shape, e.g. a method map or a view.
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.inner().handler = Some(handler);
        self
    }

    /// Adds a before middleware. Befores run in reverse order of attachment.
    pub fn before<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.inner().add_before(Middleware::new(f));
        self
    }

    /// Adds an after middleware. Afters run in order of attachment.
    pub fn after<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.inner().add_after(Middleware::new(f));
        self
    }

    /// Names the route for reverse routing. The last route tagged with a name wins.
    ///
    /// An empty name clears the route's tag and leaves the tag map untouched.
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            self.inner().tag = None;
            return self;
        }
        let id = self.id;
        self.inner().tag = Some(name.clone());
        self.router.tags.insert(name, id);
        self
    }

    /// Declares assets pushed to the client whenever this route runs.
    pub fn push<I, S>(mut self, links: I, kind: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner().add_push(PushLink {
            links: links.into_iter().map(Into::into).collect(),
            kind: kind.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(prefix: &str, schema: &str) -> Route {
        Route::new(RouteId(0), prefix, schema, None, "get").unwrap()
    }

    #[test]
    fn test_build_url_pattern() {
        assert_eq!(build_url_pattern("", "/"), "");
        assert_eq!(build_url_pattern("", "about/"), "/about");
        assert_eq!(build_url_pattern("/admin/", "/users"), "/admin/users");
        assert_eq!(build_url_pattern("/blog", "/(:page)"), "/blog(/:page)");
        assert_eq!(build_url_pattern("", "/(:page)"), "/(:page)");
        assert_eq!(build_url_pattern("", "//a//b"), "/a/b");
        assert_eq!(build_url_pattern("", "(/:page)"), "/(:page)");
        assert_eq!(build_url_pattern("", "/(/:page)"), "/(:page)");
        assert_eq!(build_url_pattern("/blog", "(/:page)"), "/blog(/:page)");
    }

    #[test]
    fn test_static_route_matches_with_trailing_slash() {
        let route = route("", "/about");
        assert!(!route.is_dynamic());
        assert!(route.matches("/about", "get"));
        assert!(route.matches("/about/", "GET"));
        assert!(!route.matches("/about", "post"));
        assert!(!route.matches("/about/team", "get"));
    }

    #[test]
    fn test_root_route_matches_root_url() {
        let route = route("", "/");
        assert!(route.matches("/", "get"));
        assert!(route.matches("", "get"));
        assert!(!route.matches("/x", "get"));
    }

    #[test]
    fn test_optional_root_parameter() {
        let route = route("", "/(:page)");
        assert!(route.matches("/", "get"));
        assert!(route.matches("/intro", "get"));
        assert_eq!(route.extract_args("/intro").get("page"), Some("intro"));
        assert!(route.extract_args("/").is_empty());
    }

    #[test]
    fn test_optional_root_group_owning_its_slash() {
        let route = route("", "(/:page)");
        assert_eq!(route.url_pattern(), "/(:page)");
        assert!(route.matches("/", "get"));
        assert!(route.matches("/intro", "get"));
        assert_eq!(route.extract_args("/intro").get("page"), Some("intro"));
        assert!(!route.matches("/intro/more", "get"));
    }

    #[test]
    fn test_url_for_drops_missing_parameters() {
        let user = route("", "/user/:id");
        let params: Params = [("id", "123")].into_iter().collect();
        assert_eq!(user.url_for(&params), "/user/123");
        assert_eq!(user.url_for(&Params::new()), "/user");
        assert_eq!(route("", "/(:x)").url_for(&Params::new()), "/");
    }

    #[test]
    fn test_url_for_keeps_trailing_optional_slash_marker() {
        let element = route("", "/element(/:id)/?");
        let params: Params = [("id", "7")].into_iter().collect();
        assert_eq!(element.url_for(&params), "/element/7/?");
        assert_eq!(route("", "/element(/:id)").url_for(&params), "/element/7");
    }

    #[test]
    fn test_wildcard_method() {
        let mut route = route("", "/ping");
        route.methods = HashSet::from(["*".to_string()]);
        assert!(route.matches("/ping", "delete"));
        assert!(route.accepts("anything"));
    }

    #[test]
    fn test_set_rules_recompiles_dynamic_routes_only() {
        let mut dynamic = route("", "/item/:id");
        dynamic
            .set_rules(Rules::from([("id".to_string(), r"\d+".to_string())]))
            .unwrap();
        assert!(dynamic.matches("/item/10", "get"));
        assert!(!dynamic.matches("/item/ten", "get"));

        let mut fixed = route("", "/item");
        fixed
            .set_rules(Rules::from([("id".to_string(), r"\d+".to_string())]))
            .unwrap();
        assert!(fixed.compiled().is_none());
        assert_eq!(fixed.rules().len(), 1);
    }

    #[test]
    fn test_set_rules_rejects_invalid_fragment_on_static_route() {
        let mut fixed = route("", "/item");
        let err = fixed
            .set_rules(Rules::from([("id".to_string(), "(".to_string())]))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidPattern);
        assert!(fixed.rules().is_empty());
    }

    #[test]
    fn test_hash_in_schema_is_rejected() {
        let err = Route::new(RouteId(0), "", "/a#b", None, "get").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidPattern);
    }
}

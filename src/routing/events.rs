//! Named event hooks and response filters.

use {
    super::{params::Params, route::Route},
    std::{collections::HashMap, fmt, sync::Arc},
};

pub const EVENT_START: &str = "start";
pub const EVENT_BEFORE: &str = "before";
pub const EVENT_AFTER: &str = "after";
pub const EVENT_END: &str = "end";
pub const EVENT_NOT_FOUND: &str = "404";

/// Payload passed to listeners.
#[derive(Debug, Clone, Copy)]
pub struct RouteEvent<'a> {
    pub name: &'a str,
    pub route: Option<&'a Route>,
    pub args: Option<&'a Params>,
    pub method: &'a str,
}

pub type Listener = Arc<dyn Fn(&RouteEvent<'_>) -> Option<String> + Send + Sync>;
pub type Filter = Arc<dyn Fn(String) -> String + Send + Sync>;

/// Listener registry keyed by event name.
#[derive(Clone, Default)]
pub struct Events {
    listeners: HashMap<String, Vec<Listener>>,
}

impl Events {
    pub fn on<F>(&mut self, name: impl Into<String>, listener: F)
    where
        F: Fn(&RouteEvent<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.listeners
            .entry(name.into())
            .or_default()
            .push(Arc::new(listener));
    }

    /// Calls every listener of `event.name` in registration order and collects their results.
    pub fn trigger(&self, event: &RouteEvent<'_>) -> Vec<String> {
        self.listeners
            .get(event.name)
            .map(|listeners| listeners.iter().filter_map(|l| l(event)).collect())
            .unwrap_or_default()
    }

    pub fn has_listeners(&self, name: &str) -> bool {
        self.listeners.get(name).is_some_and(|l| !l.is_empty())
    }

    pub fn clear(&mut self, name: &str) {
        self.listeners.remove(name);
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.listeners.keys().collect();
        names.sort();
        f.debug_struct("Events").field("names", &names).finish()
    }
}

/// Named chains of string transformations.
#[derive(Clone, Default)]
pub struct Filters {
    chains: HashMap<String, Vec<Filter>>,
}

impl Filters {
    pub fn add<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.chains
            .entry(name.into())
            .or_default()
            .push(Arc::new(filter));
    }

    /// Passes `value` through every filter registered under `name`, in order.
    pub fn with(&self, name: &str, value: String) -> String {
        match self.chains.get(name) {
            Some(chain) => chain.iter().fold(value, |acc, filter| filter(acc)),
            None => value,
        }
    }

    pub fn clear(&mut self, name: &str) {
        self.chains.remove(name);
    }
}

impl fmt::Debug for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.chains.keys().collect();
        names.sort();
        f.debug_struct("Filters").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> RouteEvent<'_> {
        RouteEvent { name, route: None, args: None, method: "get" }
    }

    #[test]
    fn test_trigger_collects_results_in_order() {
        let mut events = Events::default();
        events.on("404", |_| Some("a".to_string()));
        events.on("404", |_| None);
        events.on("404", |e| Some(e.method.to_string()));
        assert_eq!(events.trigger(&event("404")), vec!["a", "get"]);
        assert!(events.trigger(&event("start")).is_empty());
    }

    #[test]
    fn test_clear_removes_listeners() {
        let mut events = Events::default();
        events.on("end", |_| None);
        assert!(events.has_listeners("end"));
        events.clear("end");
        assert!(!events.has_listeners("end"));
    }

    #[test]
    fn test_filters_apply_in_order() {
        let mut filters = Filters::default();
        filters.add("body", |s| s.to_uppercase());
        filters.add("body", |s| format!("[{s}]"));
        assert_eq!(filters.with("body", "hi".into()), "[HI]");
        assert_eq!(filters.with("other", "hi".into()), "hi");
    }
}

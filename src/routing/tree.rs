//! Segment tree used to narrow the candidate routes for a URL.
//!
//! Routes are keyed by the static segments of their pattern up to the first
//! dynamic marker. A pattern with no static segment is stored under the
//! empty-string child of the root, which doubles as the wildcard child at
//! every level of the walk.

use {
    super::{pattern, route::RouteId},
    std::collections::HashMap,
};

#[derive(Debug, Clone, Default)]
struct Node {
    children: HashMap<String, Node>,
    routes: Vec<RouteId>,
}

#[derive(Debug, Clone, Default)]
pub struct SegmentTree {
    root: Node,
    len: usize,
}

/// Static segments of a URL pattern, as used for its tree key.
///
/// Segments stop at the first dynamic marker. A segment cut by the marker is
/// dropped unless the marker opens an optional separator (`(/`) or the cut
/// happens right after a `/`. An empty result becomes `[""]`.
pub(crate) fn static_segments(url_pattern: &str) -> Vec<&str> {
    let cut = url_pattern
        .find(pattern::is_marker)
        .unwrap_or(url_pattern.len());
    let (head, tail) = url_pattern.split_at(cut);
    let complete = tail.is_empty() || head.ends_with('/') || tail.starts_with("(/");

    let head = head.trim_matches('/');
    let mut segments: Vec<&str> = if head.is_empty() {
        Vec::new()
    } else {
        head.split('/').collect()
    };
    if !complete {
        segments.pop();
    }
    if segments.is_empty() {
        segments.push("");
    }
    segments
}

impl SegmentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of routes stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn insert(&mut self, url_pattern: &str, id: RouteId) {
        let mut node = &mut self.root;
        for segment in static_segments(url_pattern) {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.routes.push(id);
        self.len += 1;
    }

    /// Candidate route lists for `url`, deepest node first.
    ///
    /// Each URL segment descends into the matching child, or the `""` child when
    /// there is none; the walk stops at the first segment with neither. The
    /// final node comes first, followed by its ancestors.
    pub fn candidates(&self, url: &str) -> Vec<&[RouteId]> {
        let mut path = vec![&self.root];
        let mut node = &self.root;
        for segment in url.trim_matches('/').split('/') {
            let next = node
                .children
                .get(segment)
                .or_else(|| node.children.get(""));
            match next {
                Some(child) => {
                    tracing::trace!(segment, "descending segment tree");
                    node = child;
                    path.push(child);
                }
                None => break,
            }
        }
        path.into_iter()
            .rev()
            .filter(|node| !node.routes.is_empty())
            .map(|node| node.routes.as_slice())
            .collect()
    }
}

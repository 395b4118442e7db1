//! Route groups.
//!
//! A group collects the routes and nested groups registered while its scope is
//! active, so middleware and push declarations can be attached to all of them
//! at once. Groups live in the router's arena and are addressed by [`GroupId`].

use {
    super::{
        echo::Echo,
        handler::{Middleware, Reply},
        response::PushLink,
        route::RouteId,
        router::Router,
    },
    std::collections::HashSet,
};

/// Index of a group inside its router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    /// Position of the group in creation order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Something a group can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    /// A registered route.
    Route(RouteId),
    /// A nested group, whose routes are reached recursively.
    Group(GroupId),
}

impl From<RouteId> for Member {
    fn from(id: RouteId) -> Self {
        Member::Route(id)
    }
}

impl From<GroupId> for Member {
    fn from(id: GroupId) -> Self {
        Member::Group(id)
    }
}

/// An ordered, duplicate-free collection of routes and nested groups.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    id: GroupId,
    prefix: String,
    members: Vec<Member>,
}

impl RouteGroup {
    pub(crate) fn new(id: GroupId, prefix: impl Into<String>) -> Self {
        Self {
            id,
            prefix: prefix.into(),
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Prefix this group was opened with, after any parameter burn-in.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Members in the order they were added.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of direct members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `member` is a direct member.
    pub fn has(&self, member: impl Into<Member>) -> bool {
        self.members.contains(&member.into())
    }

    pub(crate) fn add(&mut self, member: Member) {
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }

    pub(crate) fn remove(&mut self, member: Member) {
        self.members.retain(|m| *m != member);
    }
}

/// Fluent handle on a group.
///
/// Middleware and push declarations fan out to the members present at call time,
/// recursing into nested groups. Members added later are not affected.
pub struct GroupMut<'a> {
    pub(crate) router: &'a mut Router,
    pub(crate) id: GroupId,
}

impl<'a> GroupMut<'a> {
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Read access to the group being edited.
    pub fn group(&self) -> &RouteGroup {
        &self.router.groups[self.id.0]
    }

    pub fn has(&self, member: impl Into<Member>) -> bool {
        self.group().has(member)
    }

    /// Adds a member. Adding an existing member is a no-op.
    pub fn add(self, member: impl Into<Member>) -> Self {
        self.router.groups[self.id.0].add(member.into());
        self
    }

    /// Removes a member if present.
    pub fn remove(self, member: impl Into<Member>) -> Self {
        self.router.groups[self.id.0].remove(member.into());
        self
    }

    /// Adds a before middleware to every current member route.
    pub fn before<F, R>(self, f: F) -> Self
    where
        F: Fn(&mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let middleware = Middleware::new(f);
        self.router
            .for_each_member_route(self.id, |route| route.add_before(middleware.clone()));
        self
    }

    /// Adds an after middleware to every current member route.
    pub fn after<F, R>(self, f: F) -> Self
    where
        F: Fn(&mut Echo) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let middleware = Middleware::new(f);
        self.router
            .for_each_member_route(self.id, |route| route.add_after(middleware.clone()));
        self
    }

    /// Declares pushed assets on every current member route.
    pub fn push<I, S>(self, links: I, kind: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let push = PushLink {
            links: links.into_iter().map(Into::into).collect(),
            kind: kind.into(),
        };
        self.router
            .for_each_member_route(self.id, |route| route.add_push(push.clone()));
        self
    }
}

/// Routes reachable from `group`, each listed once, in member order.
pub(crate) fn collect_routes(groups: &[RouteGroup], group: GroupId) -> Vec<RouteId> {
    fn visit(
        groups: &[RouteGroup],
        group: GroupId,
        seen: &mut HashSet<GroupId>,
        routes: &mut Vec<RouteId>,
    ) {
        if !seen.insert(group) {
            return;
        }
        let Some(entry) = groups.get(group.0) else {
            return;
        };
        for member in &entry.members {
            match *member {
                Member::Route(id) if !routes.contains(&id) => routes.push(id),
                Member::Route(_) => {}
                Member::Group(nested) => visit(groups, nested, seen, routes),
            }
        }
    }

    let mut routes = Vec::new();
    visit(groups, group, &mut HashSet::new(), &mut routes);
    routes
}

use std::collections::BTreeSet;
use std::fmt;

use crate::request::Resource;

/// The authenticated principal as seen by the rule handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: String,
    roles: BTreeSet<String>,
}

impl Identity {
    pub fn new<I, S>(id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    #[inline]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Authentication context of one namespace: who the current principal is.
///
/// A firewall is shared by every in-flight request of its namespace, so an
/// implementation must answer for the request being processed (request-local
/// storage, session lookup, ...) rather than keep global mutable state.
pub trait Firewall: Send + Sync {
    /// Returns the current identity, `None` if nobody is authenticated.
    fn identity(&self) -> Option<Identity>;
}

/// Permission context of one namespace: whether the current principal holds
/// a privilege on a resource.
pub trait Authorizator: Send + Sync {
    fn is_allowed(&self, resource: ResourceRef<'_>, privilege: &str) -> bool;
}

/// The resource handed to [`Authorizator::is_allowed`]: either a plain name
/// or an entity taken from the request parameters.
#[derive(Clone, Copy)]
pub enum ResourceRef<'a> {
    Name(&'a str),
    Resource(&'a dyn Resource),
}

impl ResourceRef<'_> {
    pub fn resource_id(&self) -> String {
        match self {
            Self::Name(name) => name.to_string(),
            Self::Resource(resource) => resource.resource_id(),
        }
    }
}

impl fmt::Debug for ResourceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Resource(resource) => f.debug_tuple("Resource").field(resource).finish(),
        }
    }
}

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::context::{Authorizator, Firewall, Identity, ResourceRef};
use crate::request::Resource;
use crate::resolver::{AuthorizatorResolver, FirewallResolver};

pub struct MockFirewall {
    identity: Option<Identity>,
    calls: AtomicUsize,
}

impl MockFirewall {
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn logged_in(roles: &[&str]) -> Self {
        Self {
            identity: Some(Identity::new("1", roles.iter().copied())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Firewall for MockFirewall {
    fn identity(&self) -> Option<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.identity.clone()
    }
}

/// Answers every permission check the same way and records the arguments as
/// `(resource debug, privilege)`.
pub struct MockAuthorizator {
    answer: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockAuthorizator {
    pub fn allow_all() -> Self {
        Self {
            answer: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn deny_all() -> Self {
        Self {
            answer: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Authorizator for MockAuthorizator {
    fn is_allowed(&self, resource: ResourceRef<'_>, privilege: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .push((format!("{resource:?}"), privilege.to_string()));
        self.answer
    }
}

pub struct MockResource {
    id: &'static str,
    calls: AtomicUsize,
}

impl MockResource {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for MockResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MockResource({})", self.id)
    }
}

impl Resource for MockResource {
    fn resource_id(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.id.to_string()
    }
}

pub fn firewalls(namespace: &str, firewall: Arc<MockFirewall>) -> Arc<FirewallResolver> {
    let mut resolver = FirewallResolver::firewalls();
    resolver.register(namespace, firewall).unwrap();
    Arc::new(resolver)
}

pub fn authorizators(
    namespace: &str,
    authorizator: Arc<MockAuthorizator>,
) -> Arc<AuthorizatorResolver> {
    let mut resolver = AuthorizatorResolver::authorizators();
    resolver.register(namespace, authorizator).unwrap();
    Arc::new(resolver)
}

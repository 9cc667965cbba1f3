use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::context::{Authorizator, Firewall};
use crate::error::ConfigError;

/// Lookup table from namespace to the security context serving it.
///
/// Filled once at startup, then only read. Resolving a namespace always
/// yields the same shared instance.
pub struct Resolver<C: ?Sized> {
    scope: &'static str,
    contexts: HashMap<String, Arc<C>>,
}

pub type FirewallResolver = Resolver<dyn Firewall>;
pub type AuthorizatorResolver = Resolver<dyn Authorizator>;

impl<C: ?Sized> Resolver<C> {
    /// Creates an empty resolver. `scope` names the kind of context held
    /// (`firewall`, `authorizator`) in error messages.
    pub fn new(scope: &'static str) -> Self {
        Self {
            scope,
            contexts: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        namespace: impl Into<String>,
        context: Arc<C>,
    ) -> Result<(), ConfigError> {
        let namespace = namespace.into();
        if self.contexts.contains_key(&namespace) {
            return Err(ConfigError::DuplicateNamespace {
                scope: self.scope,
                namespace,
            });
        }
        self.contexts.insert(namespace, context);
        Ok(())
    }

    pub fn resolve(&self, namespace: &str) -> Result<&Arc<C>, ConfigError> {
        match self.contexts.get(namespace) {
            Some(context) => {
                debug!("Resolved {} for namespace '{namespace}'", self.scope);
                Ok(context)
            }
            None => Err(ConfigError::UnresolvableNamespace {
                scope: self.scope,
                namespace: namespace.to_string(),
            }),
        }
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    #[inline]
    pub fn scope(&self) -> &'static str {
        self.scope
    }
}

impl Resolver<dyn Firewall> {
    pub fn firewalls() -> Self {
        Self::new("firewall")
    }
}

impl Resolver<dyn Authorizator> {
    pub fn authorizators() -> Self {
        Self::new("authorizator")
    }
}

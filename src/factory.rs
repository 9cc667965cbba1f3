use std::sync::Arc;

use log::{info, warn};

use crate::error::ConfigError;
use crate::handler::{
    IdentityRuleHandler, NoIdentityRuleHandler, PrivilegeRuleHandler, RoleRuleHandler,
};
use crate::registry::HandlerRegistry;
use crate::resolver::{AuthorizatorResolver, FirewallResolver};
use crate::rule::RuleKind;
use crate::verifier::Verifier;

/// Wires the built-in rule handlers to the security contexts.
///
/// The firewall resolver serves the `identity`, `no_identity` and `role`
/// handlers; the authorizator resolver serves `privilege`.
pub struct VerifierFactory;

impl VerifierFactory {
    /// Creates a new instance of VerifierFactory.
    pub fn new() -> Self {
        Self
    }

    /// Builds a registry holding the four built-in handlers. Hosts with rule
    /// kinds of their own register them on the result before creating the
    /// [`Verifier`].
    ///
    /// # Arguments
    /// * `firewalls` - Shared by the `identity`, `no_identity` and `role`
    ///   handlers
    /// * `authorizators` - Used by the `privilege` handler
    ///
    /// # Returns
    /// * The registry, or [`ConfigError::DuplicateHandler`] if a built-in kind
    ///   was registered twice
    pub fn build_registry(
        &self,
        firewalls: Arc<FirewallResolver>,
        authorizators: Arc<AuthorizatorResolver>,
    ) -> Result<HandlerRegistry, ConfigError> {
        if firewalls.namespaces().next().is_none() {
            warn!("No firewall configured, identity and role rules will always fail");
        }
        if authorizators.namespaces().next().is_none() {
            warn!("No authorizator configured, privilege rules will always fail");
        }

        let mut registry = HandlerRegistry::new();
        registry.register(
            RuleKind::IDENTITY,
            IdentityRuleHandler::new(firewalls.clone()),
        )?;
        registry.register(
            RuleKind::NO_IDENTITY,
            NoIdentityRuleHandler::new(firewalls.clone()),
        )?;
        registry.register(RuleKind::ROLE, RoleRuleHandler::new(firewalls))?;
        registry.register(
            RuleKind::PRIVILEGE,
            PrivilegeRuleHandler::new(authorizators),
        )?;

        info!("Built-in rule handlers registered");
        Ok(registry)
    }

    /// Same as [`VerifierFactory::build_registry`], wrapped in a [`Verifier`].
    pub fn build_verifier(
        &self,
        firewalls: Arc<FirewallResolver>,
        authorizators: Arc<AuthorizatorResolver>,
    ) -> Result<Verifier, ConfigError> {
        let registry = self.build_registry(firewalls, authorizators)?;
        Ok(Verifier::new(registry))
    }
}

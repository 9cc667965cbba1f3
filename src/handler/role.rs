use std::sync::Arc;

use crate::error::VerifyError;
use crate::request::Request;
use crate::resolver::FirewallResolver;
use crate::rule::Rule;

use super::{check_valid, unexpected_rule, RuleHandler};

/// Requires the current identity to have a role.
///
/// An unauthenticated request has no roles, so it fails with an authorization
/// error here rather than an authentication one. Pair the rule with
/// [`Rule::IdentityRequired`] to ask for a login first.
pub struct RoleRuleHandler {
    firewalls: Arc<FirewallResolver>,
}

impl RoleRuleHandler {
    /// Creates a new instance of RoleRuleHandler
    ///
    /// # Arguments
    /// * `firewalls` - Firewalls by namespace, providing the identity whose
    ///   roles are checked
    pub fn new(firewalls: Arc<FirewallResolver>) -> Self {
        Self { firewalls }
    }
}

impl RuleHandler for RoleRuleHandler {
    fn check_rule(&self, rule: &Rule, req: &Request) -> Result<(), VerifyError> {
        let role = match rule {
            Rule::RoleRequired { role } => role,
            _ => return Err(unexpected_rule(rule, "role")),
        };
        check_valid(rule)?;

        let firewall = self.firewalls.resolve(req.namespace())?;
        let granted = match firewall.identity() {
            Some(identity) => identity.has_role(role),
            None => false,
        };
        if !granted {
            return Err(VerifyError::FailedAuthorization {
                rule: rule.clone(),
                message: format!("Role \"{role}\" is required for this request."),
            });
        }

        Ok(())
    }
}

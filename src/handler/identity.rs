use std::sync::Arc;

use crate::error::VerifyError;
use crate::request::Request;
use crate::resolver::FirewallResolver;
use crate::rule::Rule;

use super::{unexpected_rule, RuleHandler};

/// Requires an authenticated principal in the request's firewall.
pub struct IdentityRuleHandler {
    firewalls: Arc<FirewallResolver>,
}

impl IdentityRuleHandler {
    /// Creates a new instance of IdentityRuleHandler.
    pub fn new(firewalls: Arc<FirewallResolver>) -> Self {
        Self { firewalls }
    }
}

impl RuleHandler for IdentityRuleHandler {
    fn check_rule(&self, rule: &Rule, req: &Request) -> Result<(), VerifyError> {
        if !matches!(rule, Rule::IdentityRequired) {
            return Err(unexpected_rule(rule, "identity"));
        }

        let firewall = self.firewalls.resolve(req.namespace())?;
        if firewall.identity().is_none() {
            return Err(VerifyError::FailedAuthentication {
                rule: rule.clone(),
                message: String::from("User must be logged in for this request."),
            });
        }

        Ok(())
    }
}

use std::sync::Arc;

use crate::error::VerifyError;
use crate::request::Request;
use crate::resolver::FirewallResolver;
use crate::rule::Rule;

use super::{unexpected_rule, RuleHandler};

/// Requires that nobody is authenticated, e.g. for login and sign-up pages.
pub struct NoIdentityRuleHandler {
    firewalls: Arc<FirewallResolver>,
}

impl NoIdentityRuleHandler {
    pub fn new(firewalls: Arc<FirewallResolver>) -> Self {
        Self { firewalls }
    }
}

impl RuleHandler for NoIdentityRuleHandler {
    fn check_rule(&self, rule: &Rule, req: &Request) -> Result<(), VerifyError> {
        if !matches!(rule, Rule::IdentityForbidden) {
            return Err(unexpected_rule(rule, "no_identity"));
        }

        let firewall = self.firewalls.resolve(req.namespace())?;
        if firewall.identity().is_some() {
            return Err(VerifyError::FailedNoAuthentication {
                rule: rule.clone(),
                message: String::from("User must not be logged in for this request."),
            });
        }

        Ok(())
    }
}

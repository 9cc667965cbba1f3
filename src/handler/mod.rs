mod identity;
mod no_identity;
mod privilege;
mod role;

pub use identity::IdentityRuleHandler;
pub use no_identity::NoIdentityRuleHandler;
pub use privilege::PrivilegeRuleHandler;
pub use role::RoleRuleHandler;

use crate::error::{ConfigError, VerifyError};
use crate::request::Request;
use crate::rule::Rule;

/// Evaluates one kind of [`Rule`] against a request.
///
/// A handler is registered once per rule kind and shared by all requests, so
/// it must be thread-safe. Security state is looked up through the resolvers
/// the handler was built with.
pub trait RuleHandler: Send + Sync {
    /// Checks a rule against a request.
    ///
    /// # Returns
    /// * `Ok(())` - The rule holds for this request
    /// * `Err(VerifyError::Failed*)` - The request is denied
    /// * `Err(VerifyError::InvalidRuleArgument)` - The rule cannot be applied
    ///   to this request (or is not a kind this handler evaluates)
    /// * `Err(VerifyError::Config)` - No security context for the namespace
    fn check_rule(&self, rule: &Rule, req: &Request) -> Result<(), VerifyError>;
}

/// Rejects rules whose own parameters are malformed (an empty role, for
/// instance) before any security context is consulted.
fn check_valid(rule: &Rule) -> Result<(), VerifyError> {
    match rule.validate() {
        Ok(()) => Ok(()),
        Err(ConfigError::InvalidRule(reason)) => Err(VerifyError::InvalidRuleArgument {
            rule: rule.clone(),
            message: format!("Invalid rule {rule}: {reason}."),
        }),
        Err(err) => Err(err.into()),
    }
}

fn unexpected_rule(rule: &Rule, handler: &str) -> VerifyError {
    VerifyError::InvalidRuleArgument {
        rule: rule.clone(),
        message: format!("Unexpected rule '{}' given to {handler} handler.", rule.kind()),
    }
}

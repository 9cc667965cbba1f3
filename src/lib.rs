//! Verification of declarative authorization rules.
//!
//! Request handlers carry a list of [`Rule`]s (login required, role required,
//! privilege on a resource, ...). Before a request is dispatched, the host
//! asks a [`Verifier`] to check them:
//!
//! ```text
//! Verifier::verify(request, rules)
//!   └─ for each rule, in order
//!         └─ HandlerRegistry::lookup(rule.kind())
//!               └─ RuleHandler::check_rule(rule, request)
//!                     └─ FirewallResolver / AuthorizatorResolver::resolve(request.namespace())
//! ```
//!
//! The first failing rule stops verification. Its [`VerifyError`] says
//! whether the request was denied (authentication or authorization) or the
//! rule could not be applied at all.

mod context;
mod error;
mod handler;
mod registry;
mod request;
mod resolver;
mod rule;
mod verifier;

pub mod config;
pub mod factory;

#[cfg(test)]
mod testing;

pub use context::{Authorizator, Firewall, Identity, ResourceRef};
pub use error::{ConfigError, ErrorKind, VerifyError};
pub use handler::{
    IdentityRuleHandler, NoIdentityRuleHandler, PrivilegeRuleHandler, RoleRuleHandler,
    RuleHandler,
};
pub use registry::HandlerRegistry;
pub use request::{Parameter, Request, Resource};
pub use resolver::{AuthorizatorResolver, FirewallResolver, Resolver};
pub use rule::{Rule, RuleKind};
pub use verifier::Verifier;

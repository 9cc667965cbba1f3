use log::{debug, info, warn};

use crate::error::VerifyError;
use crate::registry::HandlerRegistry;
use crate::request::Request;
use crate::rule::Rule;

/// Checks the rules attached to a request handler.
///
/// Rules are evaluated in declaration order and all of them must hold. The
/// first failing rule stops the verification and its error is returned as is;
/// rules after it are never evaluated. Alternatives ("any of these roles")
/// have to be expressed as a rule kind of their own.
pub struct Verifier {
    registry: HandlerRegistry,
}

impl Verifier {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn verify(&self, req: &Request, rules: &[Rule]) -> Result<(), VerifyError> {
        for rule in rules {
            let handler = match self.registry.lookup(&rule.kind()) {
                Ok(handler) => handler,
                Err(err) => {
                    warn!("Cannot verify request '{}': {err}", req.target());
                    return Err(err.into());
                }
            };

            debug!("Check rule {rule} for request '{}'", req.target());
            if let Err(err) = handler.check_rule(rule, req) {
                if err.is_denial() {
                    info!(
                        "Request '{}' denied by rule {rule} ({:?}): {err}",
                        req.target(),
                        err.kind()
                    );
                } else {
                    warn!(
                        "Rule {rule} cannot be applied to request '{}': {err}",
                        req.target()
                    );
                }
                return Err(err);
            }
        }

        Ok(())
    }

    /// Like [`Verifier::verify`], but reports a security denial as
    /// `Ok(false)`. Useful to decide whether to render a link at all; broken
    /// rules and wiring still come back as errors.
    pub fn is_verified(&self, req: &Request, rules: &[Rule]) -> Result<bool, VerifyError> {
        match self.verify(req, rules) {
            Ok(()) => Ok(true),
            Err(err) if err.is_denial() => Ok(false),
            Err(err) => Err(err),
        }
    }

    #[inline]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }
}

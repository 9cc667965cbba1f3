use thiserror::Error;

use crate::rule::{Rule, RuleKind};

/// Startup and wiring errors. These mean the verifier was put together
/// wrongly and should stop the host from serving requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("handler for rule kind '{0}' is already registered")]
    DuplicateHandler(RuleKind),

    #[error("no handler registered for rule kind '{0}'")]
    UnknownRuleKind(RuleKind),

    #[error("no {scope} configured for namespace '{namespace}'")]
    UnresolvableNamespace {
        scope: &'static str,
        namespace: String,
    },

    #[error("{scope} for namespace '{namespace}' is already registered")]
    DuplicateNamespace {
        scope: &'static str,
        namespace: String,
    },

    #[error("invalid rule: {0}")]
    InvalidRule(String),
}

/// The outcome of a failed verification.
///
/// The three `Failed*` variants are security denials; everything else is a
/// mistake in how the rules or the verifier were set up. The `Display` text of
/// a denial is the bare message, stable enough for tests and audit logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Identity required but absent.
    #[error("{message}")]
    FailedAuthentication { rule: Rule, message: String },

    /// Identity forbidden but present.
    #[error("{message}")]
    FailedNoAuthentication { rule: Rule, message: String },

    /// Role or privilege denied.
    #[error("{message}")]
    FailedAuthorization { rule: Rule, message: String },

    /// The rule cannot be evaluated against this request, e.g. it names a
    /// parameter the request does not carry.
    #[error("{message}")]
    InvalidRuleArgument { rule: Rule, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Flat discriminant of [`VerifyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FailedAuthentication,
    FailedNoAuthentication,
    FailedAuthorization,
    InvalidRuleArgument,
    Config,
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FailedAuthentication { .. } => ErrorKind::FailedAuthentication,
            Self::FailedNoAuthentication { .. } => ErrorKind::FailedNoAuthentication,
            Self::FailedAuthorization { .. } => ErrorKind::FailedAuthorization,
            Self::InvalidRuleArgument { .. } => ErrorKind::InvalidRuleArgument,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// The rule that failed, if the error came from evaluating one.
    pub fn rule(&self) -> Option<&Rule> {
        match self {
            Self::FailedAuthentication { rule, .. }
            | Self::FailedNoAuthentication { rule, .. }
            | Self::FailedAuthorization { rule, .. }
            | Self::InvalidRuleArgument { rule, .. } => Some(rule),
            Self::Config(_) => None,
        }
    }

    /// True for the three security denials.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::FailedAuthentication { .. }
                | Self::FailedNoAuthentication { .. }
                | Self::FailedAuthorization { .. }
        )
    }

    /// HTTP status a request-dispatch layer would usually answer with.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::FailedAuthentication | ErrorKind::FailedNoAuthentication => 401,
            ErrorKind::FailedAuthorization => 403,
            ErrorKind::InvalidRuleArgument | ErrorKind::Config => 500,
        }
    }
}

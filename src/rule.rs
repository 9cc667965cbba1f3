use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Key used to pair a [`Rule`] with the handler that evaluates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKind(Cow<'static, str>);

impl RuleKind {
    pub const IDENTITY: RuleKind = RuleKind(Cow::Borrowed("identity"));
    pub const NO_IDENTITY: RuleKind = RuleKind(Cow::Borrowed("no_identity"));
    pub const ROLE: RuleKind = RuleKind(Cow::Borrowed("role"));
    pub const PRIVILEGE: RuleKind = RuleKind(Cow::Borrowed("privilege"));

    const BUILTIN: [RuleKind; 4] = [
        Self::IDENTITY,
        Self::NO_IDENTITY,
        Self::ROLE,
        Self::PRIVILEGE,
    ];

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_builtin(&self) -> bool {
        Self::BUILTIN.contains(self)
    }
}

impl From<&str> for RuleKind {
    fn from(kind: &str) -> Self {
        Self(Cow::Owned(kind.to_string()))
    }
}

impl From<String> for RuleKind {
    fn from(kind: String) -> Self {
        Self(Cow::Owned(kind))
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One authorization constraint attached to a request handler.
///
/// Rules are built once when handlers are configured and never change
/// afterwards. Kinds outside the built-in four are carried by
/// [`Rule::Custom`] and evaluated by whatever handler the host registered for
/// that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum Rule {
    /// A principal must be authenticated.
    IdentityRequired,
    /// No principal may be authenticated.
    IdentityForbidden,
    /// The current identity must have `role`.
    RoleRequired { role: String },
    /// The permission engine must grant `privilege` on `resource`.
    ///
    /// `resource` is a literal name, `$this` for the request's handler name, or
    /// `$param` for a request parameter holding a [`crate::Resource`].
    PrivilegeRequired { resource: String, privilege: String },
    Custom {
        kind: String,
        args: BTreeMap<String, String>,
    },
}

impl Rule {
    pub fn role(role: impl Into<String>) -> Self {
        Self::RoleRequired { role: role.into() }
    }

    pub fn privilege(resource: impl Into<String>, privilege: impl Into<String>) -> Self {
        Self::PrivilegeRequired {
            resource: resource.into(),
            privilege: privilege.into(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Self::IdentityRequired => RuleKind::IDENTITY,
            Self::IdentityForbidden => RuleKind::NO_IDENTITY,
            Self::RoleRequired { .. } => RuleKind::ROLE,
            Self::PrivilegeRequired { .. } => RuleKind::PRIVILEGE,
            Self::Custom { kind, .. } => RuleKind::from(kind.as_str()),
        }
    }

    /// Checks the rule's own parameters. Request-dependent problems (a missing
    /// `$param`, for instance) can only be found at verification time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::IdentityRequired | Self::IdentityForbidden => Ok(()),
            Self::RoleRequired { role } => {
                if role.is_empty() {
                    return Err(ConfigError::InvalidRule(String::from(
                        "role rule requires a non-empty role",
                    )));
                }
                Ok(())
            }
            Self::PrivilegeRequired {
                resource,
                privilege,
            } => {
                if resource.is_empty() || resource == "$" {
                    return Err(ConfigError::InvalidRule(format!(
                        "privilege rule has invalid resource '{resource}'"
                    )));
                }
                if privilege.is_empty() {
                    return Err(ConfigError::InvalidRule(format!(
                        "privilege rule on '{resource}' requires a non-empty privilege"
                    )));
                }
                Ok(())
            }
            Self::Custom { kind, args } => {
                if kind.is_empty() {
                    return Err(ConfigError::InvalidRule(String::from(
                        "custom rule requires a non-empty kind",
                    )));
                }
                if RuleKind::from(kind.as_str()).is_builtin() {
                    return Err(ConfigError::InvalidRule(format!(
                        "custom rule cannot use built-in kind '{kind}'"
                    )));
                }
                if args.contains_key("kind") {
                    return Err(ConfigError::InvalidRule(format!(
                        "custom rule '{kind}' cannot take an argument named 'kind'"
                    )));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentityRequired => write!(f, "identity"),
            Self::IdentityForbidden => write!(f, "no_identity"),
            Self::RoleRequired { role } => write!(f, "role({role})"),
            Self::PrivilegeRequired {
                resource,
                privilege,
            } => write!(f, "privilege({resource} / {privilege})"),
            Self::Custom { kind, .. } => write!(f, "{kind}(..)"),
        }
    }
}

/// Flat on-disk shape of a rule: a `kind` tag plus string arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRule {
    kind: String,

    #[serde(flatten)]
    args: BTreeMap<String, String>,
}

impl RawRule {
    fn take(&mut self, name: &str) -> Result<String, String> {
        self.args
            .remove(name)
            .ok_or_else(|| format!("rule '{}' is missing field '{name}'", self.kind))
    }

    fn finish(self, rule: Rule) -> Result<Rule, String> {
        if let Some(name) = self.args.keys().next() {
            return Err(format!("rule '{}' has unknown field '{name}'", self.kind));
        }
        Ok(rule)
    }
}

impl TryFrom<RawRule> for Rule {
    type Error = String;

    fn try_from(mut raw: RawRule) -> Result<Self, Self::Error> {
        let kind = RuleKind::from(raw.kind.as_str());
        if kind == RuleKind::IDENTITY {
            return raw.finish(Rule::IdentityRequired);
        }
        if kind == RuleKind::NO_IDENTITY {
            return raw.finish(Rule::IdentityForbidden);
        }
        if kind == RuleKind::ROLE {
            let role = raw.take("role")?;
            return raw.finish(Rule::RoleRequired { role });
        }
        if kind == RuleKind::PRIVILEGE {
            let resource = raw.take("resource")?;
            let privilege = raw.take("privilege")?;
            return raw.finish(Rule::PrivilegeRequired {
                resource,
                privilege,
            });
        }

        Ok(Rule::Custom {
            kind: raw.kind,
            args: raw.args,
        })
    }
}

impl From<Rule> for RawRule {
    fn from(rule: Rule) -> Self {
        let kind = rule.kind().to_string();
        let args = match rule {
            Rule::IdentityRequired | Rule::IdentityForbidden => BTreeMap::new(),
            Rule::RoleRequired { role } => BTreeMap::from([(String::from("role"), role)]),
            Rule::PrivilegeRequired {
                resource,
                privilege,
            } => BTreeMap::from([
                (String::from("resource"), resource),
                (String::from("privilege"), privilege),
            ]),
            Rule::Custom { args, .. } => args,
        };
        Self { kind, args }
    }
}

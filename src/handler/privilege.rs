use std::sync::Arc;

use crate::context::ResourceRef;
use crate::error::VerifyError;
use crate::request::Request;
use crate::resolver::AuthorizatorResolver;
use crate::rule::Rule;

use super::{check_valid, unexpected_rule, RuleHandler};

/// Asks the namespace's authorizator for a privilege on a resource.
///
/// The resource of a rule is one of:
/// * `$this` - the handler name of the request target (`Test` in `Admin:Test`)
/// * `$name` - the request parameter `name`, which must be a [`crate::Resource`]
/// * anything else - a literal resource name
pub struct PrivilegeRuleHandler {
    authorizators: Arc<AuthorizatorResolver>,
}

impl PrivilegeRuleHandler {
    /// Creates a new instance of PrivilegeRuleHandler
    ///
    /// # Arguments
    /// * `authorizators` - Authorizators by namespace, the request target's
    ///   namespace picks the one asked for the privilege
    ///
    /// # Returns
    /// * A handler for [`Rule::PrivilegeRequired`] rules
    pub fn new(authorizators: Arc<AuthorizatorResolver>) -> Self {
        Self { authorizators }
    }
}

impl RuleHandler for PrivilegeRuleHandler {
    fn check_rule(&self, rule: &Rule, req: &Request) -> Result<(), VerifyError> {
        let (resource, privilege) = match rule {
            Rule::PrivilegeRequired {
                resource,
                privilege,
            } => (resource, privilege),
            _ => return Err(unexpected_rule(rule, "privilege")),
        };
        check_valid(rule)?;

        let authorizator = self.authorizators.resolve(req.namespace())?;
        let target = resolve_resource(rule, resource, req)?;

        if !authorizator.is_allowed(target, privilege) {
            return Err(VerifyError::FailedAuthorization {
                rule: rule.clone(),
                message: format!(
                    "Required privilege '{} / {privilege}' is not granted.",
                    target.resource_id()
                ),
            });
        }

        Ok(())
    }
}

fn resolve_resource<'a>(
    rule: &Rule,
    resource: &'a str,
    req: &'a Request,
) -> Result<ResourceRef<'a>, VerifyError> {
    if resource == "$this" {
        let name = req.target_name();
        if name.is_empty() {
            return Err(VerifyError::InvalidRuleArgument {
                rule: rule.clone(),
                message: format!(
                    "Resource '$this' cannot be resolved, request '{}' has no handler name.",
                    req.target()
                ),
            });
        }
        return Ok(ResourceRef::Name(name));
    }

    let name = match resource.strip_prefix('$') {
        Some(name) => name,
        None => return Ok(ResourceRef::Name(resource)),
    };

    let param = match req.parameter(name) {
        Some(param) => param,
        None => {
            return Err(VerifyError::InvalidRuleArgument {
                rule: rule.clone(),
                message: format!("Missing parameter '{resource}' in given request."),
            })
        }
    };

    match param.as_resource() {
        Some(entity) => Ok(ResourceRef::Resource(&**entity)),
        None => Err(VerifyError::InvalidRuleArgument {
            rule: rule.clone(),
            message: format!(
                "Parameter '{resource}' is not an instance of a capability-bearing resource."
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ErrorKind;
    use crate::request::Parameter;
    use crate::testing::{authorizators, MockAuthorizator, MockResource};

    use super::*;

    fn build_handler(authorizator: &Arc<MockAuthorizator>) -> PrivilegeRuleHandler {
        PrivilegeRuleHandler::new(authorizators("Admin", authorizator.clone()))
    }

    #[test]
    fn test_literal_true() {
        let authorizator = Arc::new(MockAuthorizator::allow_all());
        let handler = build_handler(&authorizator);

        let req = Request::new("Admin:Test", "GET");
        handler
            .check_rule(&Rule::privilege("resource", "privilege"), &req)
            .unwrap();
        assert_eq!(
            authorizator.calls(),
            vec![(String::from("Name(\"resource\")"), String::from("privilege"))]
        );
    }

    #[test]
    fn test_literal_false() {
        let authorizator = Arc::new(MockAuthorizator::deny_all());
        let handler = build_handler(&authorizator);
        let rule = Rule::privilege("resource", "privilege");

        let req = Request::new("Admin:Test", "GET");
        let err = handler.check_rule(&rule, &req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FailedAuthorization);
        assert_eq!(
            err.to_string(),
            "Required privilege 'resource / privilege' is not granted."
        );
        assert_eq!(err.rule(), Some(&rule));
    }

    #[test]
    fn test_this() {
        let authorizator = Arc::new(MockAuthorizator::allow_all());
        let handler = build_handler(&authorizator);

        let req = Request::new("Admin:Test", "GET");
        handler
            .check_rule(&Rule::privilege("$this", "privilege"), &req)
            .unwrap();
        assert_eq!(
            authorizator.calls(),
            vec![(String::from("Name(\"Test\")"), String::from("privilege"))]
        );
    }

    #[test]
    fn test_this_false() {
        let authorizator = Arc::new(MockAuthorizator::deny_all());
        let handler = build_handler(&authorizator);

        let req = Request::new("Admin:Test", "GET");
        let err = handler
            .check_rule(&Rule::privilege("$this", "privilege"), &req)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required privilege 'Test / privilege' is not granted."
        );
    }

    #[test]
    fn test_resource_parameter() {
        let authorizator = Arc::new(MockAuthorizator::allow_all());
        let handler = build_handler(&authorizator);
        let entity = Arc::new(MockResource::new("entity"));

        let req = Request::new("Admin:Test", "GET")
            .with_parameter("entity", Parameter::Resource(entity.clone()));
        handler
            .check_rule(&Rule::privilege("$entity", "privilege"), &req)
            .unwrap();
        assert_eq!(
            authorizator.calls(),
            vec![(
                String::from("Resource(MockResource(entity))"),
                String::from("privilege")
            )]
        );
        // The id is only needed for the failure message.
        assert_eq!(entity.calls(), 0);
    }

    #[test]
    fn test_resource_parameter_false() {
        let authorizator = Arc::new(MockAuthorizator::deny_all());
        let handler = build_handler(&authorizator);
        let entity = Arc::new(MockResource::new("entity"));

        let req = Request::new("Admin:Test", "GET")
            .with_parameter("entity", Parameter::Resource(entity.clone()));
        let err = handler
            .check_rule(&Rule::privilege("$entity", "privilege"), &req)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FailedAuthorization);
        assert_eq!(
            err.to_string(),
            "Required privilege 'entity / privilege' is not granted."
        );
        assert_eq!(entity.calls(), 1);
    }

    #[test]
    fn test_missing_parameter() {
        let authorizator = Arc::new(MockAuthorizator::allow_all());
        let handler = build_handler(&authorizator);
        let rule = Rule::privilege("$entity", "privilege");

        let req = Request::new("Admin:Test", "GET");
        let err = handler.check_rule(&rule, &req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRuleArgument);
        assert_eq!(
            err.to_string(),
            "Missing parameter '$entity' in given request."
        );
        assert_eq!(err.rule(), Some(&rule));
        assert!(authorizator.calls().is_empty());
    }

    #[test]
    fn test_wrong_parameter() {
        let authorizator = Arc::new(MockAuthorizator::allow_all());
        let handler = build_handler(&authorizator);

        let req = Request::new("Admin:Test", "GET").with_parameter("entity", json!({"id": 1}));
        let err = handler
            .check_rule(&Rule::privilege("$entity", "privilege"), &req)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRuleArgument);
        assert_eq!(
            err.to_string(),
            "Parameter '$entity' is not an instance of a capability-bearing resource."
        );
        assert!(authorizator.calls().is_empty());
    }

    #[test]
    fn test_invalid_rule() {
        let authorizator = Arc::new(MockAuthorizator::deny_all());
        let handler = build_handler(&authorizator);
        let req = Request::new("Admin:Test", "GET");

        let rules = [
            Rule::privilege("", ""),
            Rule::privilege("resource", ""),
            Rule::privilege("$", "privilege"),
        ];
        for rule in rules {
            let err = handler.check_rule(&rule, &req).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRuleArgument, "{rule}");
            assert!(!err.is_denial());
            assert_eq!(err.rule(), Some(&rule));
        }
        assert!(authorizator.calls().is_empty());
    }

    #[test]
    fn test_this_without_name() {
        let authorizator = Arc::new(MockAuthorizator::deny_all());
        let handler = build_handler(&authorizator);

        let req = Request::new("Admin:", "GET");
        let err = handler
            .check_rule(&Rule::privilege("$this", "view"), &req)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRuleArgument);
        assert_eq!(
            err.to_string(),
            "Resource '$this' cannot be resolved, request 'Admin:' has no handler name."
        );
        assert!(authorizator.calls().is_empty());
    }

    #[test]
    fn test_unknown_namespace() {
        let authorizator = Arc::new(MockAuthorizator::allow_all());
        let handler = build_handler(&authorizator);

        let req = Request::new("Test", "GET");
        let err = handler
            .check_rule(&Rule::privilege("resource", "privilege"), &req)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(authorizator.calls().is_empty());
    }
}

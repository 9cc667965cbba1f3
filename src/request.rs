use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use serde_json::Value;

/// A value that exposes a stable resource identifier, usable in a permission
/// check in place of a plain resource name.
pub trait Resource: Debug + Send + Sync {
    fn resource_id(&self) -> String;
}

/// A named request parameter.
///
/// Parameters are either plain values (ids, query strings, ...) or entities
/// loaded by the host that carry a resource identifier.
#[derive(Clone)]
pub enum Parameter {
    Value(Value),
    Resource(Arc<dyn Resource>),
}

impl Parameter {
    pub fn resource(resource: impl Resource + 'static) -> Self {
        Self::Resource(Arc::new(resource))
    }

    /// Returns the capability-bearing resource, if this parameter is one.
    pub fn as_resource(&self) -> Option<&Arc<dyn Resource>> {
        match self {
            Self::Resource(resource) => Some(resource),
            Self::Value(_) => None,
        }
    }
}

impl Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Resource(resource) => f.debug_tuple("Resource").field(resource).finish(),
        }
    }
}

impl From<Value> for Parameter {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Arc<dyn Resource>> for Parameter {
    fn from(resource: Arc<dyn Resource>) -> Self {
        Self::Resource(resource)
    }
}

/// The request being verified, read-only to the verifier.
///
/// The target is written as `Namespace:Name`, e.g. `Admin:Test`. Nested
/// namespaces are allowed (`Admin:Blog:Article`); the namespace is everything
/// before the last `:`.
#[derive(Debug, Clone)]
pub struct Request {
    target: String,
    method: String,
    parameters: HashMap<String, Parameter>,
}

impl Request {
    pub fn new(target: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Parameter>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// The full target identifier, namespace included.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The namespace component of the target, empty if the target has none.
    pub fn namespace(&self) -> &str {
        match self.target.rsplit_once(':') {
            Some((namespace, _)) => namespace,
            None => "",
        }
    }

    /// The handler name component of the target.
    pub fn target_name(&self) -> &str {
        match self.target.rsplit_once(':') {
            Some((_, name)) => name,
            None => &self.target,
        }
    }

    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[inline]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    #[inline]
    pub fn parameters(&self) -> &HashMap<String, Parameter> {
        &self.parameters
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug)]
    struct Article;

    impl Resource for Article {
        fn resource_id(&self) -> String {
            String::from("article")
        }
    }

    #[test]
    fn test_target_split() {
        let cases = [
            ("Admin:Test", "Admin", "Test"),
            ("Test", "", "Test"),
            ("Admin:Blog:Article", "Admin:Blog", "Article"),
            (":Test", "", "Test"),
        ];
        for (target, namespace, name) in cases {
            let req = Request::new(target, "GET");
            assert_eq!(req.namespace(), namespace, "namespace of {target}");
            assert_eq!(req.target_name(), name, "name of {target}");
            assert_eq!(req.target(), target);
        }
    }

    #[test]
    fn test_parameters() {
        let req = Request::new("Admin:Test", "POST")
            .with_parameter("id", json!(12))
            .with_parameter("article", Parameter::resource(Article));

        assert_eq!(req.method(), "POST");
        assert_eq!(req.parameters().len(), 2);
        assert!(req.parameter("id").unwrap().as_resource().is_none());

        let article = req.parameter("article").unwrap().as_resource().unwrap();
        assert_eq!(article.resource_id(), "article");

        assert!(req.parameter("missing").is_none());
    }
}

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::handler::RuleHandler;
use crate::rule::RuleKind;

/// Maps each rule kind to the one handler that evaluates it.
///
/// Handlers are registered during startup; afterwards the registry is only
/// read, so it can be shared between request threads without locking.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<RuleKind, Box<dyn RuleHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: RuleKind,
        handler: impl RuleHandler + 'static,
    ) -> Result<(), ConfigError> {
        if self.handlers.contains_key(&kind) {
            return Err(ConfigError::DuplicateHandler(kind));
        }
        self.handlers.insert(kind, Box::new(handler));
        Ok(())
    }

    pub fn lookup(&self, kind: &RuleKind) -> Result<&dyn RuleHandler, ConfigError> {
        match self.handlers.get(kind) {
            Some(handler) => Ok(handler.as_ref()),
            None => Err(ConfigError::UnknownRuleKind(kind.clone())),
        }
    }

    pub fn contains(&self, kind: &RuleKind) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&RuleKind> {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        kinds
    }
}

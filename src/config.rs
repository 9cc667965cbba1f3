use std::collections::HashMap;
use std::{fs, io};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::registry::HandlerRegistry;
use crate::rule::Rule;

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self) -> Result<()>;
}

/// Loads a TOML config file and completes it. A missing file yields the
/// defaults.
pub fn load_config<T>(path: impl AsRef<str>) -> Result<T>
where
    T: CommonConfig + DeserializeOwned,
{
    let path = expandenv("config path", path)?;
    let mut cfg: T = match fs::read_to_string(&path) {
        Ok(s) => toml::from_str(&s).with_context(|| format!("parse config toml: {path}"))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("Config file '{path}' not found, using defaults");
            T::default()
        }
        Err(err) => {
            return Err(err).context(format!("read config file: {path}"));
        }
    };

    cfg.complete().context("validate config")?;
    Ok(cfg)
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}

/// Rule declarations per handler target, for hosts that keep them in a file
/// instead of attaching them in code.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RulesConfig {
    /// Targets and their rules. A target missing here has no rules, which
    /// means every request to it passes verification.
    /// Defaults to empty.
    #[serde(default = "RulesConfig::default_targets")]
    pub targets: Vec<TargetRules>,

    /// Target name to position in `targets`, built by `complete`.
    #[serde(skip)]
    index: HashMap<String, usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TargetRules {
    /// Full target name, e.g. `Admin:Article`.
    pub target: String,

    /// Rules in evaluation order.
    #[serde(default = "TargetRules::default_rules")]
    pub rules: Vec<Rule>,
}

impl CommonConfig for RulesConfig {
    fn default() -> Self {
        Self {
            targets: Self::default_targets(),
            index: HashMap::new(),
        }
    }

    fn complete(&mut self) -> Result<()> {
        let mut index = HashMap::with_capacity(self.targets.len());
        for (pos, target) in self.targets.iter().enumerate() {
            if target.target.is_empty() {
                bail!("target name should not be empty");
            }
            if index.insert(target.target.clone(), pos).is_some() {
                bail!("target '{}' is declared more than once", target.target);
            }
            if target.rules.is_empty() {
                warn!(
                    "Target '{}' declares no rules, every request to it will pass",
                    target.target
                );
            }
            for rule in target.rules.iter() {
                rule.validate()
                    .with_context(|| format!("validate rules of target '{}'", target.target))?;
            }
        }
        self.index = index;
        Ok(())
    }
}

impl RulesConfig {
    pub fn default_targets() -> Vec<TargetRules> {
        vec![]
    }

    /// Rules declared for a target, empty if it declares none.
    ///
    /// Lookups go through the index built by [`CommonConfig::complete`]; a
    /// config that was never completed (or was edited afterwards) falls back
    /// to scanning `targets`.
    pub fn rules_for(&self, target: &str) -> &[Rule] {
        let indexed = self
            .index
            .get(target)
            .and_then(|pos| self.targets.get(*pos))
            .filter(|t| t.target == target);
        if let Some(t) = indexed {
            return &t.rules;
        }
        match self.targets.iter().find(|t| t.target == target) {
            Some(t) => &t.rules,
            None => &[],
        }
    }

    /// Makes sure every declared rule kind has a handler, so that a typo in
    /// the config stops startup instead of failing requests later.
    pub fn check_handlers(&self, registry: &HandlerRegistry) -> Result<(), ConfigError> {
        for target in self.targets.iter() {
            for rule in target.rules.iter() {
                let kind = rule.kind();
                if !registry.contains(&kind) {
                    return Err(ConfigError::UnknownRuleKind(kind));
                }
            }
        }
        Ok(())
    }
}

impl TargetRules {
    pub fn default_rules() -> Vec<Rule> {
        vec![]
    }
}

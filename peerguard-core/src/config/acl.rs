//! Access-control configuration

use serde::{Deserialize, Serialize};

use crate::acl::{compile, Action, Rule};
use crate::error::{AclError, Result};

pub const ENV_DEFAULT_ALLOW: &str = "PG_ACL_DEFAULT_ALLOW";
pub const ENV_ALLOW: &str = "PG_ACL_ALLOW";
pub const ENV_DENY: &str = "PG_ACL_DENY";

/// One ACL entry as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub action: Action,
    pub pattern: String,
}

impl RuleConfig {
    pub fn new(action: Action, pattern: impl Into<String>) -> Self {
        Self { action, pattern: pattern.into() }
    }
}

/// Plain ACL description: ordered entries plus the fallback verdict.
///
/// Built up front and handed to
/// [`AccessController::from_config`](crate::acl::AccessController::from_config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclConfig {
    #[serde(default)]
    pub default_allow: bool,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl AclConfig {
    /// Read the ACL from the process environment.
    ///
    /// `PG_ACL_ALLOW` entries come before `PG_ACL_DENY` entries, each in the
    /// order they are listed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_DEFAULT_ALLOW) {
            config.default_allow = parse_flag(ENV_DEFAULT_ALLOW, &raw)?;
        }
        for pattern in parse_csv(&lookup(ENV_ALLOW).unwrap_or_default()) {
            config.rules.push(RuleConfig::new(Action::Allow, pattern));
        }
        for pattern in parse_csv(&lookup(ENV_DENY).unwrap_or_default()) {
            config.rules.push(RuleConfig::new(Action::Deny, pattern));
        }
        Ok(config)
    }

    pub fn with_default_allow(mut self, default_allow: bool) -> Self {
        self.default_allow = default_allow;
        self
    }

    pub fn allow(mut self, pattern: impl Into<String>) -> Self {
        self.rules.push(RuleConfig::new(Action::Allow, pattern));
        self
    }

    pub fn deny(mut self, pattern: impl Into<String>) -> Self {
        self.rules.push(RuleConfig::new(Action::Deny, pattern));
        self
    }

    /// Compile every entry, stopping at the first invalid pattern
    pub fn compile(&self) -> Result<Vec<Rule>> {
        self.rules.iter().map(|r| compile(r.action, &r.pattern)).collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.compile().map(|_| ())
    }
}

/// Resolve the effective ACL configuration.
/// Precedence: builder > env
pub fn resolve_acl_config(builder: Option<AclConfig>) -> Result<AclConfig> {
    resolve_acl_config_with(builder, |key| std::env::var(key).ok())
}

/// Same as [`resolve_acl_config`] with a custom variable source.
/// The environment is not read at all when a builder value is given.
pub fn resolve_acl_config_with(
    builder: Option<AclConfig>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AclConfig> {
    match builder {
        Some(config) => Ok(config),
        None => AclConfig::from_lookup(lookup),
    }
}

pub(crate) fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AclError::Config(format!("{} must be a boolean, got '{}'", key, other))),
    }
}

fn parse_csv(csv: &str) -> Vec<String> {
    csv.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_lists_allow_before_deny() {
        let cfg = AclConfig::from_lookup(lookup(&[
            (ENV_DEFAULT_ALLOW, "true"),
            (ENV_DENY, "8.8.8.8"),
            (ENV_ALLOW, " 10.0.0.0/8 , ,192.168.*.*"),
        ]))
        .unwrap();
        assert!(cfg.default_allow);
        assert_eq!(
            cfg.rules,
            vec![
                RuleConfig::new(Action::Allow, "10.0.0.0/8"),
                RuleConfig::new(Action::Allow, "192.168.*.*"),
                RuleConfig::new(Action::Deny, "8.8.8.8"),
            ]
        );
    }

    #[test]
    fn missing_env_gives_deny_by_default() {
        let cfg = AclConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AclConfig::default());
        assert!(!cfg.default_allow);
    }

    #[test]
    fn bad_flag_is_a_config_error() {
        let err = AclConfig::from_lookup(lookup(&[(ENV_DEFAULT_ALLOW, "maybe")])).unwrap_err();
        assert!(matches!(err, AclError::Config(_)));
    }

    #[test]
    fn validate_reports_first_bad_pattern() {
        let cfg = AclConfig::default().allow("10.0.0.0/8").deny("10.0.0").allow("nope");
        match cfg.validate().unwrap_err() {
            AclError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "10.0.0"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn builder_takes_precedence_over_env() {
        let builder = AclConfig::default().with_default_allow(true).deny("1.2.3.4");
        let eff = resolve_acl_config(Some(builder.clone())).unwrap();
        assert_eq!(eff, builder);
    }

    #[test]
    fn deserializes_from_json() {
        let cfg: AclConfig = serde_json::from_str(
            r#"{"default_allow":true,"rules":[{"action":"deny","pattern":"8.8.8.8"}]}"#,
        )
        .unwrap();
        assert_eq!(cfg, AclConfig::default().with_default_allow(true).deny("8.8.8.8"));

        let empty: AclConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, AclConfig::default());
    }
}

pub mod check;
pub mod serve;

use clap::Args;
use peerguard_core::config::{AclConfig, RuleConfig};
use peerguard_core::Action;

/// Rule flags shared by every subcommand
#[derive(Args, Debug, Default, Clone)]
pub struct RuleArgs {
    /// Ordered rule as `allow:PATTERN` or `deny:PATTERN` (repeatable, applied first)
    #[arg(long = "rule", value_name = "ACTION:PATTERN")]
    pub rules: Vec<String>,

    /// Allow peers matching PATTERN (repeatable, applied after --rule)
    #[arg(long = "allow", value_name = "PATTERN")]
    pub allow: Vec<String>,

    /// Deny peers matching PATTERN (repeatable, applied after --allow)
    #[arg(long = "deny", value_name = "PATTERN")]
    pub deny: Vec<String>,

    /// Allow peers that match no rule
    #[arg(long)]
    pub default_allow: bool,
}

impl RuleArgs {
    /// True when no rule flag was given at all
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.allow.is_empty() && self.deny.is_empty() && !self.default_allow
    }

    /// Build the ACL configuration in evaluation order
    pub fn to_config(&self) -> Result<AclConfig, String> {
        let mut config = AclConfig::default().with_default_allow(self.default_allow);
        for raw in &self.rules {
            config.rules.push(parse_rule(raw)?);
        }
        for pattern in &self.allow {
            config = config.allow(pattern.as_str());
        }
        for pattern in &self.deny {
            config = config.deny(pattern.as_str());
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

/// Split `allow:PATTERN` on the first colon so IPv6 patterns survive intact
fn parse_rule(raw: &str) -> Result<RuleConfig, String> {
    let (action, pattern) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid rule \"{}\": expected ACTION:PATTERN", raw))?;
    let action = match action.trim().to_ascii_lowercase().as_str() {
        "allow" => Action::Allow,
        "deny" => Action::Deny,
        other => return Err(format!("invalid rule action \"{}\": expected allow or deny", other)),
    };
    Ok(RuleConfig::new(action, pattern.trim()))
}

//! Access controller: the public face of the ACL engine

use std::net::IpAddr;

use super::pattern;
use super::rule::{Action, Rule};
use super::rule_set::{RuleSet, Snapshot};
use crate::config::AclConfig;
use crate::error::Result;

/// Ordered allow/deny list with a fallback policy.
///
/// Rules are evaluated first-match-wins in the order they were added. The
/// controller is meant to be shared behind an `Arc`: configuration calls and
/// evaluations may run concurrently, and an evaluation always sees a complete
/// rule list.
///
/// ```rust,ignore
/// let acl = AccessController::new();
/// acl.add_allow("10.0.0.0/8")?.add_deny("10.1.2.3")?;
/// assert!(acl.is_allowed([10, 1, 2, 3]));
/// ```
#[derive(Debug, Default)]
pub struct AccessController {
    rules: RuleSet,
}

impl AccessController {
    /// Empty controller that denies every peer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_allow(default_allow: bool) -> Self {
        Self { rules: RuleSet::new(default_allow) }
    }

    /// Build a controller from a configuration value.
    ///
    /// Every pattern is compiled before anything is stored, so an invalid
    /// entry yields an error and no controller.
    pub fn from_config(config: &AclConfig) -> Result<Self> {
        let controller = Self::with_default_allow(config.default_allow);
        controller.rules.replace(config.compile()?);
        Ok(controller)
    }

    /// Swap in the rules and default policy of `config`.
    ///
    /// On error the current rules and policy are left untouched.
    pub fn apply_config(&self, config: &AclConfig) -> Result<()> {
        let rules = config.compile()?;
        log::info!(
            "Applying ACL configuration: {} rule(s), default {}",
            rules.len(),
            if config.default_allow { "allow" } else { "deny" }
        );
        self.rules.replace(rules);
        self.rules.set_default_allow(config.default_allow);
        Ok(())
    }

    /// Append a rule allowing peers that match `peer`.
    ///
    /// Accepted forms:
    ///
    /// - `a.b.c.d` literal IPv4 address
    /// - `a.b.*.*` wildcard IPv4 address
    /// - `a.b.c.0/24` IPv4 address with prefix length
    /// - `a:b:c:d:e:f:g:h` literal IPv6 address
    /// - `a:b:*:*:*:*:*:*` wildcard IPv6 address
    /// - `a:b:c:d:e:f:g:0/120` IPv6 address with prefix length
    pub fn add_allow(&self, peer: &str) -> Result<&Self> {
        self.add_rule(Action::Allow, peer)
    }

    /// Append a rule denying peers that match `peer`. Same forms as
    /// [`add_allow`](Self::add_allow).
    pub fn add_deny(&self, peer: &str) -> Result<&Self> {
        self.add_rule(Action::Deny, peer)
    }

    pub fn add_rule(&self, action: Action, peer: &str) -> Result<&Self> {
        let rule = pattern::compile(action, peer)?;
        log::debug!("ACL rule added: {}", rule);
        self.rules.append(rule);
        Ok(self)
    }

    /// Drop every rule. The default policy is kept.
    pub fn clear_rules(&self) -> &Self {
        self.rules.clear();
        log::info!("ACL rules cleared");
        self
    }

    pub fn default_allow(&self) -> bool {
        self.rules.default_allow()
    }

    pub fn set_default_allow(&self, default_allow: bool) -> &Self {
        self.rules.set_default_allow(default_allow);
        self
    }

    /// Verdict for a raw 4 or 16 byte address.
    ///
    /// Never fails: an address of any other length matches no rule and gets
    /// the default policy.
    pub fn is_allowed(&self, address: impl AsRef<[u8]>) -> bool {
        self.rules.evaluate(address.as_ref())
    }

    /// Verdict for an IP address. IPv4-mapped IPv6 addresses are checked as
    /// IPv4.
    pub fn is_ip_allowed(&self, ip: IpAddr) -> bool {
        match ip.to_canonical() {
            IpAddr::V4(v4) => self.is_allowed(v4.octets()),
            IpAddr::V6(v6) => self.is_allowed(v6.octets()),
        }
    }

    /// Current rules, in evaluation order
    pub fn rules(&self) -> Snapshot {
        self.rules.snapshot()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<&AclConfig> for AccessController {
    type Error = crate::error::AclError;

    fn try_from(config: &AclConfig) -> Result<Self> {
        Self::from_config(config)
    }
}

impl From<Vec<Rule>> for AccessController {
    fn from(rules: Vec<Rule>) -> Self {
        let controller = Self::new();
        controller.rules.replace(rules);
        controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn v4(s: &str) -> [u8; 4] {
        s.parse::<Ipv4Addr>().unwrap().octets()
    }

    fn v6(s: &str) -> [u8; 16] {
        s.parse::<Ipv6Addr>().unwrap().octets()
    }

    #[test]
    fn empty_controller_uses_default_policy() {
        let acl = AccessController::new();
        assert!(!acl.default_allow());
        assert!(!acl.is_allowed(v4("1.2.3.4")));
        assert!(!acl.is_allowed(v6("::1")));

        acl.set_default_allow(true);
        assert!(acl.is_allowed(v4("1.2.3.4")));
        assert!(acl.is_allowed(v6("::1")));
    }

    #[test]
    fn slash_rule_round_trip() {
        let acl = AccessController::new();
        acl.add_allow("10.0.0.0/8").unwrap();
        assert!(acl.is_allowed(v4("10.1.2.3")));
        assert!(!acl.is_allowed(v4("11.0.0.1")));
    }

    #[test]
    fn first_match_wins_in_both_orders() {
        let acl = AccessController::new();
        acl.add_allow("10.*.*.*").unwrap().add_deny("10.0.0.0/8").unwrap();
        assert!(acl.is_allowed(v4("10.9.9.9")));

        acl.clear_rules();
        acl.add_deny("10.0.0.0/8").unwrap().add_allow("10.*.*.*").unwrap();
        assert!(!acl.is_allowed(v4("10.9.9.9")));
    }

    #[test]
    fn earlier_broad_allow_beats_later_specific_deny() {
        let acl = AccessController::new();
        acl.add_allow("10.0.0.0/8").unwrap().add_deny("10.1.2.3").unwrap();
        assert!(acl.is_allowed(v4("10.1.2.3")));
    }

    #[test]
    fn later_broad_allow_does_not_beat_earlier_specific_deny() {
        let acl = AccessController::new();
        acl.add_deny("10.1.2.3").unwrap().add_allow("10.0.0.0/8").unwrap();
        assert!(!acl.is_allowed(v4("10.1.2.3")));
        assert!(acl.is_allowed(v4("10.1.2.4")));
    }

    #[test]
    fn slash_rule_with_host_bits_never_matches() {
        let acl = AccessController::new();
        acl.add_allow("10.0.0.1/8").unwrap();
        assert_eq!(acl.len(), 1);
        assert!(!acl.is_allowed(v4("10.0.0.1")));
        assert!(!acl.is_allowed(v4("10.9.9.9")));
        assert!(!acl.is_allowed(v4("10.0.0.0")));

        acl.clear_rules().set_default_allow(true);
        acl.add_deny("2001:db8:0:0:0:0:0:1/32").unwrap();
        assert!(acl.is_allowed(v6("2001:db8::1")));
        assert!(acl.is_allowed(v6("2001:db8::")));
    }

    #[test]
    fn default_allow_with_single_deny() {
        let acl = AccessController::with_default_allow(true);
        acl.add_deny("8.8.8.8").unwrap();
        assert!(!acl.is_allowed(v4("8.8.8.8")));
        assert!(acl.is_allowed(v4("1.1.1.1")));
    }

    #[test]
    fn clear_removes_all_rule_effects() {
        let acl = AccessController::new();
        acl.add_allow("1.1.1.1").unwrap().add_allow("0:0:0:0:0:0:0:1").unwrap();
        assert!(acl.is_allowed(v4("1.1.1.1")));

        acl.clear_rules();
        assert!(acl.is_empty());
        assert!(!acl.is_allowed(v4("1.1.1.1")));
        assert!(!acl.is_allowed(v6("::1")));
    }

    #[test]
    fn families_never_cross_match() {
        let acl = AccessController::new();
        acl.add_allow("0:0:0:0:0:0:0:0/0").unwrap();
        assert!(acl.is_allowed(v6("2001:db8::1")));
        assert!(!acl.is_allowed(v4("10.0.0.1")));

        acl.clear_rules();
        acl.add_allow("*.*.*.*").unwrap();
        assert!(acl.is_allowed(v4("10.0.0.1")));
        assert!(!acl.is_allowed(v6("::a00:1")));
    }

    #[test]
    fn invalid_pattern_leaves_rules_unchanged() {
        let acl = AccessController::new();
        acl.add_allow("192.168.1.0/24").unwrap();

        let err = acl.add_allow("not.an.address").unwrap_err();
        assert!(err.is_invalid_pattern());
        assert_eq!(acl.len(), 1);
        assert!(acl.is_allowed(v4("192.168.1.77")));
        assert!(!acl.is_allowed(v4("192.168.2.1")));
    }

    #[test]
    fn odd_length_addresses_get_default_policy() {
        let acl = AccessController::with_default_allow(true);
        acl.add_deny("*.*.*.*").unwrap();
        acl.add_deny("*:*:*:*:*:*:*:*").unwrap();
        assert!(acl.is_allowed([0u8; 0]));
        assert!(acl.is_allowed([1, 2, 3]));
        assert!(acl.is_allowed(vec![0u8; 8]));
    }

    #[test]
    fn ipv4_mapped_addresses_are_checked_as_ipv4() {
        let acl = AccessController::new();
        acl.add_allow("127.0.0.1").unwrap();
        let mapped: IpAddr = "::ffff:127.0.0.1".parse().unwrap();
        assert!(acl.is_ip_allowed(mapped));
        assert!(acl.is_ip_allowed(IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert!(!acl.is_ip_allowed(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn rules_snapshot_keeps_original_patterns() {
        let acl = AccessController::new();
        acl.add_allow("10.0.0.0/8").unwrap().add_deny("2001:db8:*:*:*:*:*:*").unwrap();
        let listed: Vec<String> = acl.rules().iter().map(|r| r.to_string()).collect();
        assert_eq!(listed, vec!["allow 10.0.0.0/8", "deny 2001:db8:*:*:*:*:*:*"]);
    }

    #[test]
    fn from_config_is_all_or_nothing() {
        let good = AclConfig::default().allow("10.0.0.0/8").deny("8.8.8.8");
        let acl = AccessController::from_config(&good).unwrap();
        assert_eq!(acl.len(), 2);

        let bad = good.clone().allow("300.0.0.1");
        assert!(AccessController::try_from(&bad).is_err());
    }

    #[test]
    fn apply_config_failure_keeps_previous_state() {
        let acl = AccessController::new();
        acl.add_allow("1.2.3.4").unwrap();

        let bad = AclConfig { default_allow: true, ..AclConfig::default() }.deny("1.2.3");
        assert!(acl.apply_config(&bad).is_err());
        assert!(!acl.default_allow());
        assert!(acl.is_allowed(v4("1.2.3.4")));

        let good = AclConfig { default_allow: true, ..AclConfig::default() }.deny("1.2.3.4");
        acl.apply_config(&good).unwrap();
        assert!(acl.default_allow());
        assert!(!acl.is_allowed(v4("1.2.3.4")));
        assert!(acl.is_allowed(v4("5.6.7.8")));
    }
}

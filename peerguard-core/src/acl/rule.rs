//! Compiled ACL rules and the matchers they carry

use std::fmt;

/// Byte length of a 32-bit address
pub const V4_LEN: usize = 4;
/// Byte length of a 128-bit address
pub const V6_LEN: usize = 16;

/// Verdict a rule renders when its matcher accepts an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Allow,
    Deny,
}

impl Action {
    pub fn is_deny(self) -> bool {
        self == Action::Deny
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Deny => "deny",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical form a peer pattern compiles to.
///
/// Both variants carry their address family implicitly through the byte
/// length (4 or 16). Wildcard and slash patterns share the `Prefix` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Byte-for-byte equality
    Exact { bytes: Box<[u8]> },
    /// `address & mask == prefix` on every byte
    Prefix { mask: Box<[u8]>, prefix: Box<[u8]> },
}

impl Matcher {
    pub(crate) fn exact(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() == V4_LEN || bytes.len() == V6_LEN);
        Matcher::Exact { bytes: bytes.into() }
    }

    pub(crate) fn prefix(mask: &[u8], prefix: &[u8]) -> Self {
        debug_assert_eq!(mask.len(), prefix.len());
        debug_assert!(mask.len() == V4_LEN || mask.len() == V6_LEN);
        Matcher::Prefix { mask: mask.into(), prefix: prefix.into() }
    }

    /// Byte length of the family this matcher applies to
    pub fn family_len(&self) -> usize {
        match self {
            Matcher::Exact { bytes } => bytes.len(),
            Matcher::Prefix { mask, .. } => mask.len(),
        }
    }

    /// Test a candidate address. A length mismatch is a non-match.
    #[inline]
    pub fn matches(&self, address: &[u8]) -> bool {
        match self {
            Matcher::Exact { bytes } => &bytes[..] == address,
            Matcher::Prefix { mask, prefix } => {
                address.len() == mask.len()
                    && address
                        .iter()
                        .zip(mask.iter().zip(prefix.iter()))
                        .all(|(a, (m, p))| a & m == *p)
            }
        }
    }
}

/// An immutable ACL entry: action, compiled matcher, and the pattern it came from
#[derive(Clone, PartialEq, Eq)]
pub struct Rule {
    action: Action,
    pattern: String,
    matcher: Matcher,
}

impl Rule {
    pub fn new(action: Action, pattern: impl Into<String>, matcher: Matcher) -> Self {
        Self { action, pattern: pattern.into(), matcher }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn is_deny(&self) -> bool {
        self.action.is_deny()
    }

    /// The source string, as written by whoever configured the rule
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    #[inline]
    pub fn matches(&self, address: &[u8]) -> bool {
        self.matcher.matches(address)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.pattern)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.matcher {
            Matcher::Exact { .. } => "Exact",
            Matcher::Prefix { .. } => "Prefix",
        };
        write!(f, "{}{{deny={}, pattern='{}'}}", kind, self.is_deny(), self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_same_length() {
        let m = Matcher::exact(&[10, 0, 0, 1]);
        assert!(m.matches(&[10, 0, 0, 1]));
        assert!(!m.matches(&[10, 0, 0, 2]));

        let mut mapped = [0u8; 16];
        mapped[12..].copy_from_slice(&[10, 0, 0, 1]);
        assert!(!m.matches(&mapped));
        assert!(!m.matches(&[10, 0, 0]));
    }

    #[test]
    fn prefix_masks_candidate_bytes() {
        let m = Matcher::prefix(&[0xFF, 0xFF, 0, 0], &[192, 168, 0, 0]);
        assert!(m.matches(&[192, 168, 7, 9]));
        assert!(!m.matches(&[192, 169, 7, 9]));
        assert!(!m.matches(&[0u8; 16]));
    }

    #[test]
    fn zero_mask_matches_whole_family_only() {
        let m = Matcher::prefix(&[0; 4], &[0; 4]);
        assert!(m.matches(&[1, 2, 3, 4]));
        assert!(m.matches(&[255, 255, 255, 255]));
        assert!(!m.matches(&[0; 16]));
        assert_eq!(m.family_len(), V4_LEN);
    }

    #[test]
    fn display_and_debug_keep_original_pattern() {
        let matcher = Matcher::prefix(&[0xFF, 0, 0, 0], &[10, 0, 0, 0]);
        let rule = Rule::new(Action::Deny, "10.*.*.*", matcher);
        assert_eq!(rule.to_string(), "deny 10.*.*.*");
        assert_eq!(format!("{:?}", rule), "Prefix{deny=true, pattern='10.*.*.*'}");
    }

    #[test]
    fn action_serializes_lowercase() {
        let json = serde_json::to_string(&Action::Allow).unwrap();
        assert_eq!(json, "\"allow\"");
        let back: Action = serde_json::from_str("\"deny\"").unwrap();
        assert!(back.is_deny());
    }
}

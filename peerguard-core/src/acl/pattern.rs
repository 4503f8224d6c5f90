//! Peer pattern parsing
//!
//! Turns the textual peer patterns accepted by [`AccessController`] into
//! compiled [`Matcher`]s. Six grammars are recognised, tried in a fixed
//! order:
//!
//! | Kind        | Example                    |
//! |-------------|----------------------------|
//! | Exact v4    | `192.168.1.5`              |
//! | Wildcard v4 | `192.168.*.*`              |
//! | Slash v4    | `192.168.1.0/24`           |
//! | Exact v6    | `2001:db8:0:0:0:0:0:1`     |
//! | Wildcard v6 | `2001:db8:*:*:*:*:*:*`     |
//! | Slash v6    | `2001:db8:0:0:0:0:0:0/32`  |
//!
//! IPv6 patterns must spell out all eight groups; `::` compression is not
//! part of the grammar.
//!
//! [`AccessController`]: super::AccessController

use super::rule::{Action, Matcher, Rule, V4_LEN, V6_LEN};
use crate::error::{AclError, Result};

const WILDCARD: &str = "*";
const V4_GROUPS: usize = 4;
const V6_GROUPS: usize = 8;

/// Which of the six grammars a pattern belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    ExactV4,
    WildcardV4,
    SlashV4,
    ExactV6,
    WildcardV6,
    SlashV6,
}

impl PatternKind {
    /// Every kind, in the order [`classify`] tries them
    pub const ALL: [PatternKind; 6] = [
        PatternKind::ExactV4,
        PatternKind::WildcardV4,
        PatternKind::SlashV4,
        PatternKind::ExactV6,
        PatternKind::WildcardV6,
        PatternKind::SlashV6,
    ];

    fn accepts(self, pattern: &str) -> bool {
        match self {
            PatternKind::ExactV4 => groups_match(pattern, '.', V4_GROUPS, is_decimal_group),
            PatternKind::WildcardV4 => {
                groups_match(pattern, '.', V4_GROUPS, |g| g == WILDCARD || is_decimal_group(g))
            }
            PatternKind::SlashV4 => match pattern.split_once('/') {
                Some((addr, len)) => {
                    PatternKind::ExactV4.accepts(addr) && is_digits(len, 1, 2)
                }
                None => false,
            },
            PatternKind::ExactV6 => groups_match(pattern, ':', V6_GROUPS, is_hex_group),
            PatternKind::WildcardV6 => {
                groups_match(pattern, ':', V6_GROUPS, |g| g == WILDCARD || is_hex_group(g))
            }
            PatternKind::SlashV6 => match pattern.split_once('/') {
                Some((addr, len)) => {
                    PatternKind::ExactV6.accepts(addr) && is_digits(len, 1, 3)
                }
                None => false,
            },
        }
    }
}

fn groups_match(s: &str, sep: char, count: usize, group_ok: impl Fn(&str) -> bool) -> bool {
    let mut seen = 0;
    for group in s.split(sep) {
        seen += 1;
        if seen > count || !group_ok(group) {
            return false;
        }
    }
    seen == count
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal_group(g: &str) -> bool {
    is_digits(g, 1, 3)
}

fn is_hex_group(g: &str) -> bool {
    (1..=4).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Find the first grammar that structurally accepts `pattern`
pub fn classify(pattern: &str) -> Option<PatternKind> {
    PatternKind::ALL.into_iter().find(|kind| kind.accepts(pattern))
}

/// Compile a peer pattern into a matcher.
///
/// Fails with [`AclError::InvalidPattern`] when the pattern fits none of the
/// grammars, when an IPv4 group is above 255, or when a prefix length is
/// longer than the address.
pub fn parse(pattern: &str) -> Result<Matcher> {
    let kind = classify(pattern).ok_or_else(|| {
        AclError::invalid_pattern(pattern, "not a recognised IPv4 or IPv6 peer pattern")
    })?;

    match kind {
        PatternKind::ExactV4 => Ok(Matcher::exact(&v4_bytes(pattern, pattern)?)),
        PatternKind::WildcardV4 => {
            let mut mask = [0u8; V4_LEN];
            let mut prefix = [0u8; V4_LEN];
            for (i, group) in pattern.split('.').enumerate() {
                if group != WILDCARD {
                    mask[i] = 0xFF;
                    prefix[i] = parse_octet(pattern, group)?;
                }
            }
            Ok(Matcher::prefix(&mask, &prefix))
        }
        PatternKind::SlashV4 => {
            let (addr, len) = split_slash(pattern)?;
            let prefix = v4_bytes(pattern, addr)?;
            let mask = prefix_mask::<V4_LEN>(parse_prefix_len(pattern, len, 32)?);
            warn_on_host_bits(pattern, &mask, &prefix);
            Ok(Matcher::prefix(&mask, &prefix))
        }
        PatternKind::ExactV6 => Ok(Matcher::exact(&v6_bytes(pattern, pattern)?)),
        PatternKind::WildcardV6 => {
            let mut mask = [0u8; V6_LEN];
            let mut prefix = [0u8; V6_LEN];
            for (i, group) in pattern.split(':').enumerate() {
                if group != WILDCARD {
                    let [hi, lo] = parse_hextet(pattern, group)?.to_be_bytes();
                    mask[i * 2] = 0xFF;
                    mask[i * 2 + 1] = 0xFF;
                    prefix[i * 2] = hi;
                    prefix[i * 2 + 1] = lo;
                }
            }
            Ok(Matcher::prefix(&mask, &prefix))
        }
        PatternKind::SlashV6 => {
            let (addr, len) = split_slash(pattern)?;
            let prefix = v6_bytes(pattern, addr)?;
            let mask = prefix_mask::<V6_LEN>(parse_prefix_len(pattern, len, 128)?);
            warn_on_host_bits(pattern, &mask, &prefix);
            Ok(Matcher::prefix(&mask, &prefix))
        }
    }
}

/// Parse `pattern` and wrap it into a rule carrying `action`
pub fn compile(action: Action, pattern: &str) -> Result<Rule> {
    let matcher = parse(pattern)?;
    Ok(Rule::new(action, pattern, matcher))
}

fn split_slash(pattern: &str) -> Result<(&str, &str)> {
    pattern
        .split_once('/')
        .ok_or_else(|| AclError::invalid_pattern(pattern, "missing prefix length"))
}

fn parse_octet(pattern: &str, group: &str) -> Result<u8> {
    let value: u16 = group
        .parse()
        .map_err(|_| AclError::invalid_pattern(pattern, format!("bad IPv4 group '{}'", group)))?;
    u8::try_from(value).map_err(|_| {
        AclError::invalid_pattern(pattern, format!("IPv4 group {} is out of range (0-255)", value))
    })
}

fn parse_hextet(pattern: &str, group: &str) -> Result<u16> {
    u16::from_str_radix(group, 16)
        .map_err(|_| AclError::invalid_pattern(pattern, format!("bad IPv6 group '{}'", group)))
}

fn v4_bytes(pattern: &str, addr: &str) -> Result<[u8; V4_LEN]> {
    let mut bytes = [0u8; V4_LEN];
    for (i, group) in addr.split('.').enumerate() {
        bytes[i] = parse_octet(pattern, group)?;
    }
    Ok(bytes)
}

fn v6_bytes(pattern: &str, addr: &str) -> Result<[u8; V6_LEN]> {
    let mut bytes = [0u8; V6_LEN];
    for (i, group) in addr.split(':').enumerate() {
        let [hi, lo] = parse_hextet(pattern, group)?.to_be_bytes();
        bytes[i * 2] = hi;
        bytes[i * 2 + 1] = lo;
    }
    Ok(bytes)
}

fn parse_prefix_len(pattern: &str, len: &str, max: u32) -> Result<u32> {
    let bits: u32 = len
        .parse()
        .map_err(|_| AclError::invalid_pattern(pattern, format!("bad prefix length '{}'", len)))?;
    if bits > max {
        return Err(AclError::invalid_pattern(
            pattern,
            format!("prefix length {} is longer than {} bits", bits, max),
        ));
    }
    Ok(bits)
}

/// Leading `bits` ones, built one byte at a time
fn prefix_mask<const N: usize>(bits: u32) -> [u8; N] {
    let mut mask = [0u8; N];
    let mut remaining = bits;
    for byte in mask.iter_mut() {
        if remaining >= 8 {
            *byte = 0xFF;
            remaining -= 8;
        } else {
            *byte = !(0xFFu8 >> remaining);
            break;
        }
    }
    mask
}

// The prefix is kept unmasked, so host bits make the rule unmatchable.
fn warn_on_host_bits(pattern: &str, mask: &[u8], prefix: &[u8]) {
    if mask.iter().zip(prefix).any(|(m, p)| p & !m != 0) {
        log::warn!("Peer pattern '{}' has host bits set past its prefix and will never match", pattern);
    }
}

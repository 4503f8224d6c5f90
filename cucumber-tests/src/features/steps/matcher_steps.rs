use cucumber::then;
use peerguard_core::acl::{classify, parse};

use crate::features::world::{parse_ip, AclWorld};

#[then(expr = "{string} and {string} compile to the same matcher")]
async fn then_same_matcher(_world: &mut AclWorld, left: String, right: String) {
    let a = parse(&left).expect("left pattern should compile");
    let b = parse(&right).expect("right pattern should compile");
    assert_eq!(a, b);
}

#[then(expr = "{string} and {string} agree on {string}")]
async fn then_agree_on(_world: &mut AclWorld, left: String, right: String, address: String) {
    let a = parse(&left).expect("left pattern should compile");
    let b = parse(&right).expect("right pattern should compile");
    let bytes = match parse_ip(&address) {
        std::net::IpAddr::V4(v4) => v4.octets().to_vec(),
        std::net::IpAddr::V6(v6) => v6.octets().to_vec(),
    };
    assert_eq!(a.matches(&bytes), b.matches(&bytes), "disagreement on {}", address);
}

#[then(expr = "{string} is not a recognised pattern")]
async fn then_unrecognised(_world: &mut AclWorld, pattern: String) {
    assert_eq!(classify(&pattern), None);
}

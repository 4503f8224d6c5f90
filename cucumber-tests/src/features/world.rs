use std::net::IpAddr;

use cucumber::World as CucumberWorld;
use peerguard_core::{AccessController, AclError};

/// State shared by the steps of one scenario
#[derive(Debug, Default, CucumberWorld)]
pub struct AclWorld {
    pub controller: AccessController,
    pub last_error: Option<AclError>,
    /// Verdicts recorded before a mutation, keyed by address text
    pub recorded: Vec<(String, bool)>,
}

impl AclWorld {
    /// Raw-byte verdict, so `::10.0.0.1` stays a 16-byte address
    pub fn verdict(&self, address: &str) -> bool {
        match parse_ip(address) {
            IpAddr::V4(v4) => self.controller.is_allowed(v4.octets()),
            IpAddr::V6(v6) => self.controller.is_allowed(v6.octets()),
        }
    }
}

pub fn parse_ip(address: &str) -> IpAddr {
    address
        .parse()
        .unwrap_or_else(|_| panic!("scenario uses an invalid address: {}", address))
}

use std::io::Write;
use std::net::IpAddr;

use peerguard_core::AccessController;

use super::RuleArgs;

/// Evaluate `addresses` against the rules in `args`, one `ADDR allow|deny` line each.
///
/// Returns `Ok(true)` when every address is allowed. Nothing is printed if a
/// rule or an address fails to parse.
pub fn run(args: &RuleArgs, addresses: &[String], out: &mut impl Write) -> Result<bool, String> {
    let config = args.to_config()?;
    let acl = AccessController::from_config(&config).map_err(|e| e.to_string())?;

    let ips = addresses
        .iter()
        .map(|raw| {
            raw.trim()
                .parse::<IpAddr>()
                .map_err(|_| format!("invalid address: \"{}\"", raw))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut all_allowed = true;
    for (raw, ip) in addresses.iter().zip(ips) {
        let allowed = acl.is_ip_allowed(ip);
        all_allowed &= allowed;
        writeln!(out, "{} {}", raw.trim(), if allowed { "allow" } else { "deny" })
            .map_err(|e| format!("failed to write output: {}", e))?;
    }
    Ok(all_allowed)
}

//! Forwarded-port extraction from raw log text

use regex::Regex;
use std::sync::OnceLock;

/// Lowest port accepted from the logs. VPN providers hand out
/// unprivileged ports only, so anything below this is a garbled line.
pub const MIN_FORWARDED_PORT: u16 = 1024;

static PORT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn port_pattern() -> &'static Regex {
    PORT_PATTERN.get_or_init(|| Regex::new(r"(?i)forwarded port is:\s*(\d+)").unwrap())
}

/// Scan log text for the most recently announced forwarded port
///
/// Lines are scanned newest-first so a re-assignment wins over older
/// announcements. Matches outside `1024..=65535` are skipped and the scan
/// continues with older lines.
pub fn forwarded_port(logs: &str) -> Option<u16> {
    for line in logs.lines().rev() {
        let Some(captures) = port_pattern().captures(line) else {
            continue;
        };

        match captures[1].parse::<u32>() {
            Ok(port) if (MIN_FORWARDED_PORT as u32..=u16::MAX as u32).contains(&port) => {
                return Some(port as u16);
            }
            _ => {
                tracing::debug!(
                    line = %line.trim(),
                    "Ignoring out-of-range forwarded port announcement"
                );
            }
        }
    }

    None
}

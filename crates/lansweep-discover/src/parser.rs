//! Extracts live IPv4 addresses from a discovery report.
//!
//! Text reports interleave status, diagnostic and summary lines with the
//! per-host announcements. Only announcements carry addresses; every other
//! line is skipped without error.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;

use crate::discovery::{NmapRun, RawReport};

/// `scan report for 10.0.0.2` or `scan report for host.lan (10.0.0.2)`.
static ANNOUNCEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"scan report for (?:[^\s()]+ \()?(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?:\)|\s|$)")
        .expect("announcement pattern is valid")
});

/// Live addresses in the order the report lists them.
pub fn live_hosts(report: &RawReport) -> Vec<Ipv4Addr> {
    match report {
        RawReport::Text(text) => text_announcements(text).collect(),
        RawReport::Structured(run) => structured_hosts(run).collect(),
    }
}

/// Lazily walk a text report line by line.
pub fn text_announcements(text: &str) -> impl Iterator<Item = Ipv4Addr> + '_ {
    text.lines().filter_map(|line| {
        let captures = ANNOUNCEMENT.captures(line)?;
        captures[1].parse().ok()
    })
}

fn structured_hosts(run: &NmapRun) -> impl Iterator<Item = Ipv4Addr> + '_ {
    run.hosts
        .iter()
        .filter(|host| host.is_up())
        .filter_map(|host| host.ipv4()?.parse().ok())
}

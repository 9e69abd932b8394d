//! Reporting sink: renders a `ScanOutcome` for humans or machines.

use std::fmt::Display;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::pipeline::ScanOutcome;

pub const NO_DEVICES: &str = "No devices found.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render<W: Write>(outcome: &ScanOutcome, format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Text => render_text(outcome, out),
        OutputFormat::Json => render_json(outcome, out),
    }
}

fn render_text<W: Write>(outcome: &ScanOutcome, out: &mut W) -> io::Result<()> {
    writeln!(out, "Local IP: {}", outcome.local_addr)?;

    if outcome.devices.is_empty() {
        writeln!(out, "{NO_DEVICES}")?;
        return Ok(());
    }

    writeln!(out, "Connected devices:")?;
    for (i, device) in outcome.devices.iter().enumerate() {
        writeln!(
            out,
            "{}. IPv4: {}, IPv6: {}, Hardware Address: {}, Default Route: {}",
            i + 1,
            device.ipv4,
            or_dash(device.ipv6.as_ref()),
            or_dash(device.hardware_addr.as_ref()),
            or_dash(device.default_route.as_ref()),
        )?;
    }
    Ok(())
}

fn or_dash<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    outcome: &'a ScanOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

fn render_json<W: Write>(outcome: &ScanOutcome, out: &mut W) -> io::Result<()> {
    let report = JsonReport {
        outcome,
        message: outcome.devices.is_empty().then_some(NO_DEVICES),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use chrono::Utc;
    use lansweep_core::{Device, NetworkPrefix};
    use uuid::Uuid;

    use super::*;

    fn outcome(devices: Vec<Device>) -> ScanOutcome {
        ScanOutcome {
            scan_id: Uuid::new_v4(),
            started_at: Utc::now(),
            local_addr: "192.168.1.20".to_string(),
            prefix: NetworkPrefix::from_octets(192, 168, 1),
            discovery: "nmap".to_string(),
            devices,
            skipped: Vec::new(),
            duration_ms: 1200,
        }
    }

    fn rendered(outcome: &ScanOutcome, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        render(outcome, format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_lists_devices() {
        let mut own = Device::new(Ipv4Addr::new(192, 168, 1, 20));
        own.hardware_addr = Some("aa:bb:cc:dd:ee:01".to_string());
        own.default_route = Some(Ipv4Addr::new(192, 168, 1, 20));
        let remote = Device::new(Ipv4Addr::new(192, 168, 1, 5));

        let text = rendered(&outcome(vec![remote, own]), OutputFormat::Text);
        assert_eq!(
            text,
            "Local IP: 192.168.1.20\n\
             Connected devices:\n\
             1. IPv4: 192.168.1.5, IPv6: -, Hardware Address: -, Default Route: -\n\
             2. IPv4: 192.168.1.20, IPv6: -, Hardware Address: aa:bb:cc:dd:ee:01, Default Route: 192.168.1.20\n"
        );
    }

    #[test]
    fn test_text_empty_says_so() {
        let text = rendered(&outcome(Vec::new()), OutputFormat::Text);
        assert_eq!(text, "Local IP: 192.168.1.20\nNo devices found.\n");
    }

    #[test]
    fn test_json_shape() {
        let devices = vec![Device::new(Ipv4Addr::new(192, 168, 1, 5))];
        let json: serde_json::Value =
            serde_json::from_str(&rendered(&outcome(devices), OutputFormat::Json)).unwrap();

        assert_eq!(json["prefix"], "192.168.1.0/24");
        assert_eq!(json["devices"][0]["ipv4"], "192.168.1.5");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_json_empty_carries_message() {
        let json: serde_json::Value =
            serde_json::from_str(&rendered(&outcome(Vec::new()), OutputFormat::Json)).unwrap();
        assert_eq!(json["devices"], serde_json::json!([]));
        assert_eq!(json["message"], NO_DEVICES);
    }
}

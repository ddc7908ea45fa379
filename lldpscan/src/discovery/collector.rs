//! Per-switch collection over an open driver.

use log::{debug, warn};

use super::report::{ConnectivityReport, SwitchReport};
use crate::driver::Driver;
use crate::enrich::enrich;
use crate::error::Result;
use crate::model::{ArpTable, SystemInfo};
use crate::parse::{lldp_enabled, parse_arp, parse_lldp, parse_system};
use crate::platform::CommandSet;

/// Query one switch and build its report.
///
/// The neighbor listing is required: a CLI error for it fails the switch.
/// A failed ARP or system command only loses that part of the report.
/// Transport errors from any command propagate.
pub async fn collect_switch<D: Driver>(driver: &mut D, commands: &CommandSet) -> Result<SwitchReport> {
    let host = driver.host().to_string();

    let lldp = driver
        .send_command(&commands.neighbors)
        .await?
        .ensure_success()?;
    let neighbors = parse_lldp(&lldp.result);
    debug!("{}: {} LLDP neighbors", host, neighbors.len());

    let arp_response = driver.send_command(&commands.arp).await?;
    let arp = if arp_response.is_success() {
        parse_arp(&arp_response.result)
    } else {
        warn!(
            "{}: {:?} failed, continuing without ARP data: {}",
            host,
            commands.arp,
            arp_response.failure_message.unwrap_or_default()
        );
        ArpTable::new()
    };
    debug!("{}: {} ARP entries", host, arp.len());

    let system_response = driver.send_command(&commands.system).await?;
    let system = if system_response.is_success() {
        parse_system(&system_response.result)
    } else {
        warn!(
            "{}: {:?} failed, continuing without system data: {}",
            host,
            commands.system,
            system_response.failure_message.unwrap_or_default()
        );
        SystemInfo::default()
    };

    Ok(SwitchReport::new(host, system, enrich(&neighbors, &arp)))
}

/// Check that LLDP is usable on a switch and count what it reports.
pub async fn check_switch<D: Driver>(
    driver: &mut D,
    commands: &CommandSet,
) -> Result<ConnectivityReport> {
    let config = driver.send_command(&commands.lldp_config).await?;
    let enabled = config.is_success() && lldp_enabled(&config.result);

    let neighbors = driver
        .send_command(&commands.neighbors)
        .await?
        .ensure_success()?;
    let arp = driver.send_command(&commands.arp).await?;

    Ok(ConnectivityReport {
        host: driver.host().to_string(),
        lldp_enabled: enabled,
        neighbors: parse_lldp(&neighbors.result).len(),
        arp_entries: if arp.is_success() {
            parse_arp(&arp.result).len()
        } else {
            0
        },
    })
}

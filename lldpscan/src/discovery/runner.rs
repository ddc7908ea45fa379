//! Bounded worker pool over the inventory.

use std::future::Future;

use futures_util::stream::{self, StreamExt};
use log::{error, info, warn};

use super::collector::{check_switch, collect_switch};
use super::config::{Inventory, SwitchConfig};
use super::report::{ConnectivityReport, DiscoveryReport};
use crate::driver::Driver;
use crate::error::Result;
use crate::platform::{PlatformDefinition, PlatformRegistry};

/// Switches queried at the same time unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Run `task` for every switch with at most `concurrency` in flight.
///
/// Results come back in inventory order.
async fn run_pool<'a, T, Fut>(
    switches: &'a [SwitchConfig],
    concurrency: usize,
    task: impl Fn(&'a SwitchConfig) -> Fut,
) -> Vec<(&'a SwitchConfig, T)>
where
    Fut: Future<Output = T>,
{
    stream::iter(switches)
        .map(|switch| {
            let pending = task(switch);
            async move { (switch, pending.await) }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Connect to one switch, run `work` on it and always close the session.
async fn with_session<D, F, T>(
    switch: &SwitchConfig,
    connect: &F,
    work: impl AsyncFnOnce(&mut D, PlatformDefinition) -> Result<T>,
) -> Result<T>
where
    D: Driver,
    F: Fn(&SwitchConfig, PlatformDefinition) -> Result<D>,
{
    let platform = PlatformRegistry::lookup(&switch.device_type)?;
    let mut driver = connect(switch, platform.clone())?;

    let result = match driver.open().await {
        Ok(()) => work(&mut driver, platform).await,
        Err(e) => Err(e),
    };

    if let Err(e) = driver.close().await {
        warn!("{}: error while closing session: {}", switch.host, e);
    }
    result
}

/// Collect LLDP neighbors from every switch in the inventory.
///
/// `connect` builds an unopened driver for a switch; a failure on one switch
/// is logged and recorded and never stops the others.
pub async fn discover<D, F>(inventory: &Inventory, concurrency: usize, connect: F) -> DiscoveryReport
where
    D: Driver,
    F: Fn(&SwitchConfig, PlatformDefinition) -> Result<D>,
{
    info!(
        "starting discovery on {} switch(es), {} at a time",
        inventory.switches.len(),
        concurrency.max(1)
    );

    let connect = &connect;
    let results = run_pool(&inventory.switches, concurrency, |switch| async move {
        info!("{}: collecting", switch.host);
        with_session(switch, connect, async |driver: &mut D, platform: PlatformDefinition| {
            collect_switch(driver, &platform.commands).await
        })
        .await
    })
    .await;

    let mut report = DiscoveryReport::new(inventory.total());
    for (switch, result) in results {
        match result {
            Ok(switch_report) => {
                info!(
                    "{}: {} neighbor(s) discovered",
                    switch.host, switch_report.neighbors_count
                );
                report.record_success(switch_report);
            }
            Err(e) => {
                error!("{}: discovery failed: {}", switch.host, e);
                report.record_failure(&switch.host, e);
            }
        }
    }
    report
}

/// Run the connectivity check against every switch in the inventory.
pub async fn check<D, F>(
    inventory: &Inventory,
    concurrency: usize,
    connect: F,
) -> Vec<(String, Result<ConnectivityReport>)>
where
    D: Driver,
    F: Fn(&SwitchConfig, PlatformDefinition) -> Result<D>,
{
    let connect = &connect;
    run_pool(&inventory.switches, concurrency, |switch| async move {
        with_session(switch, connect, async |driver: &mut D, platform: PlatformDefinition| {
            check_switch(driver, &platform.commands).await
        })
        .await
    })
    .await
    .into_iter()
    .map(|(switch, result)| {
        if let Err(e) = &result {
            error!("{}: check failed: {}", switch.host, e);
        }
        (switch.host.clone(), result)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::testing::FakeDriver;
    use tokio_test::{assert_err, assert_ok};

    const INVENTORY: &str = r#"{"switches": [
        {"host": "10.0.0.2", "username": "admin", "password": "pw"},
        {"host": "10.0.0.3", "username": "admin", "password": "pw"},
        {"host": "10.0.0.4", "username": "admin"},
        {"host": "10.0.0.5", "username": "admin", "password": "pw", "device_type": "aruba_aoscx"},
        {"host": "10.0.0.6", "username": "admin", "password": "pw", "device_type": "junos"}
    ]}"#;

    const NEIGHBORS: &str = "\
Local Port : 1/1/1
Chassis ID : aa:bb:cc:dd:ee:ff
System Name : access-01

Local Port : 1/1/2
Chassis ID : 11:22:33:44:55:66
";

    /// 10.0.0.3 refuses logins; everything else answers.
    fn connect(switch: &SwitchConfig, platform: PlatformDefinition) -> Result<FakeDriver> {
        let commands = &platform.commands;
        let driver = FakeDriver::new(&switch.host)
            .reply(&commands.neighbors, NEIGHBORS)
            .reply(&commands.arp, "10.0.0.50  aa:bb:cc:dd:ee:ff  dynamic 1/1/1\n")
            .reply(&commands.lldp_config, "LLDP Status : Enabled\n");
        Ok(if switch.host == "10.0.0.3" {
            driver.refuse_open()
        } else {
            driver
        })
    }

    #[tokio::test]
    async fn test_discover_isolates_failures() {
        let inventory = Inventory::from_json(INVENTORY, "inline").unwrap();
        let report = discover(&inventory, 2, connect).await;

        assert_eq!(report.summary.total_switches, 5);
        assert_eq!(report.summary.successful_connections, 2);
        assert_eq!(report.summary.total_neighbors, 4);

        let hosts: Vec<&str> = report.switches.keys().map(String::as_str).collect();
        assert_eq!(hosts, vec!["10.0.0.2", "10.0.0.5"]);

        let failed: Vec<&str> = report.failures.keys().map(String::as_str).collect();
        assert_eq!(failed, vec!["10.0.0.3", "10.0.0.6"]);
        assert!(report.failures["10.0.0.3"].contains("Authentication failed"));
        assert!(report.failures["10.0.0.6"].contains("junos"));

        let neighbor = &report.switches["10.0.0.2"].neighbors[0];
        assert_eq!(neighbor.hostname, "access-01");
        assert!(neighbor.ip_addresses.contains("10.0.0.50"));
    }

    #[tokio::test]
    async fn test_discover_uses_platform_commands() {
        let json = r#"{"switches": [
            {"host": "10.0.0.5", "username": "admin", "password": "pw", "device_type": "aruba_aoscx"}
        ]}"#;
        let inventory = Inventory::from_json(json, "inline").unwrap();

        // Only the AOS-CX neighbor command gets an answer.
        let report = discover(&inventory, DEFAULT_CONCURRENCY, |switch, _| {
            Ok(FakeDriver::new(&switch.host).reply("show lldp neighbor-info detail", NEIGHBORS))
        })
        .await;

        assert_eq!(report.summary.total_neighbors, 2);
    }

    #[tokio::test]
    async fn test_repeated_host_counted_once() {
        let json = r#"{"switches": [
            {"host": "10.0.0.2", "username": "admin", "password": "pw"},
            {"host": "10.0.0.2", "username": "admin", "password": "pw"}
        ]}"#;
        let inventory = Inventory::from_json(json, "inline").unwrap();
        let report = discover(&inventory, DEFAULT_CONCURRENCY, connect).await;

        assert_eq!(report.summary.total_switches, 2);
        assert_eq!(report.summary.successful_connections, report.switches.len());
        assert_eq!(report.summary.successful_connections, 1);
        assert_eq!(report.summary.total_neighbors, 2);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_runs() {
        let inventory = Inventory::from_json(INVENTORY, "inline").unwrap();
        let report = discover(&inventory, 0, connect).await;
        assert_eq!(report.summary.successful_connections, 2);
    }

    #[tokio::test]
    async fn test_check() {
        let inventory = Inventory::from_json(INVENTORY, "inline").unwrap();
        let results = check(&inventory, DEFAULT_CONCURRENCY, connect).await;

        let hosts: Vec<&str> = results.iter().map(|(host, _)| host.as_str()).collect();
        assert_eq!(hosts, vec!["10.0.0.2", "10.0.0.3", "10.0.0.5", "10.0.0.6"]);

        let first = assert_ok!(results[0].1.as_ref());
        assert!(first.lldp_enabled);
        assert_eq!(first.neighbors, 2);
        assert_eq!(first.arp_entries, 1);
        assert_err!(results[1].1.as_ref());
        assert_ok!(results[2].1.as_ref());
        assert_err!(results[3].1.as_ref());
    }
}

#![allow(dead_code)]

pub mod runtime;

use nodefleet::domain::compose::{RestartPolicy, ServiceTemplate};
use nodefleet::domain::wallet::{Wallet, WalletSet};

/// Deterministic wallets `0x…01`, `0x…02`, … with matching keys.
pub fn wallets(count: usize) -> WalletSet {
    let wallets = (1..=count)
        .map(|i| Wallet::new(format!("0x{i:040x}"), format!("0x{:064x}", i + 0xa000)))
        .collect();
    WalletSet::try_new(wallets).expect("valid wallet set")
}

pub fn template() -> ServiceTemplate {
    ServiceTemplate {
        image: "compute-node:test".into(),
        network: "fleet_test_net".into(),
        models: vec!["llama3.2:1b".into(), "qwen2.5:0.5b".into()],
        listen_address: "0.0.0.0:8080".into(),
        upstream_host: "172.28.0.1".into(),
        upstream_port: 11434,
        auto_pull: true,
        restart: RestartPolicy::OnFailure,
    }
}

//! Wallet session capability
//!
//! The connected account and chain are owned by whatever wallet integration
//! the caller uses. This crate only reads them and listens for changes.

use tokio::sync::watch;

use crate::contract::ContractConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub account: Option<String>,
    pub chain_id: Option<u64>,
}

impl SessionSnapshot {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

pub trait WalletSession {
    fn snapshot(&self) -> SessionSnapshot;

    /// Receives every account or chain change
    fn subscribe(&self) -> watch::Receiver<SessionSnapshot>;

    fn account(&self) -> Option<String> {
        self.snapshot().account
    }

    fn chain_id(&self) -> Option<u64> {
        self.snapshot().chain_id
    }
}

pub fn on_expected_chain<S: WalletSession + ?Sized>(session: &S, config: &ContractConfig) -> bool {
    session.chain_id() == Some(config.chain_id)
}

/// In-process session, driven by the embedding wallet integration
#[derive(Debug)]
pub struct SharedSession {
    tx: watch::Sender<SessionSnapshot>,
}

impl SharedSession {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { tx }
    }

    pub fn connect(&self, account: impl Into<String>, chain_id: u64) {
        let account = account.into();
        log::info!("Wallet connected: {} on chain {}", account, chain_id);
        self.tx.send_replace(SessionSnapshot {
            account: Some(account),
            chain_id: Some(chain_id),
        });
    }

    pub fn switch_chain(&self, chain_id: u64) {
        log::info!("Wallet switched to chain {}", chain_id);
        self.tx.send_modify(|snapshot| snapshot.chain_id = Some(chain_id));
    }

    pub fn disconnect(&self) {
        log::info!("Wallet disconnected");
        self.tx.send_replace(SessionSnapshot::default());
    }
}

impl Default for SharedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletSession for SharedSession {
    fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }
}

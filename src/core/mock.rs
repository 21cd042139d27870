//! In-memory [`WalletProvider`] for tests.
//!
//! Records every wallet-facing call and lets tests script failures for the
//! next `connect`, `disconnect`, `switch_chain` or `raw_request`.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use alloy_primitives::Address;
use serde_json::Value;

use crate::config::connectors as ids;
use crate::core::error::WalletError;
use crate::core::WalletProvider;
use crate::models::{ConnectionState, Connector, ConnectorKind, Environment};

/// Address handed out by [`MockProvider::connect`].
pub const MOCK_ACCOUNT: &str = "0x00000000000000000000000000000000000000a1";

/// A wallet-facing call observed by the mock.
#[derive(Clone, Debug, PartialEq)]
pub enum MockCall {
    Connect(String),
    Disconnect,
    SwitchChain(u64),
    RawRequest { method: String, params: Value },
    OpenWalletApp(String),
}

#[derive(Default)]
pub struct MockProvider {
    env: Cell<Environment>,
    state: RefCell<ConnectionState>,
    restorable: RefCell<ConnectionState>,
    calls: RefCell<Vec<MockCall>>,
    connect_failures: RefCell<VecDeque<WalletError>>,
    disconnect_failures: RefCell<VecDeque<WalletError>>,
    switch_failures: RefCell<VecDeque<WalletError>>,
    raw_failures: RefCell<VecDeque<WalletError>>,
    yield_before_reply: Cell<bool>,
}

impl MockProvider {
    pub fn new(env: Environment) -> Self {
        Self {
            env: Cell::new(env),
            ..Self::default()
        }
    }

    pub fn set_state(&self, state: ConnectionState) {
        self.state.replace(state);
    }

    /// State returned by the next `restore_session`.
    pub fn set_restorable(&self, state: ConnectionState) {
        self.restorable.replace(state);
    }

    /// Make every async call suspend once before answering, so concurrent
    /// callers interleave.
    pub fn set_yield_before_reply(&self, enabled: bool) {
        self.yield_before_reply.set(enabled);
    }

    pub fn fail_next_connect(&self, err: WalletError) {
        self.connect_failures.borrow_mut().push_back(err);
    }

    pub fn fail_next_disconnect(&self, err: WalletError) {
        self.disconnect_failures.borrow_mut().push_back(err);
    }

    pub fn fail_next_switch(&self, err: WalletError) {
        self.switch_failures.borrow_mut().push_back(err);
    }

    pub fn fail_next_raw_request(&self, err: WalletError) {
        self.raw_failures.borrow_mut().push_back(err);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.borrow_mut().push(call);
    }

    async fn reply(&self) {
        if self.yield_before_reply.get() {
            YieldOnce(false).await;
        }
    }
}

impl WalletProvider for MockProvider {
    fn connection_state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    fn connectors(&self) -> Vec<Connector> {
        vec![
            Connector::new(ids::INJECTED_ID, ids::INJECTED_NAME, ConnectorKind::Injected),
            Connector::new(ids::METAMASK_ID, ids::METAMASK_NAME, ConnectorKind::Extension),
            Connector::new(
                ids::WALLET_CONNECT_ID,
                ids::WALLET_CONNECT_NAME,
                ConnectorKind::RemotePairing,
            ),
        ]
    }

    fn environment(&self) -> Environment {
        self.env.get()
    }

    async fn restore_session(&self) -> ConnectionState {
        self.reply().await;
        let state = self.restorable.borrow().clone();
        self.state.replace(state.clone());
        state
    }

    async fn connect(&self, connector: &Connector) -> Result<ConnectionState, WalletError> {
        self.record(MockCall::Connect(connector.id.clone()));
        self.reply().await;
        if let Some(err) = self.connect_failures.borrow_mut().pop_front() {
            return Err(err);
        }
        let address = MOCK_ACCOUNT
            .parse::<Address>()
            .map_err(|_| WalletError::InvalidAccount(MOCK_ACCOUNT.to_string()))?;
        let state = ConnectionState::connected(address, &connector.id, Some(1));
        self.state.replace(state.clone());
        Ok(state)
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        self.record(MockCall::Disconnect);
        self.reply().await;
        self.state.replace(ConnectionState::default());
        match self.disconnect_failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        self.record(MockCall::SwitchChain(chain_id));
        self.reply().await;
        if let Some(err) = self.switch_failures.borrow_mut().pop_front() {
            return Err(err);
        }
        self.state.borrow_mut().chain_id = Some(chain_id);
        Ok(())
    }

    async fn raw_request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        self.record(MockCall::RawRequest {
            method: method.to_string(),
            params,
        });
        self.reply().await;
        match self.raw_failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(Value::Null),
        }
    }

    fn open_wallet_app(&self, connector: &Connector) {
        self.record(MockCall::OpenWalletApp(connector.id.clone()));
    }
}

/// Returns `Pending` once, then `Ready`.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

use alloy::primitives::{Address, B256, Bytes, LogData};
use anyhow::Result;
use async_trait::async_trait;

/// Read-only contract call (`eth_call` against latest).
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub to: Address,
    pub data: Bytes,
}

/// State-changing contract call, signed by the wallet behind the provider.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct ReceiptLog {
    pub address: Address,
    pub data: LogData,
}

#[derive(Debug, Clone)]
pub struct TransactionReceipt {
    pub tx_hash: B256,
    pub succeeded: bool,
    pub logs: Vec<ReceiptLog>,
}

/// Wallet-backed chain access: account selection, reads, and signed writes.
///
/// Submission is synchronous from the caller's point of view — the provider
/// returns once the transaction receipt is available, with the decodable
/// event logs attached.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn client_version(&self) -> Result<String>;
    async fn request_accounts(&self) -> Result<Vec<Address>>;
    async fn call(&self, req: CallRequest) -> Result<Bytes>;
    async fn send_transaction(&self, req: TransactionRequest) -> Result<TransactionReceipt>;
}

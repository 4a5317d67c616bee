use alloy::primitives::{Address, B256, Bytes, LogData};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use jc_chain_client::{
    CallRequest, ReceiptLog, TransactionReceipt, TransactionRequest, WalletProvider,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const RECEIPT_POLL_ATTEMPTS: u32 = 60;

/// Error body returned by the remote endpoint for a JSON-RPC call.
#[derive(Debug, Error)]
#[error("{method} RPC error {code}: {message}")]
pub struct JsonRpcError {
    pub method: String,
    pub code: i64,
    pub message: String,
}

/// Wallet-backed JSON-RPC provider over HTTP.
///
/// Reads `JOB_GATEWAY_RPC_URL` from environment at construction time
/// (default: `http://localhost:8545`). The endpoint is expected to hold
/// the sender's key — `eth_sendTransaction` is signed remotely, exactly
/// like a browser wallet provider.
pub struct EthRpcProvider {
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl Default for EthRpcProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl EthRpcProvider {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("JOB_GATEWAY_RPC_URL").ok())
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("{method} transport"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("{method} HTTP {status}: {text}");
        }

        let body: RpcResponse = response
            .json()
            .await
            .with_context(|| format!("{method} parse"))?;

        if let Some(error) = body.error {
            return Err(anyhow::Error::new(JsonRpcError {
                method: method.to_owned(),
                code: error.code,
                message: error.message,
            }));
        }

        body.result
            .with_context(|| format!("{method} returned no result"))
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let result = self
                .rpc("eth_getTransactionReceipt", json!([tx_hash.to_string()]))
                .await?;

            if !result.is_null() {
                let raw: RpcReceipt = serde_json::from_value(result)
                    .context("eth_getTransactionReceipt parse")?;
                return raw.into_receipt(tx_hash);
            }

            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }

        bail!(
            "transaction receipt for {tx_hash} not found after {}s",
            RECEIPT_POLL_INTERVAL.as_secs() * u64::from(RECEIPT_POLL_ATTEMPTS)
        );
    }
}

// ── JSON-RPC wire types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcReceipt {
    status: Option<String>,
    logs: Vec<RpcLog>,
}

#[derive(Debug, Deserialize)]
struct RpcLog {
    address: String,
    topics: Vec<String>,
    data: String,
}

impl RpcReceipt {
    fn into_receipt(self, tx_hash: B256) -> Result<TransactionReceipt> {
        // Pre-Byzantium receipts carry no status field; treat them as
        // successful the way web3 does.
        let succeeded = self
            .status
            .as_deref()
            .map(|status| status == "0x1")
            .unwrap_or(true);

        let mut logs = Vec::with_capacity(self.logs.len());
        for log in self.logs {
            let address: Address = log
                .address
                .parse()
                .with_context(|| format!("receipt log address {}", log.address))?;
            let mut topics = Vec::with_capacity(log.topics.len());
            for topic in &log.topics {
                topics.push(
                    topic
                        .parse::<B256>()
                        .with_context(|| format!("receipt log topic {topic}"))?,
                );
            }
            let data: Bytes = log.data.parse().context("receipt log data")?;
            logs.push(ReceiptLog {
                address,
                data: LogData::new_unchecked(topics, data),
            });
        }

        Ok(TransactionReceipt {
            tx_hash,
            succeeded,
            logs,
        })
    }
}

#[async_trait]
impl WalletProvider for EthRpcProvider {
    async fn client_version(&self) -> Result<String> {
        let result = self.rpc("web3_clientVersion", json!([])).await?;
        serde_json::from_value(result).context("web3_clientVersion parse")
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let result = match self.rpc("eth_requestAccounts", json!([])).await {
            Ok(result) => result,
            // Bare nodes expose eth_accounts only; browser-wallet bridges
            // expose eth_requestAccounts. -32601 is "method not found".
            Err(err)
                if err
                    .downcast_ref::<JsonRpcError>()
                    .is_some_and(|rpc_err| rpc_err.code == -32601) =>
            {
                self.rpc("eth_accounts", json!([])).await?
            }
            Err(err) => return Err(err),
        };

        let raw: Vec<String> = serde_json::from_value(result).context("accounts parse")?;
        raw.iter()
            .map(|account| {
                account
                    .parse::<Address>()
                    .with_context(|| format!("account address {account}"))
            })
            .collect()
    }

    async fn call(&self, req: CallRequest) -> Result<Bytes> {
        let params = json!([
            {
                "to": req.to.to_string(),
                "data": req.data.to_string(),
            },
            "latest",
        ]);
        let result = self.rpc("eth_call", params).await?;
        let raw: String = serde_json::from_value(result).context("eth_call parse")?;
        raw.parse().context("eth_call return data")
    }

    async fn send_transaction(&self, req: TransactionRequest) -> Result<TransactionReceipt> {
        let params = json!([
            {
                "from": req.from.to_string(),
                "to": req.to.to_string(),
                "data": req.data.to_string(),
            },
        ]);
        let result = self.rpc("eth_sendTransaction", params).await?;
        let raw: String = serde_json::from_value(result).context("eth_sendTransaction parse")?;
        let tx_hash: B256 = raw
            .parse()
            .with_context(|| format!("transaction hash {raw}"))?;

        self.wait_for_receipt(tx_hash).await
    }
}

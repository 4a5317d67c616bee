use alloy::primitives::Address;
use thiserror::Error;

/// Operation failures, one variant per failure class.
///
/// Every error is caught at the boundary of the operation that triggered
/// it and rendered as a one-line activity-log entry; the variants carry
/// the structured context (call name, contract address, cause) the log
/// string is built from.
#[derive(Debug, Error)]
pub enum OpError {
    /// Wallet/provider failure: no wallet, no accounts, transport error,
    /// user rejection.
    #[error("wallet provider failure: {source:#}")]
    Provider {
        #[source]
        source: anyhow::Error,
    },

    /// A read-only contract call failed.
    #[error("read {call} on {address} failed: {source:#}")]
    ContractRead {
        call: &'static str,
        address: Address,
        #[source]
        source: anyhow::Error,
    },

    /// A state-changing contract call failed (rejection, revert, gas).
    #[error("write {call} on {address} failed: {source:#}")]
    ContractWrite {
        call: &'static str,
        address: Address,
        #[source]
        source: anyhow::Error,
    },

    /// Bad or missing caller input, including an unready session.
    #[error("{0}")]
    UserInput(String),
}

//! Contract bindings and handles.
//!
//! Interfaces are declared from the minimal ABIs the gateway actually
//! needs. Handles bind one deployed address to an interface and a
//! `WalletProvider`; they encode calldata, run the call through the
//! provider, and decode returns and events.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};
use anyhow::{Context, Result};
use jc_chain_client::{CallRequest, TransactionReceipt, TransactionRequest, WalletProvider};

sol! {
    interface IProductionController {
        function getJobCreatorAddress() external view returns (address);
    }

    interface IJobCreator {
        function getTokenAddress() external view returns (address);
        function getRequiredDeposit() external view returns (uint256);
        function getControllerAddress() external view returns (address);
        function runJob(string module, string[] inputs, address payee) external returns (uint256);

        event JobAdded(uint256 id, address calling_contract, address payee, string module, string[] inputs);
    }

    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

pub use IJobCreator::JobAdded;

/// Production controller: the single configured entry point that knows
/// where the current job-creator contract lives.
pub struct ProductionController<'a, P: WalletProvider + ?Sized> {
    provider: &'a P,
    pub address: Address,
}

impl<'a, P: WalletProvider + ?Sized> ProductionController<'a, P> {
    pub fn new(provider: &'a P, address: Address) -> Self {
        Self { provider, address }
    }

    pub async fn job_creator_address(&self) -> Result<Address> {
        let data = IProductionController::getJobCreatorAddressCall {}.abi_encode();
        let raw = self
            .provider
            .call(CallRequest {
                to: self.address,
                data: Bytes::from(data),
            })
            .await
            .context("getJobCreatorAddress call")?;
        IProductionController::getJobCreatorAddressCall::abi_decode_returns(&raw)
            .context("getJobCreatorAddress return")
    }
}

pub struct JobCreator<'a, P: WalletProvider + ?Sized> {
    provider: &'a P,
    pub address: Address,
}

impl<'a, P: WalletProvider + ?Sized> JobCreator<'a, P> {
    pub fn new(provider: &'a P, address: Address) -> Self {
        Self { provider, address }
    }

    async fn read(&self, data: Vec<u8>, call_name: &str) -> Result<Bytes> {
        self.provider
            .call(CallRequest {
                to: self.address,
                data: Bytes::from(data),
            })
            .await
            .with_context(|| format!("{call_name} call"))
    }

    pub async fn token_address(&self) -> Result<Address> {
        let raw = self
            .read(IJobCreator::getTokenAddressCall {}.abi_encode(), "getTokenAddress")
            .await?;
        IJobCreator::getTokenAddressCall::abi_decode_returns(&raw).context("getTokenAddress return")
    }

    pub async fn required_deposit(&self) -> Result<U256> {
        let raw = self
            .read(IJobCreator::getRequiredDepositCall {}.abi_encode(), "getRequiredDeposit")
            .await?;
        IJobCreator::getRequiredDepositCall::abi_decode_returns(&raw)
            .context("getRequiredDeposit return")
    }

    pub async fn controller_address(&self) -> Result<Address> {
        let raw = self
            .read(IJobCreator::getControllerAddressCall {}.abi_encode(), "getControllerAddress")
            .await?;
        IJobCreator::getControllerAddressCall::abi_decode_returns(&raw)
            .context("getControllerAddress return")
    }

    pub async fn run_job(
        &self,
        from: Address,
        module: String,
        inputs: Vec<String>,
        payee: Address,
    ) -> Result<TransactionReceipt> {
        let data = IJobCreator::runJobCall { module, inputs, payee }.abi_encode();
        self.provider
            .send_transaction(TransactionRequest {
                from,
                to: self.address,
                data: Bytes::from(data),
            })
            .await
            .context("runJob transaction")
    }

    /// Decodes the `JobAdded` event from a receipt, considering only logs
    /// emitted by this contract. Returns `None` when the event is absent.
    pub fn job_added(&self, receipt: &TransactionReceipt) -> Option<JobAdded> {
        job_added_event(receipt, self.address)
    }
}

pub struct Erc20Token<'a, P: WalletProvider + ?Sized> {
    provider: &'a P,
    pub address: Address,
}

impl<'a, P: WalletProvider + ?Sized> Erc20Token<'a, P> {
    pub fn new(provider: &'a P, address: Address) -> Self {
        Self { provider, address }
    }

    pub async fn approve(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TransactionReceipt> {
        let data = IERC20::approveCall { spender, amount }.abi_encode();
        self.provider
            .send_transaction(TransactionRequest {
                from,
                to: self.address,
                data: Bytes::from(data),
            })
            .await
            .context("approve transaction")
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        let data = IERC20::allowanceCall { owner, spender }.abi_encode();
        let raw = self
            .provider
            .call(CallRequest {
                to: self.address,
                data: Bytes::from(data),
            })
            .await
            .context("allowance call")?;
        IERC20::allowanceCall::abi_decode_returns(&raw).context("allowance return")
    }
}

pub fn job_added_event(receipt: &TransactionReceipt, job_creator: Address) -> Option<JobAdded> {
    receipt
        .logs
        .iter()
        .filter(|log| log.address == job_creator)
        .find_map(|log| JobAdded::decode_log_data(&log.data).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{B256, address};
    use jc_chain_client::ReceiptLog;

    #[test]
    fn run_job_calldata_roundtrip() {
        let payee = address!("00000000000000000000000000000000000000aa");
        let encoded = IJobCreator::runJobCall {
            module: "cowsay:v0.0.4".to_owned(),
            inputs: vec!["Message=Hi".to_owned()],
            payee,
        }
        .abi_encode();

        let decoded = IJobCreator::runJobCall::abi_decode(&encoded).expect("decode runJob calldata");
        assert_eq!(decoded.module, "cowsay:v0.0.4");
        assert_eq!(decoded.inputs, vec!["Message=Hi".to_owned()]);
        assert_eq!(decoded.payee, payee);
    }

    #[test]
    fn approve_uses_canonical_erc20_selector() {
        let encoded = IERC20::approveCall {
            spender: Address::ZERO,
            amount: U256::from(1),
        }
        .abi_encode();
        assert_eq!(&encoded[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn job_added_extraction_filters_by_emitter() {
        let job_creator = address!("00000000000000000000000000000000000000c1");
        let other = address!("00000000000000000000000000000000000000c2");
        let event = JobAdded {
            id: U256::from(42),
            calling_contract: job_creator,
            payee: address!("00000000000000000000000000000000000000aa"),
            module: "cowsay:v0.0.4".to_owned(),
            inputs: vec!["Message=Hi".to_owned()],
        };

        let receipt = TransactionReceipt {
            tx_hash: B256::ZERO,
            succeeded: true,
            logs: vec![
                ReceiptLog {
                    address: other,
                    data: event.encode_log_data(),
                },
                ReceiptLog {
                    address: job_creator,
                    data: event.encode_log_data(),
                },
            ],
        };

        let found = job_added_event(&receipt, job_creator).expect("event should decode");
        assert_eq!(found.id, U256::from(42));

        let none = job_added_event(&receipt, Address::ZERO);
        assert!(none.is_none());
    }
}

//! The three wallet-facing operations.
//!
//! Each operation is a short linear chain of awaited provider calls.
//! Every success and every failure is appended to the activity log as a
//! one-line string; failures are additionally classified into `OpError`
//! for the caller. No retries anywhere.

use crate::error::OpError;
use crate::log::ActivityLog;
use crate::session::Session;
use alloy::primitives::{Address, B256, U256};
use anyhow::anyhow;
use jc_chain_client::WalletProvider;
use jc_contracts::{Erc20Token, JobCreator, ProductionController};

pub const DEFAULT_JOB_MODULE: &str = "cowsay:v0.0.4";

#[derive(Debug, Clone)]
pub struct ConnectOutcome {
    pub account: Address,
    pub job_creator: Address,
    pub token: Option<Address>,
    pub required_deposit: Option<U256>,
    pub solver: Option<Address>,
    pub ready: bool,
}

#[derive(Debug, Clone)]
pub struct ApproveOutcome {
    pub solver: Address,
    pub tx_hash: B256,
}

#[derive(Debug, Clone)]
pub struct RunJobOutcome {
    pub tx_hash: B256,
    pub job_id: Option<U256>,
}

/// Connect the wallet and resolve the job-creator parameters.
///
/// Account request and job-creator resolution abort the whole operation
/// on failure; the three parameter reads each have their own failure
/// boundary so one failing does not stop the others.
pub async fn connect<P: WalletProvider + ?Sized>(
    provider: &P,
    controller_address: Address,
    session: &mut Session,
    log: &ActivityLog,
) -> Result<ConnectOutcome, OpError> {
    match connect_inner(provider, controller_address, session, log).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            log.append(format!(
                "Error connecting wallet or retrieving job creator address: {err}"
            ))
            .await;
            Err(err)
        }
    }
}

async fn connect_inner<P: WalletProvider + ?Sized>(
    provider: &P,
    controller_address: Address,
    session: &mut Session,
    log: &ActivityLog,
) -> Result<ConnectOutcome, OpError> {
    let accounts = provider
        .request_accounts()
        .await
        .map_err(|source| OpError::Provider { source })?;
    let account = accounts.first().copied().ok_or_else(|| OpError::Provider {
        source: anyhow!("no accounts returned by the wallet provider"),
    })?;
    session.account = Some(account);
    log.append(format!("Connected: {account}")).await;

    let controller = ProductionController::new(provider, controller_address);
    let job_creator_address =
        controller
            .job_creator_address()
            .await
            .map_err(|source| OpError::ContractRead {
                call: "getJobCreatorAddress",
                address: controller_address,
                source,
            })?;
    session.job_creator = Some(job_creator_address);
    log.append(format!("Retrieved Job Creator Address: {job_creator_address}"))
        .await;

    let job_creator = JobCreator::new(provider, job_creator_address);

    match job_creator.token_address().await {
        Ok(token) => {
            session.token = Some(token);
            log.append(format!("Token Address: {token}")).await;
        }
        Err(err) => log.append(format!("Error getting token address: {err:#}")).await,
    }

    match job_creator.required_deposit().await {
        Ok(deposit) => {
            session.required_deposit = Some(deposit);
            log.append(format!("Required Deposit: {deposit}")).await;
        }
        Err(err) => {
            log.append(format!("Error getting required deposit: {err:#}"))
                .await
        }
    }

    match job_creator.controller_address().await {
        Ok(solver) => {
            session.solver = Some(solver);
            log.append(format!("Controller (Solver) Address: {solver}")).await;
        }
        Err(err) => {
            log.append(format!("Error getting controller address: {err:#}"))
                .await
        }
    }

    let ready = session.is_ready();
    if !ready {
        log.append("Some required values are missing. Check above errors.")
            .await;
    }

    Ok(ConnectOutcome {
        account,
        job_creator: job_creator_address,
        token: session.token,
        required_deposit: session.required_deposit,
        solver: session.solver,
        ready,
    })
}

/// Approve the required deposit for the solver.
///
/// The solver address is re-read immediately before submitting — the
/// connect-time value may be stale if the contract was reconfigured.
pub async fn approve<P: WalletProvider + ?Sized>(
    provider: &P,
    session: &Session,
    log: &ActivityLog,
) -> Result<ApproveOutcome, OpError> {
    match approve_inner(provider, session, log).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            if !matches!(err, OpError::UserInput(_)) {
                log.append(format!("Error approving tokens: {err}")).await;
            }
            Err(err)
        }
    }
}

async fn approve_inner<P: WalletProvider + ?Sized>(
    provider: &P,
    session: &Session,
    log: &ActivityLog,
) -> Result<ApproveOutcome, OpError> {
    let ready = require_ready(session)?;

    let job_creator = JobCreator::new(provider, ready.job_creator);
    let solver = job_creator
        .controller_address()
        .await
        .map_err(|source| OpError::ContractRead {
            call: "getControllerAddress",
            address: ready.job_creator,
            source,
        })?;
    log.append(format!("Approving tokens for controller: {solver}"))
        .await;

    let token = Erc20Token::new(provider, ready.token);
    let receipt = token
        .approve(ready.account, solver, ready.required_deposit)
        .await
        .map_err(|source| OpError::ContractWrite {
            call: "approve",
            address: ready.token,
            source,
        })?;
    if !receipt.succeeded {
        return Err(OpError::ContractWrite {
            call: "approve",
            address: ready.token,
            source: anyhow!("transaction {} reverted", receipt.tx_hash),
        });
    }

    log.append(format!("Tokens approved. Transaction hash: {}", receipt.tx_hash))
        .await;

    Ok(ApproveOutcome {
        solver,
        tx_hash: receipt.tx_hash,
    })
}

/// Submit a job and extract the assigned id from the `JobAdded` event.
pub async fn run_job<P: WalletProvider + ?Sized>(
    provider: &P,
    session: &Session,
    message: &str,
    module: Option<&str>,
    log: &ActivityLog,
) -> Result<RunJobOutcome, OpError> {
    match run_job_inner(provider, session, message, module, log).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            if !matches!(err, OpError::UserInput(_)) {
                log.append(format!("Error triggering job: {err}")).await;
            }
            Err(err)
        }
    }
}

async fn run_job_inner<P: WalletProvider + ?Sized>(
    provider: &P,
    session: &Session,
    message: &str,
    module: Option<&str>,
    log: &ActivityLog,
) -> Result<RunJobOutcome, OpError> {
    let ready = require_ready(session)?;
    let module = module.unwrap_or(DEFAULT_JOB_MODULE);

    if message.trim().is_empty() {
        log.append("No message provided.").await;
        return Err(OpError::UserInput("no message provided".to_owned()));
    }

    let inputs = vec![format!("Message={message}")];
    log.append(format!("Submitting job with message: {message}"))
        .await;

    let job_creator = JobCreator::new(provider, ready.job_creator);
    let receipt = job_creator
        .run_job(ready.account, module.to_owned(), inputs, ready.account)
        .await
        .map_err(|source| OpError::ContractWrite {
            call: "runJob",
            address: ready.job_creator,
            source,
        })?;
    if !receipt.succeeded {
        return Err(OpError::ContractWrite {
            call: "runJob",
            address: ready.job_creator,
            source: anyhow!("transaction {} reverted", receipt.tx_hash),
        });
    }

    log.append(format!("Job submitted. Transaction hash: {}", receipt.tx_hash))
        .await;

    // The id comes from the decoded event only; it is never derived
    // locally.
    let job_id = job_creator.job_added(&receipt).map(|event| event.id);
    match job_id {
        Some(id) => log.append(format!("JobAdded event detected. Job ID: {id}")).await,
        None => log.append("JobAdded event not found in transaction logs.").await,
    }

    Ok(RunJobOutcome {
        tx_hash: receipt.tx_hash,
        job_id,
    })
}

struct ReadyState {
    account: Address,
    job_creator: Address,
    token: Address,
    required_deposit: U256,
}

fn require_ready(session: &Session) -> Result<ReadyState, OpError> {
    match (
        session.account,
        session.job_creator,
        session.token,
        session.required_deposit,
        session.solver,
    ) {
        (Some(account), Some(job_creator), Some(token), Some(required_deposit), Some(_)) => {
            Ok(ReadyState {
                account,
                job_creator,
                token,
                required_deposit,
            })
        }
        _ => Err(OpError::UserInput(
            "session is not ready; connect first and check the activity log".to_owned(),
        )),
    }
}

use alloy::primitives::Address;
use anyhow::{Context, Result};
use std::net::SocketAddr;

// Production controller address from the deployment docs. An earlier
// deployment used 0xF2fD1B9b262982F12446149A27d8901Ac68dcB59.
pub(crate) const DEFAULT_CONTROLLER_ADDRESS: &str = "0x4a83270045FB4BCd1bdFe1bD6B00762A9D8bbF4E";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub(crate) struct GatewayConfig {
    pub(crate) rpc_url: String,
    pub(crate) controller_address: Address,
    pub(crate) listen_addr: SocketAddr,
}

impl GatewayConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_values(
            env_value("JOB_GATEWAY_RPC_URL"),
            env_value("JOB_GATEWAY_CONTROLLER_ADDRESS"),
            env_value("JOB_GATEWAY_LISTEN_ADDR"),
        )
    }

    fn from_values(
        rpc_url: Option<String>,
        controller_address: Option<String>,
        listen_addr: Option<String>,
    ) -> Result<Self> {
        let rpc_url = rpc_url.unwrap_or_else(|| jc_chain_ethrpc::DEFAULT_RPC_URL.to_owned());

        // Parsing up front makes a malformed controller literal fail
        // startup loudly instead of surfacing as call errors later.
        let controller_address =
            controller_address.unwrap_or_else(|| DEFAULT_CONTROLLER_ADDRESS.to_owned());
        let controller_address = controller_address
            .parse::<Address>()
            .with_context(|| format!("controller address {controller_address}"))?;

        let listen_addr = listen_addr.unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let listen_addr = listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("listen address {listen_addr}"))?;

        Ok(Self {
            rpc_url: rpc_url.trim_end_matches('/').to_owned(),
            controller_address,
            listen_addr,
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

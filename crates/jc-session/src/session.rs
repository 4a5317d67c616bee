use alloy::primitives::{Address, U256};
use jc_api_types::SessionSnapshot;

/// Mutable session state shared by the three operations.
///
/// Lifetime = process lifetime, never persisted. Callers are expected to
/// hold one session behind a single async mutex so that connect, approve,
/// and run-job are serialized with respect to each other.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Active transaction sender, set on connect.
    pub account: Option<Address>,
    /// Job-creator contract address resolved through the controller.
    pub job_creator: Option<Address>,
    pub token: Option<Address>,
    pub required_deposit: Option<U256>,
    /// Controller (solver) address as read at connect time. Approve
    /// re-reads it fresh before submitting.
    pub solver: Option<Address>,
}

impl Session {
    /// Ready means all three job-creator reads succeeded. A zero value
    /// still counts as resolved; only a failed read leaves a field unset.
    pub fn is_ready(&self) -> bool {
        self.token.is_some() && self.required_deposit.is_some() && self.solver.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            account: self.account.map(|value| value.to_string()),
            job_creator_address: self.job_creator.map(|value| value.to_string()),
            token_address: self.token.map(|value| value.to_string()),
            required_deposit: self.required_deposit.map(|value| value.to_string()),
            controller_address: self.solver.map(|value| value.to_string()),
            ready: self.is_ready(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_requires_all_three_reads() {
        let mut session = Session::default();
        assert!(!session.is_ready());

        session.token = Some(Address::ZERO);
        session.required_deposit = Some(U256::ZERO);
        assert!(!session.is_ready());

        session.solver = Some(Address::ZERO);
        assert!(session.is_ready());

        session.required_deposit = None;
        assert!(!session.is_ready());
    }

    #[test]
    fn zero_deposit_counts_as_resolved() {
        let session = Session {
            account: Some(Address::ZERO),
            job_creator: Some(Address::ZERO),
            token: Some(Address::ZERO),
            required_deposit: Some(U256::ZERO),
            solver: Some(Address::ZERO),
        };
        assert!(session.is_ready());
        assert_eq!(session.snapshot().required_deposit.as_deref(), Some("0"));
    }
}

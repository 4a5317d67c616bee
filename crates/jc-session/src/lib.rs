pub mod error;
pub mod log;
pub mod ops;
pub mod session;

pub use error::OpError;
pub use log::{ActivityLog, LogEntry};
pub use ops::{
    ApproveOutcome, ConnectOutcome, DEFAULT_JOB_MODULE, RunJobOutcome, approve, connect, run_job,
};
pub use session::Session;

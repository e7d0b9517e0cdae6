// Public exports for data models

pub mod check;
pub mod identity;
pub mod report;

pub use check::{BlockDetails, CheckResponse, Verdict};
pub use identity::AgentIdentity;
pub use report::{report, ActionReport, Metadata};

//! Policy evaluation for the sales-assist pipeline
//!
//! - [`PolicyStore`] - pure table reads over the policy config
//! - [`ComplianceChecker`] - the nine-check battery over a case draft
//! - [`CaseRouter`] - approver/team/timeline routing
//!
//! Everything here is a pure function of plain data; no I/O.

pub mod compliance;
pub mod routing;
pub mod store;

pub use compliance::{CheckError, ComplianceChecker};
pub use routing::CaseRouter;
pub use store::{ApprovalRequirement, AxisApproval, Lookup, PolicyStore, PolicyVerdict};

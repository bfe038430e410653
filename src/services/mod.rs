//! Service layer for beanbudget
//!
//! Services sit between a transport (the CLI, or a chat bot host) and the
//! ledger: they load entries, run the intake dialogue and produce reports.

pub mod intake;
pub mod report;

pub use intake::{AllowList, Authorizer, Finished, IntakeService, Reply};
pub use report::{ReportRequest, ReportService};

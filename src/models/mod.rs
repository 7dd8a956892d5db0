pub mod failure;
pub mod invocation;
pub mod outcome;
pub mod report;
pub mod run_config;
pub mod summary;

pub use failure::{FailureDetail, FailureEntry};
pub use invocation::RunDescription;
pub use report::{Report, load_report};
pub use run_config::{RunConfig, build_args};
pub use summary::{ReportSummary, TestSummary};

pub mod pytest;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Events streamed from a running test process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// A line from the runner's stdout.
    Output { line: String },
    /// A line from the runner's stderr.
    Error { line: String },
    /// The process exited. `code` is `None` when it was killed by a signal.
    Finished { code: Option<i32> },
}

/// Trait for framework-specific test runner adapters.
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Full command line that `run` would execute with `args`.
    fn command_line(&self, args: &[String]) -> Vec<String>;

    /// Run the suite with `args`, streaming output over the channel.
    /// Returns the exit code of the process.
    async fn run(
        &self,
        workspace: &Path,
        args: &[String],
        tx: mpsc::UnboundedSender<RunEvent>,
    ) -> Result<Option<i32>>;

    /// Display name for this runner (e.g., "pytest").
    fn name(&self) -> &str;
}

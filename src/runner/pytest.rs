use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use super::{RunEvent, TestRunner};

/// Guard that kills the child process (and its entire process group) on drop.
struct ChildGuard {
    child: tokio::process::Child,
    /// Process group ID saved at spawn time so we can kill the whole group.
    #[cfg(unix)]
    pgid: Option<u32>,
    finished: bool,
}

impl ChildGuard {
    fn new(child: tokio::process::Child) -> Self {
        #[cfg(unix)]
        let pgid = child.id();
        Self {
            child,
            #[cfg(unix)]
            pgid,
            finished: false,
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // Kill the whole group so xdist workers and browsers don't outlive us.
        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGKILL) };
        }
        let _ = self.child.start_kill();
    }
}

/// Runs pytest through a configurable command prefix such as `uv run pytest`.
pub struct PytestRunner {
    program: String,
    prefix_args: Vec<String>,
}

impl PytestRunner {
    /// Build a runner from a shell-style command string.
    pub fn from_command(command: &str) -> Result<Self> {
        let mut words = shell_words::split(command)
            .with_context(|| format!("invalid runner command `{}`", command))?
            .into_iter();
        let program = words.next().context("runner command is empty")?;
        Ok(Self {
            program,
            prefix_args: words.collect(),
        })
    }
}

#[async_trait]
impl TestRunner for PytestRunner {
    fn command_line(&self, args: &[String]) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.prefix_args.iter().cloned())
            .chain(args.iter().cloned())
            .collect()
    }

    async fn run(
        &self,
        workspace: &Path,
        args: &[String],
        tx: mpsc::UnboundedSender<RunEvent>,
    ) -> Result<Option<i32>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args).args(args);

        tracing::debug!(cmd = ?cmd.as_std(), cwd = %workspace.display(), "spawning runner");

        // Own process group so the guard can take out every worker pytest forks.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.as_std_mut().process_group(0);
        }

        let mut child = cmd
            .current_dir(workspace)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program))?;

        let stdout = child.stdout.take().context("missing stdout")?;
        let stderr = child.stderr.take().context("missing stderr")?;
        let mut guard = ChildGuard::new(child);

        let tx_err = tx.clone();
        let stderr_handle = tokio::spawn(async move {
            forward_lines(stderr, &tx_err, |line| RunEvent::Error { line }).await;
        });

        forward_lines(stdout, &tx, |line| RunEvent::Output { line }).await;

        stderr_handle.await.ok();

        let status = guard
            .child
            .wait()
            .await
            .context("failed to wait for runner")?;
        guard.finished = true;

        let code = status.code();
        tracing::debug!(?code, "runner exited");
        let _ = tx.send(RunEvent::Finished { code });
        Ok(code)
    }

    fn name(&self) -> &str {
        "pytest"
    }
}

/// Send every line of `reader` until EOF. Bytes that are not UTF-8 are
/// replaced so a stray byte never stops the pipe from draining.
async fn forward_lines<R, F>(reader: R, tx: &mpsc::UnboundedSender<RunEvent>, event: F)
where
    R: AsyncRead + Unpin,
    F: Fn(String) -> RunEvent,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                let _ = tx.send(event(line));
            }
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading runner output");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_command_prefix() {
        let runner = PytestRunner::from_command("uv run 'py test'").unwrap();
        let line = runner.command_line(&["-v".to_string(), "tests".to_string()]);
        assert_eq!(line, vec!["uv", "run", "py test", "-v", "tests"]);
        assert_eq!(runner.name(), "pytest");
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(PytestRunner::from_command("   ").is_err());
        assert!(PytestRunner::from_command("python 'unterminated").is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn streams_output_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let runner = PytestRunner::from_command("sh -c").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let code = runner
            .run(
                dir.path(),
                &["echo out; echo err >&2; exit 3".to_string()],
                tx,
            )
            .await
            .unwrap();

        assert_eq!(code, Some(3));
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert!(events.contains(&RunEvent::Output { line: "out".into() }));
        assert!(events.contains(&RunEvent::Error { line: "err".into() }));
        assert_eq!(events.last(), Some(&RunEvent::Finished { code: Some(3) }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_utf8_output_keeps_draining() {
        let dir = tempfile::tempdir().unwrap();
        let runner = PytestRunner::from_command("sh -c").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Far more than a pipe buffer after the bad byte.
        let script = r"printf 'caf\351\n'; head -c 300000 /dev/zero | tr '\0' 'x'; exit 1";
        let code = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            runner.run(dir.path(), &[script.to_string()], tx),
        )
        .await
        .expect("runner did not finish")
        .unwrap();

        assert_eq!(code, Some(1));
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events.first(),
            Some(&RunEvent::Output {
                line: "caf\u{FFFD}".into()
            })
        );
        let RunEvent::Output { line } = &events[1] else {
            panic!("expected output, got {:?}", events[1]);
        };
        assert_eq!(line.len(), 300000);
    }
}

//! Bounded, cancellable invocation of external command-line tools.
//!
//! Each call spawns one child process via [`tokio::process::Command`] and
//! waits for it under a timeout and a run-scoped [`CancellationToken`].
//! The child is spawned with `kill_on_drop`, so giving up on the wait
//! (timeout or cancellation) also terminates the process.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::{Error, Result};

/// Captured output of a successful command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands with a per-call timeout and shared cancellation.
///
/// Cloning is cheap; clones share the same cancellation token.
#[derive(Debug, Clone)]
pub struct Invoker {
    timeout: Duration,
    cancel: CancellationToken,
}

impl Invoker {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    /// An invoker whose token is never cancelled. Used for cleanup, which
    /// has to run even after the run itself was cancelled.
    pub fn uncancellable(timeout: Duration) -> Self {
        Self::new(timeout, CancellationToken::new())
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run `program args...`, optionally inside `cwd`.
    ///
    /// Non-zero exit status is an error carrying the captured stderr.
    #[instrument(skip(self, args), fields(command = %render(program, args)))]
    pub async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput> {
        let command = render(program, args);
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled { command });
        }

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!("spawning");

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;

        let output = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                return Err(Error::Cancelled { command });
            }
            waited = tokio::time::timeout(self.timeout, child.wait_with_output()) => {
                match waited {
                    Ok(Ok(output)) => output,
                    Ok(Err(source)) => return Err(Error::Spawn { command, source }),
                    Err(_) => {
                        return Err(Error::Timeout {
                            command,
                            timeout: self.timeout,
                        });
                    }
                }
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            debug!(status = %output.status, "command failed");
            return Err(Error::CommandFailed {
                command,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        debug!("command succeeded");
        Ok(CommandOutput { stdout, stderr })
    }
}

/// Render a command line for logs and error messages.
pub fn render(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("git", &["commit", "-m", "Initial commit"], "git commit -m \"Initial commit\"")]
    #[case("hub", &["delete", "-y", "jychri/Alpha"], "hub delete -y jychri/Alpha")]
    #[case("git", &["commit", "-m", ""], "git commit -m \"\"")]
    #[case("hub", &[], "hub")]
    fn test_render(#[case] program: &str, #[case] args: &[&str], #[case] expected: &str) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        assert_eq!(render(program, &args), expected);
    }
}

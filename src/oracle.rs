use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

use crate::error::EngineError;

/// The single blocking collaborator: runs the target project's build (with
/// the checker enabled) and regenerates the diagnostic and relation files.
pub(crate) trait BuildOracle {
    fn build(&mut self) -> Result<(), EngineError>;
}

/// Oracle that shells out to the configured build command.
pub(crate) struct CommandOracle {
    command: String,
    /// Files the build must regenerate; missing output is as fatal as a
    /// failed build.
    required_outputs: Vec<PathBuf>,
    timeout: Option<Duration>,
}

impl CommandOracle {
    pub(crate) fn new(
        command: String,
        required_outputs: Vec<PathBuf>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            command,
            required_outputs,
            timeout,
        }
    }
}

impl BuildOracle for CommandOracle {
    fn build(&mut self) -> Result<(), EngineError> {
        debug!(command = %self.command, "invoking build oracle");
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| EngineError::BuildFailure(format!("failed to spawn: {err}")))?;

        let status = match self.timeout {
            Some(timeout) => match child
                .wait_timeout(timeout)
                .map_err(|err| EngineError::BuildFailure(format!("failed to wait: {err}")))?
            {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EngineError::BuildFailure(format!(
                        "timed out after {}s",
                        timeout.as_secs()
                    )));
                }
            },
            None => child
                .wait()
                .map_err(|err| EngineError::BuildFailure(format!("failed to wait: {err}")))?,
        };

        if !status.success() {
            return Err(EngineError::BuildFailure(format!(
                "exit status {status} for `{}`",
                self.command
            )));
        }
        for output in &self.required_outputs {
            if !output.exists() {
                return Err(EngineError::MissingFile(output.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_command_with_outputs_present_is_ok() {
        let dir = tempfile::tempdir().expect("temp dir");
        let marker = dir.path().join("errors.tsv");
        let mut oracle = CommandOracle::new(
            format!("touch {}", marker.display()),
            vec![marker.clone()],
            None,
        );

        oracle.build().expect("build succeeds");

        assert!(marker.exists());
    }

    #[test]
    fn non_zero_exit_is_a_build_failure() {
        let mut oracle = CommandOracle::new("exit 3".to_string(), Vec::new(), None);

        let result = oracle.build();

        assert!(matches!(result, Err(EngineError::BuildFailure(_))));
    }

    #[test]
    fn timeout_is_a_build_failure() {
        let mut oracle = CommandOracle::new(
            "sleep 5".to_string(),
            Vec::new(),
            Some(Duration::from_millis(50)),
        );

        let result = oracle.build();

        let message = format!("{}", result.err().expect("timeout error"));
        assert!(message.contains("timed out"));
    }

    #[test]
    fn missing_required_output_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("never_written.tsv");
        let mut oracle = CommandOracle::new("true".to_string(), vec![missing], None);

        let result = oracle.build();

        assert!(matches!(result, Err(EngineError::MissingFile(_))));
    }
}

//! Direct process execution using `std::process::Command`.

use std::path::Path;
use std::process::Command;

use brevity_core::{
    application::ports::{ActionOutput, ActionRunner},
    error::{BrevityResult, PathContext},
};
use tracing::{debug, instrument};

/// Runs actions as child processes, without a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ActionRunner for ProcessRunner {
    #[instrument(skip(self, args), fields(dir = %dir.display()))]
    fn run(&self, program: &str, args: &[String], dir: &Path) -> BrevityResult<ActionOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .at_path(dir)?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        debug!(status = ?output.status.code(), "process exited");

        Ok(ActionOutput {
            success: output.status.success(),
            code: output.status.code(),
            output: combined,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn runs_in_the_given_directory() {
        let temp = tempfile::tempdir().unwrap();
        let out = ProcessRunner::new()
            .run("pwd", &[], temp.path())
            .unwrap();
        assert!(out.success);
        let reported = std::fs::canonicalize(out.output.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn captures_stdout_then_stderr() {
        let temp = tempfile::tempdir().unwrap();
        let args = vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()];
        let out = ProcessRunner::new().run("sh", &args, temp.path()).unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.output, "out\nerr\n");
    }

    #[test]
    fn missing_program_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(
            ProcessRunner::new()
                .run("brevity-no-such-program", &[], temp.path())
                .is_err()
        );
    }
}

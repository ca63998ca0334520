use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use rb_core::config::CalculatorConfig;
use rb_core::SubjectId;
use tokio::process::Command;

/// osu! API client credentials handed to the calculator.
#[derive(Clone, PartialEq, Eq)]
pub struct CalculatorCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl CalculatorCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for CalculatorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculatorCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// How to launch one `profile` run of the calculator.
#[derive(Debug, Clone)]
pub struct CalculatorInvocation {
    pub program: String,
    pub args_prefix: Vec<String>,
    pub working_dir: PathBuf,
    pub credentials: CalculatorCredentials,
}

impl CalculatorInvocation {
    pub fn from_config(config: &CalculatorConfig, credentials: CalculatorCredentials) -> Self {
        Self {
            program: config.program.clone(),
            args_prefix: config.args_prefix.clone(),
            working_dir: config.working_dir.clone(),
            credentials,
        }
    }

    /// `<prefix> profile <subject> <client_id> <client_secret> -o <output> -j`
    pub fn args(&self, subject_id: &SubjectId, output_path: &Path) -> Vec<String> {
        let mut args = self.args_prefix.clone();
        args.extend([
            "profile".to_string(),
            subject_id.to_string(),
            self.credentials.client_id.clone(),
            self.credentials.client_secret.clone(),
            "-o".to_string(),
            output_path.to_string_lossy().into_owned(),
            "-j".to_string(),
        ]);
        args
    }

    pub fn command(&self, subject_id: &SubjectId, output_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(subject_id, output_path));
        cmd.current_dir(&self.working_dir);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> CalculatorInvocation {
        CalculatorInvocation {
            program: "dotnet".into(),
            args_prefix: vec!["run".into(), "--".into()],
            working_dir: PathBuf::from("./osu-tools/PerformanceCalculator"),
            credentials: CalculatorCredentials::new("1234", "s3cret"),
        }
    }

    #[test]
    fn builds_profile_arguments() {
        let subject = SubjectId::parse("4504101").unwrap();

        let args = invocation().args(&subject, Path::new("../../scores/4504101.json"));

        assert_eq!(
            args,
            vec![
                "run",
                "--",
                "profile",
                "4504101",
                "1234",
                "s3cret",
                "-o",
                "../../scores/4504101.json",
                "-j"
            ]
        );
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let rendered = format!("{:?}", invocation());

        assert!(rendered.contains("1234"));
        assert!(!rendered.contains("s3cret"));
    }
}

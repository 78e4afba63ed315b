//! Process configuration.
//!
//! Flags mirror the deployment manifest of the nanny sidecar; the pod's own
//! namespace and name normally arrive through the downward API environment.

use crate::error::ControllerError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

/// Command line of the pod nanny
#[derive(Parser, Debug, Clone)]
#[command(name = "pod-nanny", version, about)]
pub struct Args {
    #[arg(long, env = "MY_POD_NAMESPACE", default_value = "", help = "Namespace of the pod running the nanny")]
    pub namespace: String,

    #[arg(long, env = "MY_POD_NAME", default_value = "", help = "Name of the pod running the nanny")]
    pub pod: String,

    #[arg(
        long,
        value_hint = clap::ValueHint::FilePath,
        help = "Path to the mounted scaling parameters file"
    )]
    pub configmap: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = 10,
        allow_negative_numbers = true,
        help = "Seconds between two polls of the cluster"
    )]
    pub poll_period_seconds: i64,

    #[arg(long, help = "Log the details of every poll")]
    pub verbose: bool,
}

/// Validated configuration the controller runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NannyConfig {
    pub namespace: String,
    pub pod: String,
    pub params_path: PathBuf,
    pub poll_period: Duration,
    pub verbose: bool,
}

impl Args {
    /// Check every flag, logging each problem found.
    pub fn validate(&self) -> Result<(), ControllerError> {
        let problems = self.problems();
        if problems.is_empty() {
            return Ok(());
        }
        for problem in &problems {
            error!("{}", problem);
        }
        Err(ControllerError::InvalidConfig(problems.join("; ")))
    }

    /// Validate the flags and produce the controller configuration.
    pub fn into_config(self) -> Result<NannyConfig, ControllerError> {
        self.validate()?;
        let poll_seconds = u64::try_from(self.poll_period_seconds).map_err(|_| {
            ControllerError::InvalidConfig("poll period must be positive".to_string())
        })?;
        Ok(NannyConfig {
            namespace: self.namespace,
            pod: self.pod,
            params_path: self.configmap.unwrap_or_default(),
            poll_period: Duration::from_secs(poll_seconds),
            verbose: self.verbose,
        })
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.namespace.trim().is_empty() {
            problems.push("namespace must be set (--namespace or MY_POD_NAMESPACE)".to_string());
        }
        if self.pod.trim().is_empty() {
            problems.push("pod name must be set (--pod or MY_POD_NAME)".to_string());
        }
        match &self.configmap {
            Some(path) if !path.as_os_str().is_empty() => {}
            _ => problems.push("path to the scaling parameters must be set (--configmap)".to_string()),
        }
        if self.poll_period_seconds < 1 {
            problems.push(format!(
                "poll period must be at least 1 second, got {}",
                self.poll_period_seconds
            ));
        }
        problems
    }
}

//! Validate command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dpcfg_types::ValidationPolicy;
use dpcfg_validate::Validator;

/// Verdict for one configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub pass: bool,
    pub diagnostics: Vec<String>,
}

/// Validate command implementation
pub struct ValidateCommand {
    policy: ValidationPolicy,
}

impl ValidateCommand {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Load and validate a single file. Each call is an independent run.
    pub fn validate_file(path: &Path, policy: ValidationPolicy) -> Result<FileOutcome> {
        let config = dpcfg_config::load_file(path)
            .with_context(|| format!("Failed to load configuration file: {}", path.display()))?;

        let validator = Validator::with_policy(policy);
        let (pass, diagnostics) = validator.validate(&config);
        Ok(FileOutcome {
            path: path.to_path_buf(),
            pass,
            diagnostics,
        })
    }

    /// Validate every file on the blocking pool; outcomes keep argument order.
    pub async fn run(&self, paths: &[PathBuf]) -> Result<Vec<FileOutcome>> {
        let handles: Vec<_> = paths
            .iter()
            .cloned()
            .map(|path| {
                let policy = self.policy.clone();
                tokio::task::spawn_blocking(move || {
                    Self::validate_file(&path, policy).unwrap_or_else(|e| FileOutcome {
                        diagnostics: vec![format!("{:#}", e)],
                        path,
                        pass: false,
                    })
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.context("Validation task failed")?);
        }
        Ok(outcomes)
    }

    /// Print diagnostics per file and return whether every file passed
    pub async fn execute(&self, paths: &[PathBuf]) -> Result<bool> {
        let outcomes = self.run(paths).await?;

        for outcome in &outcomes {
            if outcome.pass {
                println!("✓ {}: configuration is valid", outcome.path.display());
            } else {
                println!(
                    "✗ {}: {} error(s)",
                    outcome.path.display(),
                    outcome.diagnostics.len()
                );
                for diagnostic in &outcome.diagnostics {
                    println!("    {}", diagnostic);
                }
            }
        }

        Ok(outcomes.iter().all(|outcome| outcome.pass))
    }
}

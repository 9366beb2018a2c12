//! Build collaborator interface and the latexmk-based implementation

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{error, info};

use crate::error::{HookError, Result};

/// Parameters for one build invocation, derived from an authenticated push.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    pub project_name: String,
    pub clone_url: String,
    pub commit_id: String,
    pub workdir: String,
    pub outdir: String,
}

/// The downstream build step.
///
/// Modeled as a trait so request handling can be exercised in tests without
/// running git or a TeX toolchain.
#[async_trait]
pub trait Builder: Send + Sync {
    async fn build(&self, request: &BuildRequest) -> Result<()>;
}

/// Builds a LaTeX project for a pushed commit: syncs the repository under
/// `workdir`, checks out the commit, and runs latexmk with artifacts placed
/// in `outdir`.
pub struct DocumentBuilder;

#[async_trait]
impl Builder for DocumentBuilder {
    async fn build(&self, request: &BuildRequest) -> Result<()> {
        let checkout = Path::new(&request.workdir).join(&request.project_name);

        if checkout.is_dir() {
            info!("Running (cwd = {:?}): git fetch origin", checkout);
            run_step(
                "git fetch",
                Command::new("git")
                    .current_dir(&checkout)
                    .args(["fetch", "origin"]),
            )
            .await?;
        } else {
            tokio::fs::create_dir_all(&request.workdir).await.map_err(|e| {
                HookError::BuildFailure(format!(
                    "failed to create workdir '{}': {}",
                    request.workdir, e
                ))
            })?;

            info!(
                "Running (cwd = '{}'): git clone {}",
                request.workdir, request.clone_url
            );
            run_step(
                "git clone",
                Command::new("git")
                    .current_dir(&request.workdir)
                    .args(["clone", &request.clone_url, &request.project_name]),
            )
            .await?;
        }

        info!("Running (cwd = {:?}): git checkout {}", checkout, request.commit_id);
        run_step(
            "git checkout",
            Command::new("git")
                .current_dir(&checkout)
                .args(["checkout", "--detach", &request.commit_id]),
        )
        .await?;

        tokio::fs::create_dir_all(&request.outdir).await.map_err(|e| {
            HookError::BuildFailure(format!(
                "failed to create outdir '{}': {}",
                request.outdir, e
            ))
        })?;

        info!("Running (cwd = {:?}): latexmk", checkout);
        run_step(
            "latexmk",
            Command::new("latexmk").current_dir(&checkout).args([
                "-pdf",
                "-interaction=nonstopmode",
                &format!("-output-directory={}", request.outdir),
            ]),
        )
        .await?;

        Ok(())
    }
}

/// Runs one build step to completion, failing on spawn errors and non-zero
/// exit codes with the step's stderr in the error message.
async fn run_step(step: &str, command: &mut Command) -> Result<String> {
    let output = command.output().await.map_err(|e| {
        error!("{} failed to start: {}", step, e);
        HookError::BuildFailure(format!("{} failed to start: {}", step, e))
    })?;

    if !output.status.success() {
        let msg = format!(
            "{} failed: {}",
            step,
            String::from_utf8_lossy(&output.stderr)
        );
        error!("{}", msg);
        return Err(HookError::BuildFailure(msg));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

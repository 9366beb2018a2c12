//! Decoding, authentication, and build dispatch for validated requests

use tracing::{debug, info, warn};

use crate::AppConfig;
use crate::build::{BuildRequest, Builder};
use crate::error::{HookError, Result};
use crate::hook::IncomingHook;
use crate::payload::PushEvent;

/// Interprets a validated hook as a push event, authenticates it against
/// the configured secret, and triggers the build collaborator.
///
/// Invokes the builder exactly once per authenticated push with at least
/// one commit, and never otherwise. The commit built is always the first
/// of the push's commit list. The builder call is awaited here, so the
/// caller's response is not produced until the build returns.
pub async fn dispatch(
    hook: &IncomingHook,
    config: &AppConfig,
    builder: &dyn Builder,
) -> Result<()> {
    let event: PushEvent = serde_json::from_slice(&hook.payload)?;
    debug!(
        "Delivery {}: decoded '{}' event for ref '{}'",
        hook.delivery_id, hook.event, event.git_ref
    );

    // Trust decision. Nothing about the expected secret is logged.
    if event.secret != config.secret {
        warn!("Delivery {}: secret mismatch, rejecting", hook.delivery_id);
        return Err(HookError::AuthenticationFailed);
    }

    let head = event.commits.first().ok_or(HookError::NoCommits)?;

    let request = BuildRequest {
        project_name: config.git.project_name.clone(),
        clone_url: event.repository.clone_url.clone(),
        commit_id: head.id.clone(),
        workdir: config.git.workdir.clone(),
        outdir: config.git.outdir.clone(),
    };

    info!(
        "Delivery {}: triggering build of '{}' at commit {}",
        hook.delivery_id, request.project_name, request.commit_id
    );

    builder.build(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::testing::SpyBuilder;
    use crate::{AppConfig, GitConfig};
    use axum::body::Bytes;
    use serde_json::json;

    fn test_config() -> AppConfig {
        AppConfig {
            secret: "abc123".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8888,
            ssl_enable: false,
            ssl_key: String::new(),
            ssl_crt: String::new(),
            git: GitConfig {
                project_name: "thesis".to_string(),
                workdir: "/var/lib/hook/work".to_string(),
                outdir: "/var/lib/hook/out".to_string(),
            },
        }
    }

    fn push_hook(secret: &str, commit_ids: &[&str]) -> IncomingHook {
        let commits: Vec<_> = commit_ids
            .iter()
            .map(|id| json!({"id": id, "message": "msg", "url": ""}))
            .collect();
        let body = json!({
            "secret": secret,
            "ref": "refs/heads/master",
            "commits": commits,
            "repository": {
                "name": "thesis",
                "clone_url": "https://gogs.example.com/alice/thesis.git"
            }
        });
        IncomingHook {
            event: "push".to_string(),
            delivery_id: "delivery-1".to_string(),
            payload: Bytes::from(body.to_string()),
        }
    }

    #[tokio::test]
    async fn matching_secret_builds_head_commit() {
        let builder = SpyBuilder::succeeding();
        let hook = push_hook("abc123", &["deadbeef", "0ldc0mmit"]);

        dispatch(&hook, &test_config(), &builder).await.unwrap();

        assert_eq!(builder.call_count(), 1);
        let request = builder.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.commit_id, "deadbeef");
        assert_eq!(request.project_name, "thesis");
        assert_eq!(
            request.clone_url,
            "https://gogs.example.com/alice/thesis.git"
        );
        assert_eq!(request.workdir, "/var/lib/hook/work");
        assert_eq!(request.outdir, "/var/lib/hook/out");
    }

    #[tokio::test]
    async fn mismatched_secret_never_invokes_builder() {
        let builder = SpyBuilder::succeeding();
        let hook = push_hook("wrong", &["deadbeef"]);

        let err = dispatch(&hook, &test_config(), &builder).await.unwrap_err();

        assert!(matches!(err, HookError::AuthenticationFailed));
        assert_eq!(builder.call_count(), 0);
    }

    #[tokio::test]
    async fn absent_secret_field_fails_authentication() {
        let builder = SpyBuilder::succeeding();
        let hook = IncomingHook {
            event: "push".to_string(),
            delivery_id: "delivery-1".to_string(),
            payload: Bytes::from(r#"{"commits":[{"id":"deadbeef"}]}"#),
        };

        let err = dispatch(&hook, &test_config(), &builder).await.unwrap_err();

        assert!(matches!(err, HookError::AuthenticationFailed));
        assert_eq!(builder.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_commit_list_is_a_distinct_error() {
        let builder = SpyBuilder::succeeding();
        let hook = push_hook("abc123", &[]);

        let err = dispatch(&hook, &test_config(), &builder).await.unwrap_err();

        assert!(matches!(err, HookError::NoCommits));
        assert_eq!(builder.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_recoverable_error() {
        let builder = SpyBuilder::succeeding();
        let hook = IncomingHook {
            event: "push".to_string(),
            delivery_id: "delivery-1".to_string(),
            payload: Bytes::from("this is not json"),
        };

        let err = dispatch(&hook, &test_config(), &builder).await.unwrap_err();

        assert!(matches!(err, HookError::PayloadDecode(_)));
        assert_eq!(builder.call_count(), 0);
    }

    #[tokio::test]
    async fn builder_failure_surfaces_as_build_failure() {
        let builder = SpyBuilder::failing();
        let hook = push_hook("abc123", &["deadbeef"]);

        let err = dispatch(&hook, &test_config(), &builder).await.unwrap_err();

        assert!(matches!(err, HookError::BuildFailure(_)));
        assert_eq!(builder.call_count(), 1);
    }

    #[tokio::test]
    async fn same_empty_push_always_yields_same_outcome() {
        let builder = SpyBuilder::succeeding();
        let hook = push_hook("abc123", &[]);

        for _ in 0..3 {
            let err = dispatch(&hook, &test_config(), &builder).await.unwrap_err();
            assert!(matches!(err, HookError::NoCommits));
        }
        assert_eq!(builder.call_count(), 0);
    }
}

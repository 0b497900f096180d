//! Deployment engine tests

use std::sync::Arc;
use std::time::Duration;

use autodeployd::deploy::executor::{DeploymentEngine, DispatchMode, EngineSettings};

use crate::support::{deployment, line, Behavior, Call, MockRemote};

fn engine(client: &MockRemote, dispatch: DispatchMode) -> DeploymentEngine {
    DeploymentEngine::new(Arc::new(client.clone()), EngineSettings { dispatch })
}

#[tokio::test]
async fn runs_every_line_in_declared_order() {
    let client = MockRemote::new();
    let dep = deployment(
        "deploy-api",
        vec![
            line("cd", &["/srv/app"], false),
            line("git", &["pull"], false),
            line("systemctl", &["restart", "app"], true),
        ],
    );

    let result = engine(&client, DispatchMode::Sequential)
        .execute(&dep)
        .await
        .unwrap();

    assert_eq!(result.outcomes.len(), 3);
    assert!(result.all_succeeded());

    let calls = client.calls();
    assert_eq!(
        calls[0],
        Call::Plain {
            command: "cd".to_string(),
            args: vec!["/srv/app".to_string()],
        }
    );
    assert_eq!(
        calls[1],
        Call::Plain {
            command: "git".to_string(),
            args: vec!["pull".to_string()],
        }
    );
    assert_eq!(
        calls[2],
        Call::Privileged {
            command: "systemctl".to_string(),
            args: vec!["restart".to_string(), "app".to_string()],
            secret: "s3cret".to_string(),
        }
    );
    assert_eq!(calls[3], Call::Close);
}

#[tokio::test]
async fn only_flagged_lines_receive_the_secret() {
    let client = MockRemote::new();
    let dep = deployment(
        "deploy-api",
        vec![
            line("apt-get", &["update"], true),
            line("uptime", &[], false),
        ],
    );

    engine(&client, DispatchMode::Sequential)
        .execute(&dep)
        .await
        .unwrap();

    let privileged: Vec<_> = client
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Privileged { .. }))
        .collect();
    assert_eq!(
        privileged,
        vec![Call::Privileged {
            command: "apt-get".to_string(),
            args: vec!["update".to_string()],
            secret: "s3cret".to_string(),
        }]
    );
}

#[tokio::test]
async fn outcomes_stay_aligned_when_completion_order_scrambles() {
    // First line finishes last under concurrent dispatch
    let client = MockRemote::new()
        .with_behavior("slow", Behavior::DelayedExit(Duration::from_millis(50), 7))
        .with_behavior("fast", Behavior::Exit(0));
    let dep = deployment(
        "deploy-api",
        vec![line("slow", &[], false), line("fast", &[], false)],
    );

    let result = engine(&client, DispatchMode::Concurrent)
        .execute(&dep)
        .await
        .unwrap();

    assert_eq!(result.outcomes.len(), 2);
    assert_eq!(result.outcomes[0].command, "slow");
    assert_eq!(result.outcomes[0].outcome.as_ref().unwrap().exit_code, Some(7));
    assert_eq!(result.outcomes[1].command, "fast");
    assert!(result.outcomes[1].succeeded());
}

#[tokio::test]
async fn failing_line_does_not_abort_its_siblings() {
    let client = MockRemote::new()
        .with_behavior("broken", Behavior::Fail("connection reset".to_string()));
    let dep = deployment(
        "deploy-api",
        vec![
            line("first", &[], false),
            line("broken", &[], false),
            line("last", &[], false),
        ],
    );

    let result = engine(&client, DispatchMode::Sequential)
        .execute(&dep)
        .await
        .unwrap();

    assert_eq!(result.outcomes.len(), 3);
    assert!(result.outcomes[0].succeeded());
    assert!(!result.outcomes[1].succeeded());
    assert!(result.outcomes[1].error.as_deref().unwrap().contains("connection reset"));
    assert!(result.outcomes[2].succeeded());
    assert_eq!(result.failed_count(), 1);
}

#[tokio::test]
async fn nonzero_exits_are_outcomes_not_errors() {
    let client = MockRemote::new().with_behavior("failing", Behavior::Exit(1));
    let dep = deployment("deploy-api", vec![line("failing", &[], false)]);

    let result = engine(&client, DispatchMode::Sequential)
        .execute(&dep)
        .await
        .unwrap();

    assert!(!result.all_succeeded());
    assert!(result.outcomes[0].error.is_none());
    assert_eq!(result.outcomes[0].outcome.as_ref().unwrap().exit_code, Some(1));
}

#[tokio::test]
async fn connect_failure_runs_no_lines() {
    let client = MockRemote::failing_connect();
    let dep = deployment("deploy-api", vec![line("uptime", &[], false)]);

    let result = engine(&client, DispatchMode::Sequential).execute(&dep).await;

    assert!(result.is_err());
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn session_closes_exactly_once_even_when_a_line_errors() {
    let client = MockRemote::new()
        .with_behavior("broken", Behavior::Fail("channel died".to_string()));
    let dep = deployment(
        "deploy-api",
        vec![line("broken", &[], false), line("uptime", &[], false)],
    );

    engine(&client, DispatchMode::Sequential)
        .execute(&dep)
        .await
        .unwrap();

    assert_eq!(client.close_count(), 1);
}

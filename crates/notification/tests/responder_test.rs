// Integration tests for the notification interaction lifecycle

use backend::MockBackendClient;
use notification::{
    ActionResponder, InteractionState, NotificationRecord, NotificationResponse, ResponseOption,
    SurfaceImage, SurfaceUpdate, ACTION_CANCEL, ACTION_INITIATE,
};
use shared::{BeaconIdentity, NotificationConfig, PendingAction};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use uuid::Uuid;

fn record(action_id: &str) -> NotificationRecord {
    let action = PendingAction::new(action_id, BeaconIdentity::new(Uuid::new_v4(), 204, 7));
    NotificationRecord::for_action(&action, "CHF").unwrap()
}

/// Drain updates until the dismissal, noting when each one arrived
async fn collect_until_dismiss(
    rx: &mut UnboundedReceiver<SurfaceUpdate>,
) -> Vec<(SurfaceUpdate, Instant)> {
    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        let done = matches!(update, SurfaceUpdate::Dismiss { .. });
        updates.push((update, Instant::now()));
        if done {
            break;
        }
    }
    updates
}

fn states(updates: &[(SurfaceUpdate, Instant)]) -> Vec<InteractionState> {
    updates
        .iter()
        .map(|(update, _)| match update {
            SurfaceUpdate::Render { state, .. } => state.clone(),
            SurfaceUpdate::Dismiss { .. } => InteractionState::Dismissed,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_failed_action_dismisses_after_one_second() {
    let backend = Arc::new(MockBackendClient::new().with_failing_perform("Card declined"));
    let (responder, mut rx) =
        ActionResponder::with_channel(backend.clone(), &NotificationConfig::default());
    let responder = Arc::new(responder);
    let record = record("abc123");
    responder.present(&record);

    let task = {
        let responder = responder.clone();
        let response = NotificationResponse {
            action_identifier: ACTION_INITIATE.to_string(),
            notification: record.clone(),
        };
        tokio::spawn(async move { responder.respond(response).await })
    };

    let updates = collect_until_dismiss(&mut rx).await;
    assert_eq!(task.await.unwrap(), ResponseOption::Dismiss);

    assert_eq!(
        states(&updates),
        vec![
            InteractionState::Pending,
            InteractionState::InProgress,
            InteractionState::Failed {
                message: "Card declined".to_string()
            },
            InteractionState::Dismissed,
        ]
    );

    let failed_at = updates[2].1;
    let dismissed_at = updates[3].1;
    assert_eq!(dismissed_at - failed_at, Duration::from_secs(1));

    match &updates[2].0 {
        SurfaceUpdate::Render { view, .. } => {
            assert_eq!(view.title, "Action failed");
            assert_eq!(view.message, "Card declined");
            assert_eq!(view.image, SurfaceImage::Error);
        }
        other => panic!("Expected render, got {:?}", other),
    }

    assert_eq!(backend.perform_calls().await, vec!["abc123".to_string()]);
    assert_eq!(responder.state_of(&record.id), Some(InteractionState::Dismissed));
}

#[tokio::test(start_paused = true)]
async fn test_successful_action() {
    let backend = Arc::new(MockBackendClient::new());
    let (responder, mut rx) =
        ActionResponder::with_channel(backend.clone(), &NotificationConfig::default());
    let record = record("abc123");
    responder.present(&record);

    let option = responder
        .respond(NotificationResponse {
            action_identifier: ACTION_INITIATE.to_string(),
            notification: record.clone(),
        })
        .await;
    assert_eq!(option, ResponseOption::Dismiss);

    let updates = collect_until_dismiss(&mut rx).await;
    assert_eq!(
        states(&updates),
        vec![
            InteractionState::Pending,
            InteractionState::InProgress,
            InteractionState::Succeeded,
            InteractionState::Dismissed,
        ]
    );
    match &updates[2].0 {
        SurfaceUpdate::Render { view, .. } => {
            assert_eq!(view.title, "Action succeeded");
            assert_eq!(view.message, "SUCCESS");
        }
        other => panic!("Expected render, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_progress_shown_before_backend_completes() {
    let backend = Arc::new(MockBackendClient::new().with_perform_delay(Duration::from_secs(5)));
    let (responder, mut rx) =
        ActionResponder::with_channel(backend.clone(), &NotificationConfig::default());
    let responder = Arc::new(responder);
    let record = record("abc123");
    responder.present(&record);
    let start = Instant::now();

    let task = {
        let responder = responder.clone();
        let response = NotificationResponse {
            action_identifier: ACTION_INITIATE.to_string(),
            notification: record.clone(),
        };
        tokio::spawn(async move { responder.respond(response).await })
    };

    let updates = collect_until_dismiss(&mut rx).await;
    task.await.unwrap();

    // Progress is rendered immediately, success after the backend's 5s, dismissal 1s later
    assert_eq!(updates[1].1 - start, Duration::ZERO);
    assert_eq!(updates[2].1 - start, Duration::from_secs(5));
    assert_eq!(updates[3].1 - start, Duration::from_secs(6));
}

#[tokio::test]
async fn test_cancel_dismisses_without_backend_call() {
    let backend = Arc::new(MockBackendClient::new());
    let (responder, mut rx) =
        ActionResponder::with_channel(backend.clone(), &NotificationConfig::default());
    let record = record("abc123");
    responder.present(&record);

    let option = responder
        .respond(NotificationResponse {
            action_identifier: ACTION_CANCEL.to_string(),
            notification: record.clone(),
        })
        .await;

    assert_eq!(option, ResponseOption::Dismiss);
    let updates = collect_until_dismiss(&mut rx).await;
    assert_eq!(
        states(&updates),
        vec![InteractionState::Pending, InteractionState::Dismissed]
    );
    assert!(backend.perform_calls().await.is_empty());
    assert!(backend.lookup_calls().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_second_accept_while_in_progress_is_ignored() {
    let backend = Arc::new(MockBackendClient::new().with_perform_delay(Duration::from_secs(2)));
    let (responder, mut rx) =
        ActionResponder::with_channel(backend.clone(), &NotificationConfig::default());
    let responder = Arc::new(responder);
    let record = record("abc123");
    responder.present(&record);

    let response = NotificationResponse {
        action_identifier: ACTION_INITIATE.to_string(),
        notification: record.clone(),
    };
    let first = {
        let responder = responder.clone();
        let response = response.clone();
        tokio::spawn(async move { responder.respond(response).await })
    };

    // Let the first tap reach the backend
    tokio::task::yield_now().await;
    assert_eq!(responder.state_of(&record.id), Some(InteractionState::InProgress));

    let second = responder.respond(response).await;
    assert_eq!(second, ResponseOption::DoNotDismiss);

    assert_eq!(first.await.unwrap(), ResponseOption::Dismiss);
    collect_until_dismiss(&mut rx).await;
    assert_eq!(backend.perform_calls().await.len(), 1);
}

#[tokio::test]
async fn test_late_duplicate_cancel_has_no_backend_effect() {
    let backend = Arc::new(MockBackendClient::new());
    let (responder, _rx) =
        ActionResponder::with_channel(backend.clone(), &NotificationConfig::default());
    let record = record("abc123");
    responder.present(&record);

    let cancel = NotificationResponse {
        action_identifier: ACTION_CANCEL.to_string(),
        notification: record.clone(),
    };
    assert_eq!(responder.respond(cancel.clone()).await, ResponseOption::Dismiss);

    // A late duplicate only dismisses again
    assert_eq!(responder.respond(cancel).await, ResponseOption::Dismiss);
    assert_eq!(responder.state_of(&record.id), Some(InteractionState::Dismissed));
    assert!(backend.perform_calls().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_accept_after_dismissal_does_not_perform_again() {
    let backend = Arc::new(MockBackendClient::new());
    let (responder, mut rx) =
        ActionResponder::with_channel(backend.clone(), &NotificationConfig::default());
    let record = record("abc123");
    responder.present(&record);

    let accept = NotificationResponse {
        action_identifier: ACTION_INITIATE.to_string(),
        notification: record.clone(),
    };
    assert_eq!(responder.respond(accept.clone()).await, ResponseOption::Dismiss);
    collect_until_dismiss(&mut rx).await;

    assert_eq!(responder.respond(accept).await, ResponseOption::Dismiss);
    assert_eq!(backend.perform_calls().await, vec!["abc123".to_string()]);
    assert_eq!(responder.state_of(&record.id), Some(InteractionState::Dismissed));

    // Presenting it again does not bring back the payment prompt
    responder.present(&record);
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dismissed_after_cancel_rejects_accept() {
    let backend = Arc::new(MockBackendClient::new());
    let (responder, _rx) =
        ActionResponder::with_channel(backend.clone(), &NotificationConfig::default());
    let record = record("abc123");
    responder.present(&record);

    let respond = |identifier: &str| NotificationResponse {
        action_identifier: identifier.to_string(),
        notification: record.clone(),
    };
    responder.respond(respond(ACTION_CANCEL)).await;
    assert_eq!(responder.respond(respond(ACTION_INITIATE)).await, ResponseOption::Dismiss);

    assert!(backend.perform_calls().await.is_empty());
}

#[tokio::test]
async fn test_forget_releases_unanswered_notifications() {
    let backend = Arc::new(MockBackendClient::new());
    let (responder, _rx) = ActionResponder::with_channel(backend, &NotificationConfig::default());

    let records: Vec<_> = (0..100).map(|_| record("abc123")).collect();
    for record in &records {
        responder.present(record);
    }
    assert_eq!(responder.tracked(), 100);

    for record in &records {
        responder.forget(&record.id);
    }
    assert_eq!(responder.tracked(), 0);
    assert_eq!(responder.state_of(&records[0].id), None);
}

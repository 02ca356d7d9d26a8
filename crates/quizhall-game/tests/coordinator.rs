//! Integration tests for the coordinator.

use std::sync::Arc;
use std::time::Duration;

use quizhall_game::{Coordinator, ExitReason, GameConfig, GameError};
use quizhall_participant::ChannelParticipant;
use quizhall_protocol::{PlayerId, Question, Quiz, Status};

fn quiz() -> Arc<Quiz> {
    Arc::new(Quiz::new(
        "Planets",
        vec![Question::new(
            "Largest planet?",
            vec!["Mars".into(), "Jupiter".into()],
            1,
        )],
    ))
}

fn short_lived() -> Coordinator {
    Coordinator::with_config(GameConfig::with_lifetime(Duration::from_millis(50)))
}

#[tokio::test]
async fn test_create_game_registers_a_handle() {
    let mut coordinator = Coordinator::new();
    let pin = coordinator.create_game(quiz()).unwrap();

    assert!(pin.0 < 1_000_000);
    assert_eq!(coordinator.game_count(), 1);
    assert_eq!(coordinator.pins(), vec![pin]);

    let handle = coordinator.handle(pin).unwrap();
    assert_eq!(handle.pin(), pin);
    assert_eq!(handle.status().await.unwrap(), Status::HostWaiting);
}

#[tokio::test]
async fn test_pins_are_unique() {
    let mut coordinator = Coordinator::new();
    let mut pins: Vec<_> = (0..50)
        .map(|_| coordinator.create_game(quiz()).unwrap())
        .collect();
    pins.sort_by_key(|p| p.0);
    pins.dedup();
    assert_eq!(pins.len(), 50);
    assert_eq!(coordinator.game_count(), 50);
}

#[tokio::test]
async fn test_unplayable_quiz_is_rejected() {
    let mut coordinator = Coordinator::new();
    let result = coordinator.create_game(Arc::new(Quiz::new("Empty", vec![])));
    assert!(matches!(result, Err(GameError::Quiz(_))));
    assert_eq!(coordinator.game_count(), 0);
}

#[tokio::test]
async fn test_unknown_pin_has_no_handle() {
    let coordinator = Coordinator::default();
    assert!(coordinator.handle(quizhall_protocol::Pin(5)).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_reap_next_removes_timed_out_game() {
    let mut coordinator = short_lived();
    let pin = coordinator.create_game(quiz()).unwrap();
    assert!(coordinator.try_reap().is_none());

    let reaped = coordinator.reap_next().await.unwrap();
    assert_eq!(reaped.pin, pin);
    assert!(reaped.timed_out());
    assert_eq!(coordinator.game_count(), 0);
    assert!(coordinator.handle(pin).is_none());
}

#[tokio::test]
async fn test_reap_after_a_completed_game() {
    let mut coordinator = Coordinator::new();
    let pin = coordinator.create_game(quiz()).unwrap();
    let handle = coordinator.handle(pin).unwrap();

    let (host, _host_rx) = ChannelParticipant::new();
    handle.attach_host(host).await.unwrap();
    let mut inboxes = Vec::new();
    for id in 1..=3 {
        let (player, rx) = ChannelParticipant::new();
        handle.join(PlayerId(id), format!("p{id}"), player).await.unwrap();
        inboxes.push(rx);
    }
    handle.start().await.unwrap();
    handle.countdown_done().await.unwrap();
    for id in 1..=3 {
        handle.submit_answer(PlayerId(id), 1).await.unwrap();
    }
    handle.next_question().await.unwrap();
    handle.finish().await.unwrap();

    let reaped = coordinator.reap_next().await.unwrap();
    assert_eq!(reaped.pin, pin);
    assert_eq!(reaped.reason, ExitReason::Completed);
    assert_eq!(coordinator.game_count(), 0);
}

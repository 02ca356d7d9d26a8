//! Integration tests for the game lifetime deadline.
//!
//! Uses `start_paused = true` so Tokio auto-advances the clock whenever
//! every task is idle: a 45-minute deadline fires instantly, and
//! `timeout` proves a future pends without actually waiting.

use std::time::Duration;

use quizhall_deadline::{Deadline, LifetimeConfig, MAX_GAME_TIME};
use tokio::time::Instant;

// =========================================================================
// LifetimeConfig
// =========================================================================

#[test]
fn test_default_config_selects_max_game_time() {
    let cfg = LifetimeConfig::default();
    assert_eq!(cfg.max_lifetime, Duration::ZERO);
    assert_eq!(cfg.effective(), MAX_GAME_TIME);
}

#[test]
fn test_max_game_time_is_45_minutes() {
    assert_eq!(MAX_GAME_TIME, Duration::from_secs(2700));
}

#[test]
fn test_short_lifetime_is_kept() {
    let cfg = LifetimeConfig::with_max(Duration::from_millis(50));
    assert_eq!(cfg.effective(), Duration::from_millis(50));
}

#[test]
fn test_long_lifetime_is_clamped() {
    let cfg = LifetimeConfig::with_max(Duration::from_secs(3 * 3600)).validated();
    assert_eq!(cfg.max_lifetime, MAX_GAME_TIME);
    assert_eq!(cfg.effective(), MAX_GAME_TIME);
}

// =========================================================================
// Firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_deadline_fires_after_lifetime() {
    let start = Instant::now();
    let mut deadline = Deadline::after(Duration::from_millis(50));
    assert!(deadline.is_armed());

    deadline.expired().await;

    assert!(start.elapsed() >= Duration::from_millis(50));
    assert!(deadline.has_fired());
    assert!(!deadline.is_armed());
    assert_eq!(deadline.remaining(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_does_not_fire_early() {
    let mut deadline = Deadline::after(Duration::from_millis(50));

    let result = tokio::time::timeout(Duration::from_millis(49), deadline.expired()).await;
    assert!(result.is_err(), "deadline fired before its lifetime");
    assert!(!deadline.has_fired());
}

#[tokio::test(start_paused = true)]
async fn test_zero_lifetime_waits_max_game_time() {
    let start = Instant::now();
    let mut deadline = Deadline::arm(LifetimeConfig::default());
    assert_eq!(deadline.lifetime(), MAX_GAME_TIME);

    deadline.expired().await;
    assert!(start.elapsed() >= MAX_GAME_TIME);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_fires_at_most_once() {
    let mut deadline = Deadline::after(Duration::from_millis(10));
    deadline.expired().await;

    let again = tokio::time::timeout(Duration::from_secs(3600), deadline.expired()).await;
    assert!(again.is_err(), "a fired deadline must pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_losing_a_select_race_keeps_the_original_expiry() {
    let start = Instant::now();
    let mut deadline = Deadline::after(Duration::from_millis(100));

    // Let a competing branch win twice; the deadline future is dropped
    // each time but its timer is not reset.
    for _ in 0..2 {
        tokio::select! {
            biased;
            () = tokio::time::sleep(Duration::from_millis(30)) => {}
            () = deadline.expired() => panic!("fired too soon"),
        }
    }

    deadline.expired().await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(130));
}

// =========================================================================
// Release
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_released_deadline_never_fires() {
    let mut deadline = Deadline::after(Duration::from_millis(10));
    deadline.release();
    assert!(!deadline.is_armed());

    let result = tokio::time::timeout(Duration::from_secs(60), deadline.expired()).await;
    assert!(result.is_err());
    assert!(!deadline.has_fired());
}

#[tokio::test(start_paused = true)]
async fn test_release_is_idempotent_and_safe_after_firing() {
    let mut deadline = Deadline::after(Duration::from_millis(10));
    deadline.expired().await;
    deadline.release();
    deadline.release();
    assert!(deadline.has_fired());
    assert!(!deadline.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_remaining_counts_down() {
    let deadline = Deadline::after(Duration::from_secs(10));
    assert_eq!(deadline.remaining(), Duration::from_secs(10));

    tokio::time::advance(Duration::from_secs(4)).await;
    assert_eq!(deadline.remaining(), Duration::from_secs(6));
    assert_eq!(deadline.expires_at() - Instant::now(), Duration::from_secs(6));
}

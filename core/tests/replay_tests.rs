// tests/replay_tests.rs
mod common;

use common::*;
use futures::StreamExt;
use preflight::{DefaultPrerequisiteRegistrar, LoadResult, ResultStage};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_second_subscription_replays_without_rerunning() {
  setup_tracing();
  let registrar = DefaultPrerequisiteRegistrar::new();
  let run_count = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&run_count);
  registrar
    .register_action(
      move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
      },
      "once",
    )
    .unwrap();

  let first: Vec<LoadResult> = registrar.load().collect().await;
  assert_eq!(first.len(), 2);
  assert_eq!(run_count.load(Ordering::SeqCst), 1);

  let second: Vec<LoadResult> = registrar.load().collect().await;
  assert_eq!(second, first);
  assert_eq!(run_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[serial]
async fn test_replay_after_failure_includes_the_terminal_error() {
  setup_tracing();
  let registrar = DefaultPrerequisiteRegistrar::new();
  let run_count = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&run_count);
  registrar
    .register_action(
      move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("boom"))
      },
      "doomed",
    )
    .unwrap();

  let first: Vec<LoadResult> = registrar.load().collect().await;
  assert_eq!(first.len(), 2);
  assert_stage(&first[1], ResultStage::Error, "doomed");

  let second: Vec<LoadResult> = registrar.load().collect().await;
  assert_eq!(second, first);
  assert_eq!(run_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[serial]
async fn test_mid_run_subscriber_drains_history_then_goes_live() {
  setup_tracing();
  let registrar = DefaultPrerequisiteRegistrar::new();
  let (sender, receiver) = live_source();
  registrar.register_stream(receiver, "slow").unwrap();

  let mut early = registrar.load();
  assert_stage(&early.next().await.unwrap(), ResultStage::Starting, "slow");

  // A subscriber attaching mid-run first sees the buffered history.
  let mut late = registrar.load();
  assert_stage(&late.next().await.unwrap(), ResultStage::Starting, "slow");

  sender.unbounded_send(Ok(())).unwrap();
  assert_stage(&early.next().await.unwrap(), ResultStage::Completed, "slow");
  assert_stage(&late.next().await.unwrap(), ResultStage::Completed, "slow");
  assert!(early.next().await.is_none());
  assert!(late.next().await.is_none());
}

#[tokio::test]
#[serial]
async fn test_multiple_load_calls_share_one_execution() {
  setup_tracing();
  let registrar = DefaultPrerequisiteRegistrar::new();
  let run_count = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&run_count);
  registrar
    .register_action(
      move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
      },
      "shared",
    )
    .unwrap();

  // Both handles exist before anything runs; they still share one run.
  let first_handle = registrar.load();
  let second_handle = registrar.load();

  let first: Vec<LoadResult> = first_handle.collect().await;
  let second: Vec<LoadResult> = second_handle.collect().await;
  assert_eq!(first, second);
  assert_eq!(run_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[serial]
async fn test_dispose_ends_open_subscriptions() {
  setup_tracing();
  let registrar = DefaultPrerequisiteRegistrar::new();
  // The sender is kept alive and never used, so the unit stays in flight.
  let (_sender, receiver) = live_source();
  registrar.register_stream(receiver, "stuck").unwrap();

  let mut load = registrar.load();
  assert_stage(&load.next().await.unwrap(), ResultStage::Starting, "stuck");

  registrar.dispose();
  assert!(load.next().await.is_none());

  // Disposal abandons the replay buffer; a later subscriber sees nothing.
  let replay: Vec<LoadResult> = registrar.load().collect().await;
  assert!(replay.is_empty());

  // Disposing again is a no-op.
  registrar.dispose();
}

#[tokio::test]
#[serial]
async fn test_dispose_after_completion_is_quiet() {
  setup_tracing();
  let registrar = DefaultPrerequisiteRegistrar::new();
  registrar.register_action(|| Ok(()), "only").unwrap();

  let results: Vec<LoadResult> = registrar.load().collect().await;
  assert_eq!(results.len(), 2);

  registrar.dispose();
  registrar.dispose();
}

#[tokio::test]
#[serial]
async fn test_dropping_the_registrar_disposes_the_run() {
  setup_tracing();
  let registrar = DefaultPrerequisiteRegistrar::new();
  let (_sender, receiver) = live_source();
  registrar.register_stream(receiver, "stuck").unwrap();

  let mut load = registrar.load();
  assert_stage(&load.next().await.unwrap(), ResultStage::Starting, "stuck");

  drop(registrar);
  assert!(load.next().await.is_none());
}

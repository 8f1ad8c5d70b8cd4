// preflight/examples/late_subscriber.rs
//
// The run executes exactly once; a subscriber attaching after completion
// replays the recorded outcome instead of re-running anything.

use anyhow::Result;
use futures::StreamExt;
use preflight::DefaultPrerequisiteRegistrar;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let registrar = DefaultPrerequisiteRegistrar::new();

  registrar.register_stream(
    futures::stream::once(async {
      tokio::time::sleep(Duration::from_millis(100)).await;
      Ok::<_, anyhow::Error>(())
    }),
    "Warming session",
  )?;
  registrar.register_action(|| Ok(()), "Registering views")?;

  let live: Vec<_> = registrar.load().collect().await;
  info!(events = live.len(), "first subscriber observed the live run");

  // No unit runs again; the late subscriber gets the recorded sequence.
  let replayed: Vec<_> = registrar.load().collect().await;
  assert_eq!(replayed, live);
  info!(events = replayed.len(), "late subscriber replayed the same outcome");

  Ok(())
}

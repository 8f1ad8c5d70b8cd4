// preflight/examples/module_load.rs

use anyhow::Result;
use futures::StreamExt;
use preflight::{DefaultPrerequisiteRegistrar, ResultStage};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Module Load Example ---");

  let registrar = DefaultPrerequisiteRegistrar::new();

  // A timer-backed source standing in for a reference data request.
  registrar.register_stream(
    futures::stream::once(async {
      tokio::time::sleep(Duration::from_millis(300)).await;
      Ok::<_, anyhow::Error>(())
    }),
    "Loading referential data",
  )?;

  // A factory, for sources that would start work the moment they exist.
  registrar.register_stream_factory(
    || {
      futures::stream::once(async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        Ok::<_, anyhow::Error>(())
      })
    },
    "Connecting to trade feed",
  )?;

  // A synchronous one-shot.
  registrar.register_action(
    || {
      info!("caches primed");
      Ok(())
    },
    "Priming caches",
  )?;

  let mut load = registrar.load();
  while let Some(result) = load.next().await {
    match result.stage {
      ResultStage::Starting => info!(unit = %result.name, "starting"),
      ResultStage::Completed => info!(unit = %result.name, "completed"),
      ResultStage::Error => info!(unit = %result.name, message = ?result.error_message, "failed"),
    }
  }

  info!("module ready");
  Ok(())
}

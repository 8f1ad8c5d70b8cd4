// preflight/examples/failed_prerequisite.rs
//
// A load run where one prerequisite fails: the pipeline stops, the failure
// arrives as an ordinary Error-stage result, and units registered after the
// failing one never run.

use anyhow::Result;
use futures::StreamExt;
use preflight::DefaultPrerequisiteRegistrar;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let registrar = DefaultPrerequisiteRegistrar::new();

  registrar.register_stream(
    futures::stream::once(async {
      tokio::time::sleep(Duration::from_millis(200)).await;
      Ok::<_, anyhow::Error>(())
    }),
    "Loading referential data",
  )?;

  // This one fails after a short delay; the formatter shapes the message
  // shown to the user.
  registrar.register_stream_with(
    futures::stream::once(async {
      tokio::time::sleep(Duration::from_millis(200)).await;
      Err::<(), _>(anyhow::anyhow!("load error"))
    }),
    "Loading positions",
    |error| format!("Custom message: {error}"),
  )?;

  registrar.register_action(|| Ok(()), "Never reached")?;

  let results: Vec<_> = registrar.load().collect().await;
  for result in &results {
    info!(unit = %result.name, stage = ?result.stage, message = ?result.error_message, "load result");
  }

  if results.iter().any(|result| result.is_error()) {
    warn!("module failed to load");
  } else {
    info!("module ready");
  }

  Ok(())
}

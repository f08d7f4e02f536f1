use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{info, warn};

use moviecat::config::Config;
use moviecat::logging;
use moviecat::overlay::print_overlay;
use moviecat::playback::checkpoint::{CheckpointError, CheckpointStore};
use moviecat::playback::engine::{EngineCommand, MediaEngine};
use moviecat::playback::events::{PlayerEvent, PlayerHandle};
use moviecat::playback::fullscreen::{FullscreenError, HostFullscreen, NoFullscreen, SurfaceId};
use moviecat::{MediaSource, PlaybackController};

/// One line of the event script.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptStep {
    Wait { wait_ms: u64 },
    Event(PlayerEvent),
}

/// Engine stand-in that reports every command on stdout.
struct ConsoleEngine;

impl MediaEngine for ConsoleEngine {
    fn execute(&mut self, command: EngineCommand) {
        println!("{}", serde_json::json!({ "engine": command }));
    }
}

struct ConsoleHost;

impl HostFullscreen for ConsoleHost {
    fn is_enabled(&self) -> bool {
        true
    }

    fn request(&mut self, target: &SurfaceId) -> Result<(), FullscreenError> {
        info!(%target, "host fullscreen on");
        Ok(())
    }

    fn exit(&mut self) -> Result<(), FullscreenError> {
        info!("host fullscreen off");
        Ok(())
    }

    fn set_window_fullscreen(&mut self, fullscreen: bool) -> Result<(), FullscreenError> {
        info!(fullscreen, "window fullscreen");
        Ok(())
    }
}

struct ConsoleStore {
    fail: bool,
}

#[async_trait]
impl CheckpointStore for ConsoleStore {
    async fn save_checkpoint(
        &self,
        media_id: u32,
        elapsed_seconds: u32,
    ) -> Result<(), CheckpointError> {
        if self.fail {
            return Err(CheckpointError::Backend("simulated backend failure".to_string()));
        }
        let checkpoint = serde_json::json!({
            "media_id": media_id,
            "elapsed_seconds": elapsed_seconds,
        });
        println!("{}", serde_json::json!({ "checkpoint": checkpoint }));
        Ok(())
    }
}

async fn open_script(config: &Config) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
    match &config.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening script {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(tokio::io::stdin())),
    }
}

/// Feeds script lines into the player until input ends, then unmounts it.
async fn feed(script: Box<dyn AsyncRead + Unpin + Send>, handle: PlayerHandle) -> Result<()> {
    let mut lines = BufReader::new(script).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<ScriptStep>(line) {
            Ok(ScriptStep::Wait { wait_ms }) => {
                tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            }
            Ok(ScriptStep::Event(event)) => {
                if handle.send(event).is_err() {
                    return Ok(());
                }
            }
            Err(e) => warn!(line = line_no, "skipping unreadable script line: {}", e),
        }
    }
    let _ = handle.unmount();
    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let script = open_script(&config).await?;
    let media = MediaSource::new(config.url.clone(), config.media_id);
    let host: Box<dyn HostFullscreen> = if config.no_fullscreen {
        Box::new(NoFullscreen)
    } else {
        Box::new(ConsoleHost)
    };
    let store = Arc::new(ConsoleStore {
        fail: config.fail_checkpoint,
    });

    let (handle, controller) = PlaybackController::new(
        media,
        &config.player_config(),
        Box::new(ConsoleEngine),
        host,
        store,
    );
    info!(url = %config.url, media_id = ?config.media_id, "player mounted");

    let feeder = tokio::spawn(feed(script, handle));

    let mut last_output = String::new();
    let save = controller
        .run(|overlay| {
            print_overlay(overlay, &mut last_output);
        })
        .await;
    if let Some(save) = save {
        save.await.context("checkpoint save task failed")?;
    }

    feeder.abort();
    match feeder.await {
        Ok(result) => result?,
        Err(e) if e.is_cancelled() => {}
        Err(e) => return Err(e).context("script reader failed"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_level);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(config))
}

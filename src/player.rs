use anyhow::{Context, Result, anyhow};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::{
  io::{AsyncBufReadExt, BufReader as TokioBufReader},
  process::{Child as TokioChild, Command},
  sync::mpsc,
  task::JoinHandle,
  time::timeout,
};
use tracing::{debug, info, warn};

use crate::settings::PlaybackQuality;

/// How a theater session ended on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEnd {
  Finished,
  Failed(String),
}

struct Session {
  video_id: String,
  child: TokioChild,
  started_at: Instant,
  stderr_monitor: JoinHandle<()>,
  stderr_rx: mpsc::Receiver<String>,
  last_stderr: Option<String>,
}

/// Upper bound on waiting for the last stderr lines once the player has exited.
const STDERR_GRACE: Duration = Duration::from_millis(250);

impl Session {
  fn note_stderr(&mut self, line: String) {
    let line = line.trim();
    if !line.is_empty() {
      self.last_stderr = Some(line.to_string());
    }
  }

  /// Read whatever is still in flight after exit. The channel closes once the
  /// monitor has hit end of pipe.
  async fn drain_stderr(&mut self) {
    while let Ok(Some(line)) = timeout(STDERR_GRACE, self.stderr_rx.recv()).await {
      self.note_stderr(line);
    }
  }
}

/// Theater playback through an external `mpv` window.
pub struct TheaterPlayer {
  current: Option<Session>,
}

/// yt-dlp format selector capping the height. `None` lets the player choose.
pub fn ytdl_format(quality: PlaybackQuality) -> Option<String> {
  quality.max_height().map(|h| format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]"))
}

impl TheaterPlayer {
  pub fn new() -> Self {
    Self { current: None }
  }

  pub fn is_playing(&self) -> bool {
    self.current.is_some()
  }

  pub fn video_id(&self) -> Option<&str> {
    self.current.as_ref().map(|s| s.video_id.as_str())
  }

  pub fn elapsed_secs(&self) -> Option<u64> {
    self.current.as_ref().map(|s| s.started_at.elapsed().as_secs())
  }

  pub async fn play(&mut self, video_id: &str, title: &str, url: &str, quality: PlaybackQuality) -> Result<()> {
    self.stop().await.context("Failed to stop previous playback")?;

    let mut cmd = Command::new("mpv");
    cmd.args(["--force-window=yes", "--no-input-terminal", "--msg-level=all=error"]);
    cmd.arg(format!("--force-media-title={}", title));
    if let Some(format) = ytdl_format(quality) {
      cmd.arg(format!("--ytdl-format={}", format));
    }
    cmd.arg("--").arg(url);
    self.start(video_id, cmd)?;
    info!(video_id = %video_id, url = %url, quality = quality.label(), "player: theater started");
    Ok(())
  }

  fn start(&mut self, video_id: &str, mut cmd: Command) -> Result<()> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    // stderr is drained by the monitor task; an undrained pipe would block mpv.
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        anyhow!("mpv not found. Install it with: brew install mpv (macOS) or apt install mpv (Linux)")
      } else {
        anyhow!(e).context("Failed to spawn mpv process")
      }
    })?;

    let stderr = child.stderr.take().context("Failed to get mpv stderr")?;
    let (tx, rx) = mpsc::channel::<String>(16);
    let stderr_monitor = tokio::spawn(async move {
      let mut lines = TokioBufReader::new(stderr).lines();
      while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).await.is_err() {
          break;
        }
      }
    });

    self.current = Some(Session {
      video_id: video_id.to_string(),
      child,
      started_at: Instant::now(),
      stderr_monitor,
      stderr_rx: rx,
      last_stderr: None,
    });
    Ok(())
  }

  /// Reports the session if mpv has exited since the last call. Returns at
  /// once while it is still running.
  pub async fn check_exit(&mut self) -> Option<(String, PlaybackEnd)> {
    let outcome = {
      let session = self.current.as_mut()?;
      while let Ok(line) = session.stderr_rx.try_recv() {
        session.note_stderr(line);
      }
      let exited = session.child.try_wait();
      if matches!(exited, Ok(Some(_))) {
        session.drain_stderr().await;
      }
      match exited {
        Ok(None) => return None,
        Ok(Some(status)) if status.success() => PlaybackEnd::Finished,
        Ok(Some(status)) => PlaybackEnd::Failed(
          session.last_stderr.clone().unwrap_or_else(|| format!("Player exited with {}", status)),
        ),
        Err(e) => PlaybackEnd::Failed(format!("Lost track of the player: {}", e)),
      }
    };
    let session = self.current.take()?;
    session.stderr_monitor.abort();
    debug!(video_id = %session.video_id, outcome = ?outcome, "player: theater exited");
    Some((session.video_id, outcome))
  }

  pub async fn stop(&mut self) -> Result<()> {
    let Some(mut session) = self.current.take() else { return Ok(()) };
    session.stderr_monitor.abort();
    let _ = session.stderr_monitor.await;
    if let Err(e) = session.child.kill().await {
      // Already exited is fine; anything else is worth a note.
      if e.kind() != std::io::ErrorKind::InvalidInput {
        return Err(anyhow!(e).context("Failed to kill mpv process"));
      }
    }
    let _ = session.child.wait().await;
    debug!(video_id = %session.video_id, "player: theater stopped");
    Ok(())
  }
}

/// Fire-and-forget interaction sound. A missing mpv is not an error here.
pub fn play_click(url: &str) {
  let spawned = Command::new("mpv")
    .args(["--no-video", "--really-quiet", "--no-input-terminal", "--", url])
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn();
  match spawned {
    Ok(mut child) => {
      // Reap in the background to avoid zombie processes.
      tokio::spawn(async move {
        let _ = child.wait().await;
      });
    }
    Err(e) => warn!(err = %e, "player: click sound unavailable"),
  }
}

//! Optional spoken search. An external program records speech and prints the
//! transcript on stdout; without one configured the feature is simply hidden.

use anyhow::{Context, Result, anyhow};
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

#[derive(Debug, Clone)]
pub struct VoiceInput {
  program: String,
  args: Vec<String>,
}

impl VoiceInput {
  pub fn from_command(command: Option<&[String]>) -> Option<Self> {
    let (program, args) = command?.split_first()?;
    if program.trim().is_empty() {
      return None;
    }
    Some(Self { program: program.clone(), args: args.to_vec() })
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  /// Run the recorder and return the trimmed transcript.
  pub async fn listen(&self) -> Result<String> {
    info!(program = %self.program, "voice: listening");
    let output = Command::new(&self.program)
      .args(&self.args)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .output()
      .await
      .map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
          anyhow!("Voice input program '{}' not found", self.program)
        } else {
          anyhow!(e).context("Failed to start voice input")
        }
      })?;

    if !output.status.success() {
      return Err(anyhow!("Voice input failed: {}", String::from_utf8_lossy(&output.stderr).trim()));
    }
    let transcript = String::from_utf8(output.stdout).context("Voice input output non-UTF8")?;
    let transcript = transcript.trim();
    if transcript.is_empty() {
      return Err(anyhow!("Didn't catch that, try again"));
    }
    Ok(transcript.to_string())
  }
}

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::theme::ThemeId;

/// Requested playback quality. Advisory only: the player may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackQuality {
  #[default]
  #[serde(rename = "auto")]
  Auto,
  #[serde(rename = "hd1080")]
  Hd1080,
  #[serde(rename = "hd720")]
  Hd720,
  #[serde(rename = "large")]
  Large,
  #[serde(rename = "medium")]
  Medium,
  #[serde(rename = "small")]
  Small,
  #[serde(rename = "tiny")]
  Tiny,
}

impl PlaybackQuality {
  pub const ALL: [PlaybackQuality; 7] = [
    PlaybackQuality::Auto,
    PlaybackQuality::Hd1080,
    PlaybackQuality::Hd720,
    PlaybackQuality::Large,
    PlaybackQuality::Medium,
    PlaybackQuality::Small,
    PlaybackQuality::Tiny,
  ];

  pub fn label(self) -> &'static str {
    match self {
      PlaybackQuality::Auto => "auto",
      PlaybackQuality::Hd1080 => "1080p",
      PlaybackQuality::Hd720 => "720p",
      PlaybackQuality::Large => "480p",
      PlaybackQuality::Medium => "360p",
      PlaybackQuality::Small => "240p",
      PlaybackQuality::Tiny => "144p",
    }
  }

  /// The `vq=` token understood by the YouTube iframe player.
  pub fn youtube_token(self) -> Option<&'static str> {
    match self {
      PlaybackQuality::Auto => None,
      PlaybackQuality::Hd1080 => Some("hd1080"),
      PlaybackQuality::Hd720 => Some("hd720"),
      PlaybackQuality::Large => Some("large"),
      PlaybackQuality::Medium => Some("medium"),
      PlaybackQuality::Small => Some("small"),
      PlaybackQuality::Tiny => Some("tiny"),
    }
  }

  pub fn max_height(self) -> Option<u32> {
    match self {
      PlaybackQuality::Auto => None,
      PlaybackQuality::Hd1080 => Some(1080),
      PlaybackQuality::Hd720 => Some(720),
      PlaybackQuality::Large => Some(480),
      PlaybackQuality::Medium => Some(360),
      PlaybackQuality::Small => Some(240),
      PlaybackQuality::Tiny => Some(144),
    }
  }

  pub fn next(self) -> Self {
    let idx = Self::ALL.iter().position(|q| *q == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }
}

/// Session-wide preferences, persisted as one blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
  #[serde(rename = "isDarkMode")]
  pub dark_mode: bool,
  #[serde(rename = "soundEnabled")]
  pub sound_on_interaction: bool,
  pub theme: ThemeId,
  #[serde(rename = "defaultQuality")]
  pub default_quality: PlaybackQuality,
  #[serde(rename = "showParentsTab")]
  pub guardian_tab_visible: bool,
}

impl Default for AppSettings {
  fn default() -> Self {
    Self {
      dark_mode: false,
      sound_on_interaction: true,
      theme: ThemeId::Default,
      default_quality: PlaybackQuality::Auto,
      guardian_tab_visible: false,
    }
  }
}

impl AppSettings {
  /// Overlay a persisted settings object onto the defaults, one field at a time.
  ///
  /// Fields missing from `raw` keep their default. Fields whose value no longer
  /// parses (a theme that was removed, a wrong type) are dropped with a warning
  /// rather than discarding the whole object. Unknown fields are ignored.
  pub fn merge_over_defaults(raw: &str) -> Result<Self> {
    let overlay: Value = serde_json::from_str(raw).context("Settings blob is not valid JSON")?;
    let Value::Object(overlay) = overlay else {
      return Err(anyhow!("Settings blob is not a JSON object"));
    };

    let Value::Object(mut merged) = serde_json::to_value(Self::default()).context("Failed to encode default settings")?
    else {
      return Err(anyhow!("Default settings did not encode as an object"));
    };

    for (key, value) in overlay {
      if !merged.contains_key(&key) {
        continue;
      }
      let previous = merged.insert(key.clone(), value);
      if serde_json::from_value::<Self>(Value::Object(merged.clone())).is_err() {
        warn!(field = %key, "settings: dropping persisted field that no longer parses");
        if let Some(previous) = previous {
          merged.insert(key, previous);
        }
      }
    }

    serde_json::from_value(Value::Object(merged)).context("Failed to decode merged settings")
  }
}

use serde::{Deserialize, Serialize};

/// One catalog entry. Field names on disk are camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
  pub id: String,
  pub title: String,
  #[serde(rename = "url")]
  pub source_url: String,
  /// Not re-validated after creation; a dangling id renders as uncategorized.
  #[serde(rename = "category")]
  pub category_id: String,
  /// Unix milliseconds.
  #[serde(rename = "timestamp")]
  pub created_at: i64,
  #[serde(rename = "isBroken", default)]
  pub is_broken: bool,
  #[serde(rename = "isChannel", default)]
  pub is_channel_link: bool,
  #[serde(rename = "isParentVideo", default)]
  pub is_guardian_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoFlags {
  pub is_channel_link: bool,
  pub is_guardian_only: bool,
}

/// Administrator input for a new entry; id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
  pub title: String,
  pub source_url: String,
  pub category_id: String,
  pub flags: VideoFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: String,
  pub name: String,
  pub icon: String,
  #[serde(rename = "color")]
  pub color_token: String,
}

/// Open playback failure for one video. Kept in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
  pub video_id: String,
  pub video_title: String,
  pub error_message: String,
}

/// Derive a category id from its display name: lowercased, whitespace runs → `-`.
pub fn slugify(name: &str) -> String {
  name.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join("-")
}

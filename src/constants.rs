//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` and parsed once on first access
//! via `LazyLock`. Seed data for a first run lives here too.

use serde::Deserialize;
use std::sync::LazyLock;

use crate::model::Category;

/// A video installed on first run, before any administrator has added one.
#[derive(Debug, Deserialize)]
pub struct SeedVideo {
  pub title: String,
  pub url: String,
  pub category: String,
}

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Storage keys, one JSON blob each
  pub videos_key: String,
  pub saved_key: String,
  pub categories_key: String,
  pub settings_key: String,

  // First-run data
  pub default_categories: Vec<Category>,
  pub seed_videos: Vec<SeedVideo>,
  pub new_category_icon: String,
  pub new_category_color: String,

  pub click_sound_url: String,

  // Placeholder gates, overridable from prefs.toml
  pub admin_username: String,
  pub admin_password: String,
  pub guardian_passcode: String,

  // Search collaborator
  pub search_top_k: usize,
  pub search_timeout_secs: u64,
  pub gemini_endpoint: String,
  pub gemini_model: String,
  pub gemini_api_key_env: String,

  pub video_id_len: usize,
  pub error_display_secs: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed every test fails.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.default_categories.len(), 4);
    assert_eq!(c.default_categories[0].id, "stories");
    assert_eq!(c.search_top_k, 5);
  }

  #[test]
  fn seed_videos_reference_default_categories() {
    let c = constants();
    for seed in &c.seed_videos {
      assert!(c.default_categories.iter().any(|cat| cat.id == seed.category), "{}", seed.category);
    }
  }
}

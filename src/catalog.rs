//! The catalog store: videos, categories, saved set, settings and open health
//! reports, kept in memory and written through to a [`KeyValueStore`] on
//! every mutation. A mutation only takes effect in memory once its blobs are
//! written.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::constants;
use crate::model::{Category, HealthReport, NewVideo, VideoEntry, VideoFlags, slugify};
use crate::settings::AppSettings;
use crate::storage::KeyValueStore;

pub const UNCATEGORIZED: &str = "uncategorized";

/// Which subset of the catalog a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf<'a> {
  All,
  Category(&'a str),
  Saved,
  Guardian,
}

pub struct Catalog<S: KeyValueStore> {
  store: S,
  /// Most recent first.
  videos: Vec<VideoEntry>,
  /// Insertion order.
  saved: Vec<String>,
  categories: Vec<Category>,
  settings: AppSettings,
  reports: Vec<HealthReport>,
}

fn put<S: KeyValueStore, T: Serialize + ?Sized>(store: &mut S, key: &str, value: &T) -> Result<()> {
  let json = serde_json::to_string(value).with_context(|| format!("Failed to encode {}", key))?;
  store.write(key, &json).with_context(|| format!("Failed to persist {}", key))
}

fn get<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Result<Option<T>> {
  let Some(raw) = store.read(key)? else { return Ok(None) };
  let value = serde_json::from_str(&raw).with_context(|| format!("Stored {} is malformed", key))?;
  Ok(Some(value))
}

fn fresh_id(videos: &[VideoEntry]) -> String {
  let len = constants().video_id_len;
  loop {
    let id: String = Uuid::new_v4().simple().to_string().chars().take(len).collect();
    if !videos.iter().any(|v| v.id == id) {
      return id;
    }
  }
}

fn with_broken_flag(videos: &[VideoEntry], id: &str, is_broken: bool) -> Vec<VideoEntry> {
  videos
    .iter()
    .map(|v| if v.id == id { VideoEntry { is_broken, ..v.clone() } } else { v.clone() })
    .collect()
}

fn now_millis() -> i64 {
  chrono::Utc::now().timestamp_millis()
}

impl<S: KeyValueStore> Catalog<S> {
  /// Read all four blobs. Absent keys are a first run: defaults are installed
  /// and written back. Malformed video, saved or category blobs are errors so
  /// they are never silently overwritten.
  pub fn load(mut store: S) -> Result<Self> {
    let c = constants();

    let stored_videos: Option<Vec<VideoEntry>> = get(&store, &c.videos_key)?;
    let stored_saved: Option<Vec<String>> = get(&store, &c.saved_key)?;
    let stored_categories: Option<Vec<Category>> = get(&store, &c.categories_key)?;
    let settings = match store.read(&c.settings_key)? {
      Some(raw) => AppSettings::merge_over_defaults(&raw).unwrap_or_else(|e| {
        warn!(err = %e, "catalog: stored settings unusable, using defaults");
        AppSettings::default()
      }),
      None => AppSettings::default(),
    };

    let first_run_categories = stored_categories.is_none();
    let categories = stored_categories.unwrap_or_else(|| c.default_categories.clone());

    let first_run_videos = stored_videos.is_none();
    let videos = match stored_videos {
      Some(videos) => videos,
      None => {
        let mut seeded: Vec<VideoEntry> = Vec::with_capacity(c.seed_videos.len());
        // Seeds only land in categories that exist.
        for seed in c.seed_videos.iter().filter(|s| categories.iter().any(|cat| cat.id == s.category)) {
          let id = fresh_id(&seeded);
          seeded.push(VideoEntry {
            id,
            title: seed.title.clone(),
            source_url: seed.url.clone(),
            category_id: seed.category.clone(),
            created_at: now_millis(),
            is_broken: false,
            is_channel_link: false,
            is_guardian_only: false,
          });
        }
        seeded
      }
    };
    let stored_saved_len = stored_saved.as_ref().map(Vec::len);
    let mut saved = stored_saved.unwrap_or_default();
    saved.retain(|id| videos.iter().any(|v| &v.id == id));
    let saved_dirty = stored_saved_len != Some(saved.len());

    if first_run_videos {
      put(&mut store, &c.videos_key, &videos)?;
    }
    if first_run_categories {
      put(&mut store, &c.categories_key, &categories)?;
    }
    if saved_dirty {
      put(&mut store, &c.saved_key, &saved)?;
    }

    info!(
      videos = videos.len(),
      categories = categories.len(),
      saved = saved.len(),
      first_run = first_run_videos,
      "catalog: loaded"
    );
    Ok(Self { store, videos, saved, categories, settings, reports: Vec::new() })
  }

  // --- Queries ---

  pub fn videos(&self) -> &[VideoEntry] {
    &self.videos
  }

  pub fn categories(&self) -> &[Category] {
    &self.categories
  }

  pub fn settings(&self) -> &AppSettings {
    &self.settings
  }

  pub fn reports(&self) -> &[HealthReport] {
    &self.reports
  }

  pub fn video(&self, id: &str) -> Option<&VideoEntry> {
    self.videos.iter().find(|v| v.id == id)
  }

  pub fn category(&self, id: &str) -> Option<&Category> {
    self.categories.iter().find(|c| c.id == id)
  }

  pub fn is_saved(&self, id: &str) -> bool {
    self.saved.iter().any(|s| s == id)
  }

  /// Display name of a video's category, or "uncategorized" for a dangling reference.
  pub fn category_label(&self, video: &VideoEntry) -> &str {
    self.category(&video.category_id).map_or(UNCATEGORIZED, |c| c.name.as_str())
  }

  /// Entries on a shelf. Guardian-only entries appear on the guardian shelf and nowhere else.
  pub fn shelf(&self, shelf: Shelf<'_>) -> Vec<&VideoEntry> {
    match shelf {
      Shelf::All => self.videos.iter().filter(|v| !v.is_guardian_only).collect(),
      Shelf::Category(id) => self.videos.iter().filter(|v| !v.is_guardian_only && v.category_id == id).collect(),
      Shelf::Saved => self.saved.iter().filter_map(|id| self.video(id)).filter(|v| !v.is_guardian_only).collect(),
      Shelf::Guardian => self.videos.iter().filter(|v| v.is_guardian_only).collect(),
    }
  }

  /// Look up ids in the given order, skipping any that no longer exist.
  pub fn resolve(&self, ids: &[String]) -> Vec<&VideoEntry> {
    ids.iter().filter_map(|id| self.video(id)).collect()
  }

  // --- Mutations ---

  pub fn add_video(&mut self, new: NewVideo) -> Result<VideoEntry> {
    let title = new.title.trim();
    let source_url = new.source_url.trim();
    if title.is_empty() {
      return Err(anyhow!("A video needs a title"));
    }
    if source_url.is_empty() {
      return Err(anyhow!("A video needs a link"));
    }
    if self.category(&new.category_id).is_none() {
      return Err(anyhow!("Unknown category '{}'", new.category_id));
    }

    let VideoFlags { is_channel_link, is_guardian_only } = new.flags;
    let video = VideoEntry {
      id: fresh_id(&self.videos),
      title: title.to_string(),
      source_url: source_url.to_string(),
      category_id: new.category_id,
      created_at: now_millis(),
      is_broken: false,
      is_channel_link,
      is_guardian_only,
    };
    let mut videos = Vec::with_capacity(self.videos.len() + 1);
    videos.push(video.clone());
    videos.extend_from_slice(&self.videos);
    put(&mut self.store, &constants().videos_key, &videos)?;
    self.videos = videos;
    info!(video_id = %video.id, category = %video.category_id, "catalog: video added");
    Ok(video)
  }

  /// Remove an entry and its saved membership. An open health report for the
  /// id is left in place until dismissed.
  pub fn delete_video(&mut self, id: &str) -> Result<bool> {
    if self.video(id).is_none() {
      return Ok(false);
    }
    let c = constants();
    let videos: Vec<VideoEntry> = self.videos.iter().filter(|v| v.id != id).cloned().collect();
    let saved: Option<Vec<String>> =
      self.is_saved(id).then(|| self.saved.iter().filter(|s| *s != id).cloned().collect());

    // Saved first; a failed videos write puts the old list back.
    if let Some(saved) = &saved {
      put(&mut self.store, &c.saved_key, saved)?;
    }
    if let Err(e) = put(&mut self.store, &c.videos_key, &videos) {
      if saved.is_some()
        && let Err(restore) = put(&mut self.store, &c.saved_key, &self.saved)
      {
        warn!(video_id = %id, err = %restore, "catalog: could not restore saved list");
      }
      return Err(e);
    }
    self.videos = videos;
    if let Some(saved) = saved {
      self.saved = saved;
    }
    info!(video_id = %id, "catalog: video deleted");
    Ok(true)
  }

  /// Flip saved membership. Returns whether the video is saved afterwards.
  pub fn toggle_saved(&mut self, id: &str) -> Result<bool> {
    if self.video(id).is_none() {
      return Err(anyhow!("Unknown video '{}'", id));
    }
    let now_saved = !self.is_saved(id);
    let mut saved: Vec<String> = self.saved.iter().filter(|s| *s != id).cloned().collect();
    if now_saved {
      saved.push(id.to_string());
    }
    put(&mut self.store, &constants().saved_key, &saved)?;
    self.saved = saved;
    debug!(video_id = %id, saved = now_saved, "catalog: saved toggled");
    Ok(now_saved)
  }

  /// Append a category. The id is the slug of `name`; a slug already taken
  /// gets the first free numeric suffix (`-2`, `-3`, …).
  pub fn add_category(&mut self, name: &str, icon: Option<&str>, color_token: Option<&str>) -> Result<Category> {
    let name = name.trim();
    let base = slugify(name);
    if base.is_empty() {
      return Err(anyhow!("A category needs a name"));
    }
    let mut id = base.clone();
    let mut suffix = 2;
    while self.category(&id).is_some() {
      id = format!("{}-{}", base, suffix);
      suffix += 1;
    }

    let c = constants();
    let category = Category {
      id,
      name: name.to_string(),
      icon: icon.unwrap_or(&c.new_category_icon).to_string(),
      color_token: color_token.unwrap_or(&c.new_category_color).to_string(),
    };
    let mut categories = self.categories.clone();
    categories.push(category.clone());
    put(&mut self.store, &c.categories_key, &categories)?;
    self.categories = categories;
    info!(category = %category.id, "catalog: category added");
    Ok(category)
  }

  /// Record a playback failure. At most one report per video; unknown ids are
  /// ignored. Returns whether a new report was opened.
  pub fn report_failure(&mut self, id: &str, message: &str) -> Result<bool> {
    if self.reports.iter().any(|r| r.video_id == id) {
      return Ok(false);
    }
    let Some(video) = self.video(id) else {
      return Ok(false);
    };
    let report =
      HealthReport { video_id: id.to_string(), video_title: video.title.clone(), error_message: message.to_string() };
    let videos = with_broken_flag(&self.videos, id, true);
    put(&mut self.store, &constants().videos_key, &videos)?;
    self.videos = videos;
    self.reports.push(report);
    warn!(video_id = %id, err = %message, "catalog: playback failure reported");
    Ok(true)
  }

  /// Dismiss a report and clear the broken flag on the entry, if it still exists.
  pub fn clear_report(&mut self, id: &str) -> Result<()> {
    if self.video(id).is_some_and(|v| v.is_broken) {
      let videos = with_broken_flag(&self.videos, id, false);
      put(&mut self.store, &constants().videos_key, &videos)?;
      self.videos = videos;
    }
    self.reports.retain(|r| r.video_id != id);
    debug!(video_id = %id, "catalog: report cleared");
    Ok(())
  }

  pub fn update_settings(&mut self, f: impl FnOnce(&mut AppSettings)) -> Result<()> {
    let mut settings = self.settings.clone();
    f(&mut settings);
    put(&mut self.store, &constants().settings_key, &settings)?;
    self.settings = settings;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;

  fn catalog() -> Catalog<MemoryStore> {
    Catalog::load(MemoryStore::default()).unwrap()
  }

  fn new_video(title: &str, category: &str) -> NewVideo {
    NewVideo {
      title: title.to_string(),
      source_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
      category_id: category.to_string(),
      flags: VideoFlags::default(),
    }
  }

  #[test]
  fn first_run_seeds_and_persists() {
    let cat = catalog();
    let c = constants();
    assert_eq!(cat.videos().len(), c.seed_videos.len());
    assert_eq!(cat.categories().len(), c.default_categories.len());
    assert!(cat.store.entries.contains_key(&c.videos_key));
    assert!(cat.store.entries.contains_key(&c.categories_key));
    let mut ids: Vec<_> = cat.videos().iter().map(|v| v.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), c.seed_videos.len());
  }

  #[test]
  fn reload_reads_what_was_written() {
    let mut cat = catalog();
    let added = cat.add_video(new_video("Counting Song", "songs")).unwrap();
    cat.toggle_saved(&added.id).unwrap();
    cat.update_settings(|s| s.dark_mode = true).unwrap();

    let reloaded = Catalog::load(cat.store).unwrap();
    assert_eq!(reloaded.videos()[0], added);
    assert!(reloaded.is_saved(&added.id));
    assert!(reloaded.settings().dark_mode);
  }

  #[test]
  fn partial_settings_blob_merges_over_defaults() {
    let mut store = MemoryStore::default();
    store.entries.insert(constants().settings_key.clone(), r#"{"isDarkMode": true}"#.to_string());
    let cat = Catalog::load(store).unwrap();
    assert_eq!(cat.settings(), &AppSettings { dark_mode: true, ..AppSettings::default() });
  }

  #[test]
  fn malformed_video_blob_is_an_error() {
    let mut store = MemoryStore::default();
    store.entries.insert(constants().videos_key.clone(), "{not json".to_string());
    assert!(Catalog::load(store).is_err());
  }

  #[test]
  fn stale_saved_ids_pruned_on_load() {
    let mut store = MemoryStore::default();
    store.entries.insert(constants().saved_key.clone(), r#"["gone"]"#.to_string());
    let cat = Catalog::load(store).unwrap();
    assert!(cat.shelf(Shelf::Saved).is_empty());
    assert_eq!(cat.store.entries[&constants().saved_key], "[]");
  }

  #[test]
  fn add_video_goes_to_front_with_fresh_id() {
    let mut cat = catalog();
    let before = cat.videos().len();
    let video = cat.add_video(new_video("  Bedtime Story ", "stories")).unwrap();
    assert_eq!(cat.videos().len(), before + 1);
    assert_eq!(cat.videos()[0].id, video.id);
    assert_eq!(video.title, "Bedtime Story");
    assert_eq!(video.id.len(), constants().video_id_len);
    assert!(!video.is_broken);
    assert!(cat.videos().iter().filter(|v| v.id == video.id).count() == 1);
  }

  #[test]
  fn add_video_validates_input() {
    let mut cat = catalog();
    assert!(cat.add_video(new_video("", "songs")).is_err());
    assert!(cat.add_video(new_video("x", "no-such-category")).is_err());
    let mut blank_url = new_video("x", "songs");
    blank_url.source_url = "   ".to_string();
    assert!(cat.add_video(blank_url).is_err());
  }

  #[test]
  fn toggle_saved_flips_membership() {
    let mut cat = catalog();
    let id = cat.videos()[0].id.clone();
    assert!(cat.toggle_saved(&id).unwrap());
    assert!(cat.is_saved(&id));
    assert!(!cat.toggle_saved(&id).unwrap());
    assert!(!cat.is_saved(&id));
    assert!(cat.toggle_saved("missing").is_err());
  }

  #[test]
  fn saved_shelf_keeps_insertion_order() {
    let mut cat = catalog();
    let a = cat.videos()[2].id.clone();
    let b = cat.videos()[0].id.clone();
    cat.toggle_saved(&a).unwrap();
    cat.toggle_saved(&b).unwrap();
    let ids: Vec<_> = cat.shelf(Shelf::Saved).iter().map(|v| v.id.clone()).collect();
    assert_eq!(ids, vec![a, b]);
  }

  #[test]
  fn delete_removes_from_catalog_and_saved_but_keeps_report() {
    let mut cat = catalog();
    let id = cat.videos()[0].id.clone();
    cat.toggle_saved(&id).unwrap();
    cat.report_failure(&id, "boom").unwrap();

    assert!(cat.delete_video(&id).unwrap());
    assert!(cat.video(&id).is_none());
    assert!(!cat.is_saved(&id));
    assert!(cat.shelf(Shelf::Saved).is_empty());
    assert_eq!(cat.reports().len(), 1);
    assert_eq!(cat.reports()[0].video_id, id);

    cat.clear_report(&id).unwrap();
    assert!(cat.reports().is_empty());
    assert!(!cat.delete_video(&id).unwrap());
  }

  #[test]
  fn report_failure_is_deduplicated() {
    let mut cat = catalog();
    let id = cat.videos()[1].id.clone();
    assert!(cat.report_failure(&id, "first").unwrap());
    assert!(!cat.report_failure(&id, "second").unwrap());
    assert_eq!(cat.reports().len(), 1);
    assert_eq!(cat.reports()[0].error_message, "first");
    assert!(cat.video(&id).unwrap().is_broken);
  }

  #[test]
  fn clear_then_report_opens_one_fresh_report() {
    let mut cat = catalog();
    let id = cat.videos()[0].id.clone();
    cat.report_failure(&id, "first").unwrap();
    cat.clear_report(&id).unwrap();
    assert!(!cat.video(&id).unwrap().is_broken);

    assert!(cat.report_failure(&id, "again").unwrap());
    assert_eq!(cat.reports().len(), 1);
    assert_eq!(cat.reports()[0].error_message, "again");
  }

  #[test]
  fn report_for_unknown_video_is_ignored() {
    let mut cat = catalog();
    let writes = cat.store.writes;
    assert!(!cat.report_failure("nope", "x").unwrap());
    assert!(cat.reports().is_empty());
    assert_eq!(cat.store.writes, writes);
  }

  #[test]
  fn broken_flag_persisted() {
    let mut cat = catalog();
    let id = cat.videos()[0].id.clone();
    cat.report_failure(&id, "x").unwrap();
    let reloaded = Catalog::load(cat.store).unwrap();
    assert!(reloaded.video(&id).unwrap().is_broken);
    assert!(reloaded.reports().is_empty());
  }

  #[test]
  fn add_category_derives_slug_and_defaults() {
    let mut cat = catalog();
    let added = cat.add_category("Bedtime Stories", None, None).unwrap();
    assert_eq!(added.id, "bedtime-stories");
    assert_eq!(added.icon, constants().new_category_icon);
    assert_eq!(added.color_token, constants().new_category_color);
    assert_eq!(cat.categories().last(), Some(&added));

    let custom = cat.add_category("Sport", Some("⚽"), Some("orange")).unwrap();
    assert_eq!(custom.icon, "⚽");
    assert_eq!(custom.color_token, "orange");
  }

  #[test]
  fn colliding_slugs_get_suffixes() {
    let mut cat = catalog();
    assert_eq!(cat.add_category("Fun Time", None, None).unwrap().id, "fun-time");
    assert_eq!(cat.add_category("fun   time", None, None).unwrap().id, "fun-time-2");
    assert_eq!(cat.add_category("FUN TIME", None, None).unwrap().id, "fun-time-3");
    // a default id collides too
    assert_eq!(cat.add_category("Songs", None, None).unwrap().id, "songs-2");
  }

  #[test]
  fn blank_category_rejected() {
    let mut cat = catalog();
    assert!(cat.add_category("   ", None, None).is_err());
  }

  #[test]
  fn guardian_entries_only_on_guardian_shelf() {
    let mut cat = catalog();
    let mut nv = new_video("Parent Talk", "stories");
    nv.flags.is_guardian_only = true;
    let guarded = cat.add_video(nv).unwrap();

    assert!(!cat.shelf(Shelf::All).iter().any(|v| v.id == guarded.id));
    assert!(!cat.shelf(Shelf::Category("stories")).iter().any(|v| v.id == guarded.id));
    let guardian = cat.shelf(Shelf::Guardian);
    assert_eq!(guardian.len(), 1);
    assert_eq!(guardian[0].id, guarded.id);
  }

  #[test]
  fn dangling_category_renders_uncategorized() {
    let mut cat = catalog();
    let mut video = cat.videos()[0].clone();
    assert_ne!(cat.category_label(&video), UNCATEGORIZED);
    video.category_id = "deleted".to_string();
    assert_eq!(cat.category_label(&video), UNCATEGORIZED);
    assert!(cat.add_video(new_video("x", "deleted")).is_err());
  }

  #[test]
  fn failed_writes_leave_catalog_unchanged() {
    let mut cat = catalog();
    let saved_id = cat.videos()[0].id.clone();
    let broken_id = cat.videos()[1].id.clone();
    cat.toggle_saved(&saved_id).unwrap();
    cat.report_failure(&broken_id, "boom").unwrap();

    let c = constants();
    cat.store.fail_writes_to(&[&c.videos_key, &c.saved_key, &c.categories_key, &c.settings_key]);
    let videos = cat.videos().to_vec();
    let categories = cat.categories().to_vec();
    let reports = cat.reports().to_vec();
    let settings = cat.settings().clone();

    assert!(cat.add_video(new_video("Counting Song", "songs")).is_err());
    assert!(cat.add_video(new_video("Counting Song", "songs")).is_err());
    assert!(cat.delete_video(&saved_id).is_err());
    assert!(cat.toggle_saved(&saved_id).is_err());
    assert!(cat.toggle_saved(&broken_id).is_err());
    assert!(cat.add_category("Animals", None, None).is_err());
    let fresh_id = cat.videos()[2].id.clone();
    assert!(cat.report_failure(&fresh_id, "offline").is_err());
    assert!(cat.clear_report(&broken_id).is_err());
    assert!(cat.update_settings(|s| s.dark_mode = !s.dark_mode).is_err());

    assert_eq!(cat.videos(), videos.as_slice());
    assert_eq!(cat.categories(), categories.as_slice());
    assert_eq!(cat.reports(), reports.as_slice());
    assert_eq!(cat.settings(), &settings);
    assert!(cat.is_saved(&saved_id));
    assert!(!cat.is_saved(&broken_id));
    assert!(!cat.video(&fresh_id).unwrap().is_broken);
  }

  #[test]
  fn failed_report_is_retried_on_next_failure() {
    let mut cat = catalog();
    let id = cat.videos()[0].id.clone();
    let c = constants();
    cat.store.fail_writes_to(&[&c.videos_key]);
    assert!(cat.report_failure(&id, "offline").is_err());

    cat.store.failing_keys.clear();
    assert!(cat.report_failure(&id, "offline").unwrap());
    let reloaded = Catalog::load(cat.store).unwrap();
    assert!(reloaded.video(&id).unwrap().is_broken);
  }

  #[test]
  fn failed_delete_restores_saved_blob() {
    let mut cat = catalog();
    let id = cat.videos()[0].id.clone();
    cat.toggle_saved(&id).unwrap();
    let c = constants();
    let saved_blob = cat.store.entries[&c.saved_key].clone();

    cat.store.fail_writes_to(&[&c.videos_key]);
    assert!(cat.delete_video(&id).is_err());
    assert!(cat.video(&id).is_some());
    assert!(cat.is_saved(&id));
    assert_eq!(cat.store.entries[&c.saved_key], saved_blob);

    cat.store.failing_keys.clear();
    let reloaded = Catalog::load(cat.store).unwrap();
    assert!(reloaded.is_saved(&id));
  }

  #[test]
  fn seeds_skip_missing_categories() {
    let c = constants();
    let mut store = MemoryStore::default();
    let only_songs: Vec<_> = c.default_categories.iter().filter(|cat| cat.id == "songs").cloned().collect();
    store.entries.insert(c.categories_key.clone(), serde_json::to_string(&only_songs).unwrap());

    let cat = Catalog::load(store).unwrap();
    let expected = c.seed_videos.iter().filter(|s| s.category == "songs").count();
    assert_eq!(cat.videos().len(), expected);
    assert!(cat.videos().iter().all(|v| cat.category_label(v) != UNCATEGORIZED));
  }

  #[test]
  fn resolve_skips_unknown_ids_and_keeps_order() {
    let cat = catalog();
    let a = cat.videos()[2].id.clone();
    let b = cat.videos()[0].id.clone();
    let found: Vec<_> = cat.resolve(&[a.clone(), "ghost".to_string(), b.clone()]).iter().map(|v| v.id.clone()).collect();
    assert_eq!(found, vec![a, b]);
  }
}

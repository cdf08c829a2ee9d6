use anyhow::Result;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::access::{Credentials, Gate, static_credentials, static_passcode};
use crate::catalog::Catalog;
use crate::classify::{EmbedResult, classify};
use crate::config::Config;
use crate::constants::constants;
use crate::form::{Form, FormKind, GuardianIntent, TextInput};
use crate::model::VideoEntry;
use crate::player::{self, PlaybackEnd, TheaterPlayer};
use crate::search::{SearchPoll, SearchResolver, SearchSession};
use crate::storage::{FileStore, KeyValueStore};
use crate::theme::Palette;
use crate::view::{MenuItem, Tab, ViewState, menu};
use crate::voice::VoiceInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  /// The listing (or settings/admin screen) has focus.
  Browse,
  /// The sidebar menu overlay has focus.
  Sidebar,
  /// Typing into the search bar.
  Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
  Videos,
  Reports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
  DarkMode,
  Sounds,
  Theme,
  Quality,
  GuardianTab,
}

impl SettingsRow {
  pub const ALL: [SettingsRow; 5] =
    [SettingsRow::DarkMode, SettingsRow::Sounds, SettingsRow::Theme, SettingsRow::Quality, SettingsRow::GuardianTab];

  pub fn label(self) -> &'static str {
    match self {
      SettingsRow::DarkMode => "Dark mode",
      SettingsRow::Sounds => "Interaction sounds",
      SettingsRow::Theme => "Theme",
      SettingsRow::Quality => "Default quality",
      SettingsRow::GuardianTab => "Parents' tab",
    }
  }
}

const CHANNEL_GUIDANCE: &str =
  "Channel pages can't be played here. Ask a grown-up to add the channel's playlist link instead.";

pub struct App<S: KeyValueStore = FileStore> {
  pub catalog: Catalog<S>,
  pub view: ViewState,
  pub mode: AppMode,
  pub search_input: TextInput,
  pub input_scroll: usize,
  pub list_state: ListState,
  pub menu_state: ListState,
  pub admin_section: AdminSection,
  pub form: Option<Form>,
  pub search: SearchSession,
  pub player: TheaterPlayer,
  /// Shown in the theater panel instead of (or after) playback.
  pub theater_note: Option<String>,
  pub admin_gate: Gate<Credentials>,
  pub guardian_gate: Gate<str>,
  voice: Option<VoiceInput>,
  voice_rx: Option<oneshot::Receiver<Result<String>>>,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  /// Informational message, lower priority than status/error.
  pub info_message: Option<String>,
  pub should_quit: bool,
  error_time: Option<Instant>,
  /// Off in tests so nothing spawns `mpv`.
  launch_players: bool,
}

impl<S: KeyValueStore> App<S> {
  pub fn new(catalog: Catalog<S>, config: &Config, resolver: SearchResolver) -> Self {
    let mut list_state = ListState::default();
    list_state.select(Some(0));
    Self {
      catalog,
      view: ViewState::default(),
      mode: AppMode::Browse,
      search_input: TextInput::default(),
      input_scroll: 0,
      list_state,
      menu_state: ListState::default(),
      admin_section: AdminSection::Videos,
      form: None,
      search: SearchSession::new(resolver),
      player: TheaterPlayer::new(),
      theater_note: None,
      admin_gate: Gate::new("admin", static_credentials(config.admin_credentials()), "Wrong username or password"),
      guardian_gate: Gate::new("guardian", static_passcode(config.guardian_passcode()), "That's not the passcode"),
      voice: VoiceInput::from_command(config.voice_command.as_deref()),
      voice_rx: None,
      last_error: None,
      status_message: None,
      info_message: None,
      should_quit: false,
      error_time: None,
      launch_players: true,
    }
  }

  /// An app that never spawns external players.
  #[cfg(test)]
  pub(crate) fn headless(catalog: Catalog<S>, config: &Config, resolver: SearchResolver) -> Self {
    Self { launch_players: false, ..Self::new(catalog, config, resolver) }
  }

  pub fn palette(&self) -> Palette {
    Palette::for_settings(self.catalog.settings())
  }

  pub fn menu(&self) -> Vec<MenuItem> {
    menu(self.catalog.categories(), self.catalog.settings())
  }

  pub fn has_voice(&self) -> bool {
    self.voice.is_some()
  }

  pub fn is_listening(&self) -> bool {
    self.voice_rx.is_some()
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after the display window.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_display_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  fn click(&self) {
    if self.launch_players && self.catalog.settings().sound_on_interaction {
      player::play_click(&constants().click_sound_url);
    }
  }

  // --- Listing ---

  /// Entries currently listed. Guardian-only entries only ever come through
  /// the guardian shelf or a search run while the guardian gate is open.
  pub fn visible(&self) -> Vec<&VideoEntry> {
    self.view.visible(&self.catalog)
  }

  pub fn selected_video(&self) -> Option<&VideoEntry> {
    let idx = self.list_state.selected()?;
    match self.view.tab() {
      Tab::Admin if self.view.search().is_none() => self.catalog.videos().get(idx),
      _ => self.visible().get(idx).copied(),
    }
  }

  /// Length of whatever list the main pane shows for the active tab.
  pub fn list_len(&self) -> usize {
    match self.view.tab() {
      Tab::Settings => SettingsRow::ALL.len(),
      Tab::Admin => match self.admin_section {
        AdminSection::Videos => self.catalog.videos().len(),
        AdminSection::Reports => self.catalog.reports().len(),
      },
      _ => self.visible().len(),
    }
  }

  pub fn select_next(&mut self) {
    let count = self.list_len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
      self.list_state.select(Some(i));
    }
  }

  pub fn select_prev(&mut self) {
    let count = self.list_len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| if i == 0 { count.saturating_sub(1) } else { i.saturating_sub(1) });
      self.list_state.select(Some(i));
    }
  }

  fn reset_selection(&mut self) {
    self.list_state.select(if self.list_len() == 0 { None } else { Some(0) });
  }

  fn clamp_selection(&mut self) {
    let count = self.list_len();
    match self.list_state.selected() {
      _ if count == 0 => self.list_state.select(None),
      Some(i) if i >= count => self.list_state.select(Some(count - 1)),
      None => self.list_state.select(Some(0)),
      _ => {}
    }
  }

  // --- Navigation ---

  /// Change tab. Guardian content needs the passcode first; admin opens on
  /// its login form while the admin gate is closed.
  pub fn select_tab(&mut self, tab: Tab) {
    if tab == Tab::GuardianContent && !self.guardian_gate.is_open() {
      self.form = Some(Form::guardian_passcode(GuardianIntent::EnterTab));
      return;
    }
    if *self.view.tab() == Tab::GuardianContent && tab != Tab::GuardianContent {
      self.guardian_gate.lock();
    }
    self.search.cancel();
    self.search_input.clear();
    self.input_scroll = 0;
    self.status_message = None;
    self.info_message = None;
    let needs_login = tab == Tab::Admin && !self.admin_gate.is_open();
    info!(tab = ?tab, "view: tab selected");
    self.view.select_tab(tab);
    self.mode = AppMode::Browse;
    self.admin_section = AdminSection::Videos;
    self.reset_selection();
    if needs_login {
      self.form = Some(Form::admin_login());
    }
    self.click();
  }

  pub fn open_sidebar(&mut self) {
    let items = self.menu();
    let current = items.iter().position(|m| m.tab == *self.view.tab()).unwrap_or(0);
    self.menu_state.select(Some(current));
    if !self.view.sidebar_open() {
      self.view.toggle_sidebar();
    }
    self.mode = AppMode::Sidebar;
  }

  pub fn close_sidebar(&mut self) {
    self.view.close_sidebar();
    self.mode = AppMode::Browse;
  }

  pub fn activate_menu_item(&mut self) {
    let items = self.menu();
    let Some(item) = self.menu_state.selected().and_then(|i| items.into_iter().nth(i)) else { return };
    self.close_sidebar();
    self.select_tab(item.tab);
  }

  // --- Search ---

  pub fn trigger_search(&mut self) {
    let query = self.search_input.value.trim().to_string();
    if query.is_empty() {
      self.search.cancel();
      self.view.set_search("", None);
      self.status_message = None;
      self.reset_selection();
      return;
    }
    let include_guardian = self.guardian_gate.is_open();
    let scope: Vec<VideoEntry> =
      self.catalog.videos().iter().filter(|v| include_guardian || !v.is_guardian_only).cloned().collect();
    info!(query = %query, scope = scope.len(), "search triggered");
    self.clear_error();
    self.info_message = None;
    self.search.submit(&query, scope);
    self.status_message = Some(format!("Searching '{}'…", query));
  }

  pub fn clear_search(&mut self) {
    self.search.cancel();
    self.search_input.clear();
    self.input_scroll = 0;
    self.view.set_search("", None);
    self.status_message = None;
    self.reset_selection();
  }

  pub fn trigger_voice(&mut self) {
    let Some(voice) = self.voice.clone() else {
      self.info_message = Some("Voice search isn't set up. Add voice_command to prefs.toml.".to_string());
      return;
    };
    if self.voice_rx.is_some() {
      return;
    }
    self.clear_error();
    self.status_message = Some("Listening…".to_string());
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(voice.listen().await);
    });
    self.voice_rx = Some(rx);
  }

  // --- Theater ---

  pub async fn open_theater(&mut self) {
    let Some(video) = self.selected_video().cloned() else { return };
    self.view.open_theater(&video.id);
    self.theater_note = None;
    self.clear_error();

    let embed = classify(&video.source_url);
    let Some(url) = embed.player_url() else {
      let note = match embed {
        EmbedResult::NotEmbeddable => CHANNEL_GUIDANCE,
        _ => "This video has no link yet.",
      };
      info!(video_id = %video.id, kind = embed.label(), "theater: nothing to play");
      self.theater_note = Some(note.to_string());
      return;
    };
    if !self.launch_players {
      return;
    }
    let quality = self.catalog.settings().default_quality;
    if let Err(e) = self.player.play(&video.id, &video.title, &url, quality).await {
      self.set_error(format!("Playback error: {:#}", e));
      let _ = self.player.stop().await;
    }
  }

  pub async fn close_theater(&mut self) {
    if let Err(e) = self.player.stop().await {
      warn!(err = %e, "theater: failed to stop player");
    }
    self.view.close_theater();
    self.theater_note = None;
  }

  pub fn theater_video(&self) -> Option<&VideoEntry> {
    self.view.theater().and_then(|id| self.catalog.video(id))
  }

  fn record_playback_end(&mut self, video_id: &str, end: PlaybackEnd) {
    match end {
      PlaybackEnd::Finished => {
        if self.view.theater() == Some(video_id) {
          self.theater_note = Some("Finished! Press Enter to watch again.".to_string());
        }
      }
      PlaybackEnd::Failed(message) => {
        warn!(video_id = %video_id, err = %message, "theater: playback failed");
        if let Err(e) = self.catalog.report_failure(video_id, &message) {
          warn!(err = %e, "catalog: failed to record health report");
        }
        if self.view.theater() == Some(video_id) {
          self.theater_note = Some("This video didn't play. A grown-up has been told.".to_string());
        }
      }
    }
  }

  // --- Saved ---

  pub fn toggle_saved(&mut self, id: &str) {
    match self.catalog.toggle_saved(id) {
      Ok(saved) => {
        self.info_message = Some(if saved { "Saved ⭐" } else { "Removed from saved" }.to_string());
        self.click();
        self.clamp_selection();
      }
      Err(e) => self.set_error(format!("{:#}", e)),
    }
  }

  // --- Settings ---

  pub fn settings_value(&self, row: SettingsRow) -> String {
    let s = self.catalog.settings();
    let on_off = |b: bool| (if b { "on" } else { "off" }).to_string();
    match row {
      SettingsRow::DarkMode => on_off(s.dark_mode),
      SettingsRow::Sounds => on_off(s.sound_on_interaction),
      SettingsRow::Theme => s.theme.theme().name.to_string(),
      SettingsRow::Quality => s.default_quality.label().to_string(),
      SettingsRow::GuardianTab => (if s.guardian_tab_visible { "shown" } else { "hidden" }).to_string(),
    }
  }

  pub fn activate_setting(&mut self, row: SettingsRow) {
    let result = match row {
      SettingsRow::DarkMode => self.catalog.update_settings(|s| s.dark_mode = !s.dark_mode),
      SettingsRow::Sounds => self.catalog.update_settings(|s| s.sound_on_interaction = !s.sound_on_interaction),
      SettingsRow::Theme => self.catalog.update_settings(|s| s.theme = s.theme.next()),
      SettingsRow::Quality => self.catalog.update_settings(|s| s.default_quality = s.default_quality.next()),
      SettingsRow::GuardianTab => {
        self.form = Some(Form::guardian_passcode(GuardianIntent::ToggleVisibility));
        return;
      }
    };
    if let Err(e) = result {
      self.set_error(format!("Couldn't save settings: {:#}", e));
    }
  }

  pub fn next_theme(&mut self) {
    self.activate_setting(SettingsRow::Theme);
  }

  // --- Admin ---

  pub fn switch_admin_section(&mut self) {
    self.admin_section = match self.admin_section {
      AdminSection::Videos => AdminSection::Reports,
      AdminSection::Reports => AdminSection::Videos,
    };
    self.reset_selection();
  }

  pub fn delete_selected(&mut self) {
    let Some(video) = self.selected_video().cloned() else { return };
    match self.catalog.delete_video(&video.id) {
      Ok(_) => {
        self.info_message = Some(format!("Deleted '{}'", video.title));
        self.clamp_selection();
      }
      Err(e) => self.set_error(format!("Delete failed: {:#}", e)),
    }
  }

  pub fn clear_selected_report(&mut self) {
    let Some(report) = self.list_state.selected().and_then(|i| self.catalog.reports().get(i)).cloned() else {
      return;
    };
    match self.catalog.clear_report(&report.video_id) {
      Ok(()) => {
        self.info_message = Some(format!("Dismissed report for '{}'", report.video_title));
        self.clamp_selection();
      }
      Err(e) => self.set_error(format!("Couldn't dismiss report: {:#}", e)),
    }
  }

  pub fn logout(&mut self) {
    self.admin_gate.lock();
    self.info_message = Some("Logged out".to_string());
    self.form = Some(Form::admin_login());
  }

  // --- Forms ---

  pub fn cancel_form(&mut self) {
    self.form = None;
  }

  pub fn submit_form(&mut self) {
    let Some(mut form) = self.form.take() else { return };
    let outcome: Result<Option<String>, String> = match form.kind {
      FormKind::AdminLogin => {
        let creds = Credentials { username: form.text(0).to_string(), password: form.text(1).to_string() };
        if self.admin_gate.attempt(&creds) {
          self.reset_selection();
          Ok(None)
        } else {
          Err(self.admin_gate.rejection().unwrap_or_default().to_string())
        }
      }
      FormKind::GuardianPasscode(intent) => {
        if self.guardian_gate.attempt(form.text(0)) {
          self.guardian_unlocked(intent);
          Ok(None)
        } else {
          Err(self.guardian_gate.rejection().unwrap_or_default().to_string())
        }
      }
      FormKind::AddVideo => match self.catalog.add_video(form.new_video()) {
        Ok(video) => Ok(Some(format!("Added '{}'", video.title))),
        Err(e) => Err(format!("{:#}", e)),
      },
      FormKind::AddCategory => {
        let (name, icon, color) = form.new_category();
        match self.catalog.add_category(name, icon, color) {
          Ok(category) => Ok(Some(format!("Added category '{}'", category.name))),
          Err(e) => Err(format!("{:#}", e)),
        }
      }
    };
    match outcome {
      Ok(message) => {
        if message.is_some() {
          self.info_message = message;
        }
        self.clamp_selection();
      }
      Err(message) => {
        form.error = Some(message);
        self.form = Some(form);
      }
    }
  }

  fn guardian_unlocked(&mut self, intent: GuardianIntent) {
    match intent {
      GuardianIntent::EnterTab => self.select_tab(Tab::GuardianContent),
      GuardianIntent::ToggleVisibility => {
        if let Err(e) = self.catalog.update_settings(|s| s.guardian_tab_visible = !s.guardian_tab_visible) {
          self.set_error(format!("Couldn't save settings: {:#}", e));
        }
        if *self.view.tab() != Tab::GuardianContent {
          self.guardian_gate.lock();
        }
        self.view.ensure_tab_valid(&self.catalog);
      }
    }
  }

  pub fn open_form(&mut self, kind: FormKind) {
    self.form = Some(match kind {
      FormKind::AdminLogin => Form::admin_login(),
      FormKind::GuardianPasscode(intent) => Form::guardian_passcode(intent),
      FormKind::AddVideo => Form::add_video(self.catalog.categories()),
      FormKind::AddCategory => Form::add_category(),
    });
  }

  // --- Async results ---

  pub async fn check_pending(&mut self) -> Result<()> {
    match self.search.poll() {
      SearchPoll::Settled { query, ids } => {
        self.status_message = None;
        let count = ids.as_ref().map_or(0, Vec::len);
        self.view.set_search(&query, ids);
        if count == 0 {
          self.info_message = Some(format!("Nothing matches '{}'", query));
        }
        self.reset_selection();
      }
      SearchPoll::Pending | SearchPoll::Idle => {}
    }

    if let Some(mut rx) = self.voice_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(transcript) => {
              info!(query = %transcript, "voice: heard query");
              self.search_input = TextInput::with_value(&transcript);
              self.trigger_search();
            }
            Err(e) => self.set_error(format!("{:#}", e)),
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.voice_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Voice input task failed.".to_string());
        }
      }
    }

    if let Some((video_id, end)) = self.player.check_exit().await {
      self.record_playback_end(&video_id, end);
    }

    if self.view.theater().is_some() && self.theater_video().is_none() {
      self.close_theater().await;
    }
    self.view.ensure_tab_valid(&self.catalog);
    self.clamp_selection();
    self.expire_error();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;

  fn app() -> App<MemoryStore> {
    let catalog = Catalog::load(MemoryStore::default()).unwrap();
    let config = Config::parse("").unwrap();
    App::headless(catalog, &config, SearchResolver::new(None, Duration::from_secs(1)))
  }

  fn fill(form: &mut Option<Form>, values: &[&str]) {
    let form = form.as_mut().unwrap();
    for (field, value) in form.fields.iter_mut().zip(values) {
      field.text = TextInput::with_value(value);
    }
  }

  #[test]
  fn guardian_tab_requires_passcode() {
    let mut app = app();
    app.select_tab(Tab::GuardianContent);
    assert_eq!(*app.view.tab(), Tab::Home);
    assert_eq!(app.form.as_ref().map(|f| f.kind), Some(FormKind::GuardianPasscode(GuardianIntent::EnterTab)));

    fill(&mut app.form, &["0000"]);
    app.submit_form();
    assert!(app.form.as_ref().and_then(|f| f.error.as_ref()).is_some());
    assert_eq!(*app.view.tab(), Tab::Home);

    fill(&mut app.form, &["1234"]);
    app.submit_form();
    assert!(app.form.is_none());
    assert_eq!(*app.view.tab(), Tab::GuardianContent);

    app.select_tab(Tab::Home);
    assert!(!app.guardian_gate.is_open());
  }

  #[test]
  fn toggling_guardian_tab_needs_passcode_and_relocks() {
    let mut app = app();
    app.activate_setting(SettingsRow::GuardianTab);
    fill(&mut app.form, &["1234"]);
    app.submit_form();
    assert!(app.catalog.settings().guardian_tab_visible);
    assert!(!app.guardian_gate.is_open());
    assert!(app.menu().iter().any(|m| m.tab == Tab::GuardianContent));
  }

  #[test]
  fn admin_login_then_add_video() {
    let mut app = app();
    app.select_tab(Tab::Admin);
    assert_eq!(app.form.as_ref().map(|f| f.kind), Some(FormKind::AdminLogin));
    fill(&mut app.form, &["admin", "nope"]);
    app.submit_form();
    assert!(!app.admin_gate.is_open());
    fill(&mut app.form, &["admin", "admin"]);
    app.submit_form();
    assert!(app.admin_gate.is_open());

    let before = app.catalog.videos().len();
    app.open_form(FormKind::AddVideo);
    fill(&mut app.form, &["Counting to ten", "https://youtu.be/abcdefghijk"]);
    app.submit_form();
    assert!(app.form.is_none());
    assert_eq!(app.catalog.videos().len(), before + 1);
    assert_eq!(app.catalog.videos()[0].title, "Counting to ten");
  }

  #[test]
  fn invalid_add_video_keeps_form_open() {
    let mut app = app();
    app.open_form(FormKind::AddVideo);
    fill(&mut app.form, &["", "https://youtu.be/abcdefghijk"]);
    app.submit_form();
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.error.as_deref(), Some("A video needs a title"));
  }

  #[test]
  fn tab_change_clears_search() {
    let mut app = app();
    let id = app.catalog.videos()[0].id.clone();
    app.view.set_search("tortoise", Some(vec![id]));
    app.search_input = TextInput::with_value("tortoise");
    app.select_tab(Tab::Saved);
    assert!(app.view.search().is_none());
    assert!(app.search_input.value.is_empty());
  }

  #[tokio::test]
  async fn channel_link_shows_guidance_instead_of_playing() {
    let mut app = app();
    let id = app
      .catalog
      .add_video(crate::model::NewVideo {
        title: "A channel".to_string(),
        source_url: "https://www.youtube.com/@somehandle".to_string(),
        category_id: "cartoon".to_string(),
        flags: Default::default(),
      })
      .unwrap()
      .id;
    app.list_state.select(Some(0));
    app.open_theater().await;
    assert_eq!(app.view.theater(), Some(id.as_str()));
    assert_eq!(app.theater_note.as_deref(), Some(CHANNEL_GUIDANCE));
    assert!(!app.player.is_playing());

    app.close_theater().await;
    assert_eq!(app.view.theater(), None);
    assert_eq!(*app.view.tab(), Tab::Home);
  }

  #[tokio::test]
  async fn playback_failure_becomes_one_report() {
    let mut app = app();
    let id = app.catalog.videos()[0].id.clone();
    app.record_playback_end(&id, PlaybackEnd::Failed("Video unavailable".to_string()));
    app.record_playback_end(&id, PlaybackEnd::Failed("Video unavailable".to_string()));
    assert_eq!(app.catalog.reports().len(), 1);
    assert!(app.catalog.video(&id).unwrap().is_broken);
  }

  #[tokio::test]
  async fn search_results_replace_listing() {
    let mut app = app();
    app.search_input = TextInput::with_value("TORTOISE");
    app.trigger_search();
    assert!(app.search.is_pending());
    for _ in 0..50 {
      app.check_pending().await.unwrap();
      if !app.search.is_pending() {
        break;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let titles: Vec<&str> = app.visible().iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["The Tortoise and the Hare"]);
    assert!(app.status_message.is_none());
  }

  #[test]
  fn unconfigured_voice_shows_info() {
    let mut app = app();
    assert!(!app.has_voice());
    app.trigger_voice();
    assert!(app.info_message.is_some());
    assert!(!app.is_listening());
  }

  #[test]
  fn settings_rows_cycle_and_persist() {
    let mut app = app();
    app.activate_setting(SettingsRow::DarkMode);
    app.activate_setting(SettingsRow::Quality);
    assert!(app.catalog.settings().dark_mode);
    assert_eq!(app.settings_value(SettingsRow::Quality), "1080p");
    assert_eq!(app.settings_value(SettingsRow::DarkMode), "on");
  }
}

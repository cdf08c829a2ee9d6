//! Navigation state: the active tab, the sidebar overlay, an orthogonal
//! theater (modal playback) slot and the active search filter.

use crate::catalog::{Catalog, Shelf};
use crate::model::{Category, VideoEntry};
use crate::settings::AppSettings;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tab {
  Home,
  Category(String),
  Saved,
  GuardianContent,
  Settings,
  Admin,
}

impl Tab {
  /// Catalog subset shown on this tab; `None` for screens that are not listings.
  pub fn shelf(&self) -> Option<Shelf<'_>> {
    match self {
      Tab::Home => Some(Shelf::All),
      Tab::Category(id) => Some(Shelf::Category(id)),
      Tab::Saved => Some(Shelf::Saved),
      Tab::GuardianContent => Some(Shelf::Guardian),
      Tab::Settings | Tab::Admin => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
  pub tab: Tab,
  pub icon: String,
  pub label: String,
}

/// Sidebar entries: home, every category, saved, guardian content (only when
/// enabled in settings), settings, admin.
pub fn menu(categories: &[Category], settings: &AppSettings) -> Vec<MenuItem> {
  let item = |tab: Tab, icon: &str, label: &str| MenuItem { tab, icon: icon.to_string(), label: label.to_string() };
  let mut items = vec![item(Tab::Home, "🏠", "Home")];
  items.extend(categories.iter().map(|c| item(Tab::Category(c.id.clone()), &c.icon, &c.name)));
  items.push(item(Tab::Saved, "⭐", "Saved"));
  if settings.guardian_tab_visible {
    items.push(item(Tab::GuardianContent, "🧔", "Parents' videos"));
  }
  items.push(item(Tab::Settings, "⚙️", "Settings"));
  items.push(item(Tab::Admin, "🔐", "Admin"));
  items
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSearch {
  pub query: String,
  pub ids: Vec<String>,
}

#[derive(Debug)]
pub struct ViewState {
  tab: Tab,
  sidebar_open: bool,
  theater: Option<String>,
  search: Option<ActiveSearch>,
}

impl Default for ViewState {
  fn default() -> Self {
    Self { tab: Tab::Home, sidebar_open: false, theater: None, search: None }
  }
}

impl ViewState {
  pub fn tab(&self) -> &Tab {
    &self.tab
  }

  /// Every tab change drops the search filter and closes the sidebar overlay.
  pub fn select_tab(&mut self, tab: Tab) {
    self.tab = tab;
    self.search = None;
    self.sidebar_open = false;
  }

  pub fn sidebar_open(&self) -> bool {
    self.sidebar_open
  }

  pub fn toggle_sidebar(&mut self) {
    self.sidebar_open = !self.sidebar_open;
  }

  pub fn close_sidebar(&mut self) {
    self.sidebar_open = false;
  }

  pub fn theater(&self) -> Option<&str> {
    self.theater.as_deref()
  }

  pub fn open_theater(&mut self, video_id: &str) {
    self.theater = Some(video_id.to_string());
  }

  pub fn close_theater(&mut self) -> Option<String> {
    self.theater.take()
  }

  pub fn search(&self) -> Option<&ActiveSearch> {
    self.search.as_ref()
  }

  /// `None` reverts to tab-based filtering.
  pub fn set_search(&mut self, query: &str, ids: Option<Vec<String>>) {
    self.search = ids.map(|ids| ActiveSearch { query: query.to_string(), ids });
  }

  /// Fall back to home when the active tab no longer exists (category gone,
  /// guardian tab hidden).
  pub fn ensure_tab_valid<S: KeyValueStore>(&mut self, catalog: &Catalog<S>) {
    let valid = match &self.tab {
      Tab::Category(id) => catalog.category(id).is_some(),
      Tab::GuardianContent => catalog.settings().guardian_tab_visible,
      _ => true,
    };
    if !valid {
      self.select_tab(Tab::Home);
    }
  }

  /// Entries to list right now: search results when a search is active,
  /// otherwise the active tab's shelf.
  pub fn visible<'c, S: KeyValueStore>(&self, catalog: &'c Catalog<S>) -> Vec<&'c VideoEntry> {
    if let Some(search) = &self.search {
      return catalog.resolve(&search.ids);
    }
    self.tab.shelf().map(|shelf| catalog.shelf(shelf)).unwrap_or_default()
  }
}

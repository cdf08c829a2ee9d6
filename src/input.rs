use anyhow::Result;
use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{AdminSection, App, AppMode, SettingsRow};
use crate::form::{FormKind, TextInput};
use crate::storage::KeyValueStore;
use crate::view::Tab;

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Shared single-line editing keys. Returns whether the key was consumed.
fn edit_text(input: &mut TextInput, code: KeyCode) -> bool {
  match code {
    KeyCode::Char(c) => input.insert(c),
    KeyCode::Backspace => input.backspace(),
    KeyCode::Delete => input.delete(),
    KeyCode::Left => input.left(),
    KeyCode::Right => input.right(),
    KeyCode::Home => input.home(),
    KeyCode::End => input.end(),
    _ => return false,
  }
  true
}

fn is_listing(tab: &Tab) -> bool {
  tab.shelf().is_some()
}

// --- Event Handling ---

pub async fn handle_key_event<S: KeyValueStore>(app: &mut App<S>, key: event::KeyEvent) -> Result<()> {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return Ok(());
  }

  if app.form.is_some() {
    handle_form_key(app, key);
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return Ok(());
  }

  if app.view.theater().is_some() {
    handle_theater_key(app, key).await;
    return Ok(());
  }

  match app.mode {
    AppMode::Sidebar => handle_sidebar_key(app, key),
    AppMode::Search => handle_search_key(app, key),
    AppMode::Browse => handle_browse_key(app, key).await,
  }
  Ok(())
}

fn handle_form_key<S: KeyValueStore>(app: &mut App<S>, key: event::KeyEvent) {
  let Some(form) = app.form.as_mut() else { return };
  match key.code {
    KeyCode::Esc => {
      app.cancel_form();
    }
    KeyCode::Enter => {
      app.submit_form();
    }
    KeyCode::Tab | KeyCode::Down => form.next_field(),
    KeyCode::BackTab | KeyCode::Up => form.prev_field(),
    code => {
      let Some(field) = form.focused_mut() else { return };
      if field.is_text() {
        if edit_text(&mut field.text, code) {
          form.error = None;
        }
      } else {
        match code {
          KeyCode::Left => field.step(false),
          KeyCode::Right | KeyCode::Char(' ') => field.step(true),
          _ => {}
        }
      }
    }
  }
}

async fn handle_theater_key<S: KeyValueStore>(app: &mut App<S>, key: event::KeyEvent) {
  match key.code {
    KeyCode::Esc | KeyCode::Char('q') => app.close_theater().await,
    KeyCode::Char('s') => {
      if let Some(id) = app.view.theater().map(str::to_string) {
        app.toggle_saved(&id);
      }
    }
    KeyCode::Enter | KeyCode::Char('r') => {
      if !app.player.is_playing() {
        app.open_theater().await;
      }
    }
    _ => {}
  }
}

fn handle_sidebar_key<S: KeyValueStore>(app: &mut App<S>, key: event::KeyEvent) {
  let count = app.menu().len();
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => {
      if count > 0 {
        let i = app.menu_state.selected().map_or(0, |i| (i + 1) % count);
        app.menu_state.select(Some(i));
      }
    }
    KeyCode::Up | KeyCode::Char('k') => {
      if count > 0 {
        let i =
          app.menu_state.selected().map_or(0, |i| if i == 0 { count.saturating_sub(1) } else { i.saturating_sub(1) });
        app.menu_state.select(Some(i));
      }
    }
    KeyCode::Enter | KeyCode::Right => app.activate_menu_item(),
    KeyCode::Esc | KeyCode::Char('m') | KeyCode::Left => app.close_sidebar(),
    _ => {}
  }
}

fn handle_search_key<S: KeyValueStore>(app: &mut App<S>, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter => {
      app.trigger_search();
      app.mode = AppMode::Browse;
    }
    KeyCode::Esc => {
      app.clear_search();
      app.mode = AppMode::Browse;
    }
    KeyCode::Down => {
      app.mode = AppMode::Browse;
    }
    code => {
      edit_text(&mut app.search_input, code);
    }
  }
}

async fn handle_browse_key<S: KeyValueStore>(app: &mut App<S>, key: event::KeyEvent) {
  match key.code {
    KeyCode::Char('q') => {
      app.should_quit = true;
      return;
    }
    KeyCode::Char('m') | KeyCode::Left => {
      app.open_sidebar();
      return;
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.select_next();
      return;
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.select_prev();
      return;
    }
    _ => {}
  }

  let tab = app.view.tab().clone();
  match tab {
    Tab::Settings => {
      if matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
        && let Some(row) = app.list_state.selected().and_then(|i| SettingsRow::ALL.get(i).copied())
      {
        app.activate_setting(row);
      }
    }
    Tab::Admin => handle_admin_key(app, key),
    _ if is_listing(&tab) => match key.code {
      KeyCode::Enter => app.open_theater().await,
      KeyCode::Char('s') => {
        if let Some(id) = app.selected_video().map(|v| v.id.clone()) {
          app.toggle_saved(&id);
        }
      }
      KeyCode::Char('/') => {
        app.mode = AppMode::Search;
      }
      KeyCode::Char('v') => app.trigger_voice(),
      KeyCode::Esc => {
        if app.view.search().is_some() || !app.search_input.value.is_empty() {
          app.clear_search();
        }
      }
      _ => {}
    },
    _ => {}
  }
}

fn handle_admin_key<S: KeyValueStore>(app: &mut App<S>, key: event::KeyEvent) {
  if !app.admin_gate.is_open() {
    if key.code == KeyCode::Enter {
      app.open_form(FormKind::AdminLogin);
    }
    return;
  }
  match key.code {
    KeyCode::Tab => app.switch_admin_section(),
    KeyCode::Char('a') => app.open_form(FormKind::AddVideo),
    KeyCode::Char('c') => app.open_form(FormKind::AddCategory),
    KeyCode::Char('d') if app.admin_section == AdminSection::Videos => app.delete_selected(),
    KeyCode::Char('x') if app.admin_section == AdminSection::Reports => app.clear_selected_report(),
    KeyCode::Char('l') => app.logout(),
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::config::Config;
  use crate::search::SearchResolver;
  use crate::storage::MemoryStore;
  use ratatui::crossterm::event::KeyEvent;
  use std::time::Duration;

  fn app() -> App<MemoryStore> {
    let catalog = Catalog::load(MemoryStore::default()).unwrap();
    App::headless(catalog, &Config::default(), SearchResolver::new(None, Duration::from_secs(1)))
  }

  async fn press<S: KeyValueStore>(app: &mut App<S>, code: KeyCode) {
    handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).await.unwrap();
  }

  async fn type_str<S: KeyValueStore>(app: &mut App<S>, s: &str) {
    for c in s.chars() {
      press(app, KeyCode::Char(c)).await;
    }
  }

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 0), 0); // 'a'
    assert_eq!(char_to_byte_index(s, 1), 1); // 'é' starts at byte 1
    assert_eq!(char_to_byte_index(s, 2), 3); // '日' starts at byte 3
    assert_eq!(char_to_byte_index(s, 3), 6); // past end
  }

  #[test]
  fn char_to_byte_empty() {
    assert_eq!(char_to_byte_index("", 0), 0);
    assert_eq!(char_to_byte_index("", 5), 0);
  }

  // --- key flows ---

  #[tokio::test]
  async fn slash_focuses_search_and_esc_clears_it() {
    let mut app = app();
    press(&mut app, KeyCode::Char('/')).await;
    assert_eq!(app.mode, AppMode::Search);
    type_str(&mut app, "song").await;
    assert_eq!(app.search_input.value, "song");
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.mode, AppMode::Browse);
    assert!(app.search.is_pending());

    press(&mut app, KeyCode::Char('/')).await;
    press(&mut app, KeyCode::Esc).await;
    assert!(!app.search.is_pending());
    assert!(app.search_input.value.is_empty());
  }

  #[tokio::test]
  async fn sidebar_selects_saved_tab() {
    let mut app = app();
    press(&mut app, KeyCode::Char('m')).await;
    assert_eq!(app.mode, AppMode::Sidebar);
    let saved_idx = app.menu().iter().position(|m| m.tab == Tab::Saved).unwrap();
    for _ in 0..saved_idx {
      press(&mut app, KeyCode::Down).await;
    }
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(*app.view.tab(), Tab::Saved);
    assert_eq!(app.mode, AppMode::Browse);
    assert!(!app.view.sidebar_open());
  }

  #[tokio::test]
  async fn s_toggles_saved_for_selection() {
    let mut app = app();
    let id = app.selected_video().unwrap().id.clone();
    press(&mut app, KeyCode::Char('s')).await;
    assert!(app.catalog.is_saved(&id));
    press(&mut app, KeyCode::Char('s')).await;
    assert!(!app.catalog.is_saved(&id));
  }

  #[tokio::test]
  async fn form_swallows_keys_until_closed() {
    let mut app = app();
    app.select_tab(Tab::Admin);
    type_str(&mut app, "admin").await;
    press(&mut app, KeyCode::Tab).await;
    type_str(&mut app, "admin").await;
    press(&mut app, KeyCode::Enter).await;
    assert!(app.admin_gate.is_open());
    assert!(app.form.is_none());

    press(&mut app, KeyCode::Char('c')).await;
    type_str(&mut app, "Animals").await;
    press(&mut app, KeyCode::Enter).await;
    assert!(app.catalog.category("animals").is_some());
    assert!(!app.should_quit);
  }
}

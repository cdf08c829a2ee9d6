use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{AdminSection, App, AppMode, SettingsRow};
use crate::classify::classify;
use crate::form::{FieldKind, Form};
use crate::model::VideoEntry;
use crate::storage::KeyValueStore;
use crate::theme::{Palette, category_color};
use crate::view::Tab;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width glyphs).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn panel<'a>(title: impl Into<Line<'a>>, p: &Palette, focused: bool) -> Block<'a> {
  let border = if focused { p.accent } else { p.muted };
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(p.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let w = width.min(area.width);
  let h = height.min(area.height);
  Rect { x: area.x + (area.width - w) / 2, y: area.y + (area.height - h) / 2, width: w, height: h }
}

fn tab_title<S: KeyValueStore>(app: &App<S>) -> String {
  if let Some(search) = app.view.search() {
    return format!("Results for '{}'", search.query);
  }
  match app.view.tab() {
    Tab::Home => "All videos".to_string(),
    Tab::Category(id) => {
      app.catalog.category(id).map_or_else(|| id.clone(), |c| format!("{} {}", c.icon, c.name))
    }
    Tab::Saved => "⭐ Saved".to_string(),
    Tab::GuardianContent => "🧔 Parents' videos".to_string(),
    Tab::Settings => "⚙️ Settings".to_string(),
    Tab::Admin => "🔐 Admin".to_string(),
  }
}

// --- UI Rendering ---

pub fn ui<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>) {
  let p = app.palette();

  frame.render_widget(Block::default().style(Style::default().bg(p.bg)), frame.area());

  let [header_area, body_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, &p, header_area);

  let main_area = if app.view.sidebar_open() {
    let [menu_area, main_area] = Layout::horizontal([Constraint::Length(28), Constraint::Min(20)]).areas(body_area);
    render_sidebar(frame, app, &p, menu_area);
    main_area
  } else {
    body_area
  };

  if app.view.theater().is_some() {
    render_theater(frame, app, &p, main_area);
  } else {
    match app.view.tab() {
      Tab::Settings => render_settings(frame, app, &p, main_area),
      Tab::Admin => render_admin(frame, app, &p, main_area),
      _ => render_videos(frame, app, &p, main_area),
    }
  }

  render_status(frame, app, &p, status_area);
  render_input(frame, app, &p, input_area);
  render_footer(frame, app, &p, footer_area);

  let full = frame.area();
  if let Some(form) = &app.form {
    render_form(frame, form, &p, full);
  }
}

fn render_header<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, p: &Palette, area: Rect) {
  let left = Line::from(vec![
    Span::styled(" ★ ahbab ", Style::default().fg(p.accent).add_modifier(Modifier::BOLD)),
    Span::styled(format!(" {}", tab_title(app)), Style::default().fg(p.fg)),
  ]);
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(p.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_sidebar<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>, p: &Palette, area: Rect) {
  let active = app.view.tab().clone();
  let items: Vec<ListItem> = app
    .menu()
    .into_iter()
    .map(|item| {
      let style = if item.tab == active {
        Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(p.fg)
      };
      ListItem::new(Line::from(Span::styled(format!("{} {}", item.icon, item.label), style)))
    })
    .collect();

  let list = List::new(items)
    .block(panel(" Menu ", p, app.mode == AppMode::Sidebar))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(p.bg).bg(p.highlight).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, area, &mut app.menu_state);
}

fn video_line<S: KeyValueStore>(app: &App<S>, video: &VideoEntry, p: &Palette, inner_w: usize) -> Line<'static> {
  let saved = if app.catalog.is_saved(&video.id) { "★ " } else { "  " };
  let broken = if video.is_broken { " ⚠" } else { "" };
  let channel = if video.is_channel_link { " ▤" } else { "" };

  let (label, color) = match app.catalog.category(&video.category_id) {
    Some(c) => (format!("{} {}", c.icon, c.name), category_color(&c.color_token).unwrap_or(p.muted)),
    None => (app.catalog.category_label(video).to_string(), p.muted),
  };

  let right_w = display_width(&label, label.chars().count());
  let title_max = inner_w.saturating_sub(right_w + 4 + broken.chars().count() + channel.chars().count());
  let title = truncate_str(&video.title, title_max);
  let used = 2 + title.chars().count() + broken.chars().count() + channel.chars().count() + right_w;
  let gap = inner_w.saturating_sub(used).max(1);

  Line::from(vec![
    Span::styled(saved, Style::default().fg(p.warn)),
    Span::styled(title, Style::default().fg(p.fg)),
    Span::styled(broken, Style::default().fg(p.error)),
    Span::styled(channel, Style::default().fg(p.muted)),
    Span::raw(" ".repeat(gap)),
    Span::styled(label, Style::default().fg(color)),
  ])
}

fn render_videos<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>, p: &Palette, area: Rect) {
  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;
  let visible = app.visible();

  if visible.is_empty() {
    let hint = match (app.view.search(), app.view.tab()) {
      (Some(_), _) => "No videos match. Try another word.",
      (None, Tab::Saved) => "Nothing saved yet. Press s on a video to save it.",
      _ => "No videos here yet.",
    };
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(hint, Style::default().fg(p.muted)))])
      .alignment(Alignment::Center)
      .block(panel(format!(" {} ", tab_title(app)), p, app.mode == AppMode::Browse));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = visible.iter().map(|video| ListItem::new(video_line(app, video, p, inner_w))).collect();

  let title = format!(" {} · {} ", tab_title(app), visible.len());
  let list = List::new(items)
    .block(panel(title, p, app.mode == AppMode::Browse))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().bg(p.highlight).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_theater<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, p: &Palette, area: Rect) {
  let block = panel(" 🎬 Theater ", p, true).padding(Padding::horizontal(1));
  let Some(video) = app.theater_video() else {
    frame.render_widget(block, area);
    return;
  };
  let inner_w = area.width.saturating_sub(4) as usize;
  let embed = classify(&video.source_url);
  let quality = app.catalog.settings().default_quality;

  let mut lines = vec![
    Line::from(""),
    Line::from(Span::styled(truncate_str(&video.title, inner_w), Style::default().fg(p.fg).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(vec![
      Span::styled("Category  ", Style::default().fg(p.muted)),
      Span::styled(app.catalog.category_label(video).to_string(), Style::default().fg(p.fg)),
    ]),
    Line::from(vec![
      Span::styled("Kind      ", Style::default().fg(p.muted)),
      Span::styled(embed.label(), Style::default().fg(p.fg)),
    ]),
    Line::from(vec![
      Span::styled("Quality   ", Style::default().fg(p.muted)),
      Span::styled(quality.label(), Style::default().fg(p.fg)),
    ]),
  ];
  if let Some(url) = embed.embed_url_with_quality(quality) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      truncate_str(&url, inner_w),
      Style::default().fg(p.accent).add_modifier(Modifier::UNDERLINED),
    )));
  }
  lines.push(Line::from(""));
  if app.player.video_id() == Some(video.id.as_str()) {
    lines.push(Line::from(Span::styled("▶ Playing in the mpv window", Style::default().fg(p.success))));
  }
  if let Some(note) = &app.theater_note {
    lines.push(Line::from(Span::styled(note.clone(), Style::default().fg(p.warn))));
  }

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
  frame.render_widget(paragraph, area);
}

fn render_settings<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>, p: &Palette, area: Rect) {
  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = SettingsRow::ALL
    .iter()
    .map(|row| {
      let label = row.label();
      let value = app.settings_value(*row);
      let gap = inner_w.saturating_sub(label.chars().count() + value.chars().count()).max(1);
      let mut spans = vec![
        Span::styled(label, Style::default().fg(p.fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(value, Style::default().fg(p.accent)),
      ];
      if *row == SettingsRow::GuardianTab {
        spans.insert(1, Span::styled(" 🔒", Style::default().fg(p.muted)));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let list = List::new(items)
    .block(panel(" ⚙️ Settings ", p, app.mode == AppMode::Browse))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().bg(p.highlight).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_admin<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>, p: &Palette, area: Rect) {
  if !app.admin_gate.is_open() {
    let text = vec![
      Line::from(""),
      Line::from(Span::styled("🔐 Grown-ups only", Style::default().fg(p.accent).add_modifier(Modifier::BOLD))),
      Line::from(""),
      Line::from(Span::styled("Press Enter to log in.", Style::default().fg(p.muted))),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center).block(panel(" Admin ", p, true)), area);
    return;
  }

  let [tabs_area, list_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
  let section_span = |label: String, active: bool| {
    if active {
      Span::styled(label, Style::default().fg(p.bg).bg(p.accent).add_modifier(Modifier::BOLD))
    } else {
      Span::styled(label, Style::default().fg(p.muted))
    }
  };
  let tabs = Line::from(vec![
    section_span(format!(" Videos ({}) ", app.catalog.videos().len()), app.admin_section == AdminSection::Videos),
    Span::raw(" "),
    section_span(format!(" Reports ({}) ", app.catalog.reports().len()), app.admin_section == AdminSection::Reports),
  ]);
  frame.render_widget(tabs, tabs_area);

  let inner_w = list_area.width.saturating_sub(4) as usize;
  let (title, items): (&str, Vec<ListItem>) = match app.admin_section {
    AdminSection::Videos => (
      " All videos ",
      app
        .catalog
        .videos()
        .iter()
        .map(|v| {
          let mut line = video_line(app, v, p, inner_w.saturating_sub(3));
          if v.is_guardian_only {
            line.spans.insert(0, Span::styled("🧔 ", Style::default().fg(p.muted)));
          }
          ListItem::new(line)
        })
        .collect(),
    ),
    AdminSection::Reports => (
      " Playback reports ",
      app
        .catalog
        .reports()
        .iter()
        .map(|r| {
          ListItem::new(vec![
            Line::from(Span::styled(truncate_str(&r.video_title, inner_w), Style::default().fg(p.fg))),
            Line::from(Span::styled(format!("  {}", truncate_str(&r.error_message, inner_w)), Style::default().fg(p.error))),
          ])
        })
        .collect(),
    ),
  };

  let list = List::new(items)
    .block(panel(title, p, app.mode == AppMode::Browse))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().bg(p.highlight).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, list_area, &mut app.list_state);
}

fn render_status<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, p: &Palette, area: Rect) {
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(p.accent))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(p.error))
  } else if let Some(info) = &app.info_message {
    (format!(" ℹ  {}", info), Style::default().fg(p.muted))
  } else if let Some(secs) = app.player.elapsed_secs() {
    (format!(" ♪ Playing {}:{:02}", secs / 60, secs % 60), Style::default().fg(p.success))
  } else {
    (" Ready".to_string(), Style::default().fg(p.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>, p: &Palette, area: Rect) {
  let focused = app.mode == AppMode::Search && app.form.is_none();
  let mut title = " Search ".to_string();
  if app.search.is_pending() {
    title = " Search · thinking… ".to_string();
  } else if app.is_listening() {
    title = " Search · listening… ".to_string();
  }
  let input_block = panel(title, p, focused).padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.search_input.value, app.search_input.cursor);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .search_input
    .value
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(p.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if focused {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_form(frame: &mut Frame, form: &Form, p: &Palette, area: Rect) {
  let height = form.fields.len() as u16 + 4 + u16::from(form.error.is_some());
  let popup = centered(area, 60, height);
  frame.render_widget(Clear, popup);

  let label_w = form.fields.iter().map(|f| f.label.chars().count()).max().unwrap_or(0) + 2;
  let mut lines: Vec<Line> = Vec::with_capacity(form.fields.len() + 2);
  for (i, field) in form.fields.iter().enumerate() {
    let focused = i == form.focus;
    let label_style = if focused { Style::default().fg(p.accent).add_modifier(Modifier::BOLD) } else { Style::default().fg(p.muted) };
    let mut value = field.display();
    if focused && matches!(field.kind, FieldKind::Text { .. }) {
      value.push('▏');
    }
    lines.push(Line::from(vec![
      Span::styled(format!("{:<width$}", field.label, width = label_w), label_style),
      Span::styled(value, Style::default().fg(p.fg)),
    ]));
  }
  lines.push(Line::from(""));
  if let Some(err) = &form.error {
    lines.push(Line::from(Span::styled(format!("⚠ {}", err), Style::default().fg(p.error))));
  }

  let block = panel(format!(" {} ", form.title()), p, true).padding(Padding::horizontal(1)).style(Style::default().bg(p.bg));
  frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_footer<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, p: &Palette, area: Rect) {
  let keys: Vec<(&str, &str)> = if app.form.is_some() {
    vec![("Enter", "Submit"), ("Tab", "Next"), ("←/→", "Change"), ("Esc", "Cancel")]
  } else if app.view.theater().is_some() {
    let mut k = vec![("Esc", "Close"), ("s", "Save")];
    if !app.player.is_playing() {
      k.push(("Enter", "Play again"));
    }
    k
  } else {
    match app.mode {
      AppMode::Search => vec![("Enter", "Search"), ("Esc", "Clear"), ("↓", "Results")],
      AppMode::Sidebar => vec![("Enter", "Open"), ("j/k", "Navigate"), ("Esc", "Close")],
      AppMode::Browse => match app.view.tab() {
        Tab::Settings => vec![("Enter", "Change"), ("j/k", "Navigate"), ("m", "Menu"), ("^t", "Theme"), ("q", "Quit")],
        Tab::Admin if app.admin_gate.is_open() => {
          let mut k = vec![("a", "Add video"), ("c", "Add category"), ("Tab", "Section")];
          match app.admin_section {
            AdminSection::Videos => k.push(("d", "Delete")),
            AdminSection::Reports => k.push(("x", "Dismiss")),
          }
          k.push(("l", "Log out"));
          k.push(("m", "Menu"));
          k
        }
        Tab::Admin => vec![("Enter", "Log in"), ("m", "Menu"), ("q", "Quit")],
        _ => {
          let mut k = vec![("Enter", "Watch"), ("s", "Save"), ("/", "Search")];
          if app.has_voice() {
            k.push(("v", "Speak"));
          }
          k.push(("m", "Menu"));
          k.push(("q", "Quit"));
          k
        }
      },
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(p.bg).bg(p.accent)),
        Span::styled(format!(" {} ", action), Style::default().fg(p.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", app.catalog.settings().theme.theme().name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(p.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_keeps_short_strings() {
    assert_eq!(truncate_str("Cats", 10), "Cats");
    assert_eq!(truncate_str("Cats and Dogs", 5), "Cats…");
  }

  #[test]
  fn display_width_counts_wide_glyphs() {
    assert_eq!(display_width("ab", 2), 2);
    assert_eq!(display_width("日本", 2), 4);
    assert_eq!(display_width("日本", 1), 2);
  }

  #[test]
  fn centered_popup_fits_inside() {
    let area = Rect { x: 0, y: 0, width: 40, height: 10 };
    let popup = centered(area, 60, 6);
    assert_eq!(popup.width, 40);
    assert_eq!(popup.y, 2);
  }
}

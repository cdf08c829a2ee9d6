//! Modal forms: admin login, guardian passcode, add video, add category.

use crate::input::char_to_byte_index;
use crate::model::{Category, NewVideo, VideoFlags};
use crate::theme::{CATEGORY_COLORS, CATEGORY_ICONS};

/// Single-line editable text with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
  pub value: String,
  pub cursor: usize,
}

impl TextInput {
  pub fn with_value(value: &str) -> Self {
    Self { value: value.to_string(), cursor: value.chars().count() }
  }

  pub fn insert(&mut self, c: char) {
    let byte_idx = char_to_byte_index(&self.value, self.cursor);
    self.value.insert(byte_idx, c);
    self.cursor += 1;
  }

  pub fn backspace(&mut self) {
    if self.cursor > 0 {
      self.cursor -= 1;
      let byte_idx = char_to_byte_index(&self.value, self.cursor);
      self.value.remove(byte_idx);
    }
  }

  pub fn delete(&mut self) {
    if self.cursor < self.value.chars().count() {
      let byte_idx = char_to_byte_index(&self.value, self.cursor);
      self.value.remove(byte_idx);
    }
  }

  pub fn left(&mut self) {
    self.cursor = self.cursor.saturating_sub(1);
  }

  pub fn right(&mut self) {
    if self.cursor < self.value.chars().count() {
      self.cursor += 1;
    }
  }

  pub fn home(&mut self) {
    self.cursor = 0;
  }

  pub fn end(&mut self) {
    self.cursor = self.value.chars().count();
  }

  pub fn clear(&mut self) {
    self.value.clear();
    self.cursor = 0;
  }

  pub fn is_blank(&self) -> bool {
    self.value.trim().is_empty()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardianIntent {
  EnterTab,
  ToggleVisibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
  AdminLogin,
  GuardianPasscode(GuardianIntent),
  AddVideo,
  AddCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
  Text { secret: bool },
  /// `(value, display)` pairs cycled with left/right.
  Choice(Vec<(String, String)>),
  Toggle,
}

#[derive(Debug, Clone)]
pub struct Field {
  pub label: &'static str,
  pub kind: FieldKind,
  pub text: TextInput,
  pub selected: usize,
  pub checked: bool,
}

impl Field {
  fn text(label: &'static str, secret: bool) -> Self {
    Self { label, kind: FieldKind::Text { secret }, text: TextInput::default(), selected: 0, checked: false }
  }

  fn choice(label: &'static str, options: Vec<(String, String)>) -> Self {
    Self { label, kind: FieldKind::Choice(options), text: TextInput::default(), selected: 0, checked: false }
  }

  fn toggle(label: &'static str) -> Self {
    Self { label, kind: FieldKind::Toggle, text: TextInput::default(), selected: 0, checked: false }
  }

  pub fn is_text(&self) -> bool {
    matches!(self.kind, FieldKind::Text { .. })
  }

  /// Cycle a choice, or flip a toggle. Text fields ignore this.
  pub fn step(&mut self, forward: bool) {
    match &self.kind {
      FieldKind::Choice(options) if !options.is_empty() => {
        let n = options.len();
        self.selected = if forward { (self.selected + 1) % n } else { (self.selected + n - 1) % n };
      }
      FieldKind::Toggle => self.checked = !self.checked,
      _ => {}
    }
  }

  /// Text shown for the field, masking secrets.
  pub fn display(&self) -> String {
    match &self.kind {
      FieldKind::Text { secret: true } => "•".repeat(self.text.value.chars().count()),
      FieldKind::Text { secret: false } => self.text.value.clone(),
      FieldKind::Choice(options) => options.get(self.selected).map(|(_, d)| format!("‹ {} ›", d)).unwrap_or_default(),
      FieldKind::Toggle => (if self.checked { "[x]" } else { "[ ]" }).to_string(),
    }
  }

  fn choice_value(&self) -> Option<&str> {
    match &self.kind {
      FieldKind::Choice(options) => options.get(self.selected).map(|(v, _)| v.as_str()),
      _ => None,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Form {
  pub kind: FormKind,
  pub fields: Vec<Field>,
  pub focus: usize,
  pub error: Option<String>,
}

impl Form {
  fn new(kind: FormKind, fields: Vec<Field>) -> Self {
    Self { kind, fields, focus: 0, error: None }
  }

  pub fn admin_login() -> Self {
    Self::new(FormKind::AdminLogin, vec![Field::text("Username", false), Field::text("Password", true)])
  }

  pub fn guardian_passcode(intent: GuardianIntent) -> Self {
    Self::new(FormKind::GuardianPasscode(intent), vec![Field::text("Passcode", true)])
  }

  pub fn add_video(categories: &[Category]) -> Self {
    let options = categories.iter().map(|c| (c.id.clone(), format!("{} {}", c.icon, c.name))).collect();
    Self::new(
      FormKind::AddVideo,
      vec![
        Field::text("Title", false),
        Field::text("Link", false),
        Field::choice("Category", options),
        Field::toggle("Channel / playlist"),
        Field::toggle("Parents only"),
      ],
    )
  }

  pub fn add_category() -> Self {
    let icons = CATEGORY_ICONS.iter().map(|i| (i.to_string(), i.to_string())).collect();
    let colors = CATEGORY_COLORS.iter().map(|(t, _)| (t.to_string(), t.to_string())).collect();
    Self::new(
      FormKind::AddCategory,
      vec![Field::text("Name", false), Field::choice("Icon", icons), Field::choice("Colour", colors)],
    )
  }

  pub fn title(&self) -> &'static str {
    match self.kind {
      FormKind::AdminLogin => "Admin login",
      FormKind::GuardianPasscode(_) => "Parents' passcode",
      FormKind::AddVideo => "Add video",
      FormKind::AddCategory => "Add category",
    }
  }

  pub fn focused(&self) -> Option<&Field> {
    self.fields.get(self.focus)
  }

  pub fn focused_mut(&mut self) -> Option<&mut Field> {
    self.fields.get_mut(self.focus)
  }

  pub fn next_field(&mut self) {
    if !self.fields.is_empty() {
      self.focus = (self.focus + 1) % self.fields.len();
    }
  }

  pub fn prev_field(&mut self) {
    if !self.fields.is_empty() {
      self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }
  }

  pub fn text(&self, idx: usize) -> &str {
    self.fields.get(idx).map_or("", |f| f.text.value.as_str())
  }

  fn checked(&self, idx: usize) -> bool {
    self.fields.get(idx).is_some_and(|f| f.checked)
  }

  fn choice(&self, idx: usize) -> Option<&str> {
    self.fields.get(idx).and_then(Field::choice_value)
  }

  /// Values of an add-video form. Validation happens in the catalog.
  pub fn new_video(&self) -> NewVideo {
    NewVideo {
      title: self.text(0).trim().to_string(),
      source_url: self.text(1).trim().to_string(),
      category_id: self.choice(2).unwrap_or_default().to_string(),
      flags: VideoFlags { is_channel_link: self.checked(3), is_guardian_only: self.checked(4) },
    }
  }

  /// `(name, icon, colour)` of an add-category form.
  pub fn new_category(&self) -> (&str, Option<&str>, Option<&str>) {
    (self.text(0).trim(), self.choice(1), self.choice(2))
  }
}

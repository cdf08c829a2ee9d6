//! Closed presentation tables: visual themes, category icons and colour tokens.
//!
//! Nothing here carries behaviour beyond picking colours.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::settings::AppSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeId {
  #[default]
  Default,
  Forest,
  Candy,
  Galaxy,
  Neumorphic,
  Retro,
  Futuristic,
  Corporate,
  Creative,
  Skeuomorphic,
  Aero,
  Frosted,
  Transparent,
  Vibrant,
  Ios,
  AdvancedGlass,
  GridModern,
}

pub struct Theme {
  pub id: ThemeId,
  pub name: &'static str,
  pub accent: Color,
  pub highlight: Color,
}

pub static THEMES: [Theme; 17] = [
  Theme { id: ThemeId::Default, name: "Sky", accent: Color::Rgb(14, 165, 233), highlight: Color::Rgb(56, 189, 248) },
  Theme { id: ThemeId::Forest, name: "Forest", accent: Color::Rgb(22, 163, 74), highlight: Color::Rgb(134, 239, 172) },
  Theme { id: ThemeId::Candy, name: "Candy", accent: Color::Rgb(236, 72, 153), highlight: Color::Rgb(249, 168, 212) },
  Theme { id: ThemeId::Galaxy, name: "Galaxy", accent: Color::Rgb(139, 92, 246), highlight: Color::Rgb(196, 181, 253) },
  Theme {
    id: ThemeId::Neumorphic,
    name: "Neumorphic",
    accent: Color::Rgb(100, 116, 139),
    highlight: Color::Rgb(203, 213, 225),
  },
  Theme { id: ThemeId::Retro, name: "Retro", accent: Color::Rgb(234, 88, 12), highlight: Color::Rgb(253, 186, 116) },
  Theme {
    id: ThemeId::Futuristic,
    name: "Futuristic",
    accent: Color::Rgb(6, 182, 212),
    highlight: Color::Rgb(103, 232, 249),
  },
  Theme { id: ThemeId::Corporate, name: "Corporate", accent: Color::Rgb(37, 99, 235), highlight: Color::Rgb(147, 197, 253) },
  Theme { id: ThemeId::Creative, name: "Creative", accent: Color::Rgb(217, 70, 239), highlight: Color::Rgb(240, 171, 252) },
  Theme {
    id: ThemeId::Skeuomorphic,
    name: "Skeuomorphic",
    accent: Color::Rgb(161, 98, 7),
    highlight: Color::Rgb(250, 204, 21),
  },
  Theme { id: ThemeId::Aero, name: "Aero", accent: Color::Rgb(2, 132, 199), highlight: Color::Rgb(186, 230, 253) },
  Theme { id: ThemeId::Frosted, name: "Frosted", accent: Color::Rgb(148, 163, 184), highlight: Color::Rgb(241, 245, 249) },
  Theme {
    id: ThemeId::Transparent,
    name: "Transparent",
    accent: Color::Rgb(115, 115, 115),
    highlight: Color::Rgb(212, 212, 212),
  },
  Theme { id: ThemeId::Vibrant, name: "Vibrant", accent: Color::Rgb(244, 63, 94), highlight: Color::Rgb(253, 224, 71) },
  Theme { id: ThemeId::Ios, name: "iOS", accent: Color::Rgb(0, 122, 255), highlight: Color::Rgb(52, 199, 89) },
  Theme {
    id: ThemeId::AdvancedGlass,
    name: "Glass",
    accent: Color::Rgb(45, 212, 191),
    highlight: Color::Rgb(153, 246, 228),
  },
  Theme {
    id: ThemeId::GridModern,
    name: "Grid",
    accent: Color::Rgb(79, 70, 229),
    highlight: Color::Rgb(165, 180, 252),
  },
];

impl ThemeId {
  pub fn theme(self) -> &'static Theme {
    THEMES.iter().find(|t| t.id == self).unwrap_or(&THEMES[0])
  }

  pub fn next(self) -> Self {
    let idx = THEMES.iter().position(|t| t.id == self).unwrap_or(0);
    THEMES[(idx + 1) % THEMES.len()].id
  }
}

/// Icons offered when an administrator creates a category.
pub static CATEGORY_ICONS: [&str; 12] = ["✨", "📚", "🎬", "💡", "🎵", "🧩", "🎨", "🐾", "🚀", "⚽", "🌙", "🕌"];

/// Colour tokens a category may carry, with their terminal rendering.
pub static CATEGORY_COLORS: [(&str, Color); 8] = [
  ("pink", Color::Rgb(219, 39, 119)),
  ("blue", Color::Rgb(37, 99, 235)),
  ("yellow", Color::Rgb(202, 138, 4)),
  ("green", Color::Rgb(22, 163, 74)),
  ("purple", Color::Rgb(147, 51, 234)),
  ("orange", Color::Rgb(234, 88, 12)),
  ("red", Color::Rgb(220, 38, 38)),
  ("teal", Color::Rgb(13, 148, 136)),
];

pub fn category_color(token: &str) -> Option<Color> {
  CATEGORY_COLORS.iter().find(|(name, _)| *name == token).map(|(_, c)| *c)
}

/// Resolved colours for one frame, from the theme plus the dark-mode flag.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub highlight: Color,
  pub error: Color,
  pub warn: Color,
  pub success: Color,
}

impl Palette {
  pub fn for_settings(settings: &AppSettings) -> Self {
    let theme = settings.theme.theme();
    let (bg, fg, muted) = if settings.dark_mode {
      (Color::Rgb(15, 23, 42), Color::Rgb(241, 245, 249), Color::Rgb(100, 116, 139))
    } else {
      (Color::Rgb(240, 249, 255), Color::Rgb(30, 41, 59), Color::Rgb(100, 116, 139))
    };
    Self {
      bg,
      fg,
      muted,
      accent: theme.accent,
      highlight: theme.highlight,
      error: Color::Rgb(239, 68, 68),
      warn: Color::Rgb(245, 158, 11),
      success: Color::Rgb(34, 197, 94),
    }
  }
}

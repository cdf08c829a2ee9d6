//! YouTube link classification.
//!
//! Turns whatever an administrator pasted (watch links, short links, playlist
//! links, channel pages) into something a player can load. Rules are ordered
//! and the first match wins:
//!
//! 1. an 11-character video id → single-video embed
//! 2. a `list=` parameter → playlist ("videoseries") embed
//! 3. a channel / handle / user page → not embeddable
//! 4. anything else → passed through untouched

use regex::Regex;
use std::sync::LazyLock;

use crate::settings::PlaybackQuality;

const EMBED_BASE: &str = "https://www.youtube.com/embed";

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?|shorts|live)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
  )
  .expect("video id pattern is a valid regex")
});

static LIST_ID: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[?&]list=([^#&?]+)").expect("list pattern is a valid regex"));

/// Path markers of publisher profile pages. Platforms refuse to frame these.
const CHANNEL_MARKERS: [&str; 3] = ["youtube.com/@", "youtube.com/channel/", "youtube.com/user/"];

/// Outcome of classifying a source link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedResult {
  PlayableVideo { video_id: String, embed_url: String },
  PlayablePlaylist { list_id: String, embed_url: String },
  NotEmbeddable,
  /// No rule matched. An empty `url` means "do not render a player".
  Passthrough { url: String },
}

/// Classify a source link. Never fails: unknown shapes fall through to
/// [`EmbedResult::Passthrough`].
pub fn classify(source_url: &str) -> EmbedResult {
  if source_url.is_empty() {
    return EmbedResult::Passthrough { url: String::new() };
  }

  if let Some(id) = VIDEO_ID.captures(source_url).and_then(|c| c.get(1)) {
    let video_id = id.as_str().to_string();
    let embed_url = format!("{}/{}", EMBED_BASE, video_id);
    return EmbedResult::PlayableVideo { video_id, embed_url };
  }

  if let Some(id) = LIST_ID.captures(source_url).and_then(|c| c.get(1)) {
    let list_id = id.as_str().to_string();
    let embed_url = format!("{}/videoseries?list={}", EMBED_BASE, list_id);
    return EmbedResult::PlayablePlaylist { list_id, embed_url };
  }

  if CHANNEL_MARKERS.iter().any(|m| source_url.contains(m)) {
    return EmbedResult::NotEmbeddable;
  }

  EmbedResult::Passthrough { url: source_url.to_string() }
}

impl EmbedResult {
  pub fn label(&self) -> &'static str {
    match self {
      EmbedResult::PlayableVideo { .. } => "video",
      EmbedResult::PlayablePlaylist { .. } => "playlist",
      EmbedResult::NotEmbeddable => "channel (not embeddable)",
      EmbedResult::Passthrough { .. } => "unrecognized",
    }
  }

  pub fn embed_url(&self) -> Option<&str> {
    match self {
      EmbedResult::PlayableVideo { embed_url, .. } | EmbedResult::PlayablePlaylist { embed_url, .. } => {
        Some(embed_url)
      }
      EmbedResult::Passthrough { url } if !url.is_empty() => Some(url),
      _ => None,
    }
  }

  /// Embed URL carrying the `vq=` quality hint. The hint is advisory; players may ignore it.
  pub fn embed_url_with_quality(&self, quality: PlaybackQuality) -> Option<String> {
    let url = self.embed_url()?;
    let Some(token) = quality.youtube_token() else { return Some(url.to_string()) };
    if matches!(self, EmbedResult::Passthrough { .. }) {
      return Some(url.to_string());
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    Some(format!("{}{}vq={}", url, sep, token))
  }

  /// URL handed to the external player. Watch/playlist pages resolve better
  /// through yt-dlp than the iframe forms.
  pub fn player_url(&self) -> Option<String> {
    match self {
      EmbedResult::PlayableVideo { video_id, .. } => Some(format!("https://www.youtube.com/watch?v={}", video_id)),
      EmbedResult::PlayablePlaylist { list_id, .. } => {
        Some(format!("https://www.youtube.com/playlist?list={}", list_id))
      }
      EmbedResult::Passthrough { url } if !url.is_empty() => Some(url.clone()),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ID: &str = "dQw4w9WgXcQ";

  fn video_id_of(url: &str) -> Option<String> {
    match classify(url) {
      EmbedResult::PlayableVideo { video_id, embed_url } => {
        assert_eq!(embed_url, format!("https://www.youtube.com/embed/{}", video_id));
        Some(video_id)
      }
      _ => None,
    }
  }

  #[test]
  fn watch_link() {
    assert_eq!(video_id_of("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(), Some(ID));
    assert_eq!(video_id_of("https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ").as_deref(), Some(ID));
  }

  #[test]
  fn short_link() {
    assert_eq!(video_id_of("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some(ID));
    assert_eq!(video_id_of("https://youtu.be/dQw4w9WgXcQ?t=42").as_deref(), Some(ID));
  }

  #[test]
  fn embed_and_v_paths() {
    assert_eq!(video_id_of("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(), Some(ID));
    assert_eq!(video_id_of("https://www.youtube.com/v/dQw4w9WgXcQ").as_deref(), Some(ID));
  }

  #[test]
  fn shorts_path() {
    assert_eq!(video_id_of("https://www.youtube.com/shorts/dQw4w9WgXcQ").as_deref(), Some(ID));
  }

  #[test]
  fn live_path() {
    assert_eq!(video_id_of("https://www.youtube.com/live/dQw4w9WgXcQ").as_deref(), Some(ID));
    assert_eq!(video_id_of("https://www.youtube.com/live/dQw4w9WgXcQ?si=abc").as_deref(), Some(ID));
  }

  #[test]
  fn video_wins_over_playlist() {
    let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLabc123";
    assert_eq!(video_id_of(url).as_deref(), Some(ID));
  }

  #[test]
  fn playlist_only() {
    match classify("https://www.youtube.com/playlist?list=xyz") {
      EmbedResult::PlayablePlaylist { list_id, embed_url } => {
        assert_eq!(list_id, "xyz");
        assert_eq!(embed_url, "https://www.youtube.com/embed/videoseries?list=xyz");
      }
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn playlist_id_stops_at_next_param() {
    match classify("https://www.youtube.com/playlist?list=PL123&index=4#frag") {
      EmbedResult::PlayablePlaylist { list_id, .. } => assert_eq!(list_id, "PL123"),
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn channel_pages_not_embeddable() {
    assert_eq!(classify("https://youtube.com/@somehandle"), EmbedResult::NotEmbeddable);
    assert_eq!(classify("https://www.youtube.com/@somehandle/videos"), EmbedResult::NotEmbeddable);
    assert_eq!(classify("https://www.youtube.com/channel/UC1234567890abcdefghijkl"), EmbedResult::NotEmbeddable);
    assert_eq!(classify("https://www.youtube.com/user/someone"), EmbedResult::NotEmbeddable);
  }

  #[test]
  fn unknown_input_passes_through() {
    assert_eq!(classify("not a url"), EmbedResult::Passthrough { url: "not a url".to_string() });
    assert_eq!(
      classify("https://example.com/clip.mp4"),
      EmbedResult::Passthrough { url: "https://example.com/clip.mp4".to_string() }
    );
    assert_eq!(classify("youtube.com/watch?v=short"), EmbedResult::Passthrough {
      url: "youtube.com/watch?v=short".to_string()
    });
  }

  #[test]
  fn empty_input_passes_through_empty() {
    let result = classify("");
    assert_eq!(result, EmbedResult::Passthrough { url: String::new() });
    assert_eq!(result.embed_url(), None);
    assert_eq!(result.player_url(), None);
  }

  #[test]
  fn quality_hint_appended_to_embeds_only() {
    let video = classify("https://youtu.be/dQw4w9WgXcQ");
    assert_eq!(
      video.embed_url_with_quality(PlaybackQuality::Hd720).as_deref(),
      Some("https://www.youtube.com/embed/dQw4w9WgXcQ?vq=hd720")
    );
    assert_eq!(
      video.embed_url_with_quality(PlaybackQuality::Auto).as_deref(),
      Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
    );

    let playlist = classify("https://www.youtube.com/playlist?list=xyz");
    assert_eq!(
      playlist.embed_url_with_quality(PlaybackQuality::Tiny).as_deref(),
      Some("https://www.youtube.com/embed/videoseries?list=xyz&vq=tiny")
    );

    let other = classify("https://example.com/a");
    assert_eq!(other.embed_url_with_quality(PlaybackQuality::Hd1080).as_deref(), Some("https://example.com/a"));
    assert_eq!(EmbedResult::NotEmbeddable.embed_url_with_quality(PlaybackQuality::Hd1080), None);
  }

  #[test]
  fn player_urls() {
    assert_eq!(
      classify("https://youtu.be/dQw4w9WgXcQ").player_url().as_deref(),
      Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    );
    assert_eq!(
      classify("https://www.youtube.com/playlist?list=xyz").player_url().as_deref(),
      Some("https://www.youtube.com/playlist?list=xyz")
    );
    assert_eq!(EmbedResult::NotEmbeddable.player_url(), None);
  }
}

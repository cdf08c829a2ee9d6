//! Free-text search over the catalog.
//!
//! A query is first handed to a text-completion collaborator (an LLM) that
//! ranks the catalog; any failure there (network, timeout, a reply that is not
//! a list of ids) silently degrades to a case-insensitive substring match on
//! titles. Callers only ever see a list of ids, or `None` for "no search".

use anyhow::{Context, Result, anyhow};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::constants::constants;
use crate::model::VideoEntry;

/// A text-completion service: prompt in, text out.
pub trait Completion: Send + Sync {
  fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;
}

// --- Gemini ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
  contents: [Content<'a>; 1],
  #[serde(rename = "generationConfig")]
  generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
  parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
  #[serde(rename = "responseMimeType")]
  response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
  content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
  #[serde(default)]
  text: String,
}

/// Google Gemini `generateContent` over HTTPS.
pub struct GeminiCompletion {
  client: Client,
  endpoint: String,
  model: String,
  api_key: String,
}

impl GeminiCompletion {
  /// `None` when search ranking is disabled or no API key is available;
  /// the resolver then uses substring matching only.
  pub fn from_config(config: &SearchConfig) -> Option<Self> {
    if !config.enabled() {
      return None;
    }
    let api_key = std::env::var(config.api_key_env()).ok().filter(|k| !k.trim().is_empty())?;
    Some(Self { client: Client::new(), endpoint: config.endpoint(), model: config.model(), api_key })
  }
}

impl Completion for GeminiCompletion {
  fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
    Box::pin(async move {
      let url = format!("{}/models/{}:generateContent", self.endpoint.trim_end_matches('/'), self.model);
      let body = GenerateRequest {
        contents: [Content { parts: [Part { text: prompt }] }],
        generation_config: GenerationConfig { response_mime_type: "application/json" },
      };
      let response = self
        .client
        .post(&url)
        .header("x-goog-api-key", &self.api_key)
        .json(&body)
        .send()
        .await
        .context("Failed to reach the search service")?;

      let status = response.status();
      if !status.is_success() {
        return Err(anyhow!("Search service answered {}", status));
      }
      let parsed: GenerateResponse = response.json().await.context("Search service reply is not valid JSON")?;
      parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| anyhow!("Search service reply has no text"))
    })
  }
}

// --- Prompt / reply handling ---

#[derive(Serialize)]
struct Listing<'a> {
  id: &'a str,
  title: &'a str,
}

fn build_prompt(query: &str, catalog: &[VideoEntry], top_k: usize) -> Result<String> {
  let listing: Vec<Listing> = catalog.iter().map(|v| Listing { id: &v.id, title: &v.title }).collect();
  let listing = serde_json::to_string(&listing).context("Failed to encode catalog listing")?;
  Ok(format!(
    "You help a child find videos in a small catalog.\n\
     Catalog as a JSON list of id and title:\n{}\n\n\
     Query: {:?}\n\n\
     Answer with only a JSON array of at most {} id strings taken from the catalog, \
     most relevant first. Answer [] if nothing fits.",
    listing, query, top_k
  ))
}

/// Strip formatting a model may wrap around its JSON: code fences, a
/// language tag, or prose before and after the array.
pub fn strip_wrapping(text: &str) -> &str {
  let trimmed = text.trim();
  let unfenced = match trimmed.strip_prefix("```") {
    Some(rest) => {
      let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
      rest.strip_suffix("```").unwrap_or(rest).trim()
    }
    None => trimmed,
  };
  match (unfenced.find('['), unfenced.rfind(']')) {
    (Some(start), Some(end)) if start < end => &unfenced[start..=end],
    _ => unfenced,
  }
}

pub fn parse_ranked_ids(text: &str) -> Result<Vec<String>> {
  serde_json::from_str(strip_wrapping(text)).context("Search reply is not a JSON list of strings")
}

/// Case-insensitive substring match on titles, catalog order, no cap.
pub fn substring_matches(query: &str, catalog: &[VideoEntry]) -> Vec<String> {
  let needle = query.trim().to_lowercase();
  catalog.iter().filter(|v| v.title.to_lowercase().contains(&needle)).map(|v| v.id.clone()).collect()
}

// --- Resolver ---

#[derive(Clone)]
pub struct SearchResolver {
  completion: Option<Arc<dyn Completion>>,
  timeout: Duration,
  top_k: usize,
}

impl SearchResolver {
  pub fn new(completion: Option<Arc<dyn Completion>>, timeout: Duration) -> Self {
    Self { completion, timeout, top_k: constants().search_top_k }
  }

  pub fn has_collaborator(&self) -> bool {
    self.completion.is_some()
  }

  /// `None` for a blank query. Otherwise the ranked ids, or every substring
  /// match when ranking is unavailable or fails. Never returns an error.
  pub async fn search(&self, query: &str, catalog: &[VideoEntry]) -> Option<Vec<String>> {
    let query = query.trim();
    if query.is_empty() {
      return None;
    }

    if let Some(completion) = &self.completion {
      match self.rank(completion.as_ref(), query, catalog).await {
        Ok(ids) => {
          info!(query = %query, results = ids.len(), "search: ranked");
          return Some(ids);
        }
        Err(e) => {
          warn!(query = %query, err = %format!("{:#}", e), "search: ranking failed, using substring match");
        }
      }
    }

    let ids = substring_matches(query, catalog);
    debug!(query = %query, results = ids.len(), "search: substring match");
    Some(ids)
  }

  async fn rank(&self, completion: &dyn Completion, query: &str, catalog: &[VideoEntry]) -> Result<Vec<String>> {
    let prompt = build_prompt(query, catalog, self.top_k)?;
    let text = tokio::time::timeout(self.timeout, completion.complete(&prompt))
      .await
      .map_err(|_| anyhow!("Search service timed out after {:?}", self.timeout))??;
    let ranked = parse_ranked_ids(&text)?;

    let mut ids: Vec<String> = Vec::with_capacity(self.top_k);
    for id in ranked {
      if ids.len() == self.top_k {
        break;
      }
      if catalog.iter().any(|v| v.id == id) && !ids.contains(&id) {
        ids.push(id);
      }
    }
    Ok(ids)
  }
}

// --- Single-flight session ---

pub enum SearchPoll {
  Idle,
  Pending,
  Settled { query: String, ids: Option<Vec<String>> },
}

struct InFlight {
  query: String,
  rx: oneshot::Receiver<Option<Vec<String>>>,
  handle: JoinHandle<()>,
}

/// At most one search in flight. A new submission aborts the previous task and
/// drops its receiver, so a slow stale reply can never overwrite a newer one.
pub struct SearchSession {
  resolver: SearchResolver,
  in_flight: Option<InFlight>,
}

impl SearchSession {
  pub fn new(resolver: SearchResolver) -> Self {
    Self { resolver, in_flight: None }
  }

  pub fn resolver(&self) -> &SearchResolver {
    &self.resolver
  }

  pub fn submit(&mut self, query: &str, catalog: Vec<VideoEntry>) {
    self.cancel();
    let resolver = self.resolver.clone();
    let owned_query = query.to_string();
    let (tx, rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
      let _ = tx.send(resolver.search(&owned_query, &catalog).await);
    });
    self.in_flight = Some(InFlight { query: query.trim().to_string(), rx, handle });
  }

  pub fn cancel(&mut self) {
    if let Some(flight) = self.in_flight.take() {
      flight.handle.abort();
      debug!(query = %flight.query, "search: cancelled in-flight request");
    }
  }

  pub fn is_pending(&self) -> bool {
    self.in_flight.is_some()
  }

  pub fn poll(&mut self) -> SearchPoll {
    let Some(mut flight) = self.in_flight.take() else { return SearchPoll::Idle };
    match flight.rx.try_recv() {
      Ok(ids) => SearchPoll::Settled { query: flight.query, ids },
      Err(oneshot::error::TryRecvError::Empty) => {
        self.in_flight = Some(flight);
        SearchPoll::Pending
      }
      Err(oneshot::error::TryRecvError::Closed) => {
        warn!(query = %flight.query, "search: task ended without a result");
        SearchPoll::Idle
      }
    }
  }
}

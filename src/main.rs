mod access;
mod app;
mod catalog;
mod classify;
mod config;
mod constants;
mod form;
mod input;
mod model;
mod player;
mod search;
mod settings;
mod storage;
mod theme;
mod ui;
mod view;
mod voice;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use catalog::{Catalog, Shelf};
use classify::classify;
use config::Config;
use search::{Completion, GeminiCompletion, SearchResolver};
use storage::{FileStore, KeyValueStore};

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Directory holding the catalog and logs (default: platform data dir)
  #[arg(short, long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Browse and play the catalog (default)
  Tui,
  /// Show how a link would be played
  Classify { url: String },
  /// Print the catalog
  List,
  /// Run one search against the catalog
  Search { query: String },
  /// Print shell completions
  Completions { shell: Shell },
}

// --- Setup ---

const LOG_ENV: &str = "AHBAB_LOG";

fn init_tracing(data_dir: &Path) -> Result<WorkerGuard> {
  let log_dir = data_dir.join("logs");
  std::fs::create_dir_all(&log_dir).with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;
  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "ahbab.log"));
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;
  Ok(guard)
}

fn build_resolver(config: &Config) -> SearchResolver {
  let completion = GeminiCompletion::from_config(&config.search).map(|c| Arc::new(c) as Arc<dyn Completion>);
  SearchResolver::new(completion, config.search.timeout())
}

struct Session {
  config: Config,
  catalog: Catalog<FileStore>,
  _log_guard: WorkerGuard,
}

fn open_session(data_dir: Option<PathBuf>) -> Result<Session> {
  let config = Config::load();
  let data_dir = data_dir.or_else(|| config.data_dir()).context("No data directory available; pass --data-dir")?;
  let log_guard = init_tracing(&data_dir)?;
  info!(data_dir = %data_dir.display(), "ahbab starting");
  let store = FileStore::open(&data_dir)?;
  let catalog = Catalog::load(store).context("Failed to load the catalog")?;
  Ok(Session { config, catalog, _log_guard: log_guard })
}

// --- Headless commands ---

fn print_classification(url: &str) {
  let embed = classify(url);
  println!("kind:    {}", embed.label());
  if let Some(embed_url) = embed.embed_url() {
    println!("embed:   {}", embed_url);
  }
  match embed.player_url() {
    Some(player_url) => println!("play:    {}", player_url),
    None => println!("play:    (not playable here)"),
  }
}

fn print_videos<'a, S: KeyValueStore>(catalog: &Catalog<S>, videos: impl IntoIterator<Item = &'a model::VideoEntry>) {
  for video in videos {
    let mut flags = String::new();
    if catalog.is_saved(&video.id) {
      flags.push('★');
    }
    if video.is_broken {
      flags.push('⚠');
    }
    if video.is_guardian_only {
      flags.push('🧔');
    }
    println!("{}  {:<14} {} {}", video.id, catalog.category_label(video), video.title, flags);
  }
}

async fn search_once(session: &Session, query: &str) -> Result<()> {
  let resolver = build_resolver(&session.config);
  let scope: Vec<model::VideoEntry> = session.catalog.shelf(Shelf::All).into_iter().cloned().collect();
  let ids = resolver.search(query, &scope).await.context("Enter a search term")?;
  if ids.is_empty() {
    println!("Nothing matches '{}'", query.trim());
  }
  print_videos(&session.catalog, session.catalog.resolve(&ids));
  Ok(())
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  match args.command.unwrap_or(Command::Tui) {
    Command::Completions { shell } => {
      clap_complete::generate(shell, &mut Args::command(), "ahbab", &mut std::io::stdout());
      Ok(())
    }
    Command::Classify { url } => {
      print_classification(&url);
      Ok(())
    }
    Command::List => {
      let session = open_session(args.data_dir)?;
      print_videos(&session.catalog, session.catalog.videos());
      Ok(())
    }
    Command::Search { query } => {
      let session = open_session(args.data_dir)?;
      search_once(&session, &query).await
    }
    Command::Tui => {
      let session = open_session(args.data_dir)?;

      let default_hook = std::panic::take_hook();
      std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        default_hook(info);
      }));

      let mut terminal = ratatui::init();
      let result = run(&mut terminal, session).await;
      ratatui::restore();
      result
    }
  }
}

async fn run(terminal: &mut DefaultTerminal, session: Session) -> Result<()> {
  let Session { config, catalog, _log_guard } = session;
  let resolver = build_resolver(&config);
  let mut app = App::new(catalog, &config, resolver);

  loop {
    app.check_pending().await?;

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key).await?;
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  app.player.stop().await?;
  info!("ahbab exiting");
  Ok(())
}

//! Folio CLI
//!
//! Drives the site's client-side behaviour against a running site:
//! - Open content in a headless overlay
//! - Talk to the chat endpoint
//! - Fetch weather and print the derived series
//! - Print the booking embed URL

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio::chat::{ChatSession, HttpChatBackend, Speaker};
use folio::config::{generate_default_config, Config, LoggingConfig};
use folio::content::{ContentKind, ContentLoader, ContentRef, HttpContentSource, Slug};
use folio::overlay::{HeadlessBrowser, OverlayController, Outcome};
use folio::schedule::BookingEmbed;
use folio::theme::Theme;
use folio::timer::TokioDelay;
use folio::weather::{HttpWeatherSource, PanelContent, WeatherPanel};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless client for the portfolio site's overlay, chat and weather panel")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/folio/config.toml, then ./folio.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Site URL, overriding the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a post or case study in a headless overlay
    Open {
        /// Content slug
        slug: String,
        /// Content kind (post, case-study)
        #[arg(short, long, default_value = "post")]
        kind: ContentKind,
        /// Ask the site to bypass its content cache
        #[arg(long)]
        refresh: bool,
        /// Follow the next-post link after opening
        #[arg(long)]
        next: bool,
        /// Close the overlay afterwards
        #[arg(long)]
        close: bool,
    },

    /// Send one chat message
    Chat {
        /// Message text
        message: String,
    },

    /// Current conditions and forecast series
    Weather,

    /// Print the booking calendar URL
    Schedule {
        /// Use the dark theme
        #[arg(long)]
        dark: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.base_url {
        config.site.base_url = url.clone();
    }

    init_logging(&config.logging);
    let timeout = Duration::from_secs(config.site.request_timeout_secs);

    match cli.command {
        Commands::Open {
            slug,
            kind,
            refresh,
            next,
            close,
        } => {
            let target = ContentRef::new(Slug::parse(&slug)?, kind);
            let source = HttpContentSource::new(&config.site.base_url, timeout)?;
            let loader = ContentLoader::new(source).with_fallback(config.overlay.case_study_fallback);
            let mut overlay = OverlayController::from_config(
                HeadlessBrowser::new(&config.overlay.root_path),
                &config.overlay,
            );

            let mut outcome = overlay.open(&loader, target, refresh).await?;
            print_outcome(&overlay, &outcome);

            if next {
                let next_slug = overlay
                    .state()
                    .shown()
                    .and_then(|shown| shown.payload.next_slug())
                    .context("content has no next post")?;
                let target = overlay
                    .neighbor(next_slug)
                    .context("overlay is not showing anything")?;
                outcome = overlay.navigate(&loader, target, refresh).await?;
                print_outcome(&overlay, &outcome);
            }

            if close && !matches!(outcome, Outcome::Degraded { .. }) {
                overlay.close(&TokioDelay).await;
                println!("Closed");
                print_page(&overlay);
            }
        }

        Commands::Chat { message } => {
            let backend = HttpChatBackend::new(&config.site.base_url, timeout)?;
            let mut session = ChatSession::new(&config.chat);
            session.send(&backend, &message).await;

            if cli.format == "json" {
                let transcript: Vec<_> = session
                    .messages()
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "from": if m.speaker == Speaker::Ai { "ai" } else { "user" },
                            "text": m.text,
                            "audioUrl": m.audio_url,
                            "error": m.is_error,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&transcript)?);
            } else {
                for m in session.messages() {
                    let who = if m.speaker == Speaker::Ai { "AI " } else { "You" };
                    println!("{}: {}", who, m.text);
                    if let Some(url) = &m.audio_url {
                        println!("     audio: {}", url);
                    }
                }
            }
        }

        Commands::Weather => {
            let source = HttpWeatherSource::new(config.weather.clone(), timeout)?;
            let mut panel = WeatherPanel::from_config(&config, Theme::Light);
            panel.open();

            match panel.load(&source, chrono::Utc::now()).await {
                PanelContent::Weather(display) => {
                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(&display.charts)?);
                        return Ok(());
                    }

                    let s = &display.summary;
                    println!("{}  {}", display.location, display.local_time);
                    println!(
                        "{}°F {} ({})  Feels like {}°F • Humidity {}%",
                        s.temp, s.condition, s.icon_class, s.feels_like, s.humidity
                    );
                    println!();
                    println!("{:<6} {:>5} {:>5}", "Day", "High", "Low");
                    println!("{}", "-".repeat(18));
                    for day in &display.charts.daily {
                        println!("{:<6} {:>5} {:>5}", day.weekday, day.high, day.low);
                    }
                    println!();
                    println!("{:<6} {:>6} {:>6}", "Time", "Temp", "Rain%");
                    println!("{}", "-".repeat(20));
                    for (temp, rain) in display
                        .charts
                        .temperature
                        .iter()
                        .zip(&display.charts.precipitation)
                    {
                        println!("{:<6} {:>6} {:>6}", temp.label, temp.value, rain.value);
                    }
                }
                PanelContent::Error(message) => anyhow::bail!(message),
                other => anyhow::bail!("unexpected panel content: {:?}", other),
            }
        }

        Commands::Schedule { dark } => {
            let embed = BookingEmbed::from_config(&config.schedule);
            println!("{}", embed.url(Theme::from_dark(dark)));
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("folio={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_outcome(overlay: &OverlayController<HeadlessBrowser>, outcome: &Outcome) {
    match outcome {
        Outcome::Rendered { used_fallback, .. } => {
            if let Some(shown) = overlay.state().shown() {
                println!("{}", shown.payload.title);
                match shown.payload.published_display() {
                    Some(date) => println!("  {} • {} min read", date, shown.payload.reading_time),
                    None => println!("  {} min read", shown.payload.reading_time),
                }
                if *used_fallback {
                    println!("  (served by the {} endpoint)", shown.served_as);
                }
            }
            print_page(overlay);
        }
        Outcome::Stale { token } => println!("Response {} superseded", token),
        Outcome::Degraded { url, error } => {
            println!("Overlay unavailable ({})", error);
            println!("Navigated to {}", url);
        }
    }
}

fn print_page(overlay: &OverlayController<HeadlessBrowser>) {
    let browser = overlay.browser();
    println!("  history: {}", browser.history().join(" → "));
    println!("  scroll locked: {}", browser.scroll_locked());
}

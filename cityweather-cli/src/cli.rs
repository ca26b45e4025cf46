use anyhow::Context;
use clap::{Parser, Subcommand};

use cityweather_core::{Config, SearchController, SearchState, provider::client_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Per-day city forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key, country scope and day limit.
    Configure,

    /// Look up a city and show its per-day forecast summaries.
    Search {
        /// City name, resolved within the configured country scope.
        city: String,

        /// Number of days to show; overrides the configured limit.
        #[arg(long)]
        days: Option<usize>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { city, days } => search(&city, days).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let country = inquire::Text::new("Country scope (ISO code):")
        .with_default(&config.country)
        .prompt()
        .context("Failed to read country scope")?;

    let days = inquire::CustomType::<usize>::new("Days to display:")
        .with_default(config.days)
        .prompt()
        .context("Failed to read day limit")?;

    config.api_key = Some(api_key);
    config.country = country;
    config.days = days;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn search(city: &str, days: Option<usize>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = client_from_config(&config)?;
    let day_limit = days.unwrap_or(config.days);

    // The same client serves both capabilities.
    let mut controller =
        SearchController::new(Box::new(client.clone()), Box::new(client), day_limit);
    controller.on_change(|state| {
        if state.is_loading {
            println!("Fetching forecast for {}...", state.query_city);
        }
    });

    let state = controller.search(city).await;
    render(&state);
    Ok(())
}

fn render(state: &SearchState) {
    if let Some(notice) = state.notice {
        println!("{notice}");
        return;
    }

    if state.summaries.is_empty() {
        println!("No forecast data for {}", state.query_city);
        return;
    }

    println!("Weather in {}", state.query_city);
    for day in &state.summaries {
        println!();
        println!("Date: {}", day.date);
        println!("  Min temp : {:>6.1} °C", day.min_temp);
        println!("  Max temp : {:>6.1} °C", day.max_temp);
        println!("  Pressure : {:>6} hPa", day.pressure);
        println!("  Humidity : {:>6} %", day.humidity);
    }
}

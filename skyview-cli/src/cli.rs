use std::fmt;

use anyhow::bail;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use skyview_core::{Config, Credential, LookupController, WeatherLookup, lookup_from_config};
use tracing::debug;

use crate::render;

const CITY_PLACEHOLDER: &str = "e.g. Pune, Mumbai, London";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Current weather and map links for a city")]
pub struct Cli {
    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Look up the current weather for a city once.
    Show {
        /// City name, e.g. "London" or "Pune".
        city: String,

        /// Also print an OpenStreetMap embed link for the city.
        #[arg(long)]
        map: bool,
    },

    /// Search repeatedly from a prompt.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Show { city, map } => {
                let mut controller = controller_from_disk()?;
                controller.submit_search(&city).await;
                if map {
                    controller.request_map();
                }
                print!("{}", render::View(&controller.state()));
                Ok(())
            }
            Command::Interactive => {
                let mut controller = controller_from_disk()?;
                interactive(&mut controller).await
            }
        }
    }
}

fn controller_from_disk() -> anyhow::Result<LookupController<impl WeatherLookup>> {
    let config = Config::load()?;
    let credential = config.credential();
    debug!(?credential, endpoint = config.base_url(), "loaded configuration");

    Ok(LookupController::new(lookup_from_config(&config)?, credential))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Copy it from https://openweathermap.org under \"API keys\"")
        .prompt()?;

    if !Credential::new(key.as_str()).is_configured() {
        bail!("That does not look like an API key; nothing was saved.");
    }

    config.set_api_key(key.trim().to_string());
    let path = config.save()?;
    println!("Saved API key to {}", path.display());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    ShowMap,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search",
            Action::ShowMap => "Show City on Map",
            Action::Quit => "Quit",
        })
    }
}

async fn interactive<L: WeatherLookup>(controller: &mut LookupController<L>) -> anyhow::Result<()> {
    println!("Weather Dashboard - enter a city name to see current weather details.");

    loop {
        let action = Select::new("What next?", vec![Action::Search, Action::ShowMap, Action::Quit])
            .prompt();

        let action = match action {
            Ok(action) => action,
            Err(e) if is_cancel(&e) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        match action {
            Action::Search => {
                let Some(city) = prompt_city(controller.state().query())? else {
                    return Ok(());
                };
                controller.submit_search(&city).await;
            }
            Action::ShowMap => {
                if controller.state().query().is_empty() {
                    let Some(city) = prompt_city("")? else {
                        return Ok(());
                    };
                    controller.set_query(&city);
                }
                controller.request_map();
            }
            Action::Quit => return Ok(()),
        }

        print!("{}", render::View(&controller.state()));
    }
}

/// `None` when the user backs out of the prompt.
fn prompt_city(current: &str) -> anyhow::Result<Option<String>> {
    let answer = Text::new("City:")
        .with_initial_value(current)
        .with_placeholder(CITY_PLACEHOLDER)
        .prompt();

    match answer {
        Ok(city) => Ok(Some(city)),
        Err(e) if is_cancel(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn is_cancel(e: &InquireError) -> bool {
    matches!(
        e,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

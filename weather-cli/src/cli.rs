use std::fmt;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use weather_core::{Config, Severity, UnitSystem, WeatherError, WeatherReport, WeatherService};

use crate::render::render_report;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and the next 24 hours for a city.
    Show {
        /// City name, e.g. "Manila".
        city: String,

        /// Unit system for display: metric or imperial.
        #[arg(long, short, default_value_t = UnitSystem::Metric)]
        units: UnitSystem,
    },

    /// Ask for cities repeatedly until you quit.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => {
                let service = service_from_config()?;
                if let Ok(report) = query(&service, &city).await {
                    print!("{}", render_report(&report, units));
                }
                Ok(())
            }
            Command::Interactive => {
                let service = service_from_config()?;
                interactive(&service).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(inquire::required!("API key is required"))
        .prompt()
        .context("Failed to read API key")?;

    cfg.set_api_key(key);
    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

/// A missing API key is fatal; everything after startup is reported per query.
fn service_from_config() -> anyhow::Result<WeatherService> {
    let cfg = Config::load()?;
    Ok(WeatherService::new(cfg.client()?))
}

async fn query(service: &WeatherService, city: &str) -> Result<WeatherReport, WeatherError> {
    service.lookup(city).await.inspect_err(report_query_error)
}

fn report_query_error(err: &WeatherError) {
    tracing::debug!(error = ?err, "query failed");
    match err.severity() {
        Severity::Warning => eprintln!("warning: {}", err.user_message()),
        Severity::Error => eprintln!("error: {}", err.user_message()),
    }
}

#[derive(Debug, Clone, Copy)]
struct UnitChoice(UnitSystem);

impl fmt::Display for UnitChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            UnitSystem::Metric => f.write_str("Metric (°C, km/h)"),
            UnitSystem::Imperial => f.write_str("Imperial (°F, mph)"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NextStep {
    SwitchUnits(UnitSystem),
    NewCity,
    Quit,
}

impl fmt::Display for NextStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextStep::SwitchUnits(units) => write!(f, "Show in {units}"),
            NextStep::NewCity => f.write_str("Another city"),
            NextStep::Quit => f.write_str("Quit"),
        }
    }
}

/// `Ok(None)` when the user cancelled the prompt.
fn prompt<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn interactive(service: &WeatherService) -> anyhow::Result<()> {
    loop {
        let Some(city) = prompt(Text::new("City").with_placeholder("e.g., Manila").prompt())? else {
            return Ok(());
        };

        let choices = vec![UnitChoice(UnitSystem::Metric), UnitChoice(UnitSystem::Imperial)];
        let Some(UnitChoice(mut units)) = prompt(Select::new("Units", choices).prompt())? else {
            return Ok(());
        };

        let Ok(report) = query(service, &city).await else {
            continue;
        };

        loop {
            print!("{}", render_report(&report, units));

            let steps = vec![NextStep::SwitchUnits(units.toggled()), NextStep::NewCity, NextStep::Quit];
            match prompt(Select::new("Next", steps).prompt())? {
                Some(NextStep::SwitchUnits(next)) => units = next,
                Some(NextStep::NewCity) => break,
                Some(NextStep::Quit) | None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_units_flag() {
        let cli = Cli::try_parse_from(["weather", "show", "Manila", "--units", "imperial"]).unwrap();
        match cli.command {
            Command::Show { city, units } => {
                assert_eq!(city, "Manila");
                assert_eq!(units, UnitSystem::Imperial);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_defaults_to_metric() {
        let cli = Cli::try_parse_from(["weather", "show", "Oslo"]).unwrap();
        assert!(matches!(cli.command, Command::Show { units: UnitSystem::Metric, .. }));
    }

    #[test]
    fn unknown_units_are_rejected() {
        assert!(Cli::try_parse_from(["weather", "show", "Oslo", "--units", "kelvin"]).is_err());
    }

    #[test]
    fn choice_labels_name_both_units() {
        assert_eq!(UnitChoice(UnitSystem::Metric).to_string(), "Metric (°C, km/h)");
        assert_eq!(UnitChoice(UnitSystem::Imperial).to_string(), "Imperial (°F, mph)");
        assert_eq!(NextStep::SwitchUnits(UnitSystem::Imperial).to_string(), "Show in imperial");
    }

    #[test]
    fn cancelled_prompt_is_not_an_error() {
        let r: anyhow::Result<Option<String>> = prompt(Err(InquireError::OperationCanceled));
        assert!(matches!(r, Ok(None)));
    }
}

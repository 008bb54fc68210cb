mod intent;
mod views;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use weathlytics_core::{AppError, Config, ConfigError};
use weathlytics_weather::{ControllerOptions, OpenWeatherGateway, QueryController};

use crate::intent::Intent;
use crate::views::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    weathlytics_core::init()?;

    let config = load_config();
    let gateway = OpenWeatherGateway::from_config(&config.weather)?;
    let controller = QueryController::with_options(
        gateway,
        ControllerOptions {
            startup_city: config.weather.default_city.clone(),
            history_limit: config.weather.history_limit,
        },
    );
    let mut theme = Theme::from_dark_mode(config.ui.dark_mode);

    tracing::info!("Weathlytics started");

    let mut stdout = tokio::io::stdout();
    write(&mut stdout, &views::banner(theme)).await?;
    write(&mut stdout, &views::help(theme)).await?;

    if controller.start().await {
        write(&mut stdout, &views::render(&controller.snapshot(), theme)).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write(&mut stdout, "> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Intent::parse(&line) {
            Intent::Nothing => {}
            Intent::Quit => break,
            Intent::Help => write(&mut stdout, &views::help(theme)).await?,
            Intent::ToggleTheme => {
                theme = theme.toggled();
                write(&mut stdout, &views::theme_changed(theme)).await?;
            }
            Intent::ShowHistory => {
                let state = controller.snapshot();
                write(&mut stdout, &views::history(&state.history, theme)).await?;
            }
            Intent::Search(text) => {
                if let Some(fetch) = controller.submit_search(&text) {
                    show_status(&mut stdout, &controller, text.trim(), theme).await?;
                    fetch.await;
                    write(&mut stdout, &views::render(&controller.snapshot(), theme)).await?;
                }
            }
            Intent::Refresh => {
                let city = controller
                    .snapshot()
                    .weather
                    .map(|w| w.location_name)
                    .unwrap_or_default();
                match controller.refresh() {
                    Some(fetch) => {
                        show_status(&mut stdout, &controller, &city, theme).await?;
                        fetch.await;
                        write(&mut stdout, &views::render(&controller.snapshot(), theme)).await?;
                    }
                    None => {
                        write(&mut stdout, "Nothing to refresh yet. Search for a city first.\n")
                            .await?
                    }
                }
            }
            Intent::Pick(n) => {
                let entry = controller.snapshot().history.get(n - 1).map(str::to_string);
                match entry {
                    Some(city) => {
                        let fetch = controller.select_history_entry(&city);
                        show_status(&mut stdout, &controller, &city, theme).await?;
                        fetch.await;
                        write(&mut stdout, &views::render(&controller.snapshot(), theme)).await?;
                    }
                    None => write(&mut stdout, &format!("No recent search #{}.\n", n)).await?,
                }
            }
        }
    }

    tracing::info!("Weathlytics exiting");
    Ok(())
}

/// Load the config file and environment overrides, falling back to defaults
/// (plus the environment key) when the file is unusable.
fn load_config() -> Config {
    match Config::load_validated() {
        Ok((config, _)) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            let app_error = match e.downcast::<ConfigError>() {
                Ok(config_error) => AppError::Config(config_error),
                Err(other) => AppError::Other(other),
            };
            eprintln!("{}", app_error.user_message());

            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    }
}

async fn show_status<G: weathlytics_weather::WeatherGateway>(
    stdout: &mut tokio::io::Stdout,
    controller: &QueryController<G>,
    city: &str,
    theme: Theme,
) -> Result<()> {
    if let Some(status) = views::status_line(&controller.snapshot(), city, theme) {
        write(stdout, &format!("{}\n", status)).await?;
    }
    Ok(())
}

async fn write(stdout: &mut tokio::io::Stdout, text: &str) -> Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

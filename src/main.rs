// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, create the API client and hand it
//   to the interactive flow.
// - Returns `anyhow::Result` so request errors surface with their context.

use robotevents_cli::{logger, ui, RobotEventsClient};

fn main() -> anyhow::Result<()> {
    logger::init();

    // Token from `ROBOT_API_KEY` (or ~/.robotevents_token), base URL from
    // `ROBOTEVENTS_BASE_URL`. See `api::RobotEventsClient::from_env`.
    let api = RobotEventsClient::from_env()?;

    ui::run(&api)?;
    Ok(())
}

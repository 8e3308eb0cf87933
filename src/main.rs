mod app;
mod app_state;
mod cli;
mod config;
mod event_handlers;
mod listing_page;
mod logging;
mod rendering;
mod resources;
mod services;

use app::App;
use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = config::resolve(&cli)?;
    logging::init(&config.log_file)?;

    let app = App::new(&config)?;
    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();
    result
}

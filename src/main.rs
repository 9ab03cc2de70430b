use bubbletea_rs::Program;
use show_explorer::app::{self, App, Launch};
use show_explorer::config::Config;
use show_explorer::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("show-explorer: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = logging::default_log_path() {
        logging::init_global(&path);
    }
    tracing::info!(
        base_url = %config.base_url,
        page_size = config.page_size,
        "starting show explorer"
    );

    app::set_launch(Launch::from_config(config));

    let program = Program::<App>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()?;
    program.run().await?;

    tracing::info!("show explorer exited");
    Ok(())
}

use taskdeck::config::{self, AppConfig};
use taskdeck::logging;
use tracing::{error, info};

fn main() {
    config::load_dotenv();
    logging::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration, using defaults: {err:#}");
            AppConfig::default()
        }
    };
    info!(api_url = %config.api_url, chat_url = %config.chat_url, "starting taskdeck");
    config::install(config);

    dioxus::launch(taskdeck::ui::App);
}

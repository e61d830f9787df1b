use anyhow::{Context, Result};

use lazyleaf::app::App;
use lazyleaf::bootstrap::{self, TerminalSession};
use lazyleaf::config::Config;
use lazyleaf::logging;
use lazyleaf::runtime::Runner;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::new();

    let log_path = logging::init_logger(config.log_level).context("Failed to initialize logger")?;
    logging::info(&format!("Starting LazyLeaf (log file {})", log_path.display()));
    bootstrap::install_panic_hook();

    // A site given on the command line wins over the configured one.
    if let Some(source) = std::env::args().nth(1) {
        config.site.source = source;
    }

    let store = bootstrap::build_content_store(&config.site.source)?;
    logging::info(&format!("Reading from {}", store.describe()));
    let state = bootstrap::open_state_store(&Config::state_path());

    let mut session = TerminalSession::new()?;
    let width = session
        .terminal_mut()
        .size()
        .context("Failed to read terminal size")?
        .width;
    let app = App::new(config, store, state, width)?;
    logging::debug("Initialized application");

    let res = Runner::new(session.terminal_mut(), app).run().await;
    drop(session);

    if let Err(err) = res {
        logging::error(&format!("Application error: {}", err));
        return Err(anyhow::anyhow!(err));
    }

    logging::info("Application terminated successfully");
    Ok(())
}

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quarry_wizard::error::{QuarryError, Result};
use quarry_wizard::event::{Event, EventHandler};
use quarry_wizard::wizard::state::{BackingStorageType, DeploymentKind};
use quarry_wizard::wizard::{WizardAction, WizardApp, WizardConfig};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quarry-wizard")]
#[command(author, version, about = "Provisioning wizard for Quarry storage systems")]
struct Args {
    /// Path to wizard config file (default: /etc/quarry/wizard.toml)
    #[arg(long)]
    config: Option<String>,

    /// Walk through the wizard without writing the provisioning request
    #[arg(long)]
    dryrun: bool,

    /// Where to write the provisioning request
    #[arg(long, default_value = "quarry-provision.toml")]
    output: PathBuf,

    /// Preselect the backing storage type (use-existing, local-devices, external)
    #[arg(long)]
    backing_storage: Option<BackingStorageType>,

    /// Preselect the deployment kind (block-and-file, object-only)
    #[arg(long)]
    deployment: Option<DeploymentKind>,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting quarry-wizard");
        }
    }

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    // Initialize terminal
    let mut terminal = setup_terminal()?;

    // Run the wizard
    let result = run_wizard(&mut terminal, &args).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Wizard error: {}", e);
    }

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| QuarryError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| QuarryError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal =
        Terminal::new(backend).map_err(|e| QuarryError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| QuarryError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen)
        .map_err(|e| QuarryError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_wizard(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    args: &Args,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);

    // A missing config file falls back to defaults inside load; a file
    // that exists but does not parse is fatal rather than defaulted.
    let mut config = match args.config.as_deref() {
        Some(path) => WizardConfig::load_from(path)?,
        None => WizardConfig::load()?,
    };

    // --dryrun flag overrides config
    if args.dryrun {
        config.general.dryrun = true;
    }

    let mut app = WizardApp::new(config, args.output.clone());

    // CLI preselections run through the store like any other edit
    if let Some(storage_type) = args.backing_storage {
        app.dispatch(WizardAction::SetBackingStorageType(storage_type));
    }
    if let Some(deployment) = args.deployment {
        app.dispatch(WizardAction::SetDeployment(deployment));
    }

    loop {
        // Draw UI
        terminal
            .draw(|frame| quarry_wizard::wizard::ui::draw(frame, &app))
            .map_err(|e| QuarryError::Terminal(e.to_string()))?;

        // Handle events
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    app.handle_key(key);
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized");
                }
                Event::Tick => {
                    app.tick();
                }
            }
        }

        if app.should_exit {
            break;
        }
    }

    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use splitwm::actor::reactor::{Event, Reactor};
use splitwm::actor::wm_controller::execute_startup_commands;
use splitwm::common::config::{Config, config_file};
use splitwm::common::log;
use splitwm::sys::process::reap_children_automatically;
use splitwm::sys::x11::X11;
use splitwm::ui::status_line::StatusLine;
use tracing::{error, info};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Read the configuration from this file instead of
    /// `$XDG_CONFIG_HOME/splitwm/config.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Check whether the configuration can be loaded without actually
    /// starting the window manager.
    #[arg(long)]
    validate: bool,
}

fn main() -> anyhow::Result<()> {
    let opt: Cli = Parser::parse();

    if std::env::var_os("RUST_BACKTRACE").is_none() {
        // SAFETY: We are single threaded at this point.
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
    log::init_logging();
    install_panic_hook();

    let path = opt.config.unwrap_or_else(config_file);
    let config = if path.exists() {
        Config::read(&path).with_context(|| format!("could not load {}", path.display()))?
    } else {
        info!(path = %path.display(), "no config file, using the defaults");
        Config::default()
    };
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("{issue}");
        }
        bail!("{} has {} problem(s)", path.display(), issues.len());
    }
    if opt.validate {
        info!("configuration is valid");
        return Ok(());
    }
    let config = Arc::new(config);

    reap_children_automatically().context("could not ignore SIGCHLD")?;

    let x11 = X11::connect()?;
    x11.publish_support("splitwm")?;

    let (events_tx, events_rx) = splitwm::actor::channel();
    let pump = x11.event_pump(&config, events_tx.clone())?;
    let backend = x11.backend(&config)?;
    let status = StatusLine::stdout(config.settings.status_line);
    let reactor = Reactor::new(config.clone(), Box::new(backend), status);

    events_tx.send(Event::OutputsChanged(x11.outputs()));
    for window in x11.existing_windows()? {
        events_tx.send(Event::WindowCreated(window));
    }
    drop(events_tx);

    std::thread::Builder::new()
        .name("x11-events".into())
        .spawn(move || pump.run())
        .context("could not start the event thread")?;

    execute_startup_commands(&config.settings.run_on_start);
    reactor.run(events_rx);
    Ok(())
}

#[cfg(panic = "unwind")]
fn install_panic_hook() {
    // Abort on panic instead of leaving the X server with a half-dead manager.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        original_hook(info);
        std::process::abort();
    }));
}

#[cfg(not(panic = "unwind"))]
fn install_panic_hook() {}

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use pinup_engine::device::GpuInit;
use pinup_engine::logging::{LoggingConfig, init_logging};
use pinup_engine::widget::{Widget, WidgetConfig};
use pinup_engine::window::{CancelToken, Runtime, RuntimeConfig};

/// Pin an image to the desktop as a borderless, always-on-top widget.
///
/// Drag to move, scroll to scale, drop a file to swap the image, Escape to close.
#[derive(Debug, Parser)]
#[command(name = "pinup", version, about)]
struct Cli {
    /// Image to show; the built-in image is used when omitted or unreadable.
    image: Option<PathBuf>,

    /// Log filter in env_logger syntax, e.g. "debug" or "pinup_engine=trace".
    #[arg(long, env = "PINUP_LOG")]
    log: Option<String>,
}

fn run(cli: Cli) -> Result<()> {
    let runtime = Runtime::new(RuntimeConfig::default(), GpuInit::default())?;

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        let waker = runtime.waker();
        ctrlc::set_handler(move || {
            cancel.cancel();
            waker.wake();
        })
        .context("failed to install Ctrl-C handler")?;
    }

    let widget = Widget::new(WidgetConfig {
        image: cli.image,
        ..WidgetConfig::default()
    });
    runtime.run(widget, cancel)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

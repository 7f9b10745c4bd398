//! `grepcore`: a parallel, streaming grep replacement.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use grepcore::cli::Cli;
use grepcore::error::GrepError;
use grepcore::{engine, format};
use tokio::sync::watch;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse_args();
    let options = match cli.into_option_context() {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("grepcore: {msg}");
            return ExitCode::from(format::EXIT_FATAL as u8);
        }
    };

    match run(options) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("grepcore: {e:#}");
            ExitCode::from(format::EXIT_FATAL as u8)
        }
    }
}

/// Build the runtime, drive the engine to completion, and render the result.
/// Both fallible steps are routed through `GrepError::Fatal` (§3 **[ADDED]**,
/// §7's "any other unexpected failure in the engine aggregates to exit 2")
/// before `anyhow::Context` adds the human-facing message.
fn run(options: grepcore::OptionContext) -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| GrepError::Fatal(e.to_string()))
        .context("failed to start the async runtime")?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let interrupted = runtime.block_on(install_interrupt_handler(cancel_tx));

    let result = runtime.block_on(engine::run(Arc::new(options.clone()), cancel_rx));

    let mut stdout = std::io::stdout().lock();
    let code = format::render(&mut stdout, &result, &options)
        .map_err(|e| GrepError::Fatal(e.to_string()))
        .context("failed to write output")?;

    Ok(if interrupted.load(Ordering::SeqCst) {
        format::EXIT_CANCELLED
    } else {
        code
    })
}

/// Install a `Ctrl-C` handler that flips the engine's cancellation channel
/// and records that an interrupt occurred, so the exit code can be forced to
/// 130 even though the engine itself returns a normal `SearchResult` on
/// cancellation (§6, §7).
async fn install_interrupt_handler(cancel_tx: watch::Sender<bool>) -> Arc<AtomicBool> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
            let _ = cancel_tx.send(true);
        }
    });
    interrupted
}

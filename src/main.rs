//! Application entry point — Sign Bridge console session.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the HTTP remote client and ping the service once.
//! 5. Create the shared session, the frame mailbox and the command channel.
//! 6. Spawn the dispatch loop on the tokio runtime.
//! 7. Spawn the console reader thread over stdin.
//! 8. Run the control loop until stdin closes.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use sign_bridge::{
    config::AppConfig,
    console::{run_control, status_report, Command, ConsoleReader, Printer},
    dispatch::{frame_mailbox, DispatchLoop},
    remote::{HttpRemoteClient, RemoteClient},
    session::{lock_state, new_shared_state},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sign Bridge starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads: dispatch and control)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Remote client + startup ping
    let http = HttpRemoteClient::from_config(&config.remote);
    match rt.block_on(http.ping()) {
        Ok(greeting) => log::info!(
            "remote: {} reachable: {}",
            config.remote.base_url,
            greeting.trim()
        ),
        Err(e) => log::warn!(
            "remote: {} not reachable ({e}); continuing, requests will fail until it is up",
            config.remote.base_url
        ),
    }
    let remote: Arc<dyn RemoteClient> = Arc::new(http);

    // 5. Session, frame mailbox (newest frame wins) and command channel
    let state = new_shared_state();
    let (frame_tx, frame_rx) = frame_mailbox();
    let (command_tx, command_rx) = mpsc::channel::<Command>(16);

    // 6. Dispatch loop
    let dispatcher = DispatchLoop::new(state.clone(), Arc::clone(&remote), &config.dispatch);
    let dispatch_handle = rt.spawn(dispatcher.run(frame_rx));

    // 7. Console reader thread
    let stdin = std::io::BufReader::new(std::io::stdin());
    let _reader = ConsoleReader::start(stdin, frame_tx, command_tx)
        .context("failed to spawn console-reader thread")?;

    // 8. Control loop (returns once stdin is closed)
    println!("{}", status_report(&lock_state(&state)));
    let printer: Printer = Arc::new(|line: String| println!("{line}"));
    rt.block_on(async {
        run_control(state, remote, command_rx, printer).await;
        if let Err(e) = dispatch_handle.await {
            log::error!("dispatch: task failed: {e}");
        }
    });

    log::info!("Sign Bridge shut down");
    Ok(())
}

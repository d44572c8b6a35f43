//! Control loop: applies console commands to the session and reports what a
//! GUI would show.
//!
//! Output goes through a [`Printer`] so the binary can print to stdout while
//! tests collect the lines.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::remote::RemoteClient;
use crate::session::{
    apply_intent, begin_training, finish_training, lock_state, Intent, IntentOutcome,
    SessionState, SharedState,
};

use super::Command;

/// Sink for the lines the control loop reports.
pub type Printer = Arc<dyn Fn(String) + Send + Sync>;

/// Two-line summary of the session: mode, status and fields, then the
/// camera overlay caption.
pub fn status_report(st: &SessionState) -> String {
    format!(
        "[{}] {} | label: {:?} | samples: {} | prediction: {} | sentence: {:?}\n  {}",
        st.mode(),
        st.status(),
        st.label(),
        st.sample_count(),
        st.prediction_text(),
        st.sentence(),
        st.overlay_text()
    )
}

fn report(state: &SharedState, print: &Printer) {
    let line = status_report(&lock_state(state));
    print(line);
}

/// Apply commands until every sender of `command_rx` is dropped, then wait
/// for any training still in flight.
///
/// Training runs as its own task so other commands keep working while the
/// remote model is rebuilt.  The in-flight status is set before the task is
/// spawned, so the report printed for `/train` already shows it.
pub async fn run_control(
    state: SharedState,
    remote: Arc<dyn RemoteClient>,
    mut command_rx: mpsc::Receiver<Command>,
    print: Printer,
) {
    let mut training = JoinSet::new();

    while let Some(command) = command_rx.recv().await {
        match command {
            Command::Status => report(&state, &print),

            Command::Intent(Intent::Train) => {
                begin_training(&state);
                report(&state, &print);

                let task_state = state.clone();
                let task_remote = Arc::clone(&remote);
                let task_print = Arc::clone(&print);
                training.spawn(async move {
                    finish_training(&task_state, task_remote.as_ref()).await;
                    report(&task_state, &task_print);
                });
            }

            Command::Intent(intent) => {
                match apply_intent(&state, remote.as_ref(), intent).await {
                    Ok(IntentOutcome::Speak(text)) => print(format!("speak: {text}")),
                    Ok(_) => report(&state, &print),
                    Err(e) => log::warn!("session: {e}"),
                }
            }
        }
    }

    while let Some(result) = training.join_next().await {
        if let Err(e) = result {
            log::error!("session: training task failed: {e}");
        }
    }
    log::debug!("console: command channel closed, control loop done");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use colored::*;
use dialr_common::config::Config;
use dialr_common::dial::request::{Credentials, DialRequest};
use dialr_common::dial::state::DialState;
use dialr_common::{error, success, warn};
use dialr_core::context::TokioContext;
use dialr_core::dialer::{DialCompletion, Dialer};
use dialr_core::enumerate;

use crate::backend;
use crate::terminal::{print, spinner};

pub async fn dial(
    entry: String,
    user: String,
    password: String,
    timeout: Option<u64>,
    phonebook: Option<PathBuf>,
    cfg: &Config,
) -> anyhow::Result<()> {
    let api = backend::backend();
    let context = Arc::new(TokioContext::current());
    let dialer = Dialer::new(api.clone(), context);

    let pb = spinner::start_dial_spinner();
    pb.set_message(format!("Dialing {entry}..."));

    let phase_pb = pb.clone();
    dialer.on_state_changed(move |state| {
        if let DialState::Dialing(phase) = state {
            phase_pb.set_message(format!("{phase}..."));
        }
    });

    let (tx, rx) = mpsc::channel();
    dialer.on_completed(move |completion| {
        let _ = tx.send(completion);
    });

    let mut request = DialRequest::new(entry, Credentials::new(user, password));
    if let Some(secs) = timeout {
        request = request.with_timeout(Duration::from_secs(secs));
    }
    if let Some(path) = phonebook {
        request = request.with_phonebook(path);
    }

    let started = Instant::now();
    let pending = dialer.start(request)?;
    tracing::debug!(handle = %pending, "attempt handle allocated");

    // The completion handler runs on this runtime; receive on a blocking
    // thread so the consumer task is never starved.
    let completion = tokio::task::spawn_blocking(move || rx.recv()).await??;
    pb.finish_and_clear();

    match completion {
        DialCompletion::Connected(handle) => {
            let elapsed: ColoredString =
                format!("{:.2}s", started.elapsed().as_secs_f64()).bold().yellow();
            success!("Connected in {elapsed}");
            if let Some(connection) = enumerate::find_connection(api.as_ref(), handle.raw())? {
                let address: ColoredString = match connection.client_address {
                    Some(addr) => addr.to_string().normal(),
                    None => "none".dimmed(),
                };
                print::as_tree_one_level(vec![
                    ("Entry".to_string(), connection.entry_name.normal()),
                    ("Device".to_string(), connection.device_name.normal()),
                    ("Handle".to_string(), connection.handle.to_string().cyan()),
                    ("Address".to_string(), address),
                ]);
            }
            // One process, one demo attempt: tear the link down before exit.
            handle.hangup()?;
            print::print_status("Connection closed");
        }
        DialCompletion::Cancelled => warn!("Dial attempt cancelled"),
        DialCompletion::TimedOut => warn!("Dial attempt timed out"),
        DialCompletion::Failed(reason) => error!("Dial attempt failed: {reason}"),
    }

    if cfg.quiet == 0 {
        print::fat_separator();
    }
    Ok(())
}

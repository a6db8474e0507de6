//! Job controller.
//!
//! Receives commands from the UI thread, spawns the matching HTTP work and emits events
//! for presentation layers. It never touches form state itself.

use crate::client::{ImageHost, ListingApi};
use crate::error::{ApiError, FormError};
use crate::form;
use crate::model::{CreateListingRequest, CreateListingResponse};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers. The UI has already run the matching `begin_*` step.
#[derive(Debug)]
pub(crate) enum UiCommand {
    Upload(Vec<PathBuf>),
    Submit(Box<CreateListingRequest>),
    Quit,
}

/// Completions sent back to the owner of the form state.
#[derive(Debug)]
pub(crate) enum FormEvent {
    UploadFinished(Result<Vec<String>, FormError>),
    SubmitFinished(Result<CreateListingResponse, ApiError>),
}

/// Dispatch jobs until the UI quits or hangs up.
///
/// Jobs run as independent tasks so a slow batch never delays the next command. Nothing
/// stops a second upload from starting while one is in flight; the UI disables the trigger.
pub(crate) async fn run_controller<H: ImageHost, A: ListingApi>(
    host: Arc<H>,
    api: Arc<A>,
    event_tx: UnboundedSender<FormEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            UiCommand::Upload(paths) => {
                tracing::debug!(files = paths.len(), "dispatching upload batch");
                let host = host.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    let result = form::upload_paths(host.as_ref(), paths).await;
                    let _ = tx.send(FormEvent::UploadFinished(result));
                });
            }
            UiCommand::Submit(req) => {
                tracing::debug!("dispatching listing submission");
                let api = api.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    let result = api.create(&req).await;
                    let _ = tx.send(FormEvent::SubmitFinished(result));
                });
            }
            UiCommand::Quit => break,
        }
    }
}

//! External handoff backend.
//!
//! Not truly "played" by this process: `start` opens the reference with
//! the system's default viewer for its inferred MIME type and immediately
//! reports a terminal `Delegated` status. Pause, resume, and stop are
//! no-ops by contract — once handed off, playback is outside this
//! process's control. That reduced-control mode is a documented
//! limitation, not an error.

use crate::backend::{BackendKind, BackendStatus, PlaybackBackend};
use crate::error::BackendError;
use crate::mime::infer_mime;
use crate::source::SourceReference;
use async_trait::async_trait;
use bridge_traits::ExternalViewer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Backend delegating playback to an external system viewer.
pub struct ExternalHandoffBackend {
    viewer: Arc<dyn ExternalViewer>,
    status_tx: Option<mpsc::Sender<BackendStatus>>,
    status_rx: Option<mpsc::Receiver<BackendStatus>>,
}

impl ExternalHandoffBackend {
    pub fn new(viewer: Arc<dyn ExternalViewer>, status_capacity: usize) -> Self {
        let (status_tx, status_rx) = mpsc::channel(status_capacity);
        Self {
            viewer,
            status_tx: Some(status_tx),
            status_rx: Some(status_rx),
        }
    }
}

#[async_trait]
impl PlaybackBackend for ExternalHandoffBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ExternalHandoff
    }

    async fn start(&mut self, reference: &SourceReference) -> Result<(), BackendError> {
        let mime = infer_mime(reference);
        self.viewer
            .open_with(reference.raw(), mime)
            .await
            .map_err(|e| BackendError::StartFailed(e.to_string()))?;

        info!(%reference, mime, "Delegated playback to system viewer");

        if let Some(tx) = &self.status_tx {
            // Best effort: the session may already have taken and dropped
            // the receiver.
            tx.try_send(BackendStatus::Delegated).ok();
        }
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), BackendError> {
        // No-op: the external player is not controllable from here.
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), BackendError> {
        // No-op: the external player is not controllable from here.
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), BackendError> {
        // No-op: the external player is not controllable from here.
        Ok(())
    }

    async fn release(&mut self) {
        // No owned platform resource; just close the status channel.
        self.status_tx = None;
    }

    fn take_status_receiver(&mut self) -> Option<mpsc::Receiver<BackendStatus>> {
        self.status_rx.take()
    }
}

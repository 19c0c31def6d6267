//! Native media backend.
//!
//! Wraps the platform native-decoder handle behind the common backend
//! interface. Engine status values map onto [`BackendStatus`] one-to-one;
//! engine errors are translated into [`BackendError`] before they reach
//! the session.

use crate::backend::{BackendKind, BackendStatus, PlaybackBackend};
use crate::error::BackendError;
use crate::source::SourceReference;
use async_trait::async_trait;
use bridge_traits::{NativeMediaEngine, NativeMediaHandle, NativeMediaStatus};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Backend driving the platform's native decoder.
pub struct NativeMediaBackend {
    engine: Arc<dyn NativeMediaEngine>,
    handle: Option<Box<dyn NativeMediaHandle>>,
    status_tx: Option<mpsc::Sender<BackendStatus>>,
    status_rx: Option<mpsc::Receiver<BackendStatus>>,
    forward_task: Option<JoinHandle<()>>,
    released: bool,
}

impl NativeMediaBackend {
    pub fn new(engine: Arc<dyn NativeMediaEngine>, status_capacity: usize) -> Self {
        let (status_tx, status_rx) = mpsc::channel(status_capacity);
        Self {
            engine,
            handle: None,
            status_tx: Some(status_tx),
            status_rx: Some(status_rx),
            forward_task: None,
            released: false,
        }
    }

    fn translate(status: NativeMediaStatus) -> Option<BackendStatus> {
        match status {
            NativeMediaStatus::Idle => None,
            NativeMediaStatus::Starting => Some(BackendStatus::Starting),
            NativeMediaStatus::Running => Some(BackendStatus::Running),
            NativeMediaStatus::Paused => Some(BackendStatus::Paused),
            NativeMediaStatus::Stopped => Some(BackendStatus::Stopped),
            NativeMediaStatus::Completed => Some(BackendStatus::Completed),
            NativeMediaStatus::Error { message } => {
                Some(BackendStatus::Failed(BackendError::Device(message)))
            }
        }
    }
}

#[async_trait]
impl PlaybackBackend for NativeMediaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::NativeMedia
    }

    async fn start(&mut self, reference: &SourceReference) -> Result<(), BackendError> {
        if self.released {
            return Err(BackendError::Released);
        }

        let mut handle = self
            .engine
            .create(reference.raw())
            .await
            .map_err(|e| BackendError::StartFailed(e.to_string()))?;

        // Relay engine statuses into the common channel until a terminal
        // one arrives or the reader goes away.
        if let (Some(engine_rx), Some(tx)) =
            (handle.take_status_receiver(), self.status_tx.clone())
        {
            let mut engine_rx = engine_rx;
            self.forward_task = Some(tokio::spawn(async move {
                while let Some(status) = engine_rx.recv().await {
                    let Some(translated) = Self::translate(status) else {
                        continue;
                    };
                    let terminal = translated.is_terminal();
                    if tx.send(translated).await.is_err() {
                        break;
                    }
                    if terminal {
                        break;
                    }
                }
            }));
        } else {
            warn!("Native media handle provided no status channel");
        }

        if let Err(e) = handle.play().await {
            // The handle never became ours to keep; free it here.
            handle.release().await;
            return Err(BackendError::StartFailed(e.to_string()));
        }

        self.handle = Some(handle);
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), BackendError> {
        let handle = self.handle.as_mut().ok_or(BackendError::Released)?;
        handle
            .pause()
            .await
            .map_err(|e| BackendError::Device(e.to_string()))
    }

    async fn resume(&mut self) -> Result<(), BackendError> {
        let handle = self.handle.as_mut().ok_or(BackendError::Released)?;
        handle
            .resume()
            .await
            .map_err(|e| BackendError::Device(e.to_string()))
    }

    async fn stop(&mut self) -> Result<(), BackendError> {
        let handle = self.handle.as_mut().ok_or(BackendError::Released)?;
        handle
            .stop()
            .await
            .map_err(|e| BackendError::Device(e.to_string()))
    }

    async fn release(&mut self) {
        self.released = true;
        if let Some(task) = self.forward_task.take() {
            task.abort();
        }
        if let Some(mut handle) = self.handle.take() {
            debug!("Releasing native media handle");
            handle.release().await;
        }
        self.status_tx = None;
    }

    fn take_status_receiver(&mut self) -> Option<mpsc::Receiver<BackendStatus>> {
        self.status_rx.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use parking_lot::Mutex;

    /// Scripted engine handle driven by a pre-seeded status sequence.
    struct FakeHandle {
        statuses: Vec<NativeMediaStatus>,
        play_result: BridgeResult<()>,
        released: Arc<Mutex<u32>>,
        rx_taken: bool,
    }

    #[async_trait]
    impl NativeMediaHandle for FakeHandle {
        async fn play(&mut self) -> BridgeResult<()> {
            match &self.play_result {
                Ok(()) => Ok(()),
                Err(_) => Err(BridgeError::OperationFailed("engine start refused".into())),
            }
        }

        async fn pause(&mut self) -> BridgeResult<()> {
            Ok(())
        }

        async fn resume(&mut self) -> BridgeResult<()> {
            Ok(())
        }

        async fn stop(&mut self) -> BridgeResult<()> {
            Ok(())
        }

        async fn release(&mut self) {
            *self.released.lock() += 1;
        }

        fn take_status_receiver(&mut self) -> Option<mpsc::Receiver<NativeMediaStatus>> {
            if self.rx_taken {
                return None;
            }
            self.rx_taken = true;
            let (tx, rx) = mpsc::channel(8);
            for status in self.statuses.drain(..) {
                tx.try_send(status).unwrap();
            }
            // Sender drops here; the relay sees end-of-stream afterwards.
            Some(rx)
        }
    }

    struct FakeEngine {
        statuses: Vec<NativeMediaStatus>,
        play_fails: bool,
        released: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl NativeMediaEngine for FakeEngine {
        async fn create(&self, _uri: &str) -> BridgeResult<Box<dyn NativeMediaHandle>> {
            Ok(Box::new(FakeHandle {
                statuses: self.statuses.clone(),
                play_result: if self.play_fails {
                    Err(BridgeError::OperationFailed("refused".into()))
                } else {
                    Ok(())
                },
                released: self.released.clone(),
                rx_taken: false,
            }))
        }
    }

    fn reference() -> SourceReference {
        SourceReference::new("/music/track.mp3")
    }

    #[tokio::test]
    async fn start_relays_terminal_completion() {
        let released = Arc::new(Mutex::new(0));
        let engine = Arc::new(FakeEngine {
            statuses: vec![
                NativeMediaStatus::Starting,
                NativeMediaStatus::Running,
                NativeMediaStatus::Completed,
            ],
            play_fails: false,
            released: released.clone(),
        });

        let mut backend = NativeMediaBackend::new(engine, 8);
        let mut rx = backend.take_status_receiver().unwrap();

        backend.start(&reference()).await.unwrap();

        assert_eq!(rx.recv().await, Some(BackendStatus::Starting));
        assert_eq!(rx.recv().await, Some(BackendStatus::Running));
        assert_eq!(rx.recv().await, Some(BackendStatus::Completed));

        backend.release().await;
        assert_eq!(*released.lock(), 1);
    }

    #[tokio::test]
    async fn engine_error_is_translated() {
        let engine = Arc::new(FakeEngine {
            statuses: vec![NativeMediaStatus::Error {
                message: "codec blew up".into(),
            }],
            play_fails: false,
            released: Arc::new(Mutex::new(0)),
        });

        let mut backend = NativeMediaBackend::new(engine, 8);
        let mut rx = backend.take_status_receiver().unwrap();
        backend.start(&reference()).await.unwrap();

        match rx.recv().await {
            Some(BackendStatus::Failed(BackendError::Device(message))) => {
                assert!(message.contains("codec blew up"));
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_play_surfaces_as_start_failure() {
        let engine = Arc::new(FakeEngine {
            statuses: vec![],
            play_fails: true,
            released: Arc::new(Mutex::new(0)),
        });

        let mut backend = NativeMediaBackend::new(engine, 8);
        let err = backend.start(&reference()).await.unwrap_err();
        assert!(matches!(err, BackendError::StartFailed(_)));
    }

    #[tokio::test]
    async fn release_is_idempotent_and_blocks_controls() {
        let released = Arc::new(Mutex::new(0));
        let engine = Arc::new(FakeEngine {
            statuses: vec![NativeMediaStatus::Running],
            play_fails: false,
            released: released.clone(),
        });

        let mut backend = NativeMediaBackend::new(engine, 8);
        backend.start(&reference()).await.unwrap();

        backend.release().await;
        backend.release().await;
        assert_eq!(*released.lock(), 1);

        assert!(matches!(backend.pause().await, Err(BackendError::Released)));
        assert!(matches!(
            backend.start(&reference()).await,
            Err(BackendError::Released)
        ));
    }
}

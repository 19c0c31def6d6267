//! Streaming backend.
//!
//! Wraps a standard streaming audio element. Element failures arrive as
//! platform error codes and are always translated into the common
//! [`BackendError`] shape before they reach the session; a raw platform
//! error object never crosses this boundary.

use crate::backend::{BackendKind, BackendStatus, PlaybackBackend};
use crate::error::BackendError;
use crate::source::SourceReference;
use async_trait::async_trait;
use bridge_traits::{StreamingElement, StreamingErrorCode, StreamingEvent, StreamingHandle};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Backend driving a streaming audio element.
pub struct StreamingBackend {
    element: Arc<dyn StreamingElement>,
    handle: Option<Box<dyn StreamingHandle>>,
    status_tx: Option<mpsc::Sender<BackendStatus>>,
    status_rx: Option<mpsc::Receiver<BackendStatus>>,
    forward_task: Option<JoinHandle<()>>,
    released: bool,
}

impl StreamingBackend {
    pub fn new(element: Arc<dyn StreamingElement>, status_capacity: usize) -> Self {
        let (status_tx, status_rx) = mpsc::channel(status_capacity);
        Self {
            element,
            handle: None,
            status_tx: Some(status_tx),
            status_rx: Some(status_rx),
            forward_task: None,
            released: false,
        }
    }

    /// Translate an element error into the common backend error shape.
    fn translate_error(code: StreamingErrorCode, message: String) -> BackendError {
        match code {
            StreamingErrorCode::Aborted => {
                BackendError::Device(format!("playback aborted: {message}"))
            }
            StreamingErrorCode::Network => BackendError::Network(message),
            StreamingErrorCode::Decode => BackendError::Decode(message),
            StreamingErrorCode::SrcNotSupported => BackendError::Unsupported(message),
        }
    }

    fn translate(event: StreamingEvent) -> BackendStatus {
        match event {
            StreamingEvent::Playing => BackendStatus::Running,
            StreamingEvent::Ended => BackendStatus::Completed,
            StreamingEvent::Error { code, message } => {
                BackendStatus::Failed(Self::translate_error(code, message))
            }
        }
    }
}

#[async_trait]
impl PlaybackBackend for StreamingBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Streaming
    }

    async fn start(&mut self, reference: &SourceReference) -> Result<(), BackendError> {
        if self.released {
            return Err(BackendError::Released);
        }

        let mut handle = self
            .element
            .open(reference.raw())
            .await
            .map_err(|e| BackendError::StartFailed(e.to_string()))?;

        if let (Some(event_rx), Some(tx)) = (handle.take_event_receiver(), self.status_tx.clone())
        {
            let mut event_rx = event_rx;
            self.forward_task = Some(tokio::spawn(async move {
                while let Some(event) = event_rx.recv().await {
                    let status = Self::translate(event);
                    let terminal = status.is_terminal();
                    if tx.send(status).await.is_err() {
                        break;
                    }
                    if terminal {
                        break;
                    }
                }
            }));
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
            .play()
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
            debug!("Releasing streaming element");
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

    struct FakeStreamingHandle {
        events: Vec<StreamingEvent>,
        play_fails: bool,
        released: Arc<Mutex<u32>>,
        rx_taken: bool,
    }

    #[async_trait]
    impl StreamingHandle for FakeStreamingHandle {
        async fn play(&mut self) -> BridgeResult<()> {
            if self.play_fails {
                Err(BridgeError::OperationFailed("autoplay blocked".into()))
            } else {
                Ok(())
            }
        }

        async fn pause(&mut self) -> BridgeResult<()> {
            Ok(())
        }

        async fn stop(&mut self) -> BridgeResult<()> {
            Ok(())
        }

        async fn release(&mut self) {
            *self.released.lock() += 1;
        }

        fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<StreamingEvent>> {
            if self.rx_taken {
                return None;
            }
            self.rx_taken = true;
            let (tx, rx) = mpsc::channel(8);
            for event in self.events.drain(..) {
                tx.try_send(event).unwrap();
            }
            Some(rx)
        }
    }

    struct FakeElement {
        events: Vec<StreamingEvent>,
        play_fails: bool,
        released: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl StreamingElement for FakeElement {
        async fn open(&self, _url: &str) -> BridgeResult<Box<dyn StreamingHandle>> {
            Ok(Box::new(FakeStreamingHandle {
                events: self.events.clone(),
                play_fails: self.play_fails,
                released: self.released.clone(),
                rx_taken: false,
            }))
        }
    }

    fn reference() -> SourceReference {
        SourceReference::new("https://cdn.example.com/preview.mp3")
    }

    #[tokio::test]
    async fn ended_event_becomes_completed() {
        let element = Arc::new(FakeElement {
            events: vec![StreamingEvent::Playing, StreamingEvent::Ended],
            play_fails: false,
            released: Arc::new(Mutex::new(0)),
        });

        let mut backend = StreamingBackend::new(element, 8);
        let mut rx = backend.take_status_receiver().unwrap();
        backend.start(&reference()).await.unwrap();

        assert_eq!(rx.recv().await, Some(BackendStatus::Running));
        assert_eq!(rx.recv().await, Some(BackendStatus::Completed));
    }

    #[tokio::test]
    async fn error_codes_are_translated_not_raw() {
        let element = Arc::new(FakeElement {
            events: vec![StreamingEvent::Error {
                code: StreamingErrorCode::Decode,
                message: "bad frame".into(),
            }],
            play_fails: false,
            released: Arc::new(Mutex::new(0)),
        });

        let mut backend = StreamingBackend::new(element, 8);
        let mut rx = backend.take_status_receiver().unwrap();
        backend.start(&reference()).await.unwrap();

        match rx.recv().await {
            Some(BackendStatus::Failed(BackendError::Decode(message))) => {
                assert_eq!(message, "bad frame");
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn translation_table() {
        assert!(matches!(
            StreamingBackend::translate_error(StreamingErrorCode::Network, "down".into()),
            BackendError::Network(_)
        ));
        assert!(matches!(
            StreamingBackend::translate_error(StreamingErrorCode::SrcNotSupported, "m3u".into()),
            BackendError::Unsupported(_)
        ));
        assert!(matches!(
            StreamingBackend::translate_error(StreamingErrorCode::Aborted, "user".into()),
            BackendError::Device(_)
        ));
    }

    #[tokio::test]
    async fn failed_play_is_a_start_failure_and_release_is_idempotent() {
        let released = Arc::new(Mutex::new(0));
        let element = Arc::new(FakeElement {
            events: vec![],
            play_fails: true,
            released: released.clone(),
        });

        let mut backend = StreamingBackend::new(element, 8);
        let err = backend.start(&reference()).await.unwrap_err();
        assert!(matches!(err, BackendError::StartFailed(_)));
        // The handle was freed during the failed start.
        assert_eq!(*released.lock(), 1);

        backend.release().await;
        backend.release().await;
        assert_eq!(*released.lock(), 1);
    }
}

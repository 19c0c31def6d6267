//! Shared test doubles for session scenario tests: a scripted backend
//! factory with an event log, fake permission/content/viewer bridges, and
//! an in-memory filesystem.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::storage::FileMetadata;
use bridge_traits::{ContentResolver, ExternalViewer, FileSystemAccess, PermissionBridge, PermissionId};
use bytes::Bytes;
use core_playback::{
    BackendError, BackendFactory, BackendKind, BackendStatus, PlaybackBackend, SourceReference,
};
use core_runtime::events::{CoreEvent, Receiver, SessionPhase};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Ordered log of factory/backend operations, e.g. `start:native_media`.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn log_entries(log: &EventLog) -> Vec<String> {
    log.lock().clone()
}

/// Behavior of one backend instance produced by the scripted factory.
pub struct InstanceScript {
    pub start_result: Result<(), BackendError>,
    /// Statuses queued onto the channel once `start` succeeds.
    pub statuses: Vec<BackendStatus>,
    /// Artificial delay before `start` completes.
    pub start_delay: Option<Duration>,
}

impl InstanceScript {
    pub fn starts_ok() -> Self {
        Self {
            start_result: Ok(()),
            statuses: Vec::new(),
            start_delay: None,
        }
    }

    pub fn fails_to_start(message: &str) -> Self {
        Self {
            start_result: Err(BackendError::StartFailed(message.to_string())),
            statuses: Vec::new(),
            start_delay: None,
        }
    }

    pub fn with_statuses(mut self, statuses: Vec<BackendStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = Some(delay);
        self
    }
}

/// Factory producing scripted backends and recording every operation.
pub struct ScriptedFactory {
    scripts: Mutex<HashMap<BackendKind, VecDeque<InstanceScript>>>,
    pub log: EventLog,
}

impl ScriptedFactory {
    pub fn new(log: EventLog) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            log,
        }
    }

    /// Queue a script for the next created instance of `kind`.
    pub fn script(&self, kind: BackendKind, script: InstanceScript) {
        self.scripts.lock().entry(kind).or_default().push_back(script);
    }
}

impl BackendFactory for ScriptedFactory {
    fn create(&self, kind: BackendKind) -> Box<dyn PlaybackBackend> {
        self.log.lock().push(format!("create:{kind}"));
        let script = self
            .scripts
            .lock()
            .get_mut(&kind)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(InstanceScript::starts_ok);
        Box::new(ScriptedBackend::new(kind, script, self.log.clone()))
    }
}

/// A backend whose behavior is fully scripted.
pub struct ScriptedBackend {
    kind: BackendKind,
    script: InstanceScript,
    log: EventLog,
    status_tx: Option<mpsc::Sender<BackendStatus>>,
    status_rx: Option<mpsc::Receiver<BackendStatus>>,
    released: bool,
}

impl ScriptedBackend {
    fn new(kind: BackendKind, script: InstanceScript, log: EventLog) -> Self {
        let (status_tx, status_rx) = mpsc::channel(16);
        Self {
            kind,
            script,
            log,
            status_tx: Some(status_tx),
            status_rx: Some(status_rx),
            released: false,
        }
    }
}

#[async_trait]
impl PlaybackBackend for ScriptedBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn start(&mut self, _reference: &SourceReference) -> Result<(), BackendError> {
        self.log.lock().push(format!("start:{}", self.kind));
        if let Some(delay) = self.script.start_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.script.start_result {
            Ok(()) => {
                if let Some(tx) = &self.status_tx {
                    for status in self.script.statuses.drain(..) {
                        tx.try_send(status).unwrap();
                    }
                }
                Ok(())
            }
            Err(e) => Err(e.clone()),
        }
    }

    async fn pause(&mut self) -> Result<(), BackendError> {
        self.log.lock().push(format!("pause:{}", self.kind));
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), BackendError> {
        self.log.lock().push(format!("resume:{}", self.kind));
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), BackendError> {
        self.log.lock().push(format!("stop:{}", self.kind));
        Ok(())
    }

    async fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.log.lock().push(format!("release:{}", self.kind));
        self.status_tx = None;
    }

    fn take_status_receiver(&mut self) -> Option<mpsc::Receiver<BackendStatus>> {
        self.status_rx.take()
    }
}

/// Permission bridge answering every check and request with a fixed value.
pub struct FakePermissions {
    pub granted: bool,
}

#[async_trait]
impl PermissionBridge for FakePermissions {
    async fn check_permission(&self, _id: PermissionId) -> BridgeResult<bool> {
        Ok(self.granted)
    }

    async fn request_permission(&self, _id: PermissionId) -> BridgeResult<bool> {
        Ok(self.granted)
    }

    fn platform_release(&self) -> Option<String> {
        Some("13".to_string())
    }
}

/// Content resolver with configurable outcomes and a call log.
pub struct FakeContent {
    pub native_path: Option<PathBuf>,
    pub read_result: Option<Bytes>,
    pub calls: EventLog,
}

impl FakeContent {
    pub fn unresolvable(calls: EventLog) -> Self {
        Self {
            native_path: None,
            read_result: None,
            calls,
        }
    }
}

#[async_trait]
impl ContentResolver for FakeContent {
    async fn resolve_native_path(&self, _handle: &str) -> BridgeResult<PathBuf> {
        self.calls.lock().push("resolve_native_path".to_string());
        match &self.native_path {
            Some(path) => Ok(path.clone()),
            None => Err(BridgeError::NotAvailable("no native mapping".into())),
        }
    }

    async fn read_all(&self, _handle: &str) -> BridgeResult<Bytes> {
        self.calls.lock().push("read_all".to_string());
        match &self.read_result {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(BridgeError::OperationFailed("content read denied".into())),
        }
    }
}

/// External viewer with a configurable outcome and a call log.
pub struct FakeViewer {
    pub succeeds: bool,
    pub calls: EventLog,
}

#[async_trait]
impl ExternalViewer for FakeViewer {
    async fn open_with(&self, target: &str, mime_type: &str) -> BridgeResult<()> {
        self.calls
            .lock()
            .push(format!("open_with:{target}:{mime_type}"));
        if self.succeeds {
            Ok(())
        } else {
            Err(BridgeError::OperationFailed("no viewer registered".into()))
        }
    }
}

/// In-memory filesystem rooted at `/cache`.
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, Bytes>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn seed(&self, path: &str, data: &[u8]) {
        self.files
            .lock()
            .insert(PathBuf::from(path), Bytes::copy_from_slice(data));
    }

    /// Names of files under the cache dir matching a prefix.
    pub fn files_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .keys()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl FileSystemAccess for MemoryFileSystem {
    async fn get_cache_directory(&self) -> BridgeResult<PathBuf> {
        Ok(PathBuf::from("/cache"))
    }

    async fn exists(&self, path: &Path) -> BridgeResult<bool> {
        Ok(self.files.lock().contains_key(path))
    }

    async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata> {
        let files = self.files.lock();
        let data = files
            .get(path)
            .ok_or_else(|| BridgeError::OperationFailed("not found".into()))?;
        Ok(FileMetadata {
            size: data.len() as u64,
            created_at: Some(0),
            modified_at: Some(0),
            is_directory: false,
        })
    }

    async fn create_dir_all(&self, _path: &Path) -> BridgeResult<()> {
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> BridgeResult<Bytes> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| BridgeError::OperationFailed("not found".into()))
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> BridgeResult<()> {
        self.files.lock().insert(path.to_path_buf(), data);
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> BridgeResult<()> {
        let mut files = self.files.lock();
        let data = files
            .remove(from)
            .ok_or_else(|| BridgeError::OperationFailed("rename source missing".into()))?;
        files.insert(to.to_path_buf(), data);
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> BridgeResult<()> {
        self.files
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| BridgeError::OperationFailed("already deleted".into()))
    }

    async fn list_directory(&self, _path: &Path) -> BridgeResult<Vec<PathBuf>> {
        Ok(self.files.lock().keys().cloned().collect())
    }

    async fn open_read_stream(
        &self,
        path: &Path,
    ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        if self.files.lock().contains_key(path) {
            Ok(Box::new(tokio::io::empty()))
        } else {
            Err(BridgeError::OperationFailed("not readable".into()))
        }
    }
}

/// Drain every event currently buffered on the receiver into phases.
pub fn drain_phases(rx: &mut Receiver<CoreEvent>) -> Vec<SessionPhase> {
    let mut phases = Vec::new();
    while let Ok(event) = rx.try_recv() {
        let CoreEvent::Playback(snapshot) = event;
        phases.push(snapshot.phase);
    }
    phases
}

/// Wait until the given phase is observed on the stream.
pub async fn wait_for_phase(rx: &mut Receiver<CoreEvent>, phase: SessionPhase) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match rx.recv().await {
                Ok(CoreEvent::Playback(snapshot)) if snapshot.phase == phase => return,
                Ok(_) => continue,
                Err(e) => panic!("event stream closed while waiting for {phase:?}: {e}"),
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for phase {phase:?}"))
}

//! In-memory stand-ins for the database, the blob store and ffprobe.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tubely_core::models::Video;
use tubely_core::{AppError, StorageBackend};
use tubely_db::VideoStore;
use tubely_processing::{ClassifyError, Probe, StreamDims};
use tubely_storage::{BlobReader, BlobStore, StorageError, StorageResult};
use uuid::Uuid;

pub struct MemoryVideoStore {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_updates: bool,
    updates: AtomicUsize,
}

impl MemoryVideoStore {
    pub fn new(fail_updates: bool) -> Self {
        Self {
            videos: Mutex::new(HashMap::new()),
            fail_updates,
            updates: AtomicUsize::new(0),
        }
    }

    /// Insert a video owned by `owner` and return its id.
    pub fn seed(&self, owner: Uuid, title: &str) -> Uuid {
        let mut video = super::now_video(owner);
        video.title = title.to_string();
        let id = video.id;
        self.videos.lock().unwrap().insert(id, video);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    /// Successful updates so far
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        if self.fail_updates {
            return Err(AppError::Internal("connection reset".to_string()));
        }
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                self.updates.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Blob store whose writes always fail
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(&self, _key: &str, _data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
        Err(StorageError::UploadFailed("bucket unavailable".to_string()))
    }

    async fn put_stream(
        &self,
        _key: &str,
        _content_type: &str,
        _content_length: Option<u64>,
        _reader: BlobReader,
    ) -> StorageResult<u64> {
        Err(StorageError::UploadFailed("bucket unavailable".to_string()))
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    async fn exists(&self, _key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn url_for(&self, key: &str) -> String {
        format!("https://unavailable.test/{}", key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Probe that reports fixed streams and remembers which files it was asked about
pub struct ScriptedProbe {
    streams: Vec<StreamDims>,
    seen: Mutex<Vec<PathBuf>>,
}

impl ScriptedProbe {
    pub fn new(streams: Vec<StreamDims>) -> Self {
        Self {
            streams,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn probe(&self, path: &Path) -> Result<Vec<StreamDims>, ClassifyError> {
        if !path.exists() {
            return Err(ClassifyError::ProbeFailed("staged file missing".to_string()));
        }
        self.seen.lock().unwrap().push(path.to_path_buf());
        Ok(self.streams.clone())
    }
}

use super::staging::StagingFile;
use super::types::{UploadBody, UploadError, UploadFailure, UploadReader, UploadRequest, UploadStage};
use crate::auth::IdentityVerifier;
use crate::constants::STAGING_FILE_PREFIX;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tubely_core::models::{AspectCategory, AssetDescriptor, UploadKind, Video};
use tubely_db::VideoStore;
use tubely_processing::{AspectClassifier, MediaTypeValidator};
use tubely_storage::{keys, BlobStore};
use uuid::Uuid;

/// Per-kind upload size limits, in bytes
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_thumbnail_bytes: u64,
    pub max_video_bytes: u64,
}

impl UploadLimits {
    pub fn for_kind(&self, kind: UploadKind) -> u64 {
        match kind {
            UploadKind::Thumbnail => self.max_thumbnail_bytes,
            UploadKind::Video => self.max_video_bytes,
        }
    }

    /// The larger of the two limits.
    pub fn largest(&self) -> u64 {
        self.max_thumbnail_bytes.max(self.max_video_bytes)
    }
}

/// Pipeline state. Data owned by a state, including the staging file, is dropped
/// as soon as a step fails.
enum State<R> {
    Validating {
        credential: Option<String>,
        file: Option<UploadBody<R>>,
    },
    Authorized {
        video: Video,
        file: Option<UploadBody<R>>,
    },
    Staging {
        video: Video,
        declared_type: String,
        media_type: String,
        body: R,
    },
    Classifying {
        video: Video,
        declared_type: String,
        media_type: String,
        staged: StagingFile,
    },
    Persisting {
        video: Video,
        declared_type: String,
        media_type: String,
        staged: StagingFile,
        category: Option<AspectCategory>,
    },
    Linking {
        video: Video,
        key: String,
    },
    Done(Video),
}

impl<R> State<R> {
    fn stage(&self) -> UploadStage {
        match self {
            State::Validating { .. } | State::Authorized { .. } => UploadStage::Validating,
            State::Staging { .. } => UploadStage::Staging,
            State::Classifying { .. } => UploadStage::Classifying,
            State::Persisting { .. } => UploadStage::Persisting,
            State::Linking { .. } => UploadStage::Linking,
            State::Done(_) => UploadStage::Done,
        }
    }
}

/// A video record whose ownership by the caller has been checked
pub struct AuthorizedVideo(Video);

impl AuthorizedVideo {
    pub fn video(&self) -> &Video {
        &self.0
    }
}

/// Runs thumbnail and video uploads from request body to linked Video record
///
/// Thumbnails go to the local asset store and are served statically; videos are
/// classified by aspect ratio and go to the durable blob store under the category
/// directory.
pub struct UploadPipeline {
    videos: Arc<dyn VideoStore>,
    verifier: Arc<dyn IdentityVerifier>,
    blob_store: Arc<dyn BlobStore>,
    asset_store: Arc<dyn BlobStore>,
    classifier: AspectClassifier,
    thumbnail_types: MediaTypeValidator,
    video_types: MediaTypeValidator,
    staging_dir: PathBuf,
    limits: UploadLimits,
}

impl UploadPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        videos: Arc<dyn VideoStore>,
        verifier: Arc<dyn IdentityVerifier>,
        blob_store: Arc<dyn BlobStore>,
        asset_store: Arc<dyn BlobStore>,
        classifier: AspectClassifier,
        staging_dir: impl Into<PathBuf>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            videos,
            verifier,
            blob_store,
            asset_store,
            classifier,
            thumbnail_types: MediaTypeValidator::thumbnails(),
            video_types: MediaTypeValidator::videos(),
            staging_dir: staging_dir.into(),
            limits,
        }
    }

    /// Replace the media type allow-lists.
    pub fn with_media_types(
        mut self,
        thumbnail_types: MediaTypeValidator,
        video_types: MediaTypeValidator,
    ) -> Self {
        self.thumbnail_types = thumbnail_types;
        self.video_types = video_types;
        self
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    fn validator(&self, kind: UploadKind) -> &MediaTypeValidator {
        match kind {
            UploadKind::Thumbnail => &self.thumbnail_types,
            UploadKind::Video => &self.video_types,
        }
    }

    fn store(&self, kind: UploadKind) -> &Arc<dyn BlobStore> {
        match kind {
            UploadKind::Thumbnail => &self.asset_store,
            UploadKind::Video => &self.blob_store,
        }
    }

    /// Run one upload to completion and return the updated Video.
    pub async fn run<R: UploadReader>(
        &self,
        request: UploadRequest<R>,
    ) -> Result<Video, UploadFailure> {
        let UploadRequest {
            video_id,
            kind,
            credential,
            file,
        } = request;
        self.drive(video_id, kind, State::Validating { credential, file })
            .await
    }

    /// Check identity, record existence and ownership without touching a body.
    pub async fn authorize(
        &self,
        video_id: Uuid,
        credential: Option<&str>,
    ) -> Result<AuthorizedVideo, UploadFailure> {
        self.check_access(video_id, credential)
            .await
            .map(AuthorizedVideo)
            .map_err(|error| UploadFailure {
                video_id,
                stage: UploadStage::Validating,
                error,
            })
    }

    /// Continue an upload for a video that already passed `authorize`.
    pub async fn run_authorized<R: UploadReader>(
        &self,
        video: AuthorizedVideo,
        kind: UploadKind,
        file: Option<UploadBody<R>>,
    ) -> Result<Video, UploadFailure> {
        let video_id = video.0.id;
        self.drive(
            video_id,
            kind,
            State::Authorized {
                video: video.0,
                file,
            },
        )
        .await
    }

    #[tracing::instrument(skip(self, state), fields(video_id = %video_id, kind = %kind))]
    async fn drive<R: UploadReader>(
        &self,
        video_id: Uuid,
        kind: UploadKind,
        mut state: State<R>,
    ) -> Result<Video, UploadFailure> {
        let start = Instant::now();

        loop {
            let stage = state.stage();
            tracing::debug!(stage = %stage, "Upload stage");

            let next = match state {
                State::Validating { credential, file } => self
                    .check_access(video_id, credential.as_deref())
                    .await
                    .map(|video| State::Authorized { video, file }),
                State::Authorized { video, file } => self.check_file(kind, video, file),
                State::Staging {
                    video,
                    declared_type,
                    media_type,
                    body,
                } => {
                    self.stage_body(kind, body)
                        .await
                        .map(|staged| match kind {
                            UploadKind::Video => State::Classifying {
                                video,
                                declared_type,
                                media_type,
                                staged,
                            },
                            UploadKind::Thumbnail => State::Persisting {
                                video,
                                declared_type,
                                media_type,
                                staged,
                                category: None,
                            },
                        })
                }
                State::Classifying {
                    video,
                    declared_type,
                    media_type,
                    mut staged,
                } => self.classify(&mut staged).await.map(|category| State::Persisting {
                    video,
                    declared_type,
                    media_type,
                    staged,
                    category: Some(category),
                }),
                State::Persisting {
                    video,
                    declared_type,
                    media_type,
                    staged,
                    category,
                } => self
                    .persist(kind, &declared_type, media_type, staged, category)
                    .await
                    .map(|key| State::Linking { video, key }),
                State::Linking { video, key } => self.link(kind, video, key).await.map(State::Done),
                State::Done(video) => {
                    tracing::info!(
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Upload completed"
                    );
                    return Ok(video);
                }
            };

            state = next.map_err(|error| UploadFailure {
                video_id,
                stage,
                error,
            })?;
        }
    }

    /// Identity, record lookup, then ownership.
    async fn check_access(
        &self,
        video_id: Uuid,
        credential: Option<&str>,
    ) -> Result<Video, UploadError> {
        let credential = credential
            .ok_or_else(|| UploadError::Unauthenticated("Missing bearer token".to_string()))?;
        let user_id = self.verifier.resolve(credential).await.map_err(|e| match e {
            tubely_core::AppError::Unauthorized(msg) => UploadError::Unauthenticated(msg),
            other => UploadError::Unauthenticated(other.to_string()),
        })?;

        let video = self
            .videos
            .get_video(video_id)
            .await
            .map_err(UploadError::Lookup)?
            .ok_or(UploadError::NotFound)?;

        if !video.is_owned_by(user_id) {
            tracing::debug!(user_id = %user_id, "Upload rejected: caller does not own video");
            return Err(UploadError::Forbidden);
        }

        Ok(video)
    }

    /// Presence of the file part and its declared content type.
    fn check_file<R>(
        &self,
        kind: UploadKind,
        video: Video,
        file: Option<UploadBody<R>>,
    ) -> Result<State<R>, UploadError> {
        let UploadBody {
            content_type,
            reader,
        } = file.ok_or(UploadError::MissingFile(kind.field_name()))?;

        let declared_type =
            content_type.ok_or(tubely_processing::ValidationError::MissingContentType)?;
        let media_type = self.validator(kind).validate(&declared_type)?;

        Ok(State::Staging {
            video,
            declared_type,
            media_type,
            body: reader,
        })
    }

    async fn stage_body<R: UploadReader>(
        &self,
        kind: UploadKind,
        body: R,
    ) -> Result<StagingFile, UploadError> {
        let mut staged = StagingFile::create(&self.staging_dir, STAGING_FILE_PREFIX)?;
        let size = staged.fill(body, self.limits.for_kind(kind)).await?;
        tracing::debug!(size_bytes = size, "Upload staged");
        Ok(staged)
    }

    async fn classify(&self, staged: &mut StagingFile) -> Result<AspectCategory, UploadError> {
        staged.rewind().await?;
        let category = self.classifier.classify(staged.path()).await?;
        tracing::debug!(category = %category, "Upload classified");
        Ok(category)
    }

    /// Write the staged bytes to the store for `kind`. The staging file is released
    /// once the store has acknowledged the write, or on failure.
    async fn persist(
        &self,
        kind: UploadKind,
        declared_type: &str,
        media_type: String,
        mut staged: StagingFile,
        category: Option<AspectCategory>,
    ) -> Result<String, UploadError> {
        let descriptor = AssetDescriptor {
            relative_path: keys::asset_path(&media_type),
            media_type,
            classification: category,
        };
        let key = descriptor.storage_key();
        let size = staged.size();
        let reader = staged.reader().await?;

        let start = Instant::now();
        self.store(kind)
            .put_stream(&key, declared_type, Some(size), Box::pin(reader))
            .await?;

        tracing::info!(
            key = %key,
            media_type = %descriptor.media_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload persisted"
        );

        Ok(key)
    }

    async fn link(&self, kind: UploadKind, mut video: Video, key: String) -> Result<Video, UploadError> {
        let store = self.store(kind);
        video.attach_asset(kind, store.url_for(&key));

        if let Err(e) = self.videos.update_video(&video).await {
            self.discard_orphan(video.id, Arc::clone(store), key);
            return Err(UploadError::RecordUpdate(e));
        }

        Ok(video)
    }

    /// Best-effort removal of a blob whose record update failed. Not retried.
    fn discard_orphan(&self, video_id: Uuid, store: Arc<dyn BlobStore>, key: String) {
        tokio::spawn(async move {
            match store.delete(&key).await {
                Ok(()) => tracing::debug!(
                    video_id = %video_id,
                    key = %key,
                    "Deleted unlinked blob after failed record update"
                ),
                Err(e) => tracing::warn!(
                    video_id = %video_id,
                    key = %key,
                    error = %e,
                    "Failed to delete unlinked blob after failed record update"
                ),
            }
        });
    }
}

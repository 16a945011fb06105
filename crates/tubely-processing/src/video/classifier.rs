//! Aspect-ratio classification of staged videos.

use super::probe::{Probe, StreamDims};
use std::path::Path;
use std::sync::Arc;
use tubely_core::models::AspectCategory;

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("No streams found")]
    NoStreams,

    #[error("Failed to parse probe output: {0}")]
    ParseFailed(String),
}

/// A named target ratio with a relative tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioBucket {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    /// Allowed deviation as a fraction of the target ratio.
    pub tolerance: f64,
    pub category: AspectCategory,
}

impl RatioBucket {
    pub fn target(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn matches(&self, ratio: f64) -> bool {
        let target = self.target();
        (ratio - target).abs() <= target * self.tolerance
    }
}

/// Ordered ratio table. Earlier buckets win when tolerances overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectRatioTable {
    buckets: Vec<RatioBucket>,
}

impl AspectRatioTable {
    pub fn new(buckets: Vec<RatioBucket>) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &[RatioBucket] {
        &self.buckets
    }

    /// Category of the first bucket matching `dims`, or `Other`.
    pub fn bucket(&self, dims: StreamDims) -> AspectCategory {
        if dims.width == 0 || dims.height == 0 {
            return AspectCategory::Other;
        }

        let ratio = dims.ratio();
        self.buckets
            .iter()
            .find(|b| b.matches(ratio))
            .map(|b| b.category)
            .unwrap_or(AspectCategory::Other)
    }
}

impl Default for AspectRatioTable {
    /// 16:9 landscape, then 9:16 portrait, each within 10%.
    fn default() -> Self {
        Self::new(vec![
            RatioBucket {
                label: "16:9",
                width: 16,
                height: 9,
                tolerance: 0.1,
                category: AspectCategory::Landscape,
            },
            RatioBucket {
                label: "9:16",
                width: 9,
                height: 16,
                tolerance: 0.1,
                category: AspectCategory::Portrait,
            },
        ])
    }
}

/// Classifies a local video by the aspect ratio of its first stream.
#[derive(Clone)]
pub struct AspectClassifier {
    probe: Arc<dyn Probe>,
    table: AspectRatioTable,
}

impl AspectClassifier {
    pub fn new(probe: Arc<dyn Probe>, table: AspectRatioTable) -> Self {
        Self { probe, table }
    }

    pub fn table(&self) -> &AspectRatioTable {
        &self.table
    }

    /// Probe `path` and bucket its first stream. Probe failures are not retried.
    pub async fn classify(&self, path: &Path) -> Result<AspectCategory, ClassifyError> {
        let streams = self.probe.probe(path).await?;
        let first = streams.first().copied().ok_or(ClassifyError::NoStreams)?;
        let category = self.table.bucket(first);

        tracing::debug!(
            width = first.width,
            height = first.height,
            category = %category,
            "Video classified"
        );

        Ok(category)
    }
}

//! Video inspection: the probe capability and aspect-ratio bucketing.

pub mod classifier;
pub mod probe;

pub use classifier::{AspectClassifier, AspectRatioTable, ClassifyError, RatioBucket};
pub use probe::{parse_probe_output, FfprobeProbe, Probe, StreamDims};

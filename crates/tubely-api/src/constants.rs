//! API constants

/// Mount point of the local asset root (thumbnails)
pub const ASSETS_ROUTE: &str = "/assets";

/// Slack added on top of the largest file limit for multipart framing
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Prefix of request-scoped staging files
pub const STAGING_FILE_PREFIX: &str = "tubely-upload-";

/// Key probed by the blob store health check; it is never written.
pub const HEALTH_CHECK_KEY: &str = "health-check-non-existent-key";

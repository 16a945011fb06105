//! Configuration validation
//!
//! Catches misconfigurations at startup, before any connection is opened.

use anyhow::Result;
use tubely_core::Config;

/// Validate critical configuration values
///
/// Runs the checks in [`Config::validate`] plus the ones that only matter to the
/// HTTP server.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();
    if config.is_production() && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    let base_url = config.public_base_url();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(anyhow::anyhow!(
            "PUBLIC_BASE_URL must start with http:// or https://"
        ));
    }

    if config.max_thumbnail_size_bytes() > config.max_video_size_bytes() {
        tracing::warn!(
            max_thumbnail_bytes = config.max_thumbnail_size_bytes(),
            max_video_bytes = config.max_video_size_bytes(),
            "Thumbnail limit is larger than the video limit"
        );
    }

    Ok(())
}

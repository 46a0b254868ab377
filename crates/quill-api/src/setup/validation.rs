//! Configuration validation
//!
//! Checks that only matter to the running server; field-level rules live in
//! `Config::validate`.

use anyhow::Result;
use quill_core::Config;

/// Validate critical configuration values
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

    if config.store_call_timeout_secs() == 0 {
        return Err(anyhow::anyhow!("STORE_CALL_TIMEOUT_SECS cannot be 0"));
    }

    if config.mysql().timeout_seconds == 0 {
        return Err(anyhow::anyhow!("DB_TIMEOUT_SECONDS cannot be 0"));
    }

    if config.max_upload_size_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
    }

    if config.tmp_dir().as_os_str().is_empty() {
        return Err(anyhow::anyhow!("TMP_DIR cannot be empty"));
    }

    Ok(())
}

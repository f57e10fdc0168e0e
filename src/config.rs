use std::{env, path::PathBuf};

use anyhow::{Context, Result};

/// Runtime configuration sourced from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base address of the student records backend, without a trailing slash.
    pub api_base_url: String,
    /// Location of the durable session store file.
    pub session_store_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var("STUDENT_API_BASE_URL")
            .context("STUDENT_API_BASE_URL env var is missing")?
            .trim_end_matches('/')
            .to_string();

        let session_store_path = env::var("SESSION_STORE_PATH")
            .unwrap_or_else(|_| "sessions.json".to_string())
            .into();

        Ok(Self {
            api_base_url,
            session_store_path,
        })
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use roster_app::Patient;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const APP_NAME: &str = "roster";
pub const PATIENTS_FILE_NAME: &str = "patients.json";
pub const PATIENTS_PATH_ENV: &str = "ROSTER_PATIENTS_PATH";

/// Reads a JSON array of patient documents.
pub fn load_patients(path: &Path) -> Result<Vec<Patient>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read patients file {}", path.display()))?;
    let patients =
        parse_patients(&raw).with_context(|| format!("decode patients file {}", path.display()))?;
    info!(path = %path.display(), count = patients.len(), "patients loaded");
    Ok(patients)
}

pub fn parse_patients(raw: &str) -> Result<Vec<Patient>> {
    let patients: Vec<Patient> =
        serde_json::from_str(raw).context("expected a JSON array of patient documents")?;

    let mut seen = BTreeSet::new();
    for patient in &patients {
        if !seen.insert(patient.id.as_str()) {
            warn!(id = %patient.id, "duplicate patient id");
        }
    }
    Ok(patients)
}

pub fn default_patients_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os(PATIENTS_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set {PATIENTS_PATH_ENV} to a patients JSON file")
    })?;
    Ok(data_root.join(APP_NAME).join(PATIENTS_FILE_NAME))
}

pub fn validate_patients_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("patients path must not be empty");
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "patients path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("patients path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "patients path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

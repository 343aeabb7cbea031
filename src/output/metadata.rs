//! Write run, build and platform metadata to `metadata.toml` in the output directory.
use crate::appraisal::Appraisal;
use crate::scenario::{ScenarioMultipliers, ScenarioType};
use anyhow::Result;
use chrono::prelude::*;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output filename used for metadata.
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Build-time information included by the build script (via the `built` crate).
#[allow(clippy::doc_markdown)]
#[allow(clippy::needless_raw_strings)]
mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Return a short git commit hash for the build, or `"unknown"` when not available.
fn get_git_hash() -> String {
    let Some(hash) = built_info::GIT_COMMIT_HASH_SHORT else {
        return "unknown".into();
    };

    if built_info::GIT_DIRTY == Some(true) {
        format!("{hash}-dirty")
    } else {
        hash.into()
    }
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunMetadata<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    appraisal: Option<AppraisalMetadata>,
    program: ProgramMetadata<'a>,
    platform: PlatformMetadata,
}

/// Information about the run
#[derive(Serialize)]
struct RunMetadata<'a> {
    /// Path to the model which was appraised
    model_path: &'a Path,
    /// The date and time on which the run started
    datetime: String,
}

impl<'a> RunMetadata<'a> {
    fn new(model_path: &'a Path) -> Self {
        Self {
            model_path,
            datetime: Local::now().to_rfc2822(),
        }
    }
}

/// The settings which produced an appraisal
#[derive(Serialize)]
struct AppraisalMetadata {
    scenario: ScenarioType,
    economic_weight: f64,
    entity_count: usize,
    skipped_count: usize,
    multipliers: ScenarioMultipliers,
}

impl From<&Appraisal> for AppraisalMetadata {
    fn from(appraisal: &Appraisal) -> Self {
        Self {
            scenario: appraisal.scenario,
            economic_weight: appraisal.weight.economic(),
            entity_count: appraisal.records.len(),
            skipped_count: appraisal.skipped.len(),
            multipliers: appraisal.multipliers,
        }
    }
}

#[derive(Serialize)]
struct ProgramMetadata<'a> {
    /// The program name
    name: &'a str,
    /// The program version as specified in Cargo.toml
    version: &'a str,
    /// The target architecture for the build (e.g. x86_64-unknown-linux-gnu)
    target: &'a str,
    is_debug: bool,
    rustc_version: &'a str,
    build_time_utc: &'a str,
    /// The git commit hash for the build (if known)
    git_commit_hash: String,
}

impl Default for ProgramMetadata<'_> {
    fn default() -> Self {
        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash: get_git_hash(),
        }
    }
}

/// Information about the host platform, taken from [`PlatformInfo`]
#[derive(Serialize)]
struct PlatformMetadata {
    sysname: String,
    release: String,
    version: String,
    machine: String,
    osname: String,
}

impl Default for PlatformMetadata {
    fn default() -> Self {
        let info = PlatformInfo::new().expect("Unable to determine platform info");
        Self {
            sysname: info.sysname().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            version: info.version().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
            osname: info.osname().to_string_lossy().into(),
        }
    }
}

/// Write metadata to `metadata.toml` in the given output directory.
///
/// # Arguments
///
/// * `output_path` - Directory where `metadata.toml` will be written
/// * `model_path` - Path to the model that was appraised
/// * `appraisal` - The appraisal, if the run produced a single one
pub fn write_metadata(
    output_path: &Path,
    model_path: &Path,
    appraisal: Option<&Appraisal>,
) -> Result<()> {
    let metadata = Metadata {
        run: RunMetadata::new(model_path),
        appraisal: appraisal.map(AppraisalMetadata::from),
        program: ProgramMetadata::default(),
        platform: PlatformMetadata::default(),
    };
    let file_path = output_path.join(METADATA_FILE_NAME);
    fs::write(&file_path, toml::to_string(&metadata)?)?;

    Ok(())
}

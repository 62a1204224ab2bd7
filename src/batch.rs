//! Directory batch processing.
//!
//! Every image directly inside the input directory (no recursion) is run
//! through [`process_file`] in parallel. A failing file is logged and
//! recorded; it never stops its siblings.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::error::{InputError, RemovalError};
use crate::io::process_file;
use crate::params::Params;

/// File extensions (lowercase) picked up from an input directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, RemovalError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// List the image files directly inside `dir`, sorted by path.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, RemovalError> {
    if !dir.exists() {
        return Err(InputError::Missing(dir.to_path_buf()).into());
    }
    if !dir.is_dir() {
        return Err(InputError::NotADirectory(dir.to_path_buf()).into());
    }

    let entries = fs::read_dir(dir).map_err(|e| RemovalError::Io(dir.to_path_buf(), e))?;
    let mut images = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| RemovalError::Io(dir.to_path_buf(), e))?
            .path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// Output path for `input` inside `output_dir`: only the last extension is
/// replaced by `.png`, so `hero.idle.jpg` maps to `hero.idle.png`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".png");
    output_dir.join(name)
}

/// Pair every input with its output path.
///
/// Inputs are expected in sorted order. When two inputs map to the same
/// output (`hero.png` and `hero.bmp`), the first keeps it and the later ones
/// are returned as failures instead of racing on the same file.
fn plan_outputs(
    images: Vec<PathBuf>,
    output_dir: &Path,
) -> (Vec<(PathBuf, PathBuf)>, Vec<(PathBuf, RemovalError)>) {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut jobs = Vec::with_capacity(images.len());
    let mut rejected = Vec::new();

    for input in images {
        let output = output_path_for(&input, output_dir);
        match claimed.entry(output) {
            Entry::Occupied(entry) => {
                let err = InputError::OutputCollision {
                    input: input.clone(),
                    first: entry.get().clone(),
                    output: entry.key().clone(),
                };
                warn!(file = %input.display(), error = %err, "skipping");
                rejected.push((input, err.into()));
            }
            Entry::Vacant(entry) => {
                jobs.push((input.clone(), entry.key().clone()));
                entry.insert(input);
            }
        }
    }

    (jobs, rejected)
}

/// Remove the background of every image in `input_dir`, writing PNGs to `output_dir`.
///
/// Only listing the input directory or creating the output directory can
/// fail the whole run; per-file failures end up in [`BatchReport::failed`].
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    params: &Params,
) -> Result<BatchReport, RemovalError> {
    params.validate()?;

    let images = collect_images(input_dir)?;
    fs::create_dir_all(output_dir).map_err(|e| RemovalError::Io(output_dir.to_path_buf(), e))?;

    info!(
        count = images.len(),
        input = %input_dir.display(),
        output = %output_dir.display(),
        "processing directory"
    );

    let (jobs, rejected) = plan_outputs(images, output_dir);

    let results: Vec<(PathBuf, Result<(), RemovalError>)> = jobs
        .into_par_iter()
        .map(|(input, output)| {
            let result = process_file(&input, &output, params);
            match &result {
                Ok(()) => info!(file = %input.display(), "processed"),
                Err(e) if e.is_internal() => {
                    error!(file = %input.display(), error = %e, "pipeline bug while processing")
                }
                Err(e) => warn!(file = %input.display(), error = %e, "skipping"),
            }
            (input, result)
        })
        .collect();

    let mut report = BatchReport {
        failed: rejected,
        ..BatchReport::default()
    };
    for (input, result) in results {
        match result {
            Ok(()) => report.succeeded.push(input),
            Err(e) => report.failed.push((input, e)),
        }
    }

    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "directory done"
    );
    Ok(report)
}

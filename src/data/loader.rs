use std::path::Path;

use log::{debug, info};

use super::calibration::{lookup_sample_rate, lookup_scale_factors, scale_raw_current};
use super::layout::{describe, ReadOptions};
use super::model::{Node, ScaleFactors, ScaledRead};
use super::path::PathSpec;
use super::resolve::resolve_dataset;
use super::tree::TreeNode;
use crate::error::{Fast5Error, ResolutionFailure, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the scaled current from a container file.  Dispatch by extension.
///
/// Supported formats:
/// * `.fast5` / `.h5` / `.hdf5` – HDF5 (requires the `hdf5` feature)
/// * `.json`                    – a [`TreeNode`] dump
///
/// The file is opened here and closed before returning, on success or error.
pub fn read_fast5(path: &Path, options: &ReadOptions) -> Result<ScaledRead> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "fast5" | "h5" | "hdf5" => read_hdf5(path, options),
        "json" => {
            let tree = TreeNode::from_json_file(path)?;
            extract(&&tree, options)
        }
        other => Err(Fast5Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("unknown extension .{other}"),
        }),
    }
}

#[cfg(feature = "hdf5")]
fn read_hdf5(path: &Path, options: &ReadOptions) -> Result<ScaledRead> {
    use super::h5::{open, Hdf5Node};

    let file = open(path)?;
    let root = Hdf5Node::root(&file);
    extract(&root, options)
}

#[cfg(not(feature = "hdf5"))]
fn read_hdf5(path: &Path, _options: &ReadOptions) -> Result<ScaledRead> {
    Err(Fast5Error::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: "built without the `hdf5` feature".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Locate signal, calibration and sample rate under `root` and scale the
/// signal to current.
pub fn extract<N: Node>(root: &N, options: &ReadOptions) -> Result<ScaledRead> {
    let (raw, layout) = find_raw_signal(root, options)?;
    let factors = find_scale_factors(root, options)?;
    let sample_rate = lookup_sample_rate(root)?;
    let current = scale_raw_current(&raw, &factors)?;

    info!(
        "extracted {} samples at {sample_rate} Hz ({layout} layout)",
        current.len()
    );
    Ok(ScaledRead {
        sample_rate,
        current,
        layout,
    })
}

/// Signal from the explicit path, else from the first layout that resolves.
fn find_raw_signal<N: Node>(root: &N, options: &ReadOptions) -> Result<(Vec<f64>, String)> {
    if let Some(path) = &options.raw_path {
        return resolve_dataset(root, path, options.wildcard)
            .map(|raw| (raw, "explicit".to_string()))
            .map_err(|e| Fast5Error::RawSignalNotFound {
                reason: e.to_string(),
                expected: format!("a dataset at {path}"),
            });
    }

    let mut reasons = Vec::new();
    for layout in &options.layouts {
        match resolve_dataset(root, &layout.raw_path, options.wildcard) {
            Ok(raw) => {
                debug!("raw signal found at '{}' ({} layout)", layout.raw_path, layout.name);
                return Ok((raw, layout.name.clone()));
            }
            Err(e) if e.is_not_found() => {
                debug!("no raw signal at '{}': {e}", layout.raw_path);
                reasons.push(format!("{}: {e}", layout.name));
            }
            Err(e) => return Err(ambiguous(&layout.raw_path, e)),
        }
    }

    Err(Fast5Error::RawSignalNotFound {
        reason: none_matched(reasons),
        expected: describe(&options.layouts),
    })
}

/// Calibration from the explicit path, else from the first layout that has
/// all three factors.
fn find_scale_factors<N: Node>(root: &N, options: &ReadOptions) -> Result<ScaleFactors> {
    if let Some(path) = &options.metadata_path {
        let reason = match lookup_scale_factors(root, path, options.wildcard) {
            Ok(Some(factors)) => return Ok(factors),
            Ok(None) => format!("no offset, range and digitisation at {path}"),
            Err(e) => e.to_string(),
        };
        return Err(Fast5Error::ScaleFactorsNotFound {
            reason,
            expected: format!("a group at {path}"),
        });
    }

    let mut tried = Vec::new();
    for layout in &options.layouts {
        match lookup_scale_factors(root, &layout.metadata_path, options.wildcard) {
            Ok(Some(factors)) => {
                debug!("scale factors found at '{}' ({} layout)", layout.metadata_path, layout.name);
                return Ok(factors);
            }
            Ok(None) => tried.push(format!("{}: incomplete calibration", layout.name)),
            Err(e) if e.is_not_found() => {
                debug!("no metadata group at '{}': {e}", layout.metadata_path);
                tried.push(format!("{}: {e}", layout.name));
            }
            Err(e) => return Err(ambiguous(&layout.metadata_path, e)),
        }
    }

    Err(Fast5Error::ScaleFactorsNotFound {
        reason: none_matched(tried),
        expected: describe(&options.layouts),
    })
}

fn ambiguous(path: &PathSpec, source: ResolutionFailure) -> Fast5Error {
    Fast5Error::AmbiguousPath {
        path: path.to_string(),
        source,
    }
}

fn none_matched(reasons: Vec<String>) -> String {
    if reasons.is_empty() {
        "no layouts configured".to_string()
    } else {
        format!("tried {}", reasons.join("; "))
    }
}

use log::{debug, warn};

use super::model::{AttrValue, Node, ScaleFactors};
use super::path::PathSpec;
use super::resolve::{resolve_node, WildcardPolicy};
use crate::error::{Fast5Error, ResolutionFailure, Result};

// ---------------------------------------------------------------------------
// Scale factors
// ---------------------------------------------------------------------------

/// Read `offset`, `range` and `digitisation` from the group at `metadata_path`.
///
/// `Err` carries why the group could not be resolved. `Ok(None)` means the
/// path led to a dataset, or to a group missing one of the three numeric
/// attributes; a partial triple is never returned.
pub fn lookup_scale_factors<N: Node>(
    root: &N,
    metadata_path: &PathSpec,
    policy: WildcardPolicy,
) -> Result<Option<ScaleFactors>, ResolutionFailure> {
    let meta = resolve_node(root, metadata_path, policy)?;
    if meta.is_dataset() {
        debug!("'{metadata_path}' is a dataset, not a metadata group");
        return Ok(None);
    }

    let read = |name: &str| {
        let value = meta.attr(name).and_then(|v| v.as_f64());
        if value.is_none() {
            debug!("'{metadata_path}' has no numeric '{name}' attribute");
        }
        value
    };

    let factors = match (read("offset"), read("range"), read("digitisation")) {
        (Some(offset), Some(range), Some(digitisation)) => Some(ScaleFactors {
            offset,
            range,
            digitisation,
        }),
        _ => None,
    };
    Ok(factors)
}

// ---------------------------------------------------------------------------
// Sample rate
// ---------------------------------------------------------------------------

/// Find the acquisition sample rate.
///
/// Checks `Meta.sample_rate` first, then
/// `UniqueGlobalKey/context_tags.sample_frequency` (truncated to an integer).
/// Values that are not positive finite numbers are skipped.
pub fn lookup_sample_rate<N: Node>(root: &N) -> Result<f64> {
    if let Some(meta) = root.child("Meta") {
        if let Some(value) = meta.attr("sample_rate") {
            if let Some(rate) = usable_rate(&value, value.as_f64(), "Meta.sample_rate") {
                return Ok(rate);
            }
        }
    }

    let tags = root
        .child("UniqueGlobalKey")
        .and_then(|key| key.child("context_tags"));
    if let Some(value) = tags.and_then(|t| t.attr("sample_frequency")) {
        let rate = value.as_i64().map(|r| r as f64);
        if let Some(rate) = usable_rate(&value, rate, "context_tags.sample_frequency") {
            return Ok(rate);
        }
    }

    Err(Fast5Error::SampleRateNotFound)
}

fn usable_rate(value: &AttrValue, rate: Option<f64>, location: &str) -> Option<f64> {
    let rate = rate.filter(|r| r.is_finite() && *r > 0.0);
    if rate.is_none() {
        warn!("ignoring {location} '{value}': not a positive number");
    }
    rate
}

// ---------------------------------------------------------------------------
// Scaling
// ---------------------------------------------------------------------------

/// Convert raw ADC counts to current: `(raw + offset) * (range / digitisation)`.
///
/// Fails with `InvalidScaleFactors` rather than return a non-finite value.
pub fn scale_raw_current(raw: &[f64], factors: &ScaleFactors) -> Result<Vec<f64>> {
    factors.validate()?;
    let gain = factors.range / factors.digitisation;
    raw.iter()
        .map(|&r| {
            let current = (r + factors.offset) * gain;
            if current.is_finite() {
                Ok(current)
            } else {
                Err(factors.invalid())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tree::TreeNode;

    fn meta(attrs: &[(&str, f64)]) -> TreeNode {
        let mut node = TreeNode::group();
        for (k, v) in attrs {
            node = node.with_attr(*k, *v);
        }
        TreeNode::group().with_child(
            "UniqueGlobalKey",
            TreeNode::group().with_child("channel_id", node),
        )
    }

    #[test]
    fn reads_all_three_factors() {
        let root = meta(&[("offset", 5.0), ("range", 100.0), ("digitisation", 50.0)]);
        let f = lookup_scale_factors(&&root, &"UniqueGlobalKey/channel_id".into(), WildcardPolicy::Strict);
        assert_eq!(
            f,
            Ok(Some(ScaleFactors { offset: 5.0, range: 100.0, digitisation: 50.0 }))
        );
    }

    #[test]
    fn missing_range_is_absent_not_error() {
        let root = meta(&[("offset", 5.0), ("digitisation", 50.0)]);
        let f = lookup_scale_factors(&&root, &"UniqueGlobalKey/channel_id".into(), WildcardPolicy::Strict);
        assert_eq!(f, Ok(None));
    }

    #[test]
    fn unresolvable_group_reports_why() {
        let root = TreeNode::group();
        assert_eq!(
            lookup_scale_factors(&&root, &"Raw/Channel_*/Meta".into(), WildcardPolicy::FirstSorted),
            Err(ResolutionFailure::GroupNotFound { name: "Raw".into(), at: 0 })
        );
    }

    #[test]
    fn dataset_is_not_a_metadata_group() {
        let signal = TreeNode::dataset(vec![1.0])
            .with_attr("offset", 0.0)
            .with_attr("range", 1.0)
            .with_attr("digitisation", 1.0);
        let root = TreeNode::group().with_child("Signal", signal);
        assert_eq!(
            lookup_scale_factors(&&root, &"Signal".into(), WildcardPolicy::Strict),
            Ok(None)
        );
    }

    #[test]
    fn sample_rate_must_be_positive_and_finite() {
        let root = TreeNode::group()
            .with_child("Meta", TreeNode::group().with_attr("sample_rate", "NaN"))
            .with_child(
                "UniqueGlobalKey",
                TreeNode::group().with_child(
                    "context_tags",
                    TreeNode::group().with_attr("sample_frequency", 0.0),
                ),
            );
        assert!(matches!(
            lookup_sample_rate(&&root),
            Err(Fast5Error::SampleRateNotFound)
        ));

        let root = TreeNode::group()
            .with_child("Meta", TreeNode::group().with_attr("sample_rate", -4000.0))
            .with_child(
                "UniqueGlobalKey",
                TreeNode::group().with_child(
                    "context_tags",
                    TreeNode::group().with_attr("sample_frequency", "4000"),
                ),
            );
        assert_eq!(lookup_sample_rate(&&root).unwrap(), 4000.0);
    }

    #[test]
    fn sample_rate_prefers_meta() {
        let root = TreeNode::group()
            .with_child("Meta", TreeNode::group().with_attr("sample_rate", 4000.0))
            .with_child(
                "UniqueGlobalKey",
                TreeNode::group().with_child(
                    "context_tags",
                    TreeNode::group().with_attr("sample_frequency", "3012"),
                ),
            );
        assert_eq!(lookup_sample_rate(&&root).unwrap(), 4000.0);
    }

    #[test]
    fn sample_rate_falls_back_to_context_tags_as_integer() {
        let root = TreeNode::group()
            .with_child("Meta", TreeNode::group())
            .with_child(
                "UniqueGlobalKey",
                TreeNode::group().with_child(
                    "context_tags",
                    TreeNode::group().with_attr("sample_frequency", 3012.7),
                ),
            );
        assert_eq!(lookup_sample_rate(&&root).unwrap(), 3012.0);
    }

    #[test]
    fn sample_rate_missing_everywhere() {
        let root = TreeNode::group().with_child("UniqueGlobalKey", TreeNode::group());
        assert!(matches!(
            lookup_sample_rate(&&root),
            Err(Fast5Error::SampleRateNotFound)
        ));
    }

    #[test]
    fn scaling_is_elementwise_affine() {
        let f = ScaleFactors { offset: 5.0, range: 100.0, digitisation: 50.0 };
        let raw = [10.0, 20.0, 30.0, -5.0];
        let out = scale_raw_current(&raw, &f).unwrap();
        assert_eq!(out.len(), raw.len());
        for (r, o) in raw.iter().zip(&out) {
            assert_eq!(*o, (r + 5.0) * (100.0 / 50.0));
        }
        assert_eq!(out, vec![30.0, 50.0, 70.0, 0.0]);
    }

    #[test]
    fn scaling_with_zero_digitisation_fails() {
        let f = ScaleFactors { offset: 0.0, range: 1.0, digitisation: 0.0 };
        assert!(matches!(
            scale_raw_current(&[1.0], &f),
            Err(Fast5Error::InvalidScaleFactors { .. })
        ));
    }

    #[test]
    fn scaling_that_overflows_fails() {
        let f = ScaleFactors { offset: 0.0, range: 1e300, digitisation: 1e-300 };
        assert!(matches!(
            scale_raw_current(&[1.0, 2.0], &f),
            Err(Fast5Error::InvalidScaleFactors { .. })
        ));

        let f = ScaleFactors { offset: 0.0, range: 1e300, digitisation: 1.0 };
        assert!(matches!(
            scale_raw_current(&[1.0, 1e10], &f),
            Err(Fast5Error::InvalidScaleFactors { .. })
        ));
    }
}

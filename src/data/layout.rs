use serde::{Deserialize, Serialize};

use super::path::PathSpec;
use super::resolve::WildcardPolicy;

// ---------------------------------------------------------------------------
// Known FAST5 layouts
// ---------------------------------------------------------------------------

/// Where one generation of FAST5 writers puts the signal and its calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub raw_path: PathSpec,
    pub metadata_path: PathSpec,
    /// Expected tree, shown when nothing matched.
    #[serde(default)]
    pub description: String,
}

const CHANNEL_TREE: &str = "\
FILE_CONTENTS {
 group      /
 group      /Device
 dataset    /Device/AsicCommands
 dataset    /Device/MetaData
 group      /Meta
 group      /Meta/User
 dataset    /Meta/User/analysis_conf
 group      /Raw
 group      /Raw/Channel_X
 group      /Raw/Channel_X/Meta
 dataset    /Raw/Channel_X/Signal
}";

const READ_TREE: &str = "\
FILE_CONTENTS {
 group      /
 group      /Raw
 group      /Raw/Reads
 group      /Raw/Reads/Read_X
 dataset    /Raw/Reads/Read_X/Signal
 group      /UniqueGlobalKey
 group      /UniqueGlobalKey/channel_id
 group      /UniqueGlobalKey/context_tags
 group      /UniqueGlobalKey/tracking_id
}";

impl Layout {
    /// Bulk/channel files: `Raw/Channel_X/{Signal,Meta}`.
    pub fn channel() -> Self {
        Layout {
            name: "channel".to_string(),
            raw_path: PathSpec::from("Raw/Channel_*/Signal"),
            metadata_path: PathSpec::from("Raw/Channel_*/Meta"),
            description: CHANNEL_TREE.to_string(),
        }
    }

    /// Single-read files: `Raw/Reads/Read_X/Signal` calibrated by
    /// `UniqueGlobalKey/channel_id`.
    pub fn read() -> Self {
        Layout {
            name: "read".to_string(),
            raw_path: PathSpec::from("Raw/Reads/Read_*/Signal"),
            metadata_path: PathSpec::from("UniqueGlobalKey/channel_id"),
            description: READ_TREE.to_string(),
        }
    }

    /// Built-in layouts in probing order.
    pub fn defaults() -> Vec<Layout> {
        vec![Layout::channel(), Layout::read()]
    }
}

/// Join the expected trees of `layouts` for an error message.
pub fn describe(layouts: &[Layout]) -> String {
    layouts
        .iter()
        .map(|l| {
            if l.description.is_empty() {
                format!("[{}] signal at {}, calibration at {}", l.name, l.raw_path, l.metadata_path)
            } else {
                format!("[{}]\n{}", l.name, l.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\nor\n")
}

// ---------------------------------------------------------------------------
// ReadOptions
// ---------------------------------------------------------------------------

/// How to locate the signal and calibration in a container.
///
/// Explicit paths disable fallback for that item: if given and unresolvable,
/// extraction fails instead of trying `layouts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    pub raw_path: Option<PathSpec>,
    pub metadata_path: Option<PathSpec>,
    pub wildcard: WildcardPolicy,
    pub layouts: Vec<Layout>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            raw_path: None,
            metadata_path: None,
            wildcard: WildcardPolicy::default(),
            layouts: Layout::defaults(),
        }
    }
}

impl ReadOptions {
    /// Read one named channel, e.g. `Channel_161`.
    pub fn channel(name: &str) -> Self {
        Self {
            raw_path: Some(Layout::channel().raw_path.bind(name)),
            metadata_path: Some(Layout::channel().metadata_path.bind(name)),
            ..Self::default()
        }
    }

    /// Read one named read, e.g. `Read_804`.
    pub fn read(name: &str) -> Self {
        Self {
            raw_path: Some(Layout::read().raw_path.bind(name)),
            metadata_path: Some(Layout::read().metadata_path),
            ..Self::default()
        }
    }

    pub fn with_wildcard(mut self, policy: WildcardPolicy) -> Self {
        self.wildcard = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_channel_pins_both_paths() {
        let opts = ReadOptions::channel("Channel_161");
        assert_eq!(opts.raw_path.unwrap().to_string(), "Raw/Channel_161/Signal");
        assert_eq!(opts.metadata_path.unwrap().to_string(), "Raw/Channel_161/Meta");
    }

    #[test]
    fn named_read_keeps_global_calibration() {
        let opts = ReadOptions::read("Read_804");
        assert_eq!(opts.raw_path.unwrap().to_string(), "Raw/Reads/Read_804/Signal");
        assert_eq!(opts.metadata_path.unwrap().to_string(), "UniqueGlobalKey/channel_id");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: ReadOptions =
            serde_json::from_str(r#"{ "raw_path": "Raw/Reads/*/Signal", "wildcard": "strict" }"#).unwrap();
        assert_eq!(opts.raw_path.unwrap().to_string(), "Raw/Reads/*/Signal");
        assert_eq!(opts.metadata_path, None);
        assert_eq!(opts.wildcard, WildcardPolicy::Strict);
        assert_eq!(opts.layouts, Layout::defaults());
    }

    #[test]
    fn description_lists_every_layout() {
        let text = describe(&Layout::defaults());
        assert!(text.contains("/Raw/Channel_X/Signal"));
        assert!(text.contains("/UniqueGlobalKey/channel_id"));
    }
}

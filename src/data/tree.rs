use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::{AttrValue, Node};
use crate::error::Result;

// ---------------------------------------------------------------------------
// TreeNode – in-memory container
// ---------------------------------------------------------------------------

/// An in-memory group/dataset tree.
///
/// JSON form:
///
/// ```json
/// {
///   "attrs": { "sample_rate": 4000 },
///   "children": {
///     "Raw": { "children": { "Channel_0": { "children": {
///       "Signal": { "data": [10, 20, 30] }
///     } } } }
///   }
/// }
/// ```
///
/// A node with `data` is a dataset; one without is a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttrValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<f64>>,
}

impl TreeNode {
    pub fn group() -> Self {
        TreeNode::default()
    }

    pub fn dataset(data: Vec<f64>) -> Self {
        TreeNode {
            data: Some(data),
            ..TreeNode::default()
        }
    }

    pub fn with_child(mut self, name: impl Into<String>, child: TreeNode) -> Self {
        self.children.insert(name.into(), child);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Load a tree from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the tree as pretty-printed JSON.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl<'a> Node for &'a TreeNode {
    fn child(&self, name: &str) -> Option<Self> {
        let node: &'a TreeNode = *self;
        node.children.get(name)
    }

    fn child_names(&self) -> Vec<String> {
        self.children.keys().cloned().collect()
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        self.attrs.get(name).cloned()
    }

    fn values(&self) -> Option<Vec<f64>> {
        self.data.clone()
    }

    fn is_dataset(&self) -> bool {
        self.data.is_some()
    }
}

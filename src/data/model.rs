use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Fast5Error, Result};

// ---------------------------------------------------------------------------
// AttrValue – a single attribute on a container node
// ---------------------------------------------------------------------------

/// A dynamically-typed attribute value.
///
/// FAST5 writers are not consistent about types: `context_tags` stores
/// numbers as text, `channel_id` stores them as floats. Numeric accessors
/// therefore accept numeric strings too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Integer(i) => write!(f, "{i}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl AttrValue {
    /// Interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Integer(i) => Some(*i as f64),
            AttrValue::String(s) => s.trim().parse::<f64>().ok(),
            AttrValue::Bool(_) => None,
        }
    }

    /// Interpret the value as an `i64`. Floats truncate toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Integer(i) => Some(*i),
            AttrValue::Float(v) if v.is_finite() => Some(*v as i64),
            AttrValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
            }
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Integer(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// Node – read-only view of one point in a container tree
// ---------------------------------------------------------------------------

/// The capability the extraction core needs from a hierarchical container.
///
/// Implementations are read-only views. A handle is not expected to be
/// shared across threads; open one container per worker.
pub trait Node: Clone {
    /// Child node with exactly this name.
    fn child(&self, name: &str) -> Option<Self>;

    /// Names of all immediate children, in no particular order.
    fn child_names(&self) -> Vec<String>;

    /// Attribute value by name.
    fn attr(&self, name: &str) -> Option<AttrValue>;

    /// Dataset contents as a flat numeric sequence, or `None` for a node
    /// with no data payload.
    fn values(&self) -> Option<Vec<f64>>;

    /// Whether the node carries a data payload. Backends that can answer
    /// without reading the data should override this.
    fn is_dataset(&self) -> bool {
        self.values().is_some()
    }
}

// ---------------------------------------------------------------------------
// Calibration and output
// ---------------------------------------------------------------------------

/// Calibration scalars mapping raw ADC counts to current.
///
/// Spelled `digitisation` to match the attribute name in the file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    pub offset: f64,
    pub range: f64,
    pub digitisation: f64,
}

impl ScaleFactors {
    /// Reject factors that would yield NaN or infinite current.
    pub fn validate(&self) -> Result<()> {
        let ok = self.offset.is_finite()
            && self.range.is_finite()
            && self.digitisation.is_finite()
            && self.digitisation != 0.0
            && (self.range / self.digitisation).is_finite();
        if ok {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    pub(crate) fn invalid(&self) -> Fast5Error {
        Fast5Error::InvalidScaleFactors {
            offset: self.offset,
            range: self.range,
            digitisation: self.digitisation,
        }
    }
}

/// Result of one extraction: sample rate and scaled current.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRead {
    /// Samples per second.
    pub sample_rate: f64,
    /// Current, same length and order as the raw signal.
    pub current: Vec<f64>,
    /// Name of the layout the raw signal was found under, or `"explicit"`.
    pub layout: String,
}

impl ScaledRead {
    /// Interval between samples in milliseconds.
    pub fn time_step_ms(&self) -> f64 {
        1000.0 / self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

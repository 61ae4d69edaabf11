use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Segment – one component of a path template
// ---------------------------------------------------------------------------

/// A single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Match the child with exactly this name.
    Literal(String),
    /// Match any child whose name starts with `prefix` (`""` matches all).
    Wildcard { prefix: String },
}

impl Segment {
    fn parse(text: &str) -> Self {
        match text.strip_suffix('*') {
            Some(prefix) => Segment::Wildcard {
                prefix: prefix.to_string(),
            },
            None => Segment::Literal(text.to_string()),
        }
    }

    /// Whether `name` is a candidate for this segment.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == name,
            Segment::Wildcard { prefix } => name.starts_with(prefix.as_str()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard { .. })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(lit) => write!(f, "{lit}"),
            Segment::Wildcard { prefix } => write!(f, "{prefix}*"),
        }
    }
}

// ---------------------------------------------------------------------------
// PathSpec – slash-delimited template
// ---------------------------------------------------------------------------

/// An ordered list of path segments, e.g. `Raw/Channel_*/Signal`.
///
/// Empty components (leading, trailing or doubled `/`) are dropped while
/// parsing, so segment indices in resolution errors count only real segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PathSpec {
    segments: Vec<Segment>,
}

impl PathSpec {
    pub fn new(segments: Vec<Segment>) -> Self {
        PathSpec { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Replace each wildcard that would accept `name` with the literal `name`.
    ///
    /// Used to pin a template such as `Raw/Reads/Read_*/Signal` to one read.
    pub fn bind(&self, name: &str) -> PathSpec {
        let segments = self
            .segments
            .iter()
            .map(|seg| match seg {
                Segment::Wildcard { .. } if seg.matches(name) => Segment::Literal(name.to_string()),
                other => other.clone(),
            })
            .collect();
        PathSpec { segments }
    }
}

impl From<&str> for PathSpec {
    fn from(text: &str) -> Self {
        let segments = text
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect();
        PathSpec { segments }
    }
}

impl From<String> for PathSpec {
    fn from(text: String) -> Self {
        PathSpec::from(text.as_str())
    }
}

impl From<PathSpec> for String {
    fn from(path: PathSpec) -> Self {
        path.to_string()
    }
}

impl FromStr for PathSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PathSpec::from(s))
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_segments_are_skipped() {
        let p = PathSpec::from("/Raw//Channel_*/Signal/");
        assert_eq!(
            p.segments(),
            &[
                Segment::Literal("Raw".into()),
                Segment::Wildcard { prefix: "Channel_".into() },
                Segment::Literal("Signal".into()),
            ]
        );
        assert_eq!(p.to_string(), "Raw/Channel_*/Signal");
    }

    #[test]
    fn bare_star_matches_everything() {
        let p = PathSpec::from("*");
        assert!(p.segments()[0].matches("anything"));
        assert!(p.segments()[0].is_wildcard());
        assert!(PathSpec::from("").is_empty());
    }

    #[test]
    fn bind_pins_matching_wildcards_only() {
        let p = PathSpec::from("Raw/Reads/Read_*/Signal").bind("Read_42");
        assert_eq!(p.to_string(), "Raw/Reads/Read_42/Signal");

        let p = PathSpec::from("Raw/Channel_*/Meta").bind("Read_42");
        assert_eq!(p.to_string(), "Raw/Channel_*/Meta");
    }

    #[test]
    fn serde_uses_string_form() {
        let p: PathSpec = serde_json::from_str(r#""UniqueGlobalKey/channel_id""#).unwrap();
        assert_eq!(p.segments().len(), 2);
        assert_eq!(serde_json::to_string(&p).unwrap(), r#""UniqueGlobalKey/channel_id""#);
    }
}

//! HDF5 container backend, enabled by the `hdf5` feature.

use std::path::Path;

use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, Dataset, File, Group, Location};
use log::warn;

use super::model::{AttrValue, Node};

/// A group or dataset inside an open HDF5 file.
///
/// Holds a reference-counted HDF5 handle; the file stays open until the
/// last node derived from it is dropped.
#[derive(Clone)]
pub enum Hdf5Node {
    Group(Group),
    Dataset(Dataset),
}

impl Hdf5Node {
    /// Root group of an open file.
    pub fn root(file: &File) -> Self {
        Hdf5Node::Group((**file).clone())
    }

    fn location(&self) -> &Location {
        match self {
            Hdf5Node::Group(g) => g,
            Hdf5Node::Dataset(d) => d,
        }
    }
}

/// Open `path` read-only.
pub fn open(path: &Path) -> hdf5::Result<File> {
    File::open(path)
}

impl Node for Hdf5Node {
    fn child(&self, name: &str) -> Option<Self> {
        let Hdf5Node::Group(group) = self else {
            return None;
        };
        if !group.link_exists(name) {
            return None;
        }
        group
            .group(name)
            .map(Hdf5Node::Group)
            .or_else(|_| group.dataset(name).map(Hdf5Node::Dataset))
            .ok()
    }

    fn child_names(&self) -> Vec<String> {
        match self {
            Hdf5Node::Group(group) => group.member_names().unwrap_or_else(|e| {
                warn!("cannot list members of '{}': {e}", group.name());
                Vec::new()
            }),
            Hdf5Node::Dataset(_) => Vec::new(),
        }
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        let loc = self.location();
        let attr = loc.attr(name).ok()?;
        match read_attr(&attr) {
            Ok(value) => value,
            Err(e) => {
                warn!("cannot read attribute '{name}' on '{}': {e}", loc.name());
                None
            }
        }
    }

    fn is_dataset(&self) -> bool {
        matches!(self, Hdf5Node::Dataset(_))
    }

    fn values(&self) -> Option<Vec<f64>> {
        let Hdf5Node::Dataset(ds) = self else {
            return None;
        };
        match ds.read_raw::<f64>() {
            Ok(values) => Some(values),
            Err(e) => {
                warn!("cannot read dataset '{}' as numbers: {e}", ds.name());
                None
            }
        }
    }
}

/// Read a scalar attribute according to its stored type.
fn read_attr(attr: &Attribute) -> hdf5::Result<Option<AttrValue>> {
    let value = match attr.dtype()?.to_descriptor()? {
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            AttrValue::Integer(attr.read_scalar::<i64>()?)
        }
        TypeDescriptor::Float(_) => AttrValue::Float(attr.read_scalar::<f64>()?),
        TypeDescriptor::Boolean => AttrValue::Bool(attr.read_scalar::<bool>()?),
        TypeDescriptor::VarLenAscii => {
            AttrValue::String(attr.read_scalar::<VarLenAscii>()?.as_str().to_string())
        }
        TypeDescriptor::VarLenUnicode => {
            AttrValue::String(attr.read_scalar::<VarLenUnicode>()?.as_str().to_string())
        }
        TypeDescriptor::FixedAscii(_) => {
            AttrValue::String(attr.read_scalar::<FixedAscii<256>>()?.as_str().to_string())
        }
        TypeDescriptor::FixedUnicode(_) => {
            AttrValue::String(attr.read_scalar::<FixedUnicode<256>>()?.as_str().to_string())
        }
        other => {
            warn!("unsupported attribute type {other:?} on '{}'", attr.name());
            return Ok(None);
        }
    };
    Ok(Some(value))
}

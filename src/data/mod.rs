/// Data layer: container access, path templates, calibration and extraction.
///
/// Architecture:
/// ```text
///  .fast5 / .h5 / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  open container → root Node, probe layouts
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resolve   │  PathSpec (Raw/Channel_*/Signal) → node / dataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ calibration │  offset/range/digitisation, sample rate → ScaledRead
///   └─────────────┘
/// ```

pub mod calibration;
#[cfg(feature = "hdf5")]
pub mod h5;
pub mod layout;
pub mod loader;
pub mod model;
pub mod path;
pub mod resolve;
pub mod tree;

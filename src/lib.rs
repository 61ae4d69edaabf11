//! Read nanopore current from FAST5 files.
//!
//! A FAST5 file keeps the raw ADC signal and its calibration in places that
//! moved between writer generations. [`read_fast5`] finds them through a list
//! of known layouts (or explicit paths) and returns the signal scaled to
//! current, together with the sample rate.
//!
//! ```no_run
//! use std::path::Path;
//! use rusty_fast5::{read_fast5, ReadOptions};
//!
//! let read = read_fast5(Path::new("run.fast5"), &ReadOptions::default())?;
//! println!("{} samples at {} Hz", read.len(), read.sample_rate);
//! # Ok::<(), rusty_fast5::Fast5Error>(())
//! ```

pub mod data;
pub mod error;

pub use data::layout::{Layout, ReadOptions};
pub use data::loader::{extract, read_fast5};
pub use data::model::{AttrValue, Node, ScaleFactors, ScaledRead};
pub use data::path::{PathSpec, Segment};
pub use data::resolve::WildcardPolicy;
pub use error::{Fast5Error, ResolutionFailure};

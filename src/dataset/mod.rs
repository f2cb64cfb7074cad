//! Dataset discovery and the TU text format.

pub mod source;
pub mod tu;

pub use source::{source_for, CombcircSource, IscasSource, ISCAS85_RELIABILITY};
pub use tu::{TuDataset, TuDatasetBuilder, TuFile};

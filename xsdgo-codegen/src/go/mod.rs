//! Go code generation modules.

pub mod names;
pub mod records;

pub use names::{normalize, normalize_title, title_case, type_name};
pub use records::{Field, RecordRenderer};

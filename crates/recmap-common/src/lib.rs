//! Shared leaf utilities for the record mapping core.
//!
//! - **path**: get/set on nested records via dotted paths with
//!   `name[0]` bracket syntax, rejecting prototype-pollution segments
//! - **detect**: raw value type classification and emptiness rules

pub mod detect;
pub mod path;

pub use detect::{detect_value_type, is_empty_value, parse_number};
pub use path::{PathError, get_path, set_path};

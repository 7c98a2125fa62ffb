pub use crate::app::App;
pub use revue_types::prelude::*;

// vim: ts=4

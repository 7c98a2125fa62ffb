pub use revue_types::prelude::*;

// vim: ts=4

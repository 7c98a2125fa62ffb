pub use crate::error::{Error, RvResult};

pub use tracing::{debug, error, info, warn};

// vim: ts=4

//! Library side of the `fuel-lake` binary: logging setup, command bodies and
//! terminal summaries.

pub mod commands;
pub mod logging;
pub mod summary;

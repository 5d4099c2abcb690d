//! # Built-in listeners
//!
//! Small, self-contained implementations useful for demos and debugging.
//!
//! - [`LogListener`]: logs every event of one type through `tracing`.

mod log;

pub use log::LogListener;

//! Output subsystem.
//!
//! # Data Flow
//! ```text
//! rendered artifact (String, fully buffered)
//!     → writer.rs (create dirs, temp file, rename over target)
//!
//! filtered RouteRecord[] (--display / list)
//!     → table.rs (aligned, colored terminal table)
//! ```
//!
//! # Design Decisions
//! - Nothing touches the output path until the artifact is complete
//! - A failed run never leaves a partial file behind

pub mod table;
pub mod writer;

pub use table::render_table;
pub use writer::write_atomic;

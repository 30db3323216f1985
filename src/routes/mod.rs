//! Route collector subsystem.
//!
//! # Data Flow
//! ```text
//! Route manifest (JSON exported by the host router)
//!     → source.rs (parse, flatten domains, normalize records)
//!     → drop unnamed routes (no tree path)
//!     → filter.rs (keyword / middleware / ignore-middleware, AND semantics)
//!     → ordered RouteRecord[] handed to the compiler
//! ```
//!
//! # Design Decisions
//! - Input order is preserved end to end; the compiler's last-wins rule depends on it
//! - An empty result is reported, never an error
//! - Pure transformation over the supplied snapshot

pub mod filter;
pub mod record;
pub mod source;

pub use filter::{FilterOptions, Matcher};
pub use record::{Handler, RouteRecord};
pub use source::{ManifestSource, RawRoute};

/// Normalize `raw`, drop unnamed routes and keep those passing every filter.
pub fn collect(raw: Vec<RawRoute>, options: &FilterOptions) -> Vec<RouteRecord> {
    let total = raw.len();
    let named: Vec<RouteRecord> = raw.into_iter().filter_map(RawRoute::into_record).collect();
    let matcher = options.matcher();

    let routes: Vec<RouteRecord> = named
        .into_iter()
        .filter(|route| matcher.matches(route))
        .collect();

    tracing::debug!(total, kept = routes.len(), "Routes collected");
    routes
}

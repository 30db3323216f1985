//! Named-route compiler library.
//!
//! Turns the host router's named routes into a client module exposing
//! `route(name, params, query)` and `current(name)`.

pub mod compiler;
pub mod config;
pub mod error;
pub mod generate;
pub mod observability;
pub mod output;
pub mod resolver;
pub mod routes;

pub use compiler::{Compilation, NameMap, NameTree};
pub use config::schema::ChimeraConfig;
pub use error::ChimeraError;
pub use generate::{GenerateReport, Generator};
pub use routes::{FilterOptions, RouteRecord};

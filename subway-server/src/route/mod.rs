//! Route resolution over the topology.
//!
//! Given two stations this answers which line joins them, which way to ride
//! it, and whether a particular train will actually get there.

mod error;
mod path;
mod resolver;


pub use error::ResolveError;
pub use resolver::{Route, RouteResolver};

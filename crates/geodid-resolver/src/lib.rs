//! GeoDID resolution.
//!
//! A [`ResolutionProtocol`] maps identifier methods to [`Driver`]s. The
//! built-in [`GeoDidDriver`] handles `did:geo:*` by reading the registry for
//! the current content hash and decoding the document stored under it.
//! Resolution is read-only.

pub mod driver;
pub mod error;
pub mod geo;
pub mod protocol;

pub use driver::{Driver, Resolution};
pub use error::{ResolveError, ResolveResult};
pub use geo::GeoDidDriver;
pub use protocol::ResolutionProtocol;

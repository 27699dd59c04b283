//! Place data model.
//!
//! # Data Flow
//! ```text
//! upstream JSON array
//!     → types.rs (PlaceRecord, lenient decode)
//!     → transform.rs (field renaming)
//!     → types.rs (Place, serialized to the client)
//! ```

pub mod transform;
pub mod types;

pub use transform::transform;
pub use types::{Place, PlaceRecord};

//! AppShot Device Model
//!
//! Defines the static description of the devices a screenshot can be
//! framed in:
//! - **Profile:** screenshot canvas size, bar heights, and frame margins
//! - **Registry:** the ordered, validated table of profiles keyed by id
//! - **Geometry:** frame rectangle, rounded outline, and screen regions
//!   derived from a profile
//!
//! Profiles are validated once at registration; everything downstream
//! assumes they satisfy their invariants.

pub mod geometry;
pub mod profile;
pub mod registry;

pub use geometry::*;
pub use profile::*;
pub use registry::*;

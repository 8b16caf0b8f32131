//! Card system: characters, districts, and the district catalogue.
//!
//! ## Key Types
//!
//! - `Character`: One of the eight fixed characters, ordered by turn
//! - `CharacterRegistry`: Lookup over the eight characters
//! - `DistrictCard`: A building card with color, cost and optional ability
//! - `DistrictRegistry`: Catalogue of district templates and quantities

pub mod character;
pub mod district;
pub mod registry;

pub use character::{Character, CharacterRegistry};
pub use district::{names, Color, DistrictCard, UnknownColor};
pub use registry::{DistrictRegistry, DistrictTemplate, STANDARD_DISTRICTS};

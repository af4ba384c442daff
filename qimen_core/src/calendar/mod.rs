//! # Solar Calendar Engine
//!
//! Pure functions from a civil timestamp to the four sexagenary pillars.
//! Nothing here performs I/O or keeps state; identical inputs always give
//! identical outputs, so callers may cache or parallelise freely.
//!
//! ## Modules
//!
//! - [`solar_terms`] - Linear-ephemeris solar term instants and lookups
//! - [`true_solar`] - Longitude correction of civil time
//! - [`pillars`] - Year/month/day/hour pillar derivation

pub mod pillars;
pub mod solar_terms;
pub mod true_solar;

pub use pillars::{compute_four_pillars, FourPillars};
pub use solar_terms::{latest_term_at, solar_terms, terms_around, SolarTerm, SolarTermInstant};
pub use true_solar::{true_solar_offset, true_solar_time};

//! # qimen_core - Four-Pillar Calendar and Divination Board Engine
//!
//! `qimen_core` computes the sexagenary four pillars (year, month, day, hour)
//! of a civil timestamp and derives a nine-palace divination board from them.
//! All inputs and outputs are JSON-serializable so the board can be handed to
//! a display layer or embedded verbatim in a downstream request.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All public records implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Validate at the edge**: bad input is rejected before the engine runs
//!
//! ## Quick Start
//!
//! ```rust
//! use qimen_core::{compute_board, CalendarSettings, ChartInput};
//!
//! let input = ChartInput::parse("2024-02-10", Some("12:00"), Some("116.4")).unwrap();
//! let board = compute_board(&input, &CalendarSettings::default()).unwrap();
//!
//! println!("{} {}局", board.polarity_label, board.bureau);
//! let json = serde_json::to_string_pretty(&board).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`cycle`] - Stems, branches and pillars
//! - [`calendar`] - Solar terms, true solar time, four-pillar derivation
//! - [`board`] - Bureau, polarity, palaces and the board record
//! - [`input`] - Chart input parsing and validation
//! - [`settings`] - Civil time zone and defaults
//! - [`errors`] - Structured error types

pub mod board;
pub mod calendar;
pub mod cycle;
pub mod errors;
pub mod input;
pub mod settings;

// Re-export commonly used types at crate root for convenience
pub use board::{compute_board, compute_pillars, Board, Palace, PillarReading};
pub use calendar::{compute_four_pillars, FourPillars, SolarTerm};
pub use cycle::{Branch, Pillar, Polarity, Stem};
pub use errors::{CalcError, CalcResult};
pub use input::ChartInput;
pub use settings::{load_settings, CalendarSettings};

//! Tour CLI - terminal front end for the drive tour planner.
//!
//! - display: text rendering of offers, plan events and the leg table
//! - prompt: parsing of the interactive candidate choice
//! - recovery: how a failed step continues

pub mod display;
pub mod prompt;
pub mod recovery;

pub use display::{describe_event, format_candidates, format_summary};
pub use prompt::{parse_choice, Choice};
pub use recovery::{recovery_for, Recovery};

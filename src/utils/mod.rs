//! Utility modules shared by the freezer and the CLI.

pub mod path;
pub mod plural;

pub use plural::plural_count;

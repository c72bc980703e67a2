pub mod fixtures;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use fixtures::{at_minute, AppSeed, Fixture, RoomSeed};

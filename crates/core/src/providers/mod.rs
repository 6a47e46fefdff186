pub mod traits;

// Store implementations
pub mod wger;

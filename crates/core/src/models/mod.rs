pub mod measurement;
pub mod report;
pub mod section;
pub mod settings;
pub mod workout;

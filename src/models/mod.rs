pub mod attendance;
pub mod common;
pub mod exams;
pub mod instructors;
pub mod recitations;
pub mod references;

pub use common::ChoiceOption;

pub mod options;
pub mod serde_helpers;

pub use options::ChoiceOption;

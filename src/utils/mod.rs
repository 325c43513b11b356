pub mod file_magic;
pub mod validate;

pub use file_magic::detect_content_type;
pub use validate::{parse_int, passwords_match};

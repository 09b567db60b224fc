pub mod file_ops;
pub mod validation;

pub use file_ops::{load_options, read_script, FileOperations};
pub use validation::{parse_command, Command};

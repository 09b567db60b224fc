pub mod error_mapper;

pub use error_mapper::{map_command_error, map_file_load_error, map_file_save_error, map_revert_error};

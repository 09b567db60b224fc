pub mod dialogs;
pub mod formatting;
pub mod updates;

pub use dialogs::{set_status, show_error, StatusLevel};
pub use updates::{print_commit, print_group, print_snapshot, print_view};

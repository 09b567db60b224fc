pub mod file_handlers;
pub mod filter_handlers;

use crate::operations::Command;
use crate::state::AppState;

/// Run one parsed command against the application state
pub fn execute(state: &mut AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Save { path } => file_handlers::handle_save(state, path.as_deref()),
        Command::Revert => file_handlers::handle_revert(state),
        Command::Validate => file_handlers::handle_validate(state),
        Command::Show { group } => file_handlers::handle_show(state, group.as_deref()),
        other => filter_handlers::handle_filter_command(state, other),
    }
}

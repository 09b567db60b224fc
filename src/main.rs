mod errors;
mod handlers;
mod operations;
mod state;
mod ui;

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::operations::{parse_command, read_script, FileOperations};
use crate::state::AppState;
use crate::ui::{print_snapshot, set_status, show_error, StatusLevel};

/// Filter Deck - Edit dashboard filter selections from the command line
///
/// Examples:
///   # Summarise every filter group
///   filterdeck filters.json
///
///   # Toggle the second country and commit the change
///   filterdeck filters.json -e "toggle Country 1" -e "commit Country"
///
///   # Search a group and print its index view
///   filterdeck filters.json -e "search Publisher goo" -e "view Publisher"
///
///   # Run a script of commands and save the result elsewhere
///   filterdeck filters.json --script edits.txt --output committed.json
#[derive(Parser, Debug)]
#[command(name = "filterdeck")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Commands:\n  \
    toggle <group> <index>            Toggle one option by position\n  \
    toggle-key <group> <label> [tag]  Toggle one option by label and group tag\n  \
    select-all <group>                Toggle select all\n  \
    toggle-group <group> <label>      Toggle every option under a group label\n  \
    clear <group>                     Clear the selection\n  \
    search <group> [text...]          Set the search text\n  \
    view <group> [limit]              Print the search/index view\n  \
    scroll <group> <top> <viewport> <content>\n  \
    jump <group> <key>                Jump to an index header\n  \
    commit [group]                    Commit one group, or every touched group\n  \
    discard                           Drop uncommitted edits\n  \
    show [group]                      Print group summaries\n  \
    validate                          Check the committed filters\n  \
    save [path]                       Write the committed filters\n\n\
Lines starting with '#' in scripts are ignored. Quote labels with spaces.")]
struct Cli {
    /// Path to the filter map JSON file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Engine options JSON file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Serialize multi-select groups as keyed maps
    #[arg(long)]
    grouped: bool,

    /// Radio-style selection with an "All" entry
    #[arg(long)]
    single_select: bool,

    /// Command to run (can be specified multiple times)
    #[arg(short = 'e', long = "exec", value_name = "COMMAND")]
    commands: Vec<String>,

    /// File with one command per line, run after --exec commands
    #[arg(short, long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Write committed filters here when the session ends
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        let (title, message, details) = errors::map_command_error(&err);
        show_error(&title, &message, &details);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = operations::load_options(cli.config.as_deref(), cli.grouped, cli.single_select)?;
    let mut state = AppState::new(options);

    if !FileOperations::new(&mut state).load_file(&cli.file) {
        process::exit(1);
    }

    let mut lines = cli.commands.clone();
    if let Some(script) = &cli.script {
        lines.extend(read_script(script)?);
    }

    if lines.is_empty() {
        print_snapshot(&state);
        return Ok(());
    }

    for line in &lines {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                set_status(&format!("{} ({})", err, line), StatusLevel::Error);
                process::exit(2);
            }
        };
        handlers::execute(&mut state, command)?;
    }

    if state.has_pending_edits() {
        set_status(
            "Uncommitted edits were discarded; end scripts with 'commit' to keep them",
            StatusLevel::Warning,
        );
    }

    if let Some(output) = &cli.output {
        if !FileOperations::new(&mut state).save_file_as(output) {
            process::exit(1);
        }
    }

    Ok(())
}

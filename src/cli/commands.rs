use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tack", about = concat!("[#] tack v", env!("CARGO_PKG_VERSION"), " - a kanban board in your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to tack.toml (default: $TACK_CONFIG, then search upward from cwd)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Override the backend base URL from the config file
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Log to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the board, one section per column
    Board,
    /// Show task details
    Show(ShowArgs),
    /// Move a task to a column
    Move(MoveArgs),
    /// Move a task one column to the right
    Advance(IdArg),
    /// Move a task one column to the left
    Retreat(IdArg),
    /// Toggle a subtask's done flag
    Check(CheckArgs),
    /// Delete a task
    Delete(IdArg),
    /// Search titles and descriptions
    Search(SearchArgs),
    /// Create a task in To do
    Add(AddArgs),
    /// List users with their initials and avatar colors
    Users,
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Case-insensitive substring
    pub term: String,
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Task ID
    pub id: String,
    /// Target status: todo, in-progress, await, done
    pub status: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Task ID
    pub id: String,
    /// Subtask number (1-based)
    pub n: usize,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Task description
    pub description: String,
    /// Due date (YYYY-MM-DD, today or later)
    #[arg(long)]
    pub due: String,
    /// Priority: Urgent, Medium, Low
    #[arg(long, default_value = "Medium")]
    pub prio: String,
    /// Category: User_Story, Technical_Task
    #[arg(long)]
    pub category: Option<String>,
    /// Assign a user by full name (repeatable)
    #[arg(long = "assign")]
    pub assign: Vec<String>,
    /// Add a subtask (repeatable)
    #[arg(long = "subtask")]
    pub subtask: Vec<String>,
}

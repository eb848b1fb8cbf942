use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notes-portal", version, about = "Student note-sharing portal")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Run the web server (default)
    Serve {
        /// Overrides HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Insert the default branches, semesters and subjects; safe to repeat
    SeedSubjects,
    /// Create a staff account, or promote an existing user to staff
    CreateStaff {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Leave empty to keep the password of an existing account
        #[arg(long, env = "STAFF_PASSWORD", default_value = "", hide_env_values = true)]
        password: String,
    },
    /// Add or remove points for a user, recorded in their points history
    AdjustPoints {
        #[arg(long)]
        username: String,
        #[arg(long, allow_negative_numbers = true)]
        delta: i32,
        #[arg(long, default_value = "Manual adjustment")]
        action: String,
    },
}

use clap::{Parser, Subcommand};

/// helpdesk - customer support tickets with an automatic closure window
#[derive(Parser, Debug)]
#[command(name = "helpdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project directory (defaults to the nearest directory containing .helpdesk)
    #[arg(short = 'p', long, global = true)]
    pub project: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a help desk in the current directory
    Init {
        /// Display name of the help desk
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Sign in by creating a local profile
    Login {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Remove the local profile
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Submit a new ticket
    New {
        /// Category (Account Related, Technical Support, Billing Support, Feature Request, Other)
        #[arg(short, long)]
        category: Option<String>,

        /// What went wrong
        #[arg(short, long)]
        description: Option<String>,

        /// URL of a screenshot or other attachment
        #[arg(short, long)]
        attachment: Option<String>,
    },

    /// List tickets (your own, newest first)
    List {
        /// List every ticket, not only your own
        #[arg(short, long)]
        all: bool,

        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,

        /// Maximum number of tickets to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a ticket with its response thread
    Show {
        /// Ticket ID or reference
        ticket: String,
    },

    /// Answer a ticket and mark it resolved
    Resolve {
        /// Ticket ID or reference
        ticket: String,

        /// Support answer
        #[arg(short, long)]
        message: Option<String>,

        /// URL of an attachment for the answer
        #[arg(short, long)]
        attachment: Option<String>,
    },

    /// Reopen a resolved or closed ticket
    Reopen {
        /// Ticket ID or reference
        ticket: String,

        /// Why the ticket is being reopened
        #[arg(short, long)]
        message: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Close every resolution older than the closure threshold, once
    Sweep,

    /// Run the closure sweep on an interval and report lifecycle events
    Watch {
        /// Override the sweep interval (e.g. 30s, 5m)
        #[arg(short, long)]
        interval: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Show only this key (e.g. lifecycle.closure_threshold)
        key: Option<String>,
    },
}

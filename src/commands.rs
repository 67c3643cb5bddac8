//! Command-line surface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "revox",
    about = "REVOX motorcycle maintenance tracker",
    long_about = "REVOX - Motorcycle maintenance records with AI-assisted answers

OVERVIEW:
  Keep track of your bikes and their maintenance, and ask the AI about
  maintenance for a specific bike and category.

WORKFLOW:
  1. Sign in with a Google ID token, or as a guest
  2. Register your bikes
  3. Record maintenance tasks, or ask the AI and accept its answer as a task

QUICK START:
  revox guest                                  # Start a guest session
  revox bikes add --manufacturer Honda --model-name CBR250RR
  revox tasks list <BIKE_ID>                   # Maintenance tasks of a bike
  revox ask <BIKE_ID> <CATEGORY_ID> <QUESTION> # Ask the AI
  revox accept <QUESTION_ID>                   # Turn an answer into a task
  revox status                                 # Session and endpoint",
    version = CURRENT_VERSION,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with a Google ID token
    Login(LoginArgs),

    /// Start a guest session
    Guest,

    /// Sign out and forget the session
    Logout,

    /// Show session and endpoint
    #[command(aliases = &["st"])]
    Status,

    /// Bikes and latest maintenance at a glance
    #[command(aliases = &["home"])]
    Dashboard,

    /// Show or change your profile
    Profile(ProfileArgs),

    /// Manage bikes
    Bikes(BikesArgs),

    /// List maintenance categories
    Categories,

    /// Manage maintenance tasks
    Tasks(TasksArgs),

    /// Ask the AI about one bike in one category
    Ask(AskArgs),

    /// Past AI questions
    History(HistoryArgs),

    /// Save an AI answer as a maintenance task
    Accept(AcceptArgs),

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    /// Google ID token; prompted for when omitted
    pub id_token: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    Update {
        nickname: String,
    },
    /// Delete the account
    Delete {
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct BikesArgs {
    #[command(subcommand)]
    pub command: BikeCommand,
}

#[derive(Subcommand)]
pub enum BikeCommand {
    #[command(aliases = &["ls"])]
    List {
        /// Only bikes whose manufacturer, model name or model code contains this
        #[arg(short, long)]
        search: Option<String>,
    },
    Show {
        bike_id: i64,
    },
    Add(BikeFields),
    /// Change the given fields; the rest keep their current values
    Edit {
        bike_id: i64,
        #[command(flatten)]
        fields: BikeFields,
    },
    #[command(aliases = &["rm"])]
    Remove {
        bike_id: i64,
        #[arg(short, long)]
        force: bool,
    },
}

/// Bike form fields; values are validated before anything is sent
#[derive(Args, Default)]
pub struct BikeFields {
    #[arg(long)]
    pub manufacturer: Option<String>,
    #[arg(long)]
    pub model_name: Option<String>,
    #[arg(long)]
    pub model_code: Option<String>,
    #[arg(long)]
    pub model_year: Option<String>,
    #[arg(long)]
    pub mileage: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub purchase_date: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
}

#[derive(Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    #[command(aliases = &["ls"])]
    List {
        bike_id: i64,
        #[arg(short, long)]
        category: Option<i64>,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    Add {
        bike_id: i64,
        #[arg(short, long)]
        category: i64,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
    },
    Edit {
        task_id: i64,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
    },
    #[command(aliases = &["rm"])]
    Remove {
        task_id: i64,
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct AskArgs {
    pub bike_id: i64,
    pub category_id: i64,
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(short, long)]
    pub category: Option<i64>,
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Args)]
pub struct AcceptArgs {
    pub question_id: i64,
    /// Use this text instead of the AI's answer
    #[arg(short, long)]
    pub answer: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetEndpoint { url: String },
    SetTimeout { seconds: u64 },
    SetPageSize { size: usize },
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::parse_from(["revox", "ask", "3", "2", "How", "tight", "is", "the", "chain?"]);
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.bike_id, 3);
                assert_eq!(args.question.join(" "), "How tight is the chain?");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_bike_list_search() {
        let cli = Cli::parse_from(["revox", "bikes", "ls", "--search", "cbr"]);
        match cli.command {
            Commands::Bikes(BikesArgs {
                command: BikeCommand::List { search },
            }) => assert_eq!(search.as_deref(), Some("cbr")),
            _ => panic!("expected bikes list"),
        }
    }

    #[test]
    fn test_bike_edit_fields_optional() {
        let cli = Cli::parse_from(["revox", "bikes", "edit", "4", "--mileage", "12000"]);
        match cli.command {
            Commands::Bikes(BikesArgs {
                command: BikeCommand::Edit { bike_id, fields },
            }) => {
                assert_eq!(bike_id, 4);
                assert_eq!(fields.mileage.as_deref(), Some("12000"));
                assert!(fields.manufacturer.is_none());
            }
            _ => panic!("expected bikes edit"),
        }
    }
}

//! Command-line surface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use reviewdesk_core::{Availability, LogLevel, UserRole};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "reviewdesk")]
#[command(about = "Reviewer panel assignment and review workflow")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalOpts {
    /// SQLite database file
    #[arg(long, global = true, env = "REVIEWDESK_DB", default_value = "reviewdesk.sqlite3")]
    pub db: PathBuf,

    /// Directory for rotating log files; logging stays off when unset
    #[arg(long, global = true, env = "REVIEWDESK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, global = true, env = "REVIEWDESK_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage accounts
    #[command(subcommand)]
    User(UserCommand),
    /// Manage submitted documents
    #[command(subcommand)]
    Doc(DocCommand),
    /// Select and seat a reviewer panel for a pending document
    Assign { document_id: Uuid },
    /// List a reviewer's assignments
    Assignments { reviewer_id: Uuid },
    /// Mark an assignment as being reviewed
    StartReview {
        assignment_id: Uuid,
        #[arg(long)]
        reviewer: Uuid,
    },
    /// Submit the scored review for an assignment
    Review(ReviewArgs),
    /// Print aggregate statistics
    Stats,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Reviewer)]
        role: RoleArg,
        /// Expertise tags, comma separated or repeated
        #[arg(long, value_delimiter = ',')]
        expertise: Vec<String>,
        #[arg(long, value_enum, default_value_t = AvailabilityArg::Active)]
        status: AvailabilityArg,
    },
    /// List users, optionally by role
    List {
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
    /// Change a reviewer's availability
    Status {
        user_id: Uuid,
        #[arg(value_enum)]
        status: AvailabilityArg,
    },
}

#[derive(Subcommand)]
pub enum DocCommand {
    /// Submit a document; it starts pending
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long = "abstract", default_value = "")]
        abstract_text: String,
        #[arg(long, default_value = "")]
        keywords: String,
        /// Subject field matched against reviewer expertise
        #[arg(long)]
        field: Option<String>,
    },
    /// List documents with panel and score summary
    List,
}

#[derive(Args)]
pub struct ReviewArgs {
    pub assignment_id: Uuid,
    #[arg(long)]
    pub reviewer: Uuid,
    /// 0-30
    #[arg(long)]
    pub innovation: i32,
    /// 0-25
    #[arg(long)]
    pub feasibility: i32,
    /// 0-25
    #[arg(long)]
    pub quality: i32,
    /// 0-20
    #[arg(long)]
    pub value: i32,
    #[arg(long, default_value = "")]
    pub comments: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Reviewer,
    Author,
}

impl From<RoleArg> for UserRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::Reviewer => UserRole::Reviewer,
            RoleArg::Author => UserRole::Author,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AvailabilityArg {
    Active,
    Busy,
    Vacation,
}

impl From<AvailabilityArg> for Availability {
    fn from(value: AvailabilityArg) -> Self {
        match value {
            AvailabilityArg::Active => Availability::Active,
            AvailabilityArg::Busy => Availability::Busy,
            AvailabilityArg::Vacation => Availability::Vacation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, DocCommand, UserCommand};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn expertise_accepts_comma_separated_tags() {
        let cli = Cli::try_parse_from([
            "reviewdesk",
            "user",
            "add",
            "--username",
            "alice",
            "--name",
            "Alice",
            "--email",
            "alice@example.com",
            "--expertise",
            "NLP,Vision",
        ])
        .unwrap();
        match cli.command {
            Commands::User(UserCommand::Add { expertise, .. }) => {
                assert_eq!(expertise, vec!["NLP".to_string(), "Vision".to_string()]);
            }
            _ => panic!("expected user add"),
        }
    }

    #[test]
    fn global_db_flag_works_after_subcommand() {
        let cli = Cli::try_parse_from(["reviewdesk", "doc", "list", "--db", "/tmp/x.sqlite3"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Doc(DocCommand::List)));
        assert_eq!(cli.global.db.to_str(), Some("/tmp/x.sqlite3"));
    }

    #[test]
    fn assign_has_no_panel_size_or_cap_overrides() {
        let document_id = "6f1c2d4e-8a3b-4c5d-9e0f-1a2b3c4d5e6f";
        assert!(Cli::try_parse_from(["reviewdesk", "assign", document_id]).is_ok());
        for flag in ["--panel-size", "--workload-cap"] {
            assert!(Cli::try_parse_from(["reviewdesk", "assign", document_id, flag, "1"]).is_err());
        }
    }

    #[test]
    fn doc_abstract_defaults_to_empty() {
        let cli = Cli::try_parse_from(["reviewdesk", "doc", "add", "--title", "T", "--author", "A"])
            .unwrap();
        match cli.command {
            Commands::Doc(DocCommand::Add { abstract_text, .. }) => assert!(abstract_text.is_empty()),
            _ => panic!("expected doc add"),
        }
    }

    #[test]
    fn malformed_uuid_is_rejected() {
        assert!(Cli::try_parse_from(["reviewdesk", "assign", "not-a-uuid"]).is_err());
    }
}

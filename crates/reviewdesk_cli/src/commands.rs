//! Subcommand dispatch over the core services.
//!
//! Every command opens its own connection, runs one use case and prints the
//! result as pretty JSON on stdout.

use crate::args::{Commands, DocCommand, ReviewArgs, UserCommand};
use crate::error::CliError;
use reviewdesk_core::{
    open_db, CatalogService, NewDocument, NewUser, PanelService, ReviewScores,
    ReviewService, ReviewSubmission, StatsService,
};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

pub fn run(db_path: &Path, command: Commands) -> Result<(), CliError> {
    let mut conn = open_db(db_path)?;
    match command {
        Commands::User(command) => run_user(&mut conn, command),
        Commands::Doc(command) => run_doc(&mut conn, command),
        Commands::Assign { document_id } => {
            print_json(&PanelService::new(&mut conn).assign_panel(document_id)?)
        }
        Commands::Assignments { reviewer_id } => {
            let assignments = ReviewService::new(&mut conn).list_assignments_for(reviewer_id)?;
            print_json(&assignments)
        }
        Commands::StartReview {
            assignment_id,
            reviewer,
        } => {
            let assignment = ReviewService::new(&mut conn).start_review(assignment_id, reviewer)?;
            print_json(&assignment)
        }
        Commands::Review(args) => run_review(&mut conn, args),
        Commands::Stats => print_json(&StatsService::new(&conn).statistics()?),
    }
}

fn run_user(conn: &mut Connection, command: UserCommand) -> Result<(), CliError> {
    let mut catalog = CatalogService::new(conn);
    match command {
        UserCommand::Add {
            username,
            name,
            email,
            role,
            expertise,
            status,
        } => {
            let user = catalog.create_user(&NewUser {
                username,
                name,
                email,
                role: role.into(),
                expertise,
                status: status.into(),
            })?;
            print_json(&user)
        }
        UserCommand::List { role } => print_json(&catalog.list_users(role.map(Into::into))?),
        UserCommand::Status { user_id, status } => {
            print_json(&catalog.set_user_status(user_id, status.into())?)
        }
    }
}

fn run_doc(conn: &mut Connection, command: DocCommand) -> Result<(), CliError> {
    let mut catalog = CatalogService::new(conn);
    match command {
        DocCommand::Add {
            title,
            author,
            abstract_text,
            keywords,
            field,
        } => {
            let document = catalog.create_document(&NewDocument {
                title,
                author,
                abstract_text,
                keywords,
                field,
            })?;
            print_json(&document)
        }
        DocCommand::List => print_json(&catalog.list_documents()?),
    }
}

fn run_review(conn: &mut Connection, args: ReviewArgs) -> Result<(), CliError> {
    let submission = ReviewSubmission {
        scores: ReviewScores::new(args.innovation, args.feasibility, args.quality, args.value),
        comments: args.comments,
    };
    let receipt =
        ReviewService::new(conn).submit_review(args.assignment_id, args.reviewer, &submission)?;
    print_json(&receipt)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Command-line surface.
//!
//! Every data command goes through the [`Backend`] dispatcher, so the same
//! invocations work against the local database or a remote peer. Operation
//! errors are printed and end the invocation without crashing the process.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::ServiceError;
use crate::models::*;
use crate::service::{self, Backend};
use crate::{api, db};

#[derive(Parser)]
#[command(name = "rolodex")]
#[command(about = "Contact, organization, note and task management")]
pub struct Cli {
    /// Base URL of a remote rolodex server; overrides ROLODEX_REMOTE_URL
    #[arg(long, global = true)]
    pub remote: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server against the local database
    Serve {
        /// Port for the HTTP API
        #[arg(short, long, default_value = "7010")]
        port: u16,
    },
    /// Show a weekly overview: calendar, urgent tasks, top contacts
    Init,
    /// Manage contacts
    #[command(subcommand)]
    Contacts(ContactsCommand),
    /// Manage organizations
    #[command(subcommand)]
    Orgs(OrgsCommand),
    /// Manage notes and their tags
    #[command(subcommand)]
    Notes(NotesCommand),
    /// Manage tasks with due dates and importance scores
    #[command(subcommand)]
    Tasks(TasksCommand),
}

#[derive(Subcommand)]
pub enum ContactsCommand {
    /// Add a new contact
    Add {
        #[arg(short, long)]
        first_name: String,
        #[arg(short, long)]
        last_name: String,
    },
    /// List all contacts
    List,
    /// Show the contacts with the most notes
    Top {
        #[arg(short = 'n', long, default_value = "10")]
        limit: u32,
    },
    /// Search contacts by name
    Search { query: String },
    /// Add several contacts at once ("First Last" or bare "First")
    BulkAdd {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum OrgsCommand {
    /// Add a new organization
    Add {
        #[arg(short, long)]
        name: String,
    },
    /// List all organizations
    List,
    /// Show the organizations with the most notes
    Top {
        #[arg(short = 'n', long, default_value = "10")]
        limit: u32,
    },
}

#[derive(Subcommand)]
pub enum NotesCommand {
    /// Add a new note with optional tags
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        /// Contact ID to tag (repeatable)
        #[arg(short = 'C', long = "contact")]
        contacts: Vec<i64>,
        /// Organization ID to tag (repeatable)
        #[arg(short = 'O', long = "organization")]
        organizations: Vec<i64>,
        /// Task ID to tag (repeatable)
        #[arg(short = 'T', long = "task")]
        tasks: Vec<i64>,
    },
    /// List notes, optionally filtered by one contact or organization
    List {
        #[arg(short = 'n', long, default_value = "20")]
        limit: u32,
        #[arg(short = 'c', long)]
        contact: Option<i64>,
        #[arg(short = 'o', long)]
        organization: Option<i64>,
    },
    /// Show one note in full
    View { note_id: i64 },
    /// Add or remove tags on a note
    Tag {
        note_id: i64,
        #[arg(long = "add-contact")]
        add_contacts: Vec<i64>,
        #[arg(long = "remove-contact")]
        remove_contacts: Vec<i64>,
        #[arg(long = "add-organization")]
        add_organizations: Vec<i64>,
        #[arg(long = "remove-organization")]
        remove_organizations: Vec<i64>,
        #[arg(long = "add-task")]
        add_tasks: Vec<i64>,
        #[arg(long = "remove-task")]
        remove_tasks: Vec<i64>,
    },
}

#[derive(Subcommand)]
pub enum TasksCommand {
    /// Add a new task
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date: YYYY-MM-DD (end of day) or YYYY-MM-DDTHH:MM:SS
        #[arg(short = 'D', long)]
        due_date: String,
        /// Importance score, 0-10
        #[arg(short, long, default_value = "0")]
        importance: i32,
        /// Contact ID to tag (repeatable)
        #[arg(short = 'C', long = "contact")]
        contacts: Vec<i64>,
        /// Organization ID to tag (repeatable)
        #[arg(short = 'O', long = "organization")]
        organizations: Vec<i64>,
    },
    /// List tasks by due date
    List {
        #[arg(short = 'n', long, default_value = "20")]
        limit: u32,
        /// Include completed tasks
        #[arg(short = 'c', long)]
        show_completed: bool,
        #[arg(short = 'C', long)]
        contact: Option<i64>,
        #[arg(short = 'O', long)]
        organization: Option<i64>,
    },
    /// Show one task in full
    View { task_id: i64 },
    /// Show incomplete tasks due within a window
    Urgent {
        #[arg(short, long, default_value = "7")]
        days: i64,
        /// Sort by "urgency" (due date) or "importance"
        #[arg(short, long, default_value = "urgency")]
        sort_by: String,
    },
    /// Mark a task as completed
    Complete { task_id: i64 },
    /// Mark a task as incomplete
    Uncomplete { task_id: i64 },
    /// Add or remove contact/organization tags on a task
    Tag {
        task_id: i64,
        #[arg(long = "add-contact")]
        add_contacts: Vec<i64>,
        #[arg(long = "remove-contact")]
        remove_contacts: Vec<i64>,
        #[arg(long = "add-organization")]
        add_organizations: Vec<i64>,
        #[arg(long = "remove-organization")]
        remove_organizations: Vec<i64>,
    },
}

pub async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    if cli.remote.is_some() {
        config.remote_url = cli.remote;
    }

    match cli.command {
        Commands::Serve { port } => serve(&config, port).await,
        command => {
            let backend = service::backend_from_config(&config)?;
            dispatch(command, backend).await;
            Ok(())
        }
    }
}

async fn serve(config: &Config, port: u16) -> anyhow::Result<()> {
    let db = match &config.db_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    let app = api::create_router(db);
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    tracing::info!("rolodex API listening on http://127.0.0.1:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn dispatch(command: Commands, backend: Arc<dyn Backend>) {
    match command {
        // Serve never reaches here; run() starts the server before building
        // a backend.
        Commands::Serve { .. } => {}
        Commands::Init => init_overview(backend.as_ref()).await,
        Commands::Contacts(cmd) => contacts(cmd, backend.as_ref()).await,
        Commands::Orgs(cmd) => orgs(cmd, backend.as_ref()).await,
        Commands::Notes(cmd) => notes(cmd, backend.as_ref()).await,
        Commands::Tasks(cmd) => tasks(cmd, backend.as_ref()).await,
    }
}

fn report(err: &ServiceError) {
    eprintln!("error: {err}");
}

// ============================================================
// Contacts
// ============================================================

async fn contacts(command: ContactsCommand, backend: &dyn Backend) {
    match command {
        ContactsCommand::Add {
            first_name,
            last_name,
        } => match backend
            .add_person(CreatePersonInput {
                first_name,
                last_name,
            })
            .await
        {
            Ok(person) => println!("Contact added: {} (ID: {})", person.full_name(), person.id),
            Err(e) => report(&e),
        },

        ContactsCommand::List => match backend.list_persons().await {
            Ok(persons) if persons.is_empty() => println!("No contacts found."),
            Ok(persons) => {
                println!("\nAll contacts ({}):\n", persons.len());
                println!("{:<6} {:<20} {:<20}", "ID", "First name", "Last name");
                println!("{}", "-".repeat(48));
                for person in persons {
                    println!(
                        "{:<6} {:<20} {:<20}",
                        person.id, person.first_name, person.last_name
                    );
                }
            }
            Err(e) => report(&e),
        },

        ContactsCommand::Top { limit } => match backend.top_persons(limit).await {
            Ok(rows) if rows.is_empty() => println!("No contacts found."),
            Ok(rows) => {
                println!("\nTop {limit} contacts by note count:\n");
                println!("{:<6} {:<30} {:<6}", "ID", "Name", "Notes");
                println!("{}", "-".repeat(44));
                for row in rows {
                    println!(
                        "{:<6} {:<30} {:<6}",
                        row.person.id,
                        row.person.full_name(),
                        row.note_count
                    );
                }
            }
            Err(e) => report(&e),
        },

        ContactsCommand::Search { query } => match backend.search_persons(&query).await {
            Ok(persons) if persons.is_empty() => {
                println!("No contacts found matching '{query}'");
            }
            Ok(persons) => {
                println!("\nFound {} contact(s) matching '{query}':\n", persons.len());
                println!("{:<6} {:<20} {:<20}", "ID", "First name", "Last name");
                println!("{}", "-".repeat(48));
                for person in persons {
                    println!(
                        "{:<6} {:<20} {:<20}",
                        person.id, person.first_name, person.last_name
                    );
                }
            }
            Err(e) => report(&e),
        },

        ContactsCommand::BulkAdd { names } => match backend.bulk_add_persons(&names).await {
            Ok(outcome) => {
                if !outcome.added.is_empty() {
                    println!("Added {} contact(s):", outcome.added.len());
                    for name in &outcome.added {
                        println!("  - {name}");
                    }
                }
                if !outcome.skipped.is_empty() {
                    println!("Skipped {} existing contact(s):", outcome.skipped.len());
                    for name in &outcome.skipped {
                        println!("  - {name}");
                    }
                }
            }
            Err(e) => report(&e),
        },
    }
}

// ============================================================
// Organizations
// ============================================================

async fn orgs(command: OrgsCommand, backend: &dyn Backend) {
    match command {
        OrgsCommand::Add { name } => match backend
            .add_organization(CreateOrganizationInput { name })
            .await
        {
            Ok(org) => println!("Organization added: {} (ID: {})", org.name, org.id),
            Err(e) => report(&e),
        },

        OrgsCommand::List => match backend.list_organizations().await {
            Ok(orgs) if orgs.is_empty() => println!("No organizations found."),
            Ok(orgs) => {
                println!("\nAll organizations ({}):\n", orgs.len());
                println!("{:<6} {:<40}", "ID", "Name");
                println!("{}", "-".repeat(48));
                for org in orgs {
                    println!("{:<6} {:<40}", org.id, org.name);
                }
            }
            Err(e) => report(&e),
        },

        OrgsCommand::Top { limit } => match backend.top_organizations(limit).await {
            Ok(rows) if rows.is_empty() => println!("No organizations found."),
            Ok(rows) => {
                println!("\nTop {limit} organizations by note count:\n");
                println!("{:<6} {:<40} {:<6}", "ID", "Name", "Notes");
                println!("{}", "-".repeat(54));
                for row in rows {
                    println!(
                        "{:<6} {:<40} {:<6}",
                        row.organization.id, row.organization.name, row.note_count
                    );
                }
            }
            Err(e) => report(&e),
        },
    }
}

// ============================================================
// Notes
// ============================================================

async fn notes(command: NotesCommand, backend: &dyn Backend) {
    match command {
        NotesCommand::Add {
            title,
            content,
            contacts,
            organizations,
            tasks,
        } => {
            let input = CreateNoteInput {
                title,
                content,
                person_ids: contacts,
                org_ids: organizations,
                task_ids: tasks,
            };
            match backend.add_note(input).await {
                Ok(note) => {
                    println!("Note added: '{}' (ID: {})", note.title, note.id);
                    print_note_tags(&note);
                }
                Err(e) => report(&e),
            }
        }

        NotesCommand::List {
            limit,
            contact,
            organization,
        } => match backend.list_notes(limit, contact, organization).await {
            Ok(notes) if notes.is_empty() => println!("No notes found."),
            Ok(notes) => {
                match (contact, organization) {
                    (Some(id), _) => println!("\nNotes for contact ID {id} ({}):\n", notes.len()),
                    (_, Some(id)) => {
                        println!("\nNotes for organization ID {id} ({}):\n", notes.len())
                    }
                    _ => println!("\nRecent notes ({}):\n", notes.len()),
                }
                println!(
                    "{:<6} {:<30} {:<4} {:<4} {:<4} {:<17}",
                    "ID", "Title", "C", "O", "T", "Created"
                );
                println!("{}", "-".repeat(70));
                for note in notes {
                    println!(
                        "{:<6} {:<30} {:<4} {:<4} {:<4} {:<17}",
                        note.id,
                        truncate(&note.title, 30),
                        note.persons.len(),
                        note.organizations.len(),
                        note.tasks.len(),
                        note.created_at.format("%Y-%m-%d %H:%M").to_string()
                    );
                }
            }
            Err(e) => report(&e),
        },

        NotesCommand::View { note_id } => match backend.get_note(note_id).await {
            Ok(None) => eprintln!("error: Note ID {note_id} not found"),
            Ok(Some(note)) => {
                println!("\nNote #{}: {}", note.id, note.title);
                println!("{}", "=".repeat(60));
                println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M:%S"));
                println!("Updated: {}", note.updated_at.format("%Y-%m-%d %H:%M:%S"));
                println!("\n{}", note.content);
                print_note_tags(&note);
            }
            Err(e) => report(&e),
        },

        NotesCommand::Tag {
            note_id,
            add_contacts,
            remove_contacts,
            add_organizations,
            remove_organizations,
            add_tasks,
            remove_tasks,
        } => {
            let update = TagUpdate {
                add_person_ids: add_contacts,
                remove_person_ids: remove_contacts,
                add_org_ids: add_organizations,
                remove_org_ids: remove_organizations,
                add_task_ids: add_tasks,
                remove_task_ids: remove_tasks,
            };
            match backend.tag_note(note_id, &update).await {
                Ok(diff) => print_diff(&diff),
                Err(e) => report(&e),
            }
        }
    }
}

fn print_note_tags(note: &Note) {
    if !note.persons.is_empty() {
        let names: Vec<String> = note.persons.iter().map(Person::full_name).collect();
        println!("Contacts: {}", names.join(", "));
    }
    if !note.organizations.is_empty() {
        let names: Vec<&str> = note
            .organizations
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        println!("Organizations: {}", names.join(", "));
    }
    if !note.tasks.is_empty() {
        let titles: Vec<&str> = note.tasks.iter().map(|t| t.title.as_str()).collect();
        println!("Tasks: {}", titles.join(", "));
    }
}

// ============================================================
// Tasks
// ============================================================

async fn tasks(command: TasksCommand, backend: &dyn Backend) {
    match command {
        TasksCommand::Add {
            title,
            description,
            due_date,
            importance,
            contacts,
            organizations,
        } => {
            let due_at = match parse_due_date(&due_date) {
                Ok(due_at) => due_at,
                Err(message) => {
                    eprintln!("error: {message}");
                    return;
                }
            };
            let input = CreateTaskInput {
                title,
                description,
                due_at,
                importance,
                person_ids: contacts,
                org_ids: organizations,
            };
            match backend.add_task(input).await {
                Ok(task) => {
                    println!("Task added: '{}' (ID: {})", task.title, task.id);
                    println!("Due: {}", task.due_at.format("%Y-%m-%d %H:%M"));
                    println!("Importance: {}/10", task.importance);
                    if !task.persons.is_empty() {
                        let names: Vec<String> =
                            task.persons.iter().map(Person::full_name).collect();
                        println!("Contacts: {}", names.join(", "));
                    }
                    if !task.organizations.is_empty() {
                        let names: Vec<&str> = task
                            .organizations
                            .iter()
                            .map(|o| o.name.as_str())
                            .collect();
                        println!("Organizations: {}", names.join(", "));
                    }
                }
                Err(e) => report(&e),
            }
        }

        TasksCommand::List {
            limit,
            show_completed,
            contact,
            organization,
        } => match backend
            .list_tasks(limit, show_completed, contact, organization)
            .await
        {
            Ok(tasks) if tasks.is_empty() => println!("No tasks found."),
            Ok(tasks) => {
                let scope = if show_completed { "All" } else { "Incomplete" };
                println!("\n{scope} tasks (showing {}):\n", tasks.len());
                println!(
                    "{:<6} {:<40} {:<17} {:<4} {:<2}",
                    "ID", "Title", "Due", "Imp", "Done"
                );
                println!("{}", "-".repeat(74));
                for task in tasks {
                    println!(
                        "{:<6} {:<40} {:<17} {:<4} {:<2}",
                        task.id,
                        truncate(&task.title, 40),
                        task.due_at.format("%Y-%m-%d %H:%M").to_string(),
                        task.importance,
                        if task.completed { "x" } else { "" }
                    );
                }
            }
            Err(e) => report(&e),
        },

        TasksCommand::View { task_id } => match backend.get_task(task_id).await {
            Ok(None) => eprintln!("error: Task ID {task_id} not found"),
            Ok(Some(task)) => print_task_detail(&task),
            Err(e) => report(&e),
        },

        TasksCommand::Urgent { days, sort_by } => {
            let Some(sort) = UrgentSort::from_str(&sort_by) else {
                eprintln!("error: sort-by must be 'urgency' or 'importance'");
                return;
            };
            match backend.urgent_tasks(days, sort).await {
                Ok(tasks) if tasks.is_empty() => {
                    println!("No urgent tasks due within {days} days.");
                }
                Ok(tasks) => {
                    println!(
                        "\nUrgent tasks (due within {days} days, sorted by {}):\n",
                        sort.as_str()
                    );
                    let now = Utc::now();
                    for task in tasks {
                        println!(
                            "  [{:>2}/10] {:<40} due {} {}",
                            task.importance,
                            truncate(&task.title, 40),
                            task.due_at.format("%Y-%m-%d %H:%M"),
                            due_marker(task.due_at, now)
                        );
                    }
                }
                Err(e) => report(&e),
            }
        }

        TasksCommand::Complete { task_id } => match backend.complete_task(task_id).await {
            Ok(task) => println!("Task completed: '{}' (ID: {})", task.title, task.id),
            Err(e) => report(&e),
        },

        TasksCommand::Uncomplete { task_id } => match backend.uncomplete_task(task_id).await {
            Ok(task) => println!("Task marked incomplete: '{}' (ID: {})", task.title, task.id),
            Err(e) => report(&e),
        },

        TasksCommand::Tag {
            task_id,
            add_contacts,
            remove_contacts,
            add_organizations,
            remove_organizations,
        } => {
            let update = TagUpdate {
                add_person_ids: add_contacts,
                remove_person_ids: remove_contacts,
                add_org_ids: add_organizations,
                remove_org_ids: remove_organizations,
                ..TagUpdate::default()
            };
            match backend.tag_task(task_id, &update).await {
                Ok(diff) => print_diff(&diff),
                Err(e) => report(&e),
            }
        }
    }
}

fn print_task_detail(task: &Task) {
    println!("\nTask #{}: {}", task.id, task.title);
    println!("{}", "=".repeat(60));
    println!(
        "Status: {}",
        if task.completed {
            "completed"
        } else {
            "incomplete"
        }
    );
    println!("Due: {}", task.due_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Importance: {}/10", task.importance);
    println!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Updated: {}", task.updated_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(description) = &task.description {
        println!("\n{description}");
    }
    if !task.persons.is_empty() {
        println!("\nTagged contacts:");
        for person in &task.persons {
            println!("  - {} (ID: {})", person.full_name(), person.id);
        }
    }
    if !task.organizations.is_empty() {
        println!("\nTagged organizations:");
        for org in &task.organizations {
            println!("  - {} (ID: {})", org.name, org.id);
        }
    }
}

// ============================================================
// Overview
// ============================================================

async fn init_overview(backend: &dyn Backend) {
    let now = Utc::now();

    println!("\n{}", "=".repeat(60));
    println!("THIS WEEK");
    println!("{}", "=".repeat(60));
    for offset in 0..7 {
        let date = now + Duration::days(offset);
        let marker = if offset == 0 { "  <- today" } else { "" };
        println!(
            "  {:<10} {}{}",
            date.format("%A"),
            date.format("%Y-%m-%d"),
            marker
        );
    }

    println!("\n{}", "=".repeat(60));
    println!("TOP 5 URGENT TASKS");
    println!("{}", "=".repeat(60));
    match backend.urgent_tasks(7, UrgentSort::Urgency).await {
        Ok(tasks) if tasks.is_empty() => println!("  No urgent tasks."),
        Ok(tasks) => {
            for task in tasks.iter().take(5) {
                println!(
                    "  [{:>2}/10] {:<40} due {} {}",
                    task.importance,
                    truncate(&task.title, 40),
                    task.due_at.format("%Y-%m-%d %H:%M"),
                    due_marker(task.due_at, now)
                );
            }
        }
        Err(e) => report(&e),
    }

    println!("\n{}", "=".repeat(60));
    println!("TOP 5 CONTACTS BY NOTE COUNT");
    println!("{}", "=".repeat(60));
    match backend.top_persons(5).await {
        Ok(rows) if rows.is_empty() => println!("  No contacts found."),
        Ok(rows) => {
            for row in rows {
                println!(
                    "  {} (ID: {}) - {} note(s)",
                    row.person.full_name(),
                    row.person.id,
                    row.note_count
                );
                // Recent notes need the composite read; skip quietly where
                // the backend cannot serve it (remote mode).
                if let Ok(Some((_, notes))) =
                    backend.person_with_notes(row.person.id, 3).await
                {
                    for note in notes {
                        println!(
                            "      [{}] {}",
                            note.created_at.format("%Y-%m-%d"),
                            note.title
                        );
                    }
                }
            }
        }
        Err(e) => report(&e),
    }
    println!();
}

// ============================================================
// Helpers
// ============================================================

fn print_diff(diff: &TagDiff) {
    if diff.is_empty() {
        println!("No changes made.");
        return;
    }
    if !diff.added_persons.is_empty() {
        println!("Added contacts: {}", diff.added_persons.join(", "));
    }
    if !diff.removed_persons.is_empty() {
        println!("Removed contacts: {}", diff.removed_persons.join(", "));
    }
    if !diff.added_organizations.is_empty() {
        println!("Added organizations: {}", diff.added_organizations.join(", "));
    }
    if !diff.removed_organizations.is_empty() {
        println!(
            "Removed organizations: {}",
            diff.removed_organizations.join(", ")
        );
    }
    if !diff.added_tasks.is_empty() {
        println!("Added tasks: {}", diff.added_tasks.join(", "));
    }
    if !diff.removed_tasks.is_empty() {
        println!("Removed tasks: {}", diff.removed_tasks.join(", "));
    }
}

/// Parse a due date as RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC), or a bare
/// `YYYY-MM-DD` coerced to end of day.
fn parse_due_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let end_of_day = date.and_hms_opt(23, 59, 59).expect("valid end-of-day time");
        return Ok(Utc.from_utc_datetime(&end_of_day));
    }
    Err(format!(
        "Invalid date '{s}': use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"
    ))
}

fn due_marker(due: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    if due < now {
        "(OVERDUE)"
    } else if due < now + Duration::days(1) {
        "(today)"
    } else if due < now + Duration::days(3) {
        "(soon)"
    } else {
        ""
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn bare_dates_coerce_to_end_of_day() {
        let due = parse_due_date("2026-03-01").unwrap();
        assert_eq!((due.hour(), due.minute(), due.second()), (23, 59, 59));
    }

    #[test]
    fn datetime_strings_parse_as_utc() {
        let due = parse_due_date("2026-03-01T09:30:00").unwrap();
        assert_eq!(due.hour(), 9);
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert!(parse_due_date("next tuesday").is_err());
    }
}

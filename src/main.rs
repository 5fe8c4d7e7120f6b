/// Command line entry point for the Islamic Tracker
///
/// Runs one entity operation per invocation. The session starts in guest
/// mode against a local data directory; supplying `--email`/`--password`
/// logs in against the API server first and runs the same operation
/// remotely.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use islamic_tracker::{
    Category, Locale, LocalStore, Priority, ReminderDraft, RemoteStore, Session, StoreError,
    TaskDraft,
};

/// Pick a writable data directory for guest-mode storage
fn default_data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|mut p| {
            p.push(".islamic_tracker");
            p
        }),
        dirs::data_dir().map(|mut p| {
            p.push("islamic_tracker");
            p
        }),
        std::env::current_dir().ok().map(|mut p| {
            p.push(".islamic_tracker");
            p
        }),
    ];

    for candidate in candidates.iter().flatten() {
        if std::fs::create_dir_all(candidate).is_ok() {
            return Ok(candidate.clone());
        }
    }

    let mut temp = std::env::temp_dir();
    temp.push("islamic_tracker");
    std::fs::create_dir_all(&temp)?;
    tracing::warn!("Using temporary directory for data: {}", temp.display());
    Ok(temp)
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s)
        .ok_or_else(|| format!("Invalid category '{}'. Valid options: general, worship, study, work", s))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s)
        .ok_or_else(|| format!("Invalid priority '{}'. Valid options: low, medium, high", s))
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    Locale::from_tag(s).ok_or_else(|| format!("Invalid locale '{}'. Valid options: ar, en", s))
}

/// Accept RFC 3339, `YYYY-MM-DD HH:MM` or a bare `YYYY-MM-DD` (midnight UTC)
fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, String> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&chrono::Utc));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(dt.and_utc());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(format!(
        "Invalid timestamp '{}'. Use RFC 3339, 'YYYY-MM-DD HH:MM' or 'YYYY-MM-DD'",
        s
    ))
}

/// Command line arguments for the Islamic Tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding guest-mode data
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Base URL of the API server (used when logging in)
    #[arg(long, default_value = "http://localhost:3000/api")]
    server: String,

    /// Log in with this account before running the command
    #[arg(long, requires = "password")]
    email: Option<String>,

    /// Password for --email
    #[arg(long, requires = "email")]
    password: Option<String>,

    /// Display locale for surah names
    #[arg(long, default_value = "en", value_parser = parse_locale)]
    locale: Locale,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Manage Quran reading reminders
    Quran {
        #[command(subcommand)]
        action: QuranAction,
    },
}

#[derive(Subcommand, Debug)]
enum TaskAction {
    /// Add a new task
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "general", value_parser = parse_category)]
        category: Category,
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
        /// Due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long, value_parser = parse_timestamp)]
        due: Option<chrono::DateTime<chrono::Utc>>,
    },
    /// List tasks, newest first
    List,
    /// Flip a task's completion flag
    Toggle { id: String },
    /// Delete a task
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
enum QuranAction {
    /// Add a reading reminder
    Add {
        /// Surah number (1-114)
        #[arg(long)]
        surah: u32,
        /// First ayah to read
        #[arg(long)]
        from: u32,
        /// Last ayah to read
        #[arg(long)]
        to: u32,
        #[arg(long)]
        notes: Option<String>,
        /// Reminder time (RFC 3339 or YYYY-MM-DD HH:MM)
        #[arg(long, value_parser = parse_timestamp)]
        time: Option<chrono::DateTime<chrono::Utc>>,
    },
    /// List reminders, newest first
    List,
    /// Flip a reminder's completion flag
    Toggle { id: String },
    /// Delete a reminder
    Rm { id: String },
}

fn print_tasks(session: &Session) {
    if session.tasks().is_empty() {
        println!("No tasks.");
        return;
    }
    for task in session.tasks() {
        let mark = if task.completed { "x" } else { " " };
        let due = task
            .due_date
            .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "[{}] {}  {} ({}/{}){}",
            mark,
            task.id,
            task.title,
            task.category.as_str(),
            task.priority.as_str(),
            due
        );
        if let Some(description) = &task.description {
            println!("      {}", description);
        }
    }
}

fn print_reminders(session: &Session) {
    if session.reminders().is_empty() {
        println!("No reminders.");
        return;
    }
    for reminder in session.reminders() {
        let mark = if reminder.completed { "x" } else { " " };
        println!(
            "[{}] {}  {} ({}) ayah {}-{}",
            mark,
            reminder.id,
            reminder.surah_name,
            reminder.surah_number,
            reminder.start_ayah,
            reminder.end_ayah
        );
        if let Some(notes) = &reminder.notes {
            println!("      {}", notes);
        }
    }
}

/// Render a store failure for the terminal; validation errors get one line
/// per field
fn report_error(err: &StoreError) {
    match err.field_errors() {
        Some(fields) => {
            eprintln!("Invalid input:");
            for field in fields {
                eprintln!("  {}", field);
            }
        }
        None => eprintln!("Error: {}", err),
    }
}

async fn run(session: &mut Session, command: Command) -> Result<(), StoreError> {
    // Every command works against the freshly listed collections, so ids
    // shown by `list` are valid targets for toggle/rm in the same state.
    session.refresh().await?;

    match command {
        Command::Task { action } => match action {
            TaskAction::Add {
                title,
                description,
                category,
                priority,
                due,
            } => {
                let draft = TaskDraft {
                    title,
                    description,
                    category,
                    priority,
                    due_date: due,
                };
                let task = session.add_task(draft).await?;
                println!("Added task {}: {}", task.id, task.title);
            }
            TaskAction::List => print_tasks(session),
            TaskAction::Toggle { id } => {
                let task = session.toggle_task(&id).await?;
                let state = if task.completed { "done" } else { "open" };
                println!("Task {} is now {}", task.id, state);
            }
            TaskAction::Rm { id } => {
                session.remove_task(&id).await?;
                println!("Deleted task {}", id);
            }
        },
        Command::Quran { action } => match action {
            QuranAction::Add {
                surah,
                from,
                to,
                notes,
                time,
            } => {
                let draft = ReminderDraft {
                    surah_number: surah,
                    start_ayah: from,
                    end_ayah: to,
                    notes,
                    reminder_time: time,
                };
                let reminder = session.add_reminder(draft).await?;
                println!(
                    "Added reminder {}: {} ayah {}-{}",
                    reminder.id, reminder.surah_name, reminder.start_ayah, reminder.end_ayah
                );
            }
            QuranAction::List => print_reminders(session),
            QuranAction::Toggle { id } => {
                let reminder = session.toggle_reminder(&id).await?;
                let state = if reminder.completed { "done" } else { "open" };
                println!("Reminder {} is now {}", reminder.id, state);
            }
            QuranAction::Rm { id } => {
                session.remove_reminder(&id).await?;
                println!("Deleted reminder {}", id);
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("islamic_tracker={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    info!("Using data directory: {}", data_dir.display());

    let local = LocalStore::open(data_dir)?;
    let remote = RemoteStore::new(args.server)?;
    let mut session = Session::new(local, remote, args.locale);

    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        session.login(email, password).await?;
        info!("Authenticated as {}", session.identity());
    } else {
        session.continue_as_guest();
    }

    if let Err(err) = run(&mut session, args.command).await {
        report_error(&err);
        std::process::exit(1);
    }

    Ok(())
}

//! attendbook command-line client.
//!
//! The session token lives in the user's local data directory, so `login`
//! once and the other commands pick it up.

use attendbook::client::attendance::{AttendanceSession, HoldOutcome, SubmitOutcome};
use attendbook::client::auth::{self, FileTokenStore};
use attendbook::client::location::{parse_position, FixedLocation, GeoSample};
use attendbook::client::pagination::{
    BookEventsSource, BooksSource, Filters, HistorySource, NotificationsSource, PageSource,
    Paginator, SubscriptionsSource,
};
use attendbook::client::version::{check_for_update, UpdateCheck};
use attendbook::client::{
    notifications, profile, subscriptions, ApiClient, AuthContext, Config, FetchOutcome,
};
use attendbook::shared::models::auth::SignupForm;
use attendbook::shared::models::book::SortOrder;
use attendbook::shared::models::profile::{PasswordChange, ProfileUpdate};
use attendbook::shared::{ClientError, RecordId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "attendbook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mark attendance and browse attendance books from the terminal",
    long_about = None
)]
struct Cli {
    /// Config file (default: <config dir>/attendbook/config.toml)
    #[arg(global = true, long = "config")]
    config: Option<PathBuf>,

    /// Token file (default: <data dir>/attendbook/userToken)
    #[arg(global = true, long = "token-file")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        fullname: String,
        #[arg(long)]
        gender: String,
        /// University id
        #[arg(long)]
        university: String,
        #[arg(long)]
        faculty: String,
        #[arg(long)]
        department: String,
        #[arg(long, default_value = "student")]
        role: String,
        #[arg(long, default_value = "100")]
        level: String,
        #[arg(long = "matric-no")]
        matric_no: String,
        #[arg(long)]
        password: String,
        #[arg(long = "confirm-password")]
        confirm_password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show whether a session token is stored
    Whoami,

    /// Mark attendance for an event code
    Attend {
        /// Six-digit event code
        code: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Flip the event book subscription before confirming
        #[arg(long = "toggle-subscription")]
        toggle_subscription: bool,

        /// Release the hold after this many milliseconds (default: hold until done)
        #[arg(long = "release-after")]
        release_after: Option<u64>,
    },

    /// List attendance books
    Books {
        #[arg(long, default_value = "")]
        search: String,

        /// Oldest first
        #[arg(long)]
        asc: bool,

        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// List the events of one book
    Events {
        book_id: i64,

        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show the notification feed
    Notifications {
        #[arg(long = "mark-read")]
        mark_read: bool,

        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// List or delete event book subscriptions
    Subscriptions {
        #[arg(long)]
        delete: Option<String>,

        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show attendance history
    History {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show the profile summary
    Profile,

    /// Change profile fields; omitted fields keep their current value
    EditProfile {
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        fullname: Option<String>,

        /// University id
        #[arg(long)]
        university: Option<String>,

        /// Faculty id
        #[arg(long)]
        faculty: Option<String>,

        /// Department id
        #[arg(long)]
        department: Option<String>,

        #[arg(long)]
        level: Option<String>,

        /// Required together with --new-password
        #[arg(long, requires = "new_password")]
        current_password: Option<String>,

        #[arg(long, requires = "current_password")]
        new_password: Option<String>,
    },

    /// Check whether an app update is available
    Version {
        #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
        current: String,

        #[arg(long, default_value = "android")]
        platform: String,

        /// Versions that force a mandatory update
        #[arg(long = "force")]
        force: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let config = Config::load(cli.config.as_deref())?;
    let store = match cli.token_file {
        Some(path) => FileTokenStore::new(path),
        None => FileTokenStore::default_location().ok_or_else(|| {
            ClientError::validation("token_file", "No data directory found; pass --token-file")
        })?,
    };
    let auth = AuthContext::new(store);
    let api = ApiClient::new(config);

    match cli.command {
        Commands::Login { email, password } => {
            auth::login(&api, &auth, &email, &password).await?;
            println!("Logged in");
        }
        Commands::Signup {
            username,
            email,
            phone,
            fullname,
            gender,
            university,
            faculty,
            department,
            role,
            level,
            matric_no,
            password,
            confirm_password,
        } => {
            let form = SignupForm {
                username,
                email,
                phone,
                fullname,
                gender,
                university,
                faculty,
                department,
                role,
                level,
                matric_no,
                password,
                confirm_password,
            };
            auth::signup(&api, &auth, &form).await?;
            println!("Account created");
        }
        Commands::Logout => {
            auth::logout(&api, &auth).await?;
            println!("Logged out");
        }
        Commands::Whoami => match auth.get_token()? {
            Some(_) => println!("Logged in"),
            None => println!("Not logged in"),
        },
        Commands::Attend {
            code,
            lat,
            lon,
            toggle_subscription,
            release_after,
        } => {
            let position = parse_position(lat, lon)?;
            attend(api, auth, &code, position, toggle_subscription, release_after).await?;
        }
        Commands::Books { search, asc, pages } => {
            let books = Paginator::new(api, auth, BooksSource);
            let filters = Filters {
                search,
                sort_by: None,
                sort_order: if asc {
                    SortOrder::Ascending
                } else {
                    SortOrder::Descending
                },
            };
            books.apply_filters(filters).await?;
            load_pages(&books, pages).await?;
            for book in books.items().await {
                println!(
                    "{:>6}  {}  {}",
                    book.book_id,
                    book.book_title,
                    book.created_at.as_deref().unwrap_or("")
                );
            }
        }
        Commands::Events { book_id, pages } => {
            let events = Paginator::new(api, auth, BookEventsSource::new(book_id));
            events.refresh().await?;
            load_pages(&events, pages).await?;
            if let Some(details) = events.source().details() {
                println!("{} ({} students)", details.name, details.total_students);
            }
            for event in events.items().await {
                println!(
                    "{:>6}  {}  {}  {}  {} present",
                    event.id, event.short_code, event.event_type, event.name, event.attendance_count
                );
            }
        }
        Commands::Notifications { mark_read, pages } => {
            let feed = Paginator::new(api, auth, NotificationsSource);
            feed.refresh().await?;
            load_pages(&feed, pages).await?;
            if mark_read {
                notifications::mark_all_read(&feed).await?;
            }
            for n in feed.items().await {
                let marker = if n.is_read { " " } else { "*" };
                println!("{marker} {}  {}  {}", n.timestamp, n.title, n.description);
            }
        }
        Commands::Subscriptions { delete, pages } => {
            let list = Paginator::new(api, auth, SubscriptionsSource);
            list.refresh().await?;
            load_pages(&list, pages).await?;
            if let Some(id) = delete {
                subscriptions::delete_subscription(&list, &RecordId(id)).await?;
                if let Some(notice) = list.notice().await {
                    println!("{}", notice.message);
                }
            }
            for s in list.items().await {
                println!("{:>6}  {}  {}", s.id, s.book_name, s.subscription_date);
            }
        }
        Commands::History { pages } => {
            let history = Paginator::new(api, auth, HistorySource);
            history.refresh().await?;
            load_pages(&history, pages).await?;
            for record in history.items().await {
                println!(
                    "{}  {}  {}",
                    record.attendance_time, record.book_title, record.column_name
                );
            }
        }
        Commands::Profile => {
            let p = profile::fetch_profile(&api, &auth).await?;
            println!("{}", p.username);
            println!("{} / {} / {}", p.university_name, p.faculty_name, p.department_name);
            println!("{}", p.level_label());
        }
        Commands::EditProfile {
            email,
            phone,
            fullname,
            university,
            faculty,
            department,
            level,
            current_password,
            new_password,
        } => {
            let current = profile::get_editable_profile(&api, &auth).await?;
            let mut update = ProfileUpdate::from(&current);
            for (slot, value) in [
                (&mut update.email, email),
                (&mut update.phone, phone),
                (&mut update.fullname, fullname),
                (&mut update.university, university),
                (&mut update.faculty, faculty),
                (&mut update.department, department),
                (&mut update.level, level),
            ] {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            if let (Some(current_password), Some(new_password)) = (current_password, new_password) {
                update.password = Some(PasswordChange {
                    current_password,
                    confirm_new_password: new_password.clone(),
                    new_password,
                });
            }
            profile::update_profile(&api, &auth, &current.id, &update).await?;
            println!("{}", profile::PROFILE_UPDATED);
        }
        Commands::Version {
            current,
            platform,
            force,
        } => {
            let force: Vec<&str> = force.iter().map(String::as_str).collect();
            match check_for_update(&api, &current, &platform, &force).await? {
                UpdateCheck::UpToDate => println!("Up to date"),
                UpdateCheck::Optional { download_url, message }
                | UpdateCheck::Mandatory { download_url, message } => {
                    println!("{message}");
                    if let Some(url) = download_url {
                        println!("{url}");
                    }
                }
            }
        }
    }
    Ok(())
}

/// Keep calling `load_more` until `pages` pages are loaded or the list ends
async fn load_pages<S: PageSource>(list: &Paginator<S>, pages: u32) -> Result<(), ClientError> {
    while list.snapshot().await.page < pages {
        if list.load_more().await? == FetchOutcome::Skipped {
            break;
        }
    }
    Ok(())
}

async fn attend(
    api: ApiClient,
    auth: AuthContext,
    code: &str,
    position: GeoSample,
    toggle_subscription: bool,
    release_after: Option<u64>,
) -> Result<(), ClientError> {
    let mut session = AttendanceSession::new(api, auth);
    session
        .acquire_location(&FixedLocation::at(position.latitude, position.longitude))
        .await?;
    session.enter_code(code);

    let outcome = session.submit_code().await;
    if let Some(notice) = session.notice() {
        println!("{}", notice.message);
    }
    if outcome? == SubmitOutcome::AlreadyMarked {
        return Ok(());
    }

    if let Some(event) = session.state().event() {
        println!("{}  {}", event.event_title, event.location_label);
        println!("{} checked in", event.checked_in_count);
    }

    if toggle_subscription {
        session.toggle_subscription().await?;
        if let Some(notice) = session.notice() {
            println!("{}", notice.message);
        }
    }

    let mut progress = session.subscribe_progress();
    let release = async move {
        match release_after {
            Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            None => std::future::pending::<()>().await,
        }
    };
    let hold = session.hold_to_confirm(release);
    tokio::pin!(hold);
    let outcome = loop {
        tokio::select! {
            outcome = &mut hold => break outcome,
            Ok(()) = progress.changed() => {
                eprint!("\rConfirming {:>3}%", *progress.borrow_and_update());
            }
        }
    };
    eprintln!();

    match outcome? {
        HoldOutcome::Marked => println!("Attendance marked"),
        HoldOutcome::Released { progress } => println!("Released at {progress}%"),
    }
    Ok(())
}

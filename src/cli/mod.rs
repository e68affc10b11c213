//! # CLI Module
//!
//! Command-line interface for photoping.
//!
//! ## Usage
//! ```bash
//! # Random photo from the whole library
//! photoping select
//!
//! # Random photo of one person
//! photoping select "Alice Smith"
//!
//! # Who is tagged, and how often
//! photoping list-persons
//!
//! # Rebuild the cache
//! photoping refresh
//!
//! # Pick today's photos and render the email
//! photoping compose --output today.html
//! ```

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use photoping::config::{self, MailSettings, Settings};
use photoping::core::compose::{build_message, subject_line, EmailMessage, PhotoEntry};
use photoping::core::selector::{person_counts, select_on_this_day, select_photo};
use photoping::core::{JsonFileStore, PhotoInventory, PhotoRecord, PhotosLibrary};
use photoping::error::{ComposeError, PhotopingError, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// photoping - a photo (and a memory) from your library
#[derive(Parser, Debug)]
#[command(name = "photoping")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Photos library path (default: $PHOTOS_LIBRARY or ~/Pictures/Photos Library.photoslibrary)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Cache file path (default: $PHOTOPING_CACHE or next to the executable)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select a random photo and print its details
    Select {
        /// Person to select a photo of (default: $PERSON_NAME, else the whole library)
        person: Option<String>,

        /// Rebuild the photo cache before selecting
        #[arg(long)]
        refresh_cache: bool,
    },

    /// List every named person with their photo count
    ListPersons {
        /// Rebuild the photo cache before listing
        #[arg(long)]
        refresh_cache: bool,
    },

    /// Force a rebuild of the photo cache
    Refresh,

    /// Select a random photo and an on-this-day memory, then render the email
    Compose {
        /// Person to select photos of (default: $PERSON_NAME, else the whole library)
        person: Option<String>,

        /// Rebuild the photo cache before selecting
        #[arg(long)]
        refresh_cache: bool,

        /// Select and log the photos, but don't render the message
        #[arg(long)]
        dry_run: bool,

        /// Write the rendered message here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "html")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// The HTML body only
    Html,
    /// The whole message (headers, bodies, inline images) as JSON
    Json,
}

impl Commands {
    /// Whether stdout carries the command's output document, leaving no room
    /// for progress lines
    fn renders_to_stdout(&self) -> bool {
        matches!(
            self,
            Commands::Compose {
                dry_run: false,
                output: None,
                ..
            }
        )
    }
}

type Inventory = PhotoInventory<PhotosLibrary, JsonFileStore>;

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // .env first, so a RUST_LOG set there reaches the log filter
    let dotenv = config::load_dotenv();
    photoping::init_tracing(cli.verbose, cli.command.renders_to_stdout());
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env");
    }

    match cli.command {
        Commands::Select {
            person,
            refresh_cache,
        } => {
            let settings = Settings::resolve(cli.library, cli.cache, person);
            run_select(&settings, refresh_cache)
        }
        Commands::ListPersons { refresh_cache } => {
            let settings = Settings::resolve(cli.library, cli.cache, None);
            run_list_persons(&settings, refresh_cache)
        }
        Commands::Refresh => {
            let settings = Settings::resolve(cli.library, cli.cache, None);
            run_refresh(&settings)
        }
        Commands::Compose {
            person,
            refresh_cache,
            dry_run,
            output,
            format,
        } => {
            let settings = Settings::resolve(cli.library, cli.cache, person);
            run_compose(&settings, refresh_cache, dry_run, output, format)
        }
    }
}

fn open_inventory(settings: &Settings) -> Inventory {
    PhotoInventory::new(
        PhotosLibrary::new(&settings.library_path),
        JsonFileStore::new(&settings.cache_path),
    )
}

fn run_select(settings: &Settings, refresh_cache: bool) -> Result<()> {
    let records = open_inventory(settings).get_records(refresh_cache)?;
    let selection = select_photo(
        &records,
        settings.person.as_deref(),
        &mut rand::thread_rng(),
    )?;

    print_photo_info(&Term::stdout(), selection.photo);
    Ok(())
}

fn run_list_persons(settings: &Settings, refresh_cache: bool) -> Result<()> {
    let records = open_inventory(settings).get_records(refresh_cache)?;
    let counts = person_counts(&records);

    if counts.is_empty() {
        println!("No named persons found in the Photos library.");
        return Ok(());
    }

    println!("{:<40} {:>6}", "Person", "Photos");
    println!("{}", "-".repeat(48));
    for (name, count) in counts {
        println!("{:<40} {:>6}", name, count);
    }
    Ok(())
}

fn run_refresh(settings: &Settings) -> Result<()> {
    let records = open_inventory(settings).get_records(true)?;

    let term = Term::stdout();
    term.write_line(&format!(
        "{} Cache refreshed: {} local photos",
        style("✓").green().bold(),
        style(records.len()).cyan()
    ))
    .ok();
    Ok(())
}

fn run_compose(
    settings: &Settings,
    refresh_cache: bool,
    dry_run: bool,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let person = settings.person.as_deref();
    let mut rng = rand::thread_rng();

    info!(
        "Loading photo library{}...",
        if refresh_cache { " (refreshing cache)" } else { "" }
    );
    let records = open_inventory(settings).get_records(refresh_cache)?;

    match person {
        Some(p) => info!("Selecting a random photo of '{}'.", p),
        None => info!("Selecting a random photo from the full library."),
    }
    let selection = select_photo(&records, person, &mut rng)?;
    info!("Random:      {}", describe(selection.photo));

    let today = Local::now().date_naive();
    let memory = select_on_this_day(&records, person, today, &mut rng);
    match memory {
        Some(photo) => info!("On this day: {}", describe(photo)),
        None => info!("On this day: no matching photo found for today's date."),
    }

    if dry_run {
        info!("Dry run; message not rendered.");
        return Ok(());
    }

    let mail = MailSettings::from_env()?;
    let mut entries = vec![PhotoEntry::from_record(selection.photo)];
    if let Some(photo) = memory {
        entries.push(PhotoEntry::memory(photo, today));
    }
    let subject = subject_line(settings.email_subject.as_deref(), memory);

    let message = build_message(&mail.sender_formatted(), &mail.recipients, &entries, &subject)?;
    info!(
        to = %message.to.join(", "),
        images = message.inline_images.len(),
        "Composed \"{}\"",
        message.subject
    );

    write_message(&message, output, format)
}

fn write_message(
    message: &EmailMessage,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let rendered = match format {
        OutputFormat::Html => message.html_body.clone(),
        OutputFormat::Json => serde_json::to_string_pretty(message)
            .map_err(|e| ComposeError::EncodeFailed(e.to_string()))?,
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered).map_err(|source| PhotopingError::Output {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Wrote message");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn describe(photo: &PhotoRecord) -> String {
    format!(
        "{} ({})",
        photo.original_filename,
        photo.date.as_deref().unwrap_or("no date")
    )
}

fn print_photo_info(term: &Term, photo: &PhotoRecord) {
    let line = |label: &str, value: &str| {
        let label = format!("{:<9}", format!("{}:", label));
        term.write_line(&format!("  {} {}", style(label).dim(), value)).ok();
    };

    line("Path", &photo.path);
    line("Filename", &photo.original_filename);
    line("Date", photo.date.as_deref().unwrap_or("unknown"));
    if let Some(location) = &photo.location {
        line("Location", location);
    }
    if let Some(mb) = photo.size_mb() {
        line("Size", &format!("{:.1} MB", mb));
    }
    if !photo.persons.is_empty() {
        line("Persons", &photo.persons.join(", "));
    }
    if let Some(title) = &photo.title {
        line("Title", title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(args: &[&str]) -> Commands {
        let mut argv = vec!["photoping"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn compose_to_stdout_reserves_stdout() {
        assert!(commands(&["compose"]).renders_to_stdout());
        assert!(commands(&["compose", "--format", "json", "Alice Smith"]).renders_to_stdout());
    }

    #[test]
    fn other_commands_leave_stdout_for_progress() {
        assert!(!commands(&["compose", "--output", "today.html"]).renders_to_stdout());
        assert!(!commands(&["compose", "--dry-run"]).renders_to_stdout());
        assert!(!commands(&["select", "Alice Smith"]).renders_to_stdout());
        assert!(!commands(&["list-persons"]).renders_to_stdout());
        assert!(!commands(&["refresh"]).renders_to_stdout());
    }
}

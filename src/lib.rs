//! # photoping
//!
//! Picks a random photo from your Photos library, plus an "on this day"
//! memory when one exists, and composes them into an email.
//!
//! ## Architecture
//! - `core` - Library access, snapshot cache, selection, composition
//! - `config` - Settings from flags, environment and `.env`
//! - `error` - User-facing error types
//!
//! The library is only opened when the cached snapshot is missing or stale;
//! most runs are served entirely from the cache file.

pub mod config;
pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{PhotopingError, Result};

use tracing::Level;
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt, OrElse, WithMaxLevel};
use tracing_subscriber::EnvFilter;

/// Log filter: `RUST_LOG` if set, else `info` (`debug` when verbose)
pub fn log_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "photoping=debug" } else { "photoping=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Route warnings and errors to `errors`, everything else to `progress`
pub fn split_writer<E, P>(errors: E, progress: P) -> OrElse<WithMaxLevel<E>, P>
where
    E: for<'w> MakeWriter<'w>,
    P: for<'w> MakeWriter<'w>,
{
    errors.with_max_level(Level::WARN).or_else(progress)
}

/// Initialize tracing for the application
///
/// Warnings and errors go to stderr. Progress goes to stdout, unless
/// `stdout_reserved` says stdout carries the command's output (a rendered
/// message), in which case everything goes to stderr.
/// Call after `.env` is loaded so a `RUST_LOG` there takes effect.
pub fn init_tracing(verbose: bool, stdout_reserved: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_target(false);

    // A subscriber may already be installed (e.g. by a test harness)
    let _ = if stdout_reserved {
        tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())
    } else {
        tracing::subscriber::set_global_default(
            builder
                .with_writer(split_writer(std::io::stderr, std::io::stdout))
                .finish(),
        )
    };
}

// MIT License - Copyright (c) 2026 Peter Wright
// Log verbosity control

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Handle used to swap the active filter at runtime.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Level used when the shell is not in debug mode.
pub const NORMAL_LEVEL: LevelFilter = LevelFilter::INFO;

/// Level used in debug mode.
pub const DEBUG_LEVEL: LevelFilter = LevelFilter::DEBUG;

/// The process log level, owned by whoever may change it.
///
/// [`Verbosity::toggle`] flips the global level between normal and debug.
/// Per-target directives from `RUST_LOG` (e.g. `hyper=warn`) are kept across
/// toggles. Without a filter handle (tests, embedding) the level is tracked
/// but nothing is reloaded.
pub struct Verbosity {
    level: LevelFilter,
    targets: Vec<String>,
    handle: Option<FilterHandle>,
}

impl Verbosity {
    pub fn new(level: LevelFilter, handle: FilterHandle) -> Self {
        Self {
            level,
            targets: Vec::new(),
            handle: Some(handle),
        }
    }

    pub fn detached(level: LevelFilter) -> Self {
        Self {
            level,
            targets: Vec::new(),
            handle: None,
        }
    }

    /// Keep the target-specific directives of `directives` across toggles.
    pub fn with_directives(mut self, directives: &str) -> Self {
        self.targets = directives
            .split(',')
            .map(str::trim)
            .filter(|d| d.contains('='))
            .map(str::to_owned)
            .collect();
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// True at debug level or anything more verbose.
    pub fn is_debug(&self) -> bool {
        self.level >= DEBUG_LEVEL
    }

    /// Filter directives for `level`, target directives first.
    pub fn directives(&self, level: LevelFilter) -> String {
        let global = level.to_string().to_lowercase();
        if self.targets.is_empty() {
            return global;
        }
        format!("{},{global}", self.targets.join(","))
    }

    /// Flip between the normal and debug level. Returns the new level.
    pub fn toggle(&mut self) -> LevelFilter {
        let next = if self.is_debug() { NORMAL_LEVEL } else { DEBUG_LEVEL };
        if let Some(handle) = &self.handle {
            let directives = self.directives(next);
            if let Err(e) = handle.modify(|filter| *filter = EnvFilter::new(&directives)) {
                tracing::warn!("Failed to change log level: {e}");
                return self.level;
            }
        }
        self.level = next;
        self.level
    }
}

/// Install the global tracing subscriber and return the verbosity handle.
///
/// `RUST_LOG` controls the initial filter and the starting level; when unset,
/// `debug` selects between the two fixed levels. Logs go to stderr so they do
/// not mix with command output on stdout.
pub fn init_logging(debug: bool) -> Verbosity {
    let fallback = if debug { DEBUG_LEVEL } else { NORMAL_LEVEL };
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .and_then(|directives| {
            EnvFilter::try_new(&directives)
                .ok()
                .map(|filter| (directives, filter))
        });
    let (env_filter, level, directives) = match from_env {
        Some((directives, filter)) => {
            let level = filter.max_level_hint().unwrap_or(fallback);
            (filter, level, directives)
        }
        None => (
            EnvFilter::new(fallback.to_string().to_lowercase()),
            fallback,
            String::new(),
        ),
    };
    let (filter, handle) = reload::Layer::new(env_filter);

    // systemd journal already adds timestamps, so omit them when running under systemd
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var_os("JOURNAL_STREAM").is_some() {
        registry
            .with(fmt::layer().without_time().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    Verbosity::new(level, handle).with_directives(&directives)
}

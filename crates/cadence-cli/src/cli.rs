use cadence_core::models::Pattern;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Preview, check and encode recurring task rules
#[derive(Parser, Debug)]
#[command(name = "cadence", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file (defaults to ./cadence.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the upcoming occurrences of a rule
    Preview(PreviewCommand),
    /// Validate a rule the way the task form does
    Check(CheckCommand),
    /// Print the stored (key:value) form of a rule
    Encode(EncodeCommand),
}

/// Flags describing a rule, shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleArgs {
    /// A rule in its stored form, e.g. "pattern:daily;start:2024-01-01"
    #[arg(
        long,
        conflicts_with_all = [
            "every", "interval", "start", "on", "monthly_date", "monthly_week", "monthly_day",
            "count", "until",
        ]
    )]
    pub rule: Option<String>,

    /// Title of the recurring task
    #[arg(long)]
    pub title: Option<String>,

    /// Human-friendly frequency (daily, weekly, monthly, etc.)
    #[arg(long, value_enum)]
    pub every: Option<RecurrenceShortcut>,

    /// Pattern units between occurrences
    #[arg(long)]
    pub interval: Option<u32>,

    /// First occurrence (e.g., '2024-01-01', '2024-01-01 09:00', 'next monday')
    #[arg(long)]
    pub start: Option<String>,

    /// Days of week for weekly recurrence (mon,tue,wed,thu,fri,sat,sun)
    #[arg(long)]
    pub on: Option<String>,

    /// Day of month (1-31) for monthly recurrence
    #[arg(long, conflicts_with_all = ["monthly_week", "monthly_day"])]
    pub monthly_date: Option<u32>,

    /// Week of month (1-5, or -1 for last) for monthly recurrence
    #[arg(long, allow_hyphen_values = true, requires = "monthly_day")]
    pub monthly_week: Option<i8>,

    /// Weekday for monthly recurrence (e.g., 'mon', 'friday', or 0-6)
    #[arg(long, requires = "monthly_week")]
    pub monthly_day: Option<String>,

    /// Stop after this many occurrences
    #[arg(long, conflicts_with = "until")]
    pub count: Option<u32>,

    /// Last date an occurrence may fall on (e.g., '2024-12-31')
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    #[command(flatten)]
    pub rule: RuleArgs,

    /// Number of occurrences to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Only show occurrences after this date/time
    #[arg(long)]
    pub after: Option<String>,

    /// Generate the full materialization window (preview.materialize_count)
    #[arg(long, conflicts_with_all = ["limit", "after"])]
    pub materialize: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckCommand {
    #[command(flatten)]
    pub rule: RuleArgs,

    /// Print the validation result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EncodeCommand {
    #[command(flatten)]
    pub rule: RuleArgs,
}

/// Human-friendly recurrence patterns
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceShortcut {
    /// Every day
    Daily,
    /// Every week (same day, or the days given with --on)
    Weekly,
    /// Every month (same date, or --monthly-date / --monthly-week)
    Monthly,
    /// Every year (same date)
    Yearly,
    /// Every N days, like daily
    Custom,
    /// Monday to Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
}

impl std::fmt::Display for RecurrenceShortcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceShortcut::Daily => write!(f, "daily"),
            RecurrenceShortcut::Weekly => write!(f, "weekly"),
            RecurrenceShortcut::Monthly => write!(f, "monthly"),
            RecurrenceShortcut::Yearly => write!(f, "yearly"),
            RecurrenceShortcut::Custom => write!(f, "custom"),
            RecurrenceShortcut::Weekdays => write!(f, "weekdays"),
            RecurrenceShortcut::Weekends => write!(f, "weekends"),
        }
    }
}

impl RecurrenceShortcut {
    /// The rule pattern this shortcut stands for.
    pub fn pattern(&self) -> Pattern {
        match self {
            RecurrenceShortcut::Daily => Pattern::Daily,
            RecurrenceShortcut::Weekly
            | RecurrenceShortcut::Weekdays
            | RecurrenceShortcut::Weekends => Pattern::Weekly,
            RecurrenceShortcut::Monthly => Pattern::Monthly,
            RecurrenceShortcut::Yearly => Pattern::Yearly,
            RecurrenceShortcut::Custom => Pattern::Custom,
        }
    }

    /// Weekdays implied by the shortcut (0 = Sunday).
    pub fn implied_days(&self) -> &'static [u8] {
        match self {
            RecurrenceShortcut::Weekdays => &[1, 2, 3, 4, 5],
            RecurrenceShortcut::Weekends => &[0, 6],
            _ => &[],
        }
    }
}

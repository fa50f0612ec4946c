extern crate almanac as lib;

use chrono::{Local, NaiveDate, Utc};
use flexi_logger::{FileSpec, Logger};
use lib::config::load_suitable_config;
use lib::view::render_text;
use lib::{
    CalendarDate, CalendarEngine, CalendarEvent, ColorMap, ExpansionState, MonthIndex, WeekStart,
};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "alm",
    about = "Almanac - month calendar of scheduled payments and notifications."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "e",
        long = "events",
        help = "JSON file with the event list (read from stdin if omitted)",
        parse(from_os_str)
    )]
    pub events: Option<PathBuf>,

    #[structopt(short = "m", long = "month", help = "month to show as YYYY-MM")]
    pub month: Option<MonthIndex>,

    #[structopt(long = "week-start", help = "first column of the grid (monday, sunday)")]
    pub week_start: Option<WeekStart>,

    #[structopt(
        long = "expand",
        number_of_values = 1,
        help = "show all events of this day (YYYY-MM-DD), may be repeated"
    )]
    pub expand: Vec<CalendarDate>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn read_events(path: Option<&Path>) -> lib::Result<Vec<CalendarEvent>> {
    let reader: Box<dyn Read> = match path {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };

    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    let mut config = load_suitable_config(args.configfile.as_deref())?;
    if let Some(week_start) = args.week_start {
        config.week_start = week_start;
    }

    let engine = CalendarEngine::from_config(&config)?;
    let tz = config.tz()?;

    let mut events = read_events(args.events.as_deref())?;

    // The engine takes dates as written; shift instants into the display zone first
    let today: NaiveDate = if let Some(tz) = &tz {
        events = lib::tz::normalize_events(events, tz);
        Utc::now().with_timezone(tz).date_naive()
    } else {
        Local::now().date_naive()
    };

    let month = args.month.unwrap_or_else(MonthIndex::today);

    let (view, colors) = engine.build_month_view(
        month.year(),
        month.month0() as i32,
        &events,
        ColorMap::new(),
        Some(today.into()),
    )?;

    let expanded: ExpansionState = args.expand.into_iter().collect();
    print!(
        "{}",
        render_text(&view, &expanded, &config.expansion_tracker())
    );

    if !colors.is_empty() {
        println!();
        for (key, color) in colors.iter() {
            println!("{:>12}  {}", key, color);
        }
    }

    let diagnostics = view.diagnostics();
    if !diagnostics.is_clean() {
        eprintln!(
            "{} event(s) skipped because of unreadable timestamps:",
            diagnostics.skipped()
        );
        for malformed in diagnostics.malformed.iter() {
            eprintln!("  {}: '{}'", malformed.id, malformed.occurs_at);
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};
use tracing::Level;

use crate::domain::{
    error::Result,
    statement::{DateFormats, DEFAULT_INPUT_DATE_FORMAT, DEFAULT_OUTPUT_DATE_FORMAT},
};

#[derive(Debug, Parser)]
#[command(name = "stmt2xero", version)]
#[command(about = "Converts semicolon separated bank statements into accounting import CSV")]
pub struct Args {
    /// Bank statement export; the result is written next to it as `<name>_output.csv`
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// strftime format of the "Booked date" column
    #[arg(long, value_name = "FORMAT", default_value = DEFAULT_INPUT_DATE_FORMAT)]
    pub input_date_format: String,

    /// strftime format of the "*Date" output column
    #[arg(long, value_name = "FORMAT", default_value = DEFAULT_OUTPUT_DATE_FORMAT)]
    pub output_date_format: String,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn date_formats(&self) -> Result<DateFormats> {
        DateFormats::new(&self.input_date_format, &self.output_date_format)
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }

    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_is_positional() {
        let args = Args::try_parse_from(["stmt2xero", "statements.csv"]).unwrap();

        assert_eq!(args.input, Some(PathBuf::from("statements.csv")));
        assert_eq!(args.date_formats().unwrap(), DateFormats::default());
        assert_eq!(args.log_level(), Level::WARN);
    }

    #[test]
    fn input_may_be_omitted_at_parse_time() {
        let args = Args::try_parse_from(["stmt2xero"]).unwrap();
        assert_eq!(args.input, None);
        assert!(Args::usage().contains("[FILE]"));
    }

    #[test]
    fn date_formats_and_verbosity_are_configurable() {
        let args = Args::try_parse_from([
            "stmt2xero",
            "-vv",
            "--input-date-format",
            "%m/%d/%Y",
            "--output-date-format",
            "%Y-%m-%d",
            "in.csv",
        ])
        .unwrap();

        let formats = args.date_formats().unwrap();
        assert_eq!(formats.input(), "%m/%d/%Y");
        assert_eq!(formats.output(), "%Y-%m-%d");
        assert_eq!(args.log_level(), Level::DEBUG);
    }
}

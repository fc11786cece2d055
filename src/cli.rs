//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`PositionArg`] - clap-facing mirror of [`MsgPosition`]
//!
//! ```rust
//! use chatmap::cli::PositionArg;
//! use chatmap::config::MsgPosition;
//!
//! assert_eq!(MsgPosition::from(PositionArg::Before), MsgPosition::Before);
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{MsgPosition, ParseConfig};

/// Turn exported chat logs from Telegram, WhatsApp and Signal into a
/// GeoJSON map of shared locations.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatmap")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatmap result.json
    chatmap result.json chat.txt -o map.geojson --pretty
    chatmap chat.txt -p before --report
    chatmap result.json --media ./photos")]
pub struct Args {
    /// Chat export files (format is detected per file)
    #[arg(required = true, value_name = "FILES")]
    pub inputs: Vec<PathBuf>,

    /// Which message to attach to each location
    #[arg(short = 'p', long, value_enum, default_value_t = PositionArg::Closest)]
    pub position: PositionArg,

    /// Write GeoJSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the GeoJSON
    #[arg(long)]
    pub pretty: bool,

    /// Directory holding exported media; missing attachments are reported
    #[arg(long, value_name = "DIR")]
    pub media: Option<PathBuf>,

    /// Print a per-file summary to stderr
    #[arg(long)]
    pub report: bool,

    /// Keep system notices eligible as context messages
    #[arg(long)]
    pub keep_system: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Builds the parse configuration from the flags.
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig::new()
            .with_msg_position(self.position.into())
            .with_skip_system_messages(!self.keep_system)
    }

    /// Default log directive for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Context message policy as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum PositionArg {
    /// Nearest message in time, on either side
    #[default]
    Closest,
    /// Nearest preceding message
    Before,
    /// Nearest following message
    After,
}

impl From<PositionArg> for MsgPosition {
    fn from(arg: PositionArg) -> MsgPosition {
        match arg {
            PositionArg::Closest => MsgPosition::Closest,
            PositionArg::Before => MsgPosition::Before,
            PositionArg::After => MsgPosition::After,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["chatmap", "a.json"]).unwrap();
        assert_eq!(args.inputs, [PathBuf::from("a.json")]);
        assert_eq!(args.position, PositionArg::Closest);
        assert!(args.output.is_none());
        assert_eq!(args.log_level(), "warn");
        assert_eq!(args.parse_config(), ParseConfig::default());
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "chatmap", "a.json", "b.txt", "-p", "after", "-o", "out.geojson", "--pretty",
            "--keep-system", "-vv",
        ])
        .unwrap();
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.parse_config().msg_position, MsgPosition::After);
        assert!(!args.parse_config().skip_system_messages);
        assert_eq!(args.output, Some(PathBuf::from("out.geojson")));
        assert!(args.pretty);
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_args_require_input() {
        assert!(Args::try_parse_from(["chatmap"]).is_err());
    }

    #[test]
    fn test_args_reject_unknown_position() {
        assert!(Args::try_parse_from(["chatmap", "a.json", "-p", "nearest"]).is_err());
    }

    #[test]
    fn test_position_conversion() {
        assert_eq!(MsgPosition::from(PositionArg::Closest), MsgPosition::Closest);
        assert_eq!(MsgPosition::from(PositionArg::After), MsgPosition::After);
    }
}

//! Command-line options of a test binary.
//!
//! ```text
//! --color on|off|auto     colored report (auto: only on a terminal)
//! --only "3 7 12"         run just these case ids
//! --skip "7"              don't run these case ids (applied after --only)
//! ```
//!
//! Arguments under a prefix declared with
//! [`TesterConfiguration::set_skipped_argument_prefixes`] belong to the host
//! application and are removed before parsing.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::num::IntErrorKind;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use tracing::trace;

use crate::engine::TesterConfiguration;
use crate::errors::{InvalidCaseId, TesterError};

/// When the report uses ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    On,
    Off,
    #[default]
    Auto,
}

/// A space-separated list of 1-based case ids, as given to `--only`/`--skip`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseIds(Vec<usize>);

impl FromStr for CaseIds {
    type Err = InvalidCaseId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(|id| match id.parse::<usize>() {
                Ok(id) => Ok(id),
                // too large for any registry, so out of range like any other
                Err(err) if *err.kind() == IntErrorKind::PosOverflow => Ok(usize::MAX),
                Err(_) => Err(InvalidCaseId(id.to_string())),
            })
            .collect::<Result<_, _>>()
            .map(CaseIds)
    }
}

/// The raw argument structure.
#[derive(Debug, Parser)]
#[command(about = "Runs the test cases of this suite.")]
struct TesterArgs {
    /// Colored output.
    #[arg(long, value_enum, value_name = "MODE", default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Run only the given test cases, e.g. "1 4 9". Empty runs all of them.
    #[arg(long, value_name = "IDS")]
    only: Option<CaseIds>,

    /// Don't run the given test cases.
    #[arg(long, value_name = "IDS")]
    skip: Option<CaseIds>,
}

/// Which registered cases a run executes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub only: Option<Vec<usize>>,
    pub skip: Vec<usize>,
}

impl CaseFilter {
    /// Zero-based registry indices to run, in registry order.
    ///
    /// Ids are 1-based; ids outside `1..=count` are ignored. Filtering never
    /// renumbers cases.
    pub fn select(&self, count: usize) -> Vec<usize> {
        let skipped: BTreeSet<usize> = self.skip.iter().copied().collect();
        let wanted = |id: &usize| !skipped.contains(id);
        match &self.only {
            None => (1..=count).filter(wanted).map(|id| id - 1).collect(),
            Some(only) => only
                .iter()
                .copied()
                .filter(|id| (1..=count).contains(id))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(wanted)
                .map(|id| id - 1)
                .collect(),
        }
    }
}

/// Parsed options of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub color: ColorMode,
    pub filter: CaseFilter,
}

impl Options {
    /// Parses `args`, the first of which is the program name.
    pub fn parse<I, T>(args: I, configuration: &TesterConfiguration) -> Result<Self, TesterError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = strip_skipped(
            args.into_iter().map(Into::into).collect(),
            configuration.skipped_argument_prefixes(),
        );
        let parsed = TesterArgs::try_parse_from(args)?;
        Ok(Options {
            color: parsed.color,
            filter: CaseFilter {
                only: parsed.only.map(|ids| ids.0).filter(|ids| !ids.is_empty()),
                skip: parsed.skip.map(|ids| ids.0).unwrap_or_default(),
            },
        })
    }
}

/// Drops `--<prefix>-name[=value]` arguments and their separate value.
///
/// A separate value is the next argument unless that one is an option itself.
fn strip_skipped(args: Vec<OsString>, prefixes: &[String]) -> Vec<OsString> {
    if prefixes.is_empty() {
        return args;
    }
    let markers: Vec<String> = prefixes.iter().map(|p| format!("--{p}-")).collect();
    let mut kept = Vec::with_capacity(args.len());
    let mut iter = args.into_iter().peekable();
    // program name
    kept.extend(iter.next());
    while let Some(arg) = iter.next() {
        let is_host = arg
            .to_str()
            .is_some_and(|text| markers.iter().any(|marker| text.starts_with(marker.as_str())));
        if !is_host {
            kept.push(arg);
            continue;
        }
        let text = arg.to_string_lossy();
        trace!(argument = %text, "skipping host argument");
        if !text.contains('=') {
            let takes_value = iter
                .peek()
                .is_some_and(|next| !next.to_string_lossy().starts_with("--"));
            if takes_value {
                iter.next();
            }
        }
    }
    kept
}

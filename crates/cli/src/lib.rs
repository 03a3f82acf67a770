#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-end for the `mdsum` digest
//! toolkit. It is a thin wrapper: every subcommand maps directly onto one
//! engine entry point and renders its output or error.
//!
//! - `string TEXT` — digest of the UTF-8 bytes of `TEXT`.
//! - `file PATH` — digest of a file's contents.
//! - `tree DIR [--manifest]` — aggregate digest of a directory tree,
//!   optionally persisting per-file digests to `file_hashes.txt` inside it.
//! - `trace TEXT` — step-by-step execution trace of the algorithm over
//!   `TEXT`, one record per compression step.
//! - `verify PATH HEX` — hash a file and compare against an expected digest.
//! - `compare REFERENCE CURRENT` — three-way manifest comparison.
//!
//! # Design
//!
//! [`run`] accepts the argument iterator together with handles for standard
//! output and error and returns the process exit code, so the full command
//! surface is exercisable in-process by tests. Exit codes: `0` success (for
//! `verify`/`compare`, a clean result), `1` operation failure or unclean
//! result, `2` usage error.
//!
//! # Errors
//!
//! [`run`] never panics; operational failures are rendered to the error
//! handle as `mdsum: <message>` and surface as exit code `1`.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use md5_core::{Md5, StepOutcome, Stepper};

/// Exit code for successful runs.
const EXIT_OK: u8 = 0;
/// Exit code for operational failures and unclean comparisons.
const EXIT_FAILURE: u8 = 1;
/// Exit code for argument errors.
const EXIT_USAGE: u8 = 2;

/// Builds the clap command definition.
fn command() -> Command {
    Command::new("mdsum")
        .about("MD5 digests for strings, files, and directory trees")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("string")
                .about("Hash the UTF-8 bytes of TEXT")
                .arg(Arg::new("text").value_name("TEXT").required(true)),
        )
        .subcommand(
            Command::new("file").about("Hash the contents of a file").arg(
                Arg::new("path")
                    .value_name("PATH")
                    .required(true)
                    .value_parser(value_parser!(PathBuf)),
            ),
        )
        .subcommand(
            Command::new("tree")
                .about("Hash a directory tree into one aggregate digest")
                .arg(
                    Arg::new("dir")
                        .value_name("DIR")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("manifest")
                        .long("manifest")
                        .value_name("FILE")
                        .num_args(0..=1)
                        .default_missing_value(treehash::DEFAULT_MANIFEST_NAME)
                        .value_parser(value_parser!(PathBuf))
                        .help(
                            "Also write per-file digests to FILE, resolved inside DIR \
                             (default file_hashes.txt)",
                        ),
                ),
        )
        .subcommand(
            Command::new("trace")
                .about("Print every compression step while hashing TEXT")
                .arg(Arg::new("text").value_name("TEXT").required(true)),
        )
        .subcommand(
            Command::new("verify")
                .about("Hash a file and compare against an expected digest")
                .arg(
                    Arg::new("path")
                        .value_name("PATH")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("digest")
                        .value_name("HEX")
                        .required(true)
                        .help("Expected 32-character hex digest (compared byte-for-byte)"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare two hash manifests, reference-driven")
                .arg(
                    Arg::new("reference")
                        .value_name("REFERENCE")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("current")
                        .value_name("CURRENT")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
}

/// Parses `args` and executes the requested subcommand.
///
/// Returns the process exit code. Diagnostics go to `stderr`, results to
/// `stdout`.
pub fn run<I, T, O, E>(args: I, stdout: &mut O, stderr: &mut E) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    O: Write,
    E: Write,
{
    let matches = match command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => {
            use clap::error::ErrorKind;
            let rendered = error.render();
            return if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                let _ = write!(stdout, "{rendered}");
                EXIT_OK
            } else {
                let _ = write!(stderr, "{rendered}");
                EXIT_USAGE
            };
        }
    };

    init_tracing(matches.get_count("verbose"));

    if let Some((name, _)) = matches.subcommand() {
        tracing::debug!(target: "mdsum::cli", subcommand = name, "dispatching");
    }

    let outcome = match matches.subcommand() {
        Some(("string", sub)) => hash_string(sub, stdout),
        Some(("file", sub)) => hash_file(sub, stdout),
        Some(("tree", sub)) => hash_tree(sub, stdout),
        Some(("trace", sub)) => trace_string(sub, stdout),
        Some(("verify", sub)) => verify_file(sub, stdout),
        Some(("compare", sub)) => compare_manifests(sub, stdout),
        _ => unreachable!("subcommand_required guarantees a subcommand"),
    };

    match outcome {
        Ok(code) => code,
        Err(CliError::Operation(message)) => {
            let _ = writeln!(stderr, "mdsum: {message}");
            EXIT_FAILURE
        }
        Err(CliError::Usage(message)) => {
            let _ = writeln!(stderr, "mdsum: {message}");
            EXIT_USAGE
        }
        Err(CliError::Output(_)) => EXIT_FAILURE,
    }
}

/// Internal failure channel for subcommand handlers.
enum CliError {
    /// The requested operation failed; rendered as `mdsum: <message>`.
    Operation(String),
    /// The arguments were shaped wrong in a way clap cannot express.
    Usage(String),
    /// Writing to the output handle failed; nothing sensible left to print.
    Output(io::Error),
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        Self::Output(error)
    }
}

fn operation(error: impl std::fmt::Display) -> CliError {
    CliError::Operation(error.to_string())
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    // Repeated initialisation (tests call run() many times) is fine to ignore.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn hash_string<O: Write>(matches: &ArgMatches, stdout: &mut O) -> Result<u8, CliError> {
    let text = matches.get_one::<String>("text").expect("required arg");
    writeln!(stdout, "{}", Md5::digest(text.as_bytes()))?;
    Ok(EXIT_OK)
}

fn hash_file<O: Write>(matches: &ArgMatches, stdout: &mut O) -> Result<u8, CliError> {
    let path = matches.get_one::<PathBuf>("path").expect("required arg");
    let digest = md5_core::hash_file(path)
        .map_err(|error| operation(format!("failed to hash '{}': {error}", path.display())))?;
    writeln!(stdout, "{digest}")?;
    Ok(EXIT_OK)
}

fn hash_tree<O: Write>(matches: &ArgMatches, stdout: &mut O) -> Result<u8, CliError> {
    let dir = matches.get_one::<PathBuf>("dir").expect("required arg");
    let digests = treehash::file_digests(dir).map_err(operation)?;
    let digest = treehash::aggregate(&digests);
    writeln!(stdout, "{digest}")?;

    // Written after hashing so the manifest never feeds into its own
    // aggregate.
    if let Some(file) = matches.get_one::<PathBuf>("manifest") {
        let manifest_path = if file.is_absolute() {
            file.clone()
        } else {
            dir.join(file)
        };
        treehash::write_manifest(&digests, &manifest_path).map_err(operation)?;
        writeln!(stdout, "manifest written to {}", manifest_path.display())?;
    }
    Ok(EXIT_OK)
}

fn trace_string<O: Write>(matches: &ArgMatches, stdout: &mut O) -> Result<u8, CliError> {
    let text = matches.get_one::<String>("text").expect("required arg");
    let mut session = Stepper::new(text.as_bytes());
    let total = session.total_blocks();

    loop {
        match session.advance() {
            StepOutcome::Step(record) => {
                if record.step_index == 0 {
                    writeln!(stdout, "\nProcessing block {} of {total}:", record.block_index + 1)?;
                }
                let [a, b, c, d] = record.registers;
                writeln!(stdout, "\nRound {}, Step {}:", record.round, record.step_in_round)?;
                writeln!(stdout, "A: {a:08x}  B: {b:08x}  C: {c:08x}  D: {d:08x}")?;
                writeln!(stdout, "f: {:08x}  g: {}", record.f, record.word_index)?;
                writeln!(stdout, "Temp result: {:08x}", record.unrotated)?;
            }
            StepOutcome::BlockBoundary {
                block_index,
                registers: [a, b, c, d],
            } => {
                writeln!(
                    stdout,
                    "\nBlock {} folded: A: {a:08x}  B: {b:08x}  C: {c:08x}  D: {d:08x}",
                    block_index + 1
                )?;
            }
            StepOutcome::Completed(digest) => {
                writeln!(stdout, "\nFinal MD5 hash: {digest}")?;
                return Ok(EXIT_OK);
            }
            StepOutcome::AlreadyCompleted => {
                unreachable!("loop exits on completion")
            }
        }
    }
}

fn verify_file<O: Write>(matches: &ArgMatches, stdout: &mut O) -> Result<u8, CliError> {
    let path = matches.get_one::<PathBuf>("path").expect("required arg");
    let expected = matches.get_one::<String>("digest").expect("required arg");
    if expected.len() != 32 || !expected.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CliError::Usage(format!(
            "'{expected}' is not a 32-character hex digest"
        )));
    }

    let digest = md5_core::hash_file(path)
        .map_err(|error| operation(format!("failed to hash '{}': {error}", path.display())))?;
    let computed = digest.to_hex();
    if manifest::integrity_check(expected, &computed) {
        writeln!(stdout, "OK {computed}")?;
        Ok(EXIT_OK)
    } else {
        writeln!(stdout, "MISMATCH expected {expected} computed {computed}")?;
        Ok(EXIT_FAILURE)
    }
}

fn compare_manifests<O: Write>(matches: &ArgMatches, stdout: &mut O) -> Result<u8, CliError> {
    let reference_path = matches
        .get_one::<PathBuf>("reference")
        .expect("required arg");
    let current_path = matches.get_one::<PathBuf>("current").expect("required arg");

    let reference = manifest::Manifest::load(reference_path).map_err(operation)?;
    let current = manifest::Manifest::load(current_path).map_err(operation)?;
    let result = manifest::compare(&reference, &current);

    for (label, names) in [
        ("matched", &result.matched),
        ("mismatched", &result.mismatched),
        ("missing", &result.missing),
    ] {
        writeln!(stdout, "{label} ({}):", names.len())?;
        for name in names {
            writeln!(stdout, "  {name}")?;
        }
    }

    Ok(if result.is_clean() { EXIT_OK } else { EXIT_FAILURE })
}

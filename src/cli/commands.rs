//! CLI command implementations
//!
//! `compile` reads one CQL statement per stdin line and answers each with
//! one JSON line on stdout. Define and drop commands update the session's
//! schema catalog; every mutation is appended to the WAL, when one is
//! given, before it is applied or acknowledged.
//!
//! `replay` prints the commands held in a WAL file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;

use super::args::Command as CliCommand;
use super::config::Config;
use super::errors::CliResult;
use super::io::{write_error, write_response};
use crate::compiler::{compile as compile_statement, Command, CompileError, CompilerConfig};
use crate::observability::{log_event_with_fields, set_min_severity, Event};
use crate::schema::{SchemaCatalog, SchemaError};
use crate::wal::{RecordType, WalDecoder, WalEncoder, WalError, WalRecord};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: CliCommand) -> CliResult<()> {
    match cmd {
        CliCommand::Compile {
            schemas,
            config,
            wal,
        } => compile(schemas.as_deref(), config.as_deref(), wal.as_deref()),
        CliCommand::Replay { wal } => replay(&wal),
    }
}

/// Compile stdin statements until EOF
pub fn compile(
    schemas_path: Option<&Path>,
    config_path: Option<&Path>,
    wal_path: Option<&Path>,
) -> CliResult<()> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    set_min_severity(config.severity());
    let limit = config.compiler.default_limit.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("default_limit", &limit), ("log_level", &config.log_level)],
    );

    let mut catalog = match schemas_path {
        Some(path) => SchemaCatalog::load(path)?,
        None => SchemaCatalog::new(),
    };
    let count = catalog.len().to_string();
    log_event_with_fields(Event::SchemasLoaded, &[("collections", &count)]);

    let stdin = io::stdin();
    let stdout = io::stdout();

    match wal_path {
        Some(path) => {
            let mut encoder = open_wal(path, config.wal_page_bytes)?;
            run_session(
                stdin.lock(),
                stdout.lock(),
                &mut catalog,
                &config.compiler,
                Some(&mut encoder),
            )?;
            encoder.get_ref().sync_data()?;
        }
        None => {
            run_session::<_, _, io::Sink>(
                stdin.lock(),
                stdout.lock(),
                &mut catalog,
                &config.compiler,
                None,
            )?;
        }
    }

    Ok(())
}

/// Compile every line of `input`, answering on `output`
///
/// Returns the number of statements that produced a command. Rejected
/// statements are answered with an error line and do not stop the session.
pub fn run_session<I: BufRead, O: Write, S: Write>(
    input: I,
    mut output: O,
    catalog: &mut SchemaCatalog,
    config: &CompilerConfig,
    mut wal: Option<&mut WalEncoder<S>>,
) -> CliResult<usize> {
    let mut compiled = 0;

    for line in input.lines() {
        let line = line?;
        let statement = line.trim();
        if statement.is_empty() {
            continue;
        }

        let command = match compile_statement(statement, &*catalog, config) {
            Ok(command) => command,
            Err(e) => {
                write_error(&mut output, e.code().code(), e.message())?;
                continue;
            }
        };

        // Engine-side checks happen before anything is logged
        match &command {
            Command::DefineSchema { collection, .. } if catalog.contains(collection) => {
                let e = SchemaError::exists(collection.as_str());
                write_error(&mut output, e.code().code(), e.message())?;
                continue;
            }
            Command::DropSchema { collection } if !catalog.contains(collection) => {
                let e = CompileError::schema_not_found(collection);
                write_error(&mut output, e.code().code(), e.message())?;
                continue;
            }
            _ => {}
        }

        if command.is_mutation() {
            if let Some(encoder) = wal.as_deref_mut() {
                match encoder.encode(&mut WalRecord::command(&command)?) {
                    Ok(()) => encoder.flush()?,
                    Err(e @ WalError::RecordTooLarge { .. }) => {
                        write_error(&mut output, e.code(), &e.to_string())?;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        apply(catalog, &command)?;
        write_response(&mut output, &command)?;
        compiled += 1;
    }

    Ok(compiled)
}

fn apply(catalog: &mut SchemaCatalog, command: &Command) -> CliResult<()> {
    match command {
        Command::DefineSchema { collection, schema } => {
            catalog.define(collection.as_str(), schema.clone())?;
        }
        Command::DropSchema { collection } => {
            catalog.drop_collection(collection);
        }
        Command::Insert(_) | Command::Delete(_) | Command::Select(_) => {}
    }
    Ok(())
}

/// Open a WAL for appending
///
/// An existing log is verified first. A torn tail is cut off at the end of
/// the last complete record; any other damage is an error. A new log starts
/// with a CRC record.
pub fn open_wal(path: &Path, page_bytes: usize) -> CliResult<WalEncoder<File>> {
    let (prev_crc, offset) = if path.exists() {
        let mut decoder = WalDecoder::new(BufReader::new(File::open(path)?));
        loop {
            match decoder.decode() {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(WalError::TornWrite { .. }) => break,
                Err(e) => return Err(e.into()),
            }
        }
        (decoder.last_crc(), decoder.offset())
    } else {
        (0, 0)
    };

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)?;
    file.set_len(offset)?;
    file.seek(SeekFrom::Start(offset))?;

    let mut encoder = WalEncoder::new(file, prev_crc, offset, page_bytes);
    if offset == 0 {
        encoder.encode(&mut WalRecord::crc_marker())?;
        encoder.flush()?;
    }
    Ok(encoder)
}

/// Print every command in a WAL file
pub fn replay(path: &Path) -> CliResult<()> {
    let stdout = io::stdout();
    replay_to(path, stdout.lock())?;
    Ok(())
}

/// Write every command in the WAL at `path` to `output`
///
/// A torn tail is reported as a final error line; other damage aborts.
pub fn replay_to<O: Write>(path: &Path, mut output: O) -> CliResult<usize> {
    let mut decoder = WalDecoder::new(BufReader::new(File::open(path)?));
    let mut replayed = 0;

    loop {
        let record = match decoder.decode() {
            Ok(Some(record)) => record,
            Ok(None) => break,
            Err(e @ WalError::TornWrite { .. }) => {
                write_error(&mut output, e.code(), &e.to_string())?;
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if record.record_type == RecordType::Command {
            write_response(&mut output, &record.to_command()?)?;
            replayed += 1;
        }
    }

    let offset = decoder.offset().to_string();
    let count = replayed.to_string();
    log_event_with_fields(
        Event::WalReplayComplete,
        &[("offset", &offset), ("records", &count)],
    );
    Ok(replayed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::MAX_RECORD_BYTES;
    use tempfile::TempDir;

    fn session(input: &str, catalog: &mut SchemaCatalog) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        run_session::<_, _, io::Sink>(
            input.as_bytes(),
            &mut out,
            catalog,
            &CompilerConfig::default(),
            None,
        )
        .unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_session_applies_schema_commands() {
        let mut catalog = SchemaCatalog::new();
        let lines = session(
            "CREATE orders (price UINT32, name STR)\n\
             \n\
             INSERT INTO orders VALUES (1, 42, x)\n\
             SELECT FROM orders WHERE price > 0\n",
            &mut catalog,
        );

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l["status"] == "ok"));
        assert_eq!(lines[1]["data"]["kind"], "insert");
        assert_eq!(lines[2]["data"]["order_by"], "price");
        assert!(catalog.contains("orders"));
    }

    #[test]
    fn test_session_continues_after_rejection() {
        let mut catalog = SchemaCatalog::new();
        let lines = session(
            "INSERT INTO orders VALUES (1)\n\
             CREATE orders (price UINT8)\n\
             CREATE orders (price UINT8)\n\
             DROP orders\n\
             DROP orders\n",
            &mut catalog,
        );

        let statuses: Vec<&str> = lines.iter().map(|l| l["status"].as_str().unwrap()).collect();
        assert_eq!(statuses, vec!["error", "ok", "error", "ok", "error"]);
        assert_eq!(lines[0]["code"], "AERO_CQL_SCHEMA_NOT_FOUND");
        assert_eq!(lines[2]["code"], "AERO_SCHEMA_EXISTS");
        assert_eq!(lines[4]["code"], "AERO_CQL_SCHEMA_NOT_FOUND");
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_session_logs_only_mutations() {
        let mut catalog = SchemaCatalog::new();
        let mut encoder = WalEncoder::new(Vec::new(), 0, 0, 4096);
        let input = "CREATE t (a UINT8)\nINSERT INTO t (1, 2)\nSELECT FROM t WHERE a > 1\nBAD\n";

        let compiled = run_session(
            input.as_bytes(),
            io::sink(),
            &mut catalog,
            &CompilerConfig::default(),
            Some(&mut encoder),
        )
        .unwrap();
        assert_eq!(compiled, 3);

        let records = WalDecoder::new(encoder.get_ref().as_slice()).decode_all().unwrap();
        let kinds: Vec<&str> = records
            .iter()
            .map(|r| r.to_command().unwrap().kind())
            .collect();
        assert_eq!(kinds, vec!["define_schema", "insert"]);
    }

    #[test]
    fn test_oversized_mutation_rejected_and_not_applied() {
        let mut catalog = SchemaCatalog::new();
        let mut encoder = WalEncoder::new(Vec::new(), 0, 0, 4096);
        let big = "a".repeat(MAX_RECORD_BYTES as usize);
        let input = format!(
            "CREATE t (s STR)\nINSERT INTO t VALUES (1, {})\nINSERT INTO t VALUES (2, b)\n",
            big
        );

        let mut out = Vec::new();
        let compiled = run_session(
            input.as_bytes(),
            &mut out,
            &mut catalog,
            &CompilerConfig::default(),
            Some(&mut encoder),
        )
        .unwrap();
        assert_eq!(compiled, 2);

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[1]["status"], "error");
        assert_eq!(lines[1]["code"], "AERO_WAL_RECORD_TOO_LARGE");
        assert_eq!(lines[2]["status"], "ok");

        let records = WalDecoder::new(encoder.get_ref().as_slice()).decode_all().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_open_wal_continues_chain_and_replays() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cql.wal");
        let mut catalog = SchemaCatalog::new();

        {
            let mut encoder = open_wal(&path, 4096).unwrap();
            run_session(
                "CREATE t (a UINT8)\n".as_bytes(),
                io::sink(),
                &mut catalog,
                &CompilerConfig::default(),
                Some(&mut encoder),
            )
            .unwrap();
        }
        {
            let mut encoder = open_wal(&path, 4096).unwrap();
            run_session(
                "INSERT INTO t (1, 2)\n".as_bytes(),
                io::sink(),
                &mut catalog,
                &CompilerConfig::default(),
                Some(&mut encoder),
            )
            .unwrap();
        }

        let mut out = Vec::new();
        assert_eq!(replay_to(&path, &mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("define_schema"));
        assert!(text.contains("\"kind\":\"insert\""));
    }

    #[test]
    fn test_open_wal_cuts_torn_tail() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cql.wal");
        let mut catalog = SchemaCatalog::new();

        let valid_len = {
            let mut encoder = open_wal(&path, 4096).unwrap();
            run_session(
                "CREATE t (a UINT8)\n".as_bytes(),
                io::sink(),
                &mut catalog,
                &CompilerConfig::default(),
                Some(&mut encoder),
            )
            .unwrap();
            encoder.offset()
        };

        // Half a frame left behind by a crash
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[40, 0, 0, 0, 0, 0, 0, 0, 1, 2]).unwrap();
        drop(file);

        let encoder = open_wal(&path, 4096).unwrap();
        assert_eq!(encoder.offset(), valid_len);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), valid_len);
    }

    #[test]
    fn test_replay_reports_torn_tail() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cql.wal");
        {
            let mut encoder = open_wal(&path, 4096).unwrap();
            let command = Command::DropSchema {
                collection: "t".into(),
            };
            encoder.encode(&mut WalRecord::command(&command).unwrap()).unwrap();
            encoder.flush().unwrap();
        }
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[40, 0, 0]).unwrap();
        drop(file);

        let mut out = Vec::new();
        assert_eq!(replay_to(&path, &mut out).unwrap(), 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("AERO_WAL_TORN_WRITE"));
    }
}

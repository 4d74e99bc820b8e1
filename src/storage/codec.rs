//! Tab-separated text codec for lexicons.
//!
//! Format, one record per line:
//! ```text
//! [entity id: i64][TAB][name][TAB][weight: f64]
//! ```
//!
//! Records are grouped by entity. Entities are written in ascending order
//! and names within an entity in lexicographic order, so saving the same
//! lexicon twice produces identical files.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::entity::EntityId;
use crate::error::{LexiconError, LexiconResult, ParseError};
use crate::lexicon::MediatorLexicon;
use crate::storage::{LoadConfig, LoadPolicy, LoadReport};

const SEPARATOR: char = '\t';

/// Writes every `(entity, name, weight)` record of the lexicon to the sink.
///
/// The sink is flushed before returning and dropped on every exit path.
/// Returns the number of records written.
///
/// # Errors
/// - `LexiconError::Io` if the sink cannot be written or flushed
/// - `LexiconError::InvalidName` if a stored name contains a tab or newline
pub fn write<W: Write>(lexicon: &MediatorLexicon, mut sink: W) -> LexiconResult<usize> {
    let mut entities: Vec<EntityId> = lexicon.entity_ids().collect();
    entities.sort_unstable();

    let mut records = 0usize;
    for entity in entities {
        let mut names: Vec<&str> = lexicon.names_of(entity).collect();
        names.sort_unstable();
        for name in names {
            if name.contains(['\t', '\n', '\r']) {
                return Err(LexiconError::InvalidName {
                    name: name.to_string(),
                });
            }
            // Debug formatting keeps a decimal point or exponent and
            // round-trips exactly.
            writeln!(
                sink,
                "{entity}{SEPARATOR}{name}{SEPARATOR}{:?}",
                lexicon.weight(name, entity)
            )?;
            records += 1;
        }
    }
    sink.flush()?;
    Ok(records)
}

/// Reads a lexicon, aborting on the first malformed record.
///
/// # Errors
/// - `LexiconError::Io` if the source cannot be read
/// - `LexiconError::Parse` on the first malformed record
pub fn read<R: BufRead>(source: R) -> LexiconResult<MediatorLexicon> {
    read_with(source, &LoadConfig::default()).map(|(lexicon, _)| lexicon)
}

/// Reads a lexicon under the given load configuration.
///
/// Every parsed record goes through [`MediatorLexicon::add`]. Under the
/// lenient policy malformed records are skipped and listed in the report;
/// I/O failures abort regardless of policy.
///
/// # Errors
/// - `LexiconError::Config` if the configuration is invalid
/// - `LexiconError::Io` if the source cannot be read
/// - `LexiconError::Parse` on a malformed or non-UTF-8 record under the
///   strict policy, or once the lenient skip limit is exceeded
pub fn read_with<R: BufRead>(
    mut source: R,
    config: &LoadConfig,
) -> LexiconResult<(MediatorLexicon, LoadReport)> {
    let config = config.clone().validate()?;
    let mut lexicon = MediatorLexicon::with_kind(config.kind);
    let mut report = LoadReport::default();

    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        if source.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let parsed = decode_line(&buf, line_no).and_then(|line| parse_record(line, line_no));
        match parsed {
            Ok((entity, name, weight)) => {
                lexicon.add(entity, name, weight);
                report.records += 1;
            }
            Err(err) if config.policy == LoadPolicy::Lenient => {
                if config.max_skipped.is_some_and(|limit| report.skipped.len() >= limit) {
                    return Err(err.into());
                }
                warn!(error = %err, "skipping malformed lexicon record");
                report.skipped.push(err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok((lexicon, report))
}

/// Strips the line terminator (`\n` or `\r\n`) and checks the encoding.
fn decode_line(raw: &[u8], line_no: usize) -> Result<&str, ParseError> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw).map_err(|_| ParseError::InvalidUtf8 { line: line_no })
}

fn parse_record(line: &str, line_no: usize) -> Result<(EntityId, &str, f64), ParseError> {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    let &[id, name, weight] = fields.as_slice() else {
        return Err(ParseError::FieldCount {
            line: line_no,
            found: fields.len(),
        });
    };

    let entity = id.parse::<EntityId>().map_err(|_| ParseError::InvalidEntityId {
        line: line_no,
        value: id.to_string(),
    })?;

    let weight = weight
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
        .ok_or_else(|| ParseError::InvalidWeight {
            line: line_no,
            value: weight.to_string(),
        })?;

    Ok((entity, name, weight))
}

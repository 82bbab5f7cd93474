//! Text-row persistence.
//!
//! One creature per line, whitespace separated:
//!
//! ```text
//! kind name x y attack defense
//! ```
//!
//! Loading is forgiving. Rows that do not parse, name an unknown kind or
//! carry coordinates off the map are skipped and logged at debug level.
//! Writing is strict: a name that would not read back as one field is an
//! error, as are I/O failures.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::entity::{CombatStats, Creature, Kind};
use crate::error::PersistenceError;

/// Parses every well-formed row in `text`, in order.
///
/// # Example
///
/// ```
/// use skirmish_core::persistence::parse_rows;
///
/// let creatures = parse_rows("ranger R1 5 5 25 20\ndragon D 1 1 1 1\nbear B 2 2 30 40\n");
/// assert_eq!(creatures.len(), 2);
/// assert_eq!(creatures[1].name(), "B");
/// ```
#[must_use]
pub fn parse_rows(text: &str) -> Vec<Creature> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let parsed = parse_row(line);
            if parsed.is_none() {
                debug!(line = index + 1, row = line, "skipping unreadable row");
            }
            parsed
        })
        .collect()
}

fn parse_row(line: &str) -> Option<Creature> {
    let mut fields = line.split_whitespace();
    let kind: Kind = fields.next()?.parse().ok()?;
    let name = fields.next()?;
    let x: i32 = fields.next()?.parse().ok()?;
    let y: i32 = fields.next()?.parse().ok()?;
    let attack: i32 = fields.next()?.parse().ok()?;
    let defense: i32 = fields.next()?.parse().ok()?;
    Creature::with_stats(name, kind, x, y, CombatStats::new(attack, defense)).ok()
}

/// Renders creatures as rows, one per line, each terminated by `\n`.
///
/// # Errors
///
/// Returns [`PersistenceError::UnwritableName`] for the first creature whose
/// name is empty or contains whitespace. Nothing is rendered in that case.
pub fn render_rows<'a>(
    creatures: impl IntoIterator<Item = &'a Creature>,
) -> Result<String, PersistenceError> {
    let mut out = String::new();
    for creature in creatures {
        let name = creature.name();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(PersistenceError::UnwritableName {
                name: name.to_string(),
            });
        }
        out.push_str(&creature.to_row());
        out.push('\n');
    }
    Ok(out)
}

/// Reads creatures from a row file.
///
/// # Errors
///
/// Returns [`PersistenceError::Io`] if the file cannot be read.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Creature>, PersistenceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let creatures = parse_rows(&text);
    info!(count = creatures.len(), path = %path.display(), "loaded creatures");
    Ok(creatures)
}

/// Writes creatures to a row file, replacing its contents.
///
/// # Errors
///
/// Returns [`PersistenceError::UnwritableName`] without touching the file if
/// any name cannot be written as a row field, or [`PersistenceError::Io`] if
/// the file cannot be written.
pub fn save<'a>(
    path: impl AsRef<Path>,
    creatures: impl IntoIterator<Item = &'a Creature>,
) -> Result<usize, PersistenceError> {
    let path = path.as_ref();
    let text = render_rows(creatures)?;
    let count = text.lines().count();
    fs::write(path, text).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(count, path = %path.display(), "saved creatures");
    Ok(count)
}

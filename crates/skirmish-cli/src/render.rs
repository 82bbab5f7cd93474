//! Text rendering of the running map and the final report.

use std::fmt::Write as _;

use serde::Serialize;
use skirmish_core::arena::{Arena, Census};
use skirmish_core::entity::{Entity, Kind};
use skirmish_core::simulation::FightTally;

/// Cells per side of the overview grid.
pub const GRID_SIZE: usize = 10;

/// Renders the live-count header and a `GRID_SIZE` by `GRID_SIZE` overview.
///
/// Each cell shows the symbol of the last creature that maps onto it. Later
/// creatures in roster order overwrite earlier ones.
pub fn render_map(arena: &Arena, map_size: i32, elapsed_secs: u64) -> String {
    let census = arena.census();
    let mut grid = [['.'; GRID_SIZE]; GRID_SIZE];
    for entity in arena.iter() {
        let (col, row) = grid_cell(entity, map_size);
        grid[row][col] = entity.kind().symbol();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "t={elapsed_secs}s  alive: {}  dead: {}",
        arena.len(),
        arena.graveyard().len()
    );
    let _ = writeln!(out, "{}", census_line(&census));
    out.push_str("  ");
    for col in 0..GRID_SIZE {
        let _ = write!(out, "{col} ");
    }
    out.push('\n');
    for (row, cells) in grid.iter().enumerate() {
        let _ = write!(out, "{row} ");
        for cell in cells {
            out.push(*cell);
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str(&legend());
    out.push('\n');
    out
}

fn grid_cell(entity: &Entity, map_size: i32) -> (usize, usize) {
    let scale = |v: i32| -> usize {
        let cell = i64::from(v) * GRID_SIZE as i64 / i64::from(map_size.max(1));
        usize::try_from(cell).unwrap_or(0).min(GRID_SIZE - 1)
    };
    let pos = entity.position();
    (scale(pos.x()), scale(pos.y()))
}

fn census_line(census: &Census) -> String {
    Kind::ALL
        .iter()
        .map(|kind| format!("{kind}s: {}", census.count_of(*kind)))
        .collect::<Vec<_>>()
        .join("  ")
}

fn legend() -> String {
    Kind::ALL
        .iter()
        .map(|kind| format!("{}={kind}", kind.symbol()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One surviving creature in the final report.
#[derive(Debug, Clone, Serialize)]
pub struct SurvivorRow {
    /// Creature name.
    pub name: String,
    /// Creature kind.
    pub kind: Kind,
    /// Final x coordinate.
    pub x: i32,
    /// Final y coordinate.
    pub y: i32,
    /// Final attack.
    pub attack: i32,
    /// Final defense.
    pub defense: i32,
}

impl From<&Entity> for SurvivorRow {
    fn from(entity: &Entity) -> Self {
        Self {
            name: entity.name().to_string(),
            kind: entity.kind(),
            x: entity.position().x(),
            y: entity.position().y(),
            attack: entity.stats().attack,
            defense: entity.stats().defense,
        }
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Wall-clock seconds the workers ran.
    pub seconds: f64,
    /// Seed used for spawning and movement, if fixed.
    pub seed: Option<u64>,
    /// Creatures alive at the end.
    pub alive: usize,
    /// Creatures dead at the end.
    pub fallen: usize,
    /// Live creatures per kind.
    pub census: Census,
    /// Resolution outcome counts.
    pub tally: FightTally,
    /// Every survivor in roster order.
    pub survivors: Vec<SurvivorRow>,
    /// Names of the dead in order of death.
    pub dead: Vec<String>,
}

impl RunReport {
    /// Builds a report from the final arena.
    pub fn from_arena(arena: &Arena, tally: FightTally, seconds: f64, seed: Option<u64>) -> Self {
        Self {
            seconds,
            seed,
            alive: arena.len(),
            fallen: arena.graveyard().len(),
            census: arena.census(),
            tally,
            survivors: arena.iter().map(SurvivorRow::from).collect(),
            dead: arena.graveyard().iter().map(|e| e.name().to_string()).collect(),
        }
    }

    /// Human readable summary.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== final report ({:.1}s) ===", self.seconds);
        let _ = writeln!(out, "alive: {}  dead: {}", self.alive, self.fallen);
        let _ = writeln!(out, "{}", census_line(&self.census));
        let _ = writeln!(
            out,
            "kills: {}  mutual kills: {}  standoffs: {}  stale: {}",
            self.tally.kills, self.tally.mutual_kills, self.tally.standoffs, self.tally.stale
        );
        if !self.survivors.is_empty() {
            out.push_str("survivors:\n");
            for s in &self.survivors {
                let _ = writeln!(
                    out,
                    "  {:<10} {:<9} [{},{}] atk={} def={}",
                    s.name,
                    s.kind.as_str(),
                    s.x,
                    s.y,
                    s.attack,
                    s.defense
                );
            }
        }
        out
    }
}

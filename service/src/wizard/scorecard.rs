//! The editable scorecard grid: cell traversal, inline editing and the
//! derived totals row.

use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::dto::{HoleForm, MAX_HOLE_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorecardColumn {
    Par,
    Handicap,
    /// Distance from the tee set at this position.
    Distance(usize),
    Notes,
}

/// A cell addressed by hole position (not hole number) and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub hole: usize,
    pub column: ScorecardColumn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorecardGrid {
    hole_count: usize,
    tee_names: Vec<String>,
}

impl ScorecardGrid {
    pub fn new(hole_count: usize, tee_names: Vec<String>) -> Self {
        Self {
            hole_count,
            tee_names,
        }
    }

    fn width(&self) -> usize {
        self.tee_names.len() + 3
    }

    pub fn len(&self) -> usize {
        self.hole_count * self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tee_name(&self, position: usize) -> Option<&str> {
        self.tee_names.get(position).map(String::as_str)
    }

    pub fn index_of(&self, cell: CellRef) -> Option<usize> {
        let tees = self.tee_names.len();
        let column = match cell.column {
            ScorecardColumn::Par => 0,
            ScorecardColumn::Handicap => 1,
            ScorecardColumn::Distance(i) if i < tees => 2 + i,
            ScorecardColumn::Distance(_) => return None,
            ScorecardColumn::Notes => 2 + tees,
        };
        (cell.hole < self.hole_count).then(|| cell.hole * self.width() + column)
    }

    pub fn cell_at(&self, index: usize) -> Option<CellRef> {
        if index >= self.len() {
            return None;
        }
        let tees = self.tee_names.len();
        let column = match index % self.width() {
            0 => ScorecardColumn::Par,
            1 => ScorecardColumn::Handicap,
            c if c < 2 + tees => ScorecardColumn::Distance(c - 2),
            _ => ScorecardColumn::Notes,
        };
        Some(CellRef {
            hole: index / self.width(),
            column,
        })
    }

    pub fn next(&self, cell: CellRef) -> Option<CellRef> {
        self.index_of(cell).and_then(|i| self.cell_at(i + 1))
    }

    pub fn previous(&self, cell: CellRef) -> Option<CellRef> {
        self.index_of(cell)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.cell_at(i))
    }

    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (0..self.len()).filter_map(|i| self.cell_at(i))
    }

    pub fn value(&self, holes: &[HoleForm], cell: CellRef) -> Option<String> {
        let hole = holes.get(cell.hole)?;
        Some(match cell.column {
            ScorecardColumn::Par => hole.par.to_string(),
            ScorecardColumn::Handicap => hole.handicap_index.map(|h| h.to_string()).unwrap_or_default(),
            ScorecardColumn::Distance(i) => hole
                .distance(self.tee_name(i)?)
                .map(|d| d.to_string())
                .unwrap_or_default(),
            ScorecardColumn::Notes => hole.notes.clone().unwrap_or_default(),
        })
    }

    /// Parses `text` for `cell` and writes it into `holes`.
    pub fn write(&self, holes: &mut [HoleForm], cell: CellRef, text: &str) -> Result<(), String> {
        let hole_count = holes.len();
        let hole = holes
            .get_mut(cell.hole)
            .ok_or_else(|| format!("No hole at position {}", cell.hole))?;
        let text = text.trim();
        match cell.column {
            ScorecardColumn::Par => {
                let par = parse_number(text, "Par")?;
                if !(3..=6).contains(&par) {
                    return Err("Par must be between 3 and 6".to_string());
                }
                hole.par = par;
            }
            ScorecardColumn::Handicap => {
                if text.is_empty() {
                    hole.handicap_index = None;
                    return Ok(());
                }
                let handicap = parse_number(text, "Handicap")?;
                if handicap < 1 || handicap as usize > hole_count {
                    return Err(format!("Handicap must be between 1 and {hole_count}"));
                }
                hole.handicap_index = Some(handicap);
            }
            ScorecardColumn::Distance(i) => {
                let tee = self
                    .tee_name(i)
                    .ok_or_else(|| format!("No tee set at position {i}"))?
                    .to_string();
                if text.is_empty() {
                    hole.take_distance(&tee);
                    return Ok(());
                }
                let length = parse_number(text, "Distance")?;
                if !(1..=MAX_HOLE_LENGTH).contains(&length) {
                    return Err(format!("Distance must be between 1 and {MAX_HOLE_LENGTH} yards"));
                }
                hole.set_distance(&tee, length);
            }
            ScorecardColumn::Notes => {
                hole.notes = (!text.is_empty()).then(|| text.to_string());
            }
        }
        Ok(())
    }
}

fn parse_number(text: &str, what: &str) -> Result<i32, String> {
    text.parse()
        .map_err(|_| format!("{what} must be a whole number, got \"{text}\""))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Blur,
    Escape,
    Tab,
    ShiftTab,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Committed(CellRef),
    Cancelled(CellRef),
    /// Committed, and editing continues in this cell.
    Moved(CellRef),
    /// The editor stays open on the offending cell.
    Invalid(String),
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveCell {
    cell: CellRef,
    text: String,
}

/// Inline editor over a grid. At most one cell is edited at a time.
#[derive(Debug, Clone)]
pub struct CellEditor {
    grid: ScorecardGrid,
    active: Option<ActiveCell>,
}

impl CellEditor {
    pub fn new(grid: ScorecardGrid) -> Self {
        Self { grid, active: None }
    }

    pub fn active(&self) -> Option<CellRef> {
        self.active.as_ref().map(|a| a.cell)
    }

    pub fn text(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.text.as_str())
    }

    pub fn begin(&mut self, holes: &[HoleForm], cell: CellRef) -> bool {
        match self.grid.value(holes, cell) {
            Some(text) if self.grid.index_of(cell).is_some() => {
                self.active = Some(ActiveCell { cell, text });
                true
            }
            _ => false,
        }
    }

    pub fn input(&mut self, text: &str) {
        if let Some(active) = &mut self.active {
            active.text = text.to_string();
        }
    }

    pub fn key(&mut self, holes: &mut [HoleForm], key: EditKey) -> EditOutcome {
        let Some(active) = self.active.clone() else {
            return EditOutcome::Idle;
        };
        if key == EditKey::Escape {
            self.active = None;
            return EditOutcome::Cancelled(active.cell);
        }
        if let Err(message) = self.grid.write(holes, active.cell, &active.text) {
            return EditOutcome::Invalid(message);
        }
        self.active = None;
        let target = match key {
            EditKey::Tab => self.grid.next(active.cell),
            EditKey::ShiftTab => self.grid.previous(active.cell),
            _ => None,
        };
        match target {
            Some(cell) if self.begin(holes, cell) => EditOutcome::Moved(cell),
            _ => EditOutcome::Committed(active.cell),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq, Eq)]
pub struct TeeTotals {
    pub tee_set: String,
    pub front: i64,
    pub back: i64,
    pub total: i64,
}

/// The read-only totals row. Recomputed from the holes each time, summed
/// wide so unvalidated rows cannot overflow it.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScorecardTotals {
    pub par_out: i64,
    pub par_in: i64,
    pub par_total: i64,
    pub tees: Vec<TeeTotals>,
}

impl ScorecardTotals {
    pub fn compute(holes: &[HoleForm], tee_names: &[String]) -> Self {
        let front_nine = |h: &&HoleForm| h.number <= 9;
        let par = |h: &HoleForm| i64::from(h.par);
        let par_out: i64 = holes.iter().filter(front_nine).map(par).sum();
        let par_total: i64 = holes.iter().map(par).sum();
        let tees = tee_names
            .iter()
            .map(|name| {
                let length = |h: &HoleForm| i64::from(h.distance(name).unwrap_or(0));
                let front: i64 = holes.iter().filter(front_nine).map(length).sum();
                let total: i64 = holes.iter().map(length).sum();
                TeeTotals {
                    tee_set: name.clone(),
                    front,
                    back: total - front,
                    total,
                }
            })
            .collect();
        Self {
            par_out,
            par_in: par_total - par_out,
            par_total,
            tees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> ScorecardGrid {
        ScorecardGrid::new(2, vec!["Blue".to_string(), "White".to_string()])
    }

    fn cell(hole: usize, column: ScorecardColumn) -> CellRef {
        CellRef { hole, column }
    }

    #[test]
    fn traversal_runs_par_handicap_distances_notes() {
        let grid = grid();
        let order: Vec<_> = grid.cells().collect();
        assert_eq!(
            order[..6],
            [
                cell(0, ScorecardColumn::Par),
                cell(0, ScorecardColumn::Handicap),
                cell(0, ScorecardColumn::Distance(0)),
                cell(0, ScorecardColumn::Distance(1)),
                cell(0, ScorecardColumn::Notes),
                cell(1, ScorecardColumn::Par),
            ]
        );
        assert_eq!(order.len(), 10);
        assert_eq!(grid.next(cell(1, ScorecardColumn::Notes)), None);
        assert_eq!(grid.previous(cell(0, ScorecardColumn::Par)), None);
        assert_eq!(
            grid.previous(cell(1, ScorecardColumn::Par)),
            Some(cell(0, ScorecardColumn::Notes))
        );
        assert_eq!(grid.index_of(cell(0, ScorecardColumn::Distance(2))), None);
    }

    #[test]
    fn tab_commits_and_moves_on() {
        let mut holes = HoleForm::defaults(2);
        let mut editor = CellEditor::new(grid());
        assert!(editor.begin(&holes, cell(0, ScorecardColumn::Par)));
        assert_eq!(editor.text(), Some("4"));

        editor.input("5");
        let outcome = editor.key(&mut holes, EditKey::Tab);
        assert_eq!(outcome, EditOutcome::Moved(cell(0, ScorecardColumn::Handicap)));
        assert_eq!(holes[0].par, 5);
        assert_eq!(editor.text(), Some("1"));

        editor.input("2");
        let outcome = editor.key(&mut holes, EditKey::ShiftTab);
        assert_eq!(outcome, EditOutcome::Moved(cell(0, ScorecardColumn::Par)));
        assert_eq!(holes[0].handicap_index, Some(2));
    }

    #[test]
    fn escape_discards_and_invalid_input_stays_open() {
        let mut holes = HoleForm::defaults(2);
        let mut editor = CellEditor::new(grid());
        editor.begin(&holes, cell(1, ScorecardColumn::Distance(1)));
        editor.input("abc");
        assert!(matches!(editor.key(&mut holes, EditKey::Enter), EditOutcome::Invalid(_)));
        assert_eq!(editor.active(), Some(cell(1, ScorecardColumn::Distance(1))));

        editor.input("310");
        assert_eq!(
            editor.key(&mut holes, EditKey::Blur),
            EditOutcome::Committed(cell(1, ScorecardColumn::Distance(1)))
        );
        assert_eq!(holes[1].distances.get("White"), Some(&310));

        editor.begin(&holes, cell(1, ScorecardColumn::Notes));
        editor.input("Water left");
        assert_eq!(
            editor.key(&mut holes, EditKey::Escape),
            EditOutcome::Cancelled(cell(1, ScorecardColumn::Notes))
        );
        assert_eq!(holes[1].notes, None);
        assert_eq!(editor.key(&mut holes, EditKey::Enter), EditOutcome::Idle);
    }

    #[test]
    fn totals_split_front_and_back() {
        let mut holes = HoleForm::defaults(18);
        holes[0].par = 5;
        holes[17].par = 3;
        for hole in &mut holes {
            hole.distances.insert("Blue".to_string(), 400);
        }
        let totals = ScorecardTotals::compute(&holes, &["Blue".to_string()]);
        assert_eq!(totals.par_out, 37);
        assert_eq!(totals.par_in, 35);
        assert_eq!(totals.par_total, 72);
        assert_eq!(totals.tees[0].front, 3600);
        assert_eq!(totals.tees[0].total, 7200);
    }

    #[test]
    fn totals_match_tee_names_without_case_and_do_not_overflow() {
        let mut holes = HoleForm::defaults(2);
        holes[0].distances.insert("blue".to_string(), 2_000_000_000);
        holes[1].distances.insert("BLUE".to_string(), 2_000_000_000);
        let totals = ScorecardTotals::compute(&holes, &["Blue".to_string()]);
        assert_eq!(totals.tees[0].total, 4_000_000_000);
        assert_eq!(totals.tees[0].front, 4_000_000_000);
    }

    #[test]
    fn distance_cells_are_capped_and_case_blind() {
        let mut holes = HoleForm::defaults(2);
        holes[0].distances.insert("blue".to_string(), 380);
        let grid = grid();
        let blue = cell(0, ScorecardColumn::Distance(0));
        assert_eq!(grid.value(&holes, blue).as_deref(), Some("380"));

        assert!(grid.write(&mut holes, blue, "1001").is_err());
        assert_eq!(holes[0].distance("Blue"), Some(380));

        grid.write(&mut holes, blue, "395").unwrap();
        assert_eq!(holes[0].distances.len(), 1);
        assert_eq!(holes[0].distances.get("Blue"), Some(&395));

        grid.write(&mut holes, blue, "").unwrap();
        assert!(holes[0].distances.is_empty());
    }
}

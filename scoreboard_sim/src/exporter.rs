//! JSON exporter for final scoreboards.

use scoreboard_core::{BoardRow, Overtake};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

use crate::runner::ScenarioResult;

/// A final scoreboard row in export form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRow {
    pub team: String,
    pub rank: usize,
    pub solved: usize,
    pub penalty: u64,
    /// Rendered cells, one per problem
    pub cells: Vec<String>,
}

impl From<&BoardRow> for ExportRow {
    fn from(row: &BoardRow) -> Self {
        Self {
            team: row.team.clone(),
            rank: row.rank,
            solved: row.solved,
            penalty: row.penalty,
            cells: row.cells.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// An overtake in export form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOvertake {
    pub team: String,
    pub displaced: String,
    pub solved: usize,
    pub penalty: u64,
}

impl From<&Overtake> for ExportOvertake {
    fn from(o: &Overtake) -> Self {
        Self {
            team: o.team.clone(),
            displaced: o.displaced.clone(),
            solved: o.solved,
            penalty: o.penalty,
        }
    }
}

/// Complete board export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardExport {
    /// Where the contest came from (scenario name or input path)
    pub source: String,

    /// Seed used, for generated scenarios
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Contest length in minutes
    pub duration: u32,

    /// Overtakes from the last scroll, in order
    pub overtakes: Vec<ExportOvertake>,

    /// Final board
    pub board: Vec<ExportRow>,

    /// Outcome of scenario checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

impl BoardExport {
    /// Creates an export from board rows and overtakes.
    pub fn new(source: &str, duration: u32, board: &[BoardRow], overtakes: &[Overtake]) -> Self {
        Self {
            source: source.to_string(),
            seed: None,
            duration,
            overtakes: overtakes.iter().map(ExportOvertake::from).collect(),
            board: board.iter().map(ExportRow::from).collect(),
            passed: None,
        }
    }

    /// Creates an export from a scenario result.
    pub fn from_result(result: &ScenarioResult) -> Self {
        Self {
            seed: Some(result.seed),
            passed: Some(result.passed),
            ..Self::new(
                result.scenario.name(),
                result.duration,
                &result.final_board,
                &result.overtakes,
            )
        }
    }

    /// Writes the export to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoreboard_core::ProblemCell;

    #[test]
    fn test_export_serialization() {
        let rows = vec![BoardRow {
            team: "alpha".to_string(),
            rank: 1,
            solved: 1,
            penalty: 25,
            cells: vec![ProblemCell::Solved { wrong: 0 }, ProblemCell::Pending { wrong: 2, withheld: 1 }],
        }];
        let overtakes = vec![Overtake {
            team: "alpha".to_string(),
            displaced: "beta".to_string(),
            solved: 1,
            penalty: 25,
        }];

        let export = BoardExport::new("input.txt", 300, &rows, &overtakes);
        let json = serde_json::to_value(&export).unwrap();

        assert_eq!(json["source"], "input.txt");
        assert!(json.get("seed").is_none());
        assert_eq!(json["duration"], 300);
        assert_eq!(json["board"][0]["cells"][1], "-2/1");
        assert_eq!(json["overtakes"][0]["displaced"], "beta");
    }
}

//! Position profiles: the one piece of configuration the pipeline depends
//! on.
//!
//! Everything position-specific lives here as data — which columns to
//! coerce, how duplicate headers are renamed, the composite-score weights,
//! which direction is "good", and how many rows the cohort keeps. The
//! stages themselves stay stateless. Profiles are built once at startup and
//! never mutated; weights are domain constants, not derived values, and
//! deliberately do not sum to anything in particular.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Player position (or team-defense stat variant) a profile ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    K,
    DstRushing,
    DstReceiving,
    DstInterceptions,
    DstFumbles,
    DstTackles,
    KickoffReturns,
    PuntReturns,
}

impl Position {
    pub const ALL: [Position; 12] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::K,
        Position::DstRushing,
        Position::DstReceiving,
        Position::DstInterceptions,
        Position::DstFumbles,
        Position::DstTackles,
        Position::KickoffReturns,
        Position::PuntReturns,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Position::Qb => "qb",
            Position::Rb => "rb",
            Position::Wr => "wr",
            Position::Te => "te",
            Position::K => "k",
            Position::DstRushing => "dst_rushing",
            Position::DstReceiving => "dst_receiving",
            Position::DstInterceptions => "dst_interceptions",
            Position::DstFumbles => "dst_fumbles",
            Position::DstTackles => "dst_tackles",
            Position::KickoffReturns => "kickoff_returns",
            Position::PuntReturns => "punt_returns",
        }
    }

    pub fn from_code(code: &str) -> Option<Position> {
        Position::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// Team defense stat pages rather than individual players.
    pub fn is_defense(self) -> bool {
        matches!(
            self,
            Position::DstRushing
                | Position::DstReceiving
                | Position::DstInterceptions
                | Position::DstFumbles
                | Position::DstTackles
        )
    }

    /// Any team-level page (defense or special teams). These carry a `Team`
    /// column instead of `Player` and publish season totals only.
    pub fn is_team_stats(self) -> bool {
        self.is_defense()
            || matches!(self, Position::KickoffReturns | Position::PuntReturns)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Declared type a numeric column is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    Integer,
    Float,
}

/// One column the normalizer must coerce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    pub kind: NumericKind,
}

/// Renames the `occurrence`-th (1-based, so always >= 2) duplicate of
/// `column` to `to`. A passing table's second "YDS" is rushing yards, not
/// passing yards, and carries a different weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rename {
    pub column: String,
    pub occurrence: usize,
    pub to: String,
}

/// One weighted term of the composite-score formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub column: String,
    pub weight: f64,
    /// Optional terms contribute zero when the column is absent instead of
    /// failing the run.
    #[serde(default)]
    pub optional: bool,
}

/// Which end of the raw-score range is rank 1.
///
/// Offensive stats rank descending. Defensive "allowed" stats rank
/// ascending: fewer yards given up is better, and the normalized score is
/// flipped to match (best defense still normalizes to 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Descending,
    Ascending,
}

/// Immutable per-position configuration. Static, versionable data — never
/// computed at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionProfile {
    pub position: Position,
    pub numeric_columns: Vec<NumericColumn>,
    #[serde(default)]
    pub renames: Vec<Rename>,
    pub formula: Vec<Term>,
    pub orientation: Orientation,
    pub cohort_size: usize,
}

impl PositionProfile {
    /// A formula referencing a column the profile never coerces is a
    /// configuration defect, not a runtime data error. Checked once when
    /// the catalog is built.
    pub fn validate(&self) -> Result<()> {
        for term in &self.formula {
            if !self.numeric_columns.iter().any(|c| c.name == term.column) {
                return Err(PipelineError::InvalidProfile {
                    position: self.position.code().to_string(),
                    reason: format!(
                        "formula references `{}` which is not a numeric column",
                        term.column
                    ),
                });
            }
        }
        if self.cohort_size == 0 {
            return Err(PipelineError::InvalidProfile {
                position: self.position.code().to_string(),
                reason: "cohort_size must be >= 1".into(),
            });
        }
        Ok(())
    }

    pub fn numeric_column(&self, name: &str) -> Option<&NumericColumn> {
        self.numeric_columns.iter().find(|c| c.name == name)
    }

    /// True when every formula term naming `column` is optional. Absent
    /// optional columns score zero; absent required columns abort the run.
    pub fn is_optional(&self, column: &str) -> bool {
        let mut any = false;
        for term in self.formula.iter().filter(|t| t.column == column) {
            any = true;
            if !term.optional {
                return false;
            }
        }
        any
    }
}

fn int(name: &str) -> NumericColumn {
    NumericColumn {
        name: name.into(),
        kind: NumericKind::Integer,
    }
}

fn float(name: &str) -> NumericColumn {
    NumericColumn {
        name: name.into(),
        kind: NumericKind::Float,
    }
}

fn term(column: &str, weight: f64) -> Term {
    Term {
        column: column.into(),
        weight,
        optional: false,
    }
}

fn opt_term(column: &str, weight: f64) -> Term {
    Term {
        column: column.into(),
        weight,
        optional: true,
    }
}

fn rename2(column: &str, to: &str) -> Rename {
    Rename {
        column: column.into(),
        occurrence: 2,
        to: to.into(),
    }
}

/// The full position catalog. Weights, rename maps, and cohort sizes are
/// the production constants from the ranking formulas this pipeline
/// consolidates.
pub fn catalog() -> Result<Vec<PositionProfile>> {
    let profiles = vec![
        // FantasyPros QB table carries passing and rushing stats with
        // colliding YDS/TD/ATT headers; the second occurrence is rushing.
        PositionProfile {
            position: Position::Qb,
            numeric_columns: vec![
                int("CMP"),
                int("YDS"),
                int("TD"),
                float("Y/A"),
                int("INT"),
                float("FPTS/G"),
                float("FPTS"),
                int("R_YDS"),
                int("R_TD"),
                int("R_ATT"),
            ],
            renames: vec![
                rename2("YDS", "R_YDS"),
                rename2("TD", "R_TD"),
                rename2("ATT", "R_ATT"),
            ],
            formula: vec![
                term("YDS", 0.4),
                term("R_YDS", 0.1),
                term("TD", 0.3),
                term("Y/A", 0.2),
                term("INT", -0.1),
                term("FPTS/G", 0.4),
                term("FPTS", 0.3),
                term("CMP", 0.1),
                term("R_TD", 0.2),
            ],
            orientation: Orientation::Descending,
            cohort_size: 32,
        },
        PositionProfile {
            position: Position::Rb,
            numeric_columns: vec![
                int("ATT"),
                int("YDS"),
                int("TD"),
                int("REC_YDS"),
                int("REC_TD"),
                float("Y/A"),
                float("FPTS/G"),
                float("FPTS"),
                int("FL"),
                int("REC"),
            ],
            renames: vec![rename2("YDS", "REC_YDS"), rename2("TD", "REC_TD")],
            formula: vec![
                term("YDS", 0.45),
                term("TD", 0.4),
                term("Y/A", 0.15),
                term("FPTS/G", 0.3),
                term("FPTS", 0.2),
                term("ATT", 0.1),
                term("FL", -0.1),
                term("REC", 0.1),
                opt_term("REC_YDS", 0.1),
                opt_term("REC_TD", 0.1),
            ],
            orientation: Orientation::Descending,
            cohort_size: 32,
        },
        PositionProfile {
            position: Position::Wr,
            numeric_columns: vec![
                int("REC"),
                int("YDS"),
                int("TD"),
                float("Y/R"),
                int("LG"),
                int("20+"),
            ],
            renames: vec![],
            formula: vec![
                term("REC", 0.35),
                term("YDS", 0.25),
                term("TD", 0.5),
                term("Y/R", 0.15),
                term("LG", 0.1),
                term("20+", 0.1),
            ],
            orientation: Orientation::Descending,
            cohort_size: 50,
        },
        PositionProfile {
            position: Position::Te,
            numeric_columns: vec![
                int("REC"),
                int("YDS"),
                int("TD"),
                float("Y/R"),
                int("LG"),
                int("20+"),
                float("FPTS/G"),
                float("FPTS"),
            ],
            renames: vec![],
            formula: vec![
                term("REC", 0.35),
                term("YDS", 0.25),
                term("TD", 0.5),
                term("Y/R", 0.15),
                term("LG", 0.1),
                term("20+", 0.1),
                term("FPTS/G", 0.4),
                term("FPTS", 0.3),
            ],
            orientation: Orientation::Descending,
            cohort_size: 50,
        },
        PositionProfile {
            position: Position::K,
            numeric_columns: vec![
                int("FG"),
                int("FGA"),
                float("PCT"),
                int("1-19"),
                int("20-29"),
                int("30-39"),
                int("40-49"),
                int("50+"),
                float("FPTS/G"),
                float("FPTS"),
            ],
            renames: vec![],
            formula: vec![
                term("FG", 0.4),
                term("FGA", 0.2),
                term("PCT", 0.2),
                term("1-19", 0.1),
                term("20-29", 0.2),
                term("30-39", 0.1),
                term("40-49", 0.1),
                term("50+", 0.1),
                term("FPTS/G", 0.4),
                term("FPTS", 0.3),
            ],
            orientation: Orientation::Descending,
            cohort_size: 32,
        },
        // Defensive "allowed" stats: lower composite is better, so these
        // rank ascending and the normalizer flips the scale.
        PositionProfile {
            position: Position::DstRushing,
            numeric_columns: vec![
                float("YPC"),
                int("Rush Yds"),
                int("TD"),
                int("Rush FUM"),
                int("20+"),
                int("40+"),
            ],
            renames: vec![],
            formula: vec![
                term("YPC", 0.3),
                term("Rush Yds", 0.3),
                term("TD", 0.6),
                term("40+", 0.3),
                term("20+", 0.2),
                term("Rush FUM", 0.1),
            ],
            orientation: Orientation::Ascending,
            cohort_size: 32,
        },
        PositionProfile {
            position: Position::DstReceiving,
            numeric_columns: vec![
                float("Yds/Rec"),
                int("Yds"),
                int("TD"),
                int("Rec FUM"),
                int("PDef"),
                int("20+"),
                int("40+"),
            ],
            renames: vec![],
            formula: vec![
                term("Yds/Rec", 0.2),
                term("Yds", 0.3),
                term("TD", 0.6),
                term("Rec FUM", 0.1),
                term("PDef", 0.2),
                term("40+", 0.2),
                term("20+", 0.1),
            ],
            orientation: Orientation::Ascending,
            cohort_size: 32,
        },
        // Takeaway stats: more is better, back to descending.
        PositionProfile {
            position: Position::DstInterceptions,
            numeric_columns: vec![int("INT"), int("INT TD"), int("INT Yds")],
            renames: vec![],
            formula: vec![
                term("INT", 0.8),
                term("INT TD", 1.0),
                term("INT Yds", 0.2),
            ],
            orientation: Orientation::Descending,
            cohort_size: 32,
        },
        PositionProfile {
            position: Position::DstFumbles,
            numeric_columns: vec![int("FF"), int("FR"), int("FR TD")],
            renames: vec![],
            formula: vec![term("FF", 0.5), term("FR", 0.5), term("FR TD", 0.3)],
            orientation: Orientation::Descending,
            cohort_size: 32,
        },
        PositionProfile {
            position: Position::DstTackles,
            numeric_columns: vec![int("Sck"), int("Solo"), float("Comb")],
            renames: vec![],
            formula: vec![
                term("Sck", 0.5),
                term("Solo", 0.3),
                term("Comb", 0.5),
            ],
            orientation: Orientation::Descending,
            cohort_size: 32,
        },
        // Special-teams return pages: team-level like the defenses, but
        // more production is better, so these stay descending.
        PositionProfile {
            position: Position::KickoffReturns,
            numeric_columns: vec![
                int("Yds"),
                int("KRet TD"),
                float("Avg"),
                int("FUM"),
                int("Ret"),
                int("20+"),
                int("40+"),
            ],
            renames: vec![],
            formula: vec![
                term("Yds", 0.4),
                term("KRet TD", 0.6),
                term("Avg", 0.2),
                term("FUM", 0.1),
                term("Ret", 0.2),
                term("20+", 0.2),
                term("40+", 0.1),
            ],
            orientation: Orientation::Descending,
            cohort_size: 32,
        },
        PositionProfile {
            position: Position::PuntReturns,
            numeric_columns: vec![
                int("Yds"),
                float("Avg"),
                int("PRet T"),
                int("FC"),
                int("Ret"),
                int("20+"),
                int("40+"),
            ],
            renames: vec![],
            formula: vec![
                term("Yds", 0.4),
                term("20+", 0.8),
                term("Avg", 0.4),
                term("FC", 0.1),
                term("PRet T", 0.3),
                term("Ret", 0.2),
            ],
            orientation: Orientation::Descending,
            cohort_size: 32,
        },
    ];

    for profile in &profiles {
        profile.validate()?;
    }
    Ok(profiles)
}

/// Lookup wrapper around the static catalog.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: Vec<PositionProfile>,
}

impl ProfileCatalog {
    pub fn standard() -> Result<Self> {
        Ok(Self {
            profiles: catalog()?,
        })
    }

    pub fn get(&self, position: Position) -> Option<&PositionProfile> {
        self.profiles.iter().find(|p| p.position == position)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.profiles.iter().map(|p| p.position)
    }
}

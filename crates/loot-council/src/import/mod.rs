//! Roster CSV import used to feed the priority report from spreadsheet exports.

mod parser;

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::attendance::{AttendanceError, AttendanceStats};
use crate::domain::RaiderId;
use crate::loot::Candidate;

pub use parser::{BanExpiry, MAX_EXPORTED_EVENTS};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: usize, message: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            ImportError::Row { line, message } => {
                write!(f, "invalid roster row on line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A candidate plus the history columns carried alongside it in the export.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedCandidate {
    pub candidate: Candidate,
    pub attendance: AttendanceStats,
    pub last_award: Option<NaiveDate>,
    pub ban: Option<BanExpiry>,
}

impl ImportedCandidate {
    pub fn raider(&self) -> &RaiderId {
        &self.candidate.raider
    }
}

pub struct CandidateImporter;

impl CandidateImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ImportedCandidate>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ImportedCandidate>, ImportError> {
        let rows = parser::parse_rows(reader)?;
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| {
                // header occupies line 1
                let line = index + 2;
                row.into_candidate().map_err(|message| ImportError::Row { line, message })
            })
            .collect()
    }
}

pub(crate) fn attendance_from_counts(attended: i64, total: i64) -> Result<AttendanceStats, String> {
    AttendanceStats::calculate(attended, total).map_err(|err: AttendanceError| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    const HEADER: &str = "raider,role,attended_events,total_events,deaths_per_attempt,spec_avg_deaths_per_attempt,avoidable_damage_pct,spec_avg_avoidable_damage_pct,vault_slots,crest_usage_ratio,heroic_kills,simulated_gain,spec_baseline,tier_pieces,last_award,banned_until\n";

    #[test]
    fn imports_candidates_with_history_columns() {
        let csv = format!(
            "{HEADER}\
Bajheera, dps ,8,8,0.4,0.5,3.0,4.0,3,0.9,6,850,1000,1,2025-03-01,\n\
Hydra,tank,7,8,0.6,0.5,5.0,4.0,2,0.5,4,400,1000,4,,permanent\n\
Cdew,healer,6,8,0.5,0.5,4.0,4.0,1,0.2,2,300,1000,2,,2025-05-01\n"
        );

        let imported = CandidateImporter::from_reader(csv.as_bytes()).expect("import succeeds");
        assert_eq!(imported.len(), 3);

        let bajheera = &imported[0];
        assert_eq!(bajheera.raider(), &RaiderId("Bajheera".to_string()));
        assert_eq!(bajheera.candidate.role, Role::Dps);
        assert_eq!(bajheera.attendance.percentage(), 1.0);
        assert_eq!(bajheera.candidate.upgrade.simulated_gain, 850.0);
        assert_eq!(
            bajheera.last_award,
            Some(NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid"))
        );
        assert!(bajheera.ban.is_none());

        assert_eq!(imported[1].ban, Some(BanExpiry::Permanent));
        assert_eq!(
            imported[2].ban,
            Some(BanExpiry::Until(
                NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid")
            ))
        );
    }

    #[test]
    fn rejects_unknown_role_with_line_number() {
        let csv = format!("{HEADER}Rogue,bard,8,8,0.4,0.5,3.0,4.0,3,0.9,6,850,1000,1,,\n");
        match CandidateImporter::from_reader(csv.as_bytes()) {
            Err(ImportError::Row { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("bard"));
            }
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_attendance_above_total() {
        let csv = format!("{HEADER}Greedy,dps,9,8,0.4,0.5,3.0,4.0,3,0.9,6,850,1000,1,,\n");
        assert!(matches!(
            CandidateImporter::from_reader(csv.as_bytes()),
            Err(ImportError::Row { .. })
        ));
    }

    #[test]
    fn rejects_event_counts_beyond_the_export_limit() {
        let csv = format!(
            "{HEADER}Hoarder,dps,4000000000,4000000000,0.4,0.5,3.0,4.0,3,0.9,6,850,1000,1,,\n"
        );
        match CandidateImporter::from_reader(csv.as_bytes()) {
            Err(ImportError::Row { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("total_events"));
            }
            other => panic!("expected row error, got {other:?}"),
        }

        let limit = MAX_EXPORTED_EVENTS;
        let at_limit =
            format!("{HEADER}Veteran,dps,{limit},{limit},0.4,0.5,3.0,4.0,3,0.9,6,850,1000,1,,\n");
        let imported = CandidateImporter::from_reader(at_limit.as_bytes()).expect("limit accepted");
        assert_eq!(imported[0].attendance.total_events(), 1_000);
    }

    #[test]
    fn surfaces_malformed_numbers_as_csv_errors() {
        let csv = format!("{HEADER}Typo,dps,eight,8,0.4,0.5,3.0,4.0,3,0.9,6,850,1000,1,,\n");
        assert!(matches!(
            CandidateImporter::from_reader(csv.as_bytes()),
            Err(ImportError::Csv(_))
        ));
    }
}

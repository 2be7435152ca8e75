//! CSV loaders for the roster, panel and request files.
//!
//! Every loader fails fast: the first malformed row aborts the load and
//! nothing is returned, so the allocators never see partially valid data.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::LoadError;
use crate::schedule::categories::normalize;
use crate::schedule::slot_utils::parse_time_of_day;
use crate::schedule::{Availability, InterviewRequest, PanelMember, RosterEntry, ShiftCapacity};

const ROSTER_COLUMNS: [&str; 6] = [
    "Interviewer_ID",
    "Name",
    "Day_Available",
    "Night_Available",
    "Day_Slots",
    "Night_Slots",
];
const PANEL_COLUMNS: [&str; 3] = ["Name", "Categories", "Availability"];
const REQUEST_COLUMNS: [&str; 3] = ["Email", "Start", "Category"];

/// Raw roster row, every field still text
#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Interviewer_ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "Day_Available")]
    day_available: String,
    #[serde(rename = "Night_Available")]
    night_available: String,
    #[serde(rename = "Day_Slots")]
    day_slots: String,
    #[serde(rename = "Night_Slots")]
    night_slots: String,
}

/// Raw panel row; the list columns are split before validation
#[derive(Debug, Deserialize)]
struct PanelRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Categories")]
    categories: String,
    #[serde(rename = "Availability")]
    availability: String,
}

/// One window-mode interviewer before validation. Shared by the CSV loader
/// and the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRecord {
    pub name: String,
    pub categories: Vec<String>,
    /// "HH:MM-HH:MM" intervals
    pub availability: Vec<String>,
}

/// One interview request before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Start")]
    pub start: String,
    #[serde(alias = "Category")]
    pub category: String,
}

/// Parses a boolean value from various string representations
fn parse_bool(row: usize, field: &'static str, value: &str) -> Result<bool, LoadError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        "" => Err(LoadError::EmptyField { row, field }),
        _ => Err(LoadError::InvalidBool {
            row,
            field,
            value: value.to_string(),
        }),
    }
}

/// Parses a per-shift slot limit, rejecting negatives
fn parse_capacity(row: usize, field: &'static str, value: &str) -> Result<u32, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LoadError::EmptyField { row, field });
    }
    let invalid = || LoadError::InvalidNumber {
        row,
        field,
        value: value.to_string(),
    };
    let parsed: i64 = trimmed.parse().map_err(|_| invalid())?;
    if parsed < 0 {
        return Err(LoadError::NegativeCapacity {
            row,
            field,
            value: parsed,
        });
    }
    u32::try_from(parsed).map_err(|_| invalid())
}

fn required(row: usize, field: &'static str, value: &str) -> Result<String, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(LoadError::EmptyField { row, field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parses "HH:MM-HH:MM"
fn parse_interval(row: usize, value: &str) -> Result<Availability, LoadError> {
    let invalid = || LoadError::InvalidInterval {
        row,
        value: value.to_string(),
    };
    let (start, end) = value.split_once('-').ok_or_else(invalid)?;
    let start = parse_time_of_day(start).ok_or_else(invalid)?;
    let end = parse_time_of_day(end).ok_or_else(invalid)?;
    if start == end {
        return Err(invalid());
    }
    Ok(Availability::new(start, end))
}

/// Splits a list cell on ';' or ',' and drops empty items
fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ';' || c == ',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_columns(headers: &StringRecord, columns: &[&'static str]) -> Result<(), LoadError> {
    for &column in columns {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn { column });
        }
    }
    Ok(())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new().trim(Trim::All).from_reader(reader)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the interviewer roster used by the proportional allocator
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, LoadError> {
    read_roster(open(path.as_ref())?)
}

/// Reads roster rows:
/// Interviewer_ID, Name, Email, Day_Available, Night_Available, Day_Slots, Night_Slots
/// (Email may be absent)
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<RosterEntry>, LoadError> {
    let mut reader = csv_reader(reader);
    check_columns(reader.headers()?, &ROSTER_COLUMNS)?;

    let mut entries = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, result) in reader.deserialize::<RosterRow>().enumerate() {
        let row = index + 1;
        let raw = result?;

        let id = required(row, "Interviewer_ID", &raw.id)?;
        if !seen_ids.insert(id.clone()) {
            return Err(LoadError::DuplicateInterviewer { row, key: id });
        }

        entries.push(RosterEntry {
            id,
            name: required(row, "Name", &raw.name)?,
            email: raw.email.trim().to_string(),
            day: ShiftCapacity {
                available: parse_bool(row, "Day_Available", &raw.day_available)?,
                capacity: parse_capacity(row, "Day_Slots", &raw.day_slots)?,
            },
            night: ShiftCapacity {
                available: parse_bool(row, "Night_Available", &raw.night_available)?,
                capacity: parse_capacity(row, "Night_Slots", &raw.night_slots)?,
            },
        });
    }

    info!(interviewers = entries.len(), "roster loaded");
    Ok(entries)
}

/// Loads the window-mode interviewer panel
pub fn load_panel<P: AsRef<Path>>(path: P) -> Result<Vec<PanelMember>, LoadError> {
    read_panel(open(path.as_ref())?)
}

/// Reads panel rows: Name, Categories ("a;b"), Availability ("09:00-12:00;14:00-17:00")
pub fn read_panel<R: Read>(reader: R) -> Result<Vec<PanelMember>, LoadError> {
    let mut reader = csv_reader(reader);
    check_columns(reader.headers()?, &PANEL_COLUMNS)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<PanelRow>() {
        let raw = result?;
        records.push(PanelRecord {
            name: raw.name,
            categories: split_list(&raw.categories),
            availability: split_list(&raw.availability),
        });
    }

    let panel = validate_panel(records)?;
    info!(interviewers = panel.len(), "panel loaded");
    Ok(panel)
}

/// Turns panel records into validated panel members, keeping their order
pub fn validate_panel(records: Vec<PanelRecord>) -> Result<Vec<PanelMember>, LoadError> {
    let mut panel = Vec::with_capacity(records.len());
    let mut seen_names = HashSet::new();

    for (index, record) in records.into_iter().enumerate() {
        let row = index + 1;
        let name = required(row, "Name", &record.name)?;
        if !seen_names.insert(name.clone()) {
            return Err(LoadError::DuplicateInterviewer { row, key: name });
        }

        let flags: BTreeSet<String> = record
            .categories
            .iter()
            .map(|c| normalize(c))
            .filter(|c| !c.is_empty())
            .collect();

        let availability = record
            .availability
            .iter()
            .map(|interval| parse_interval(row, interval))
            .collect::<Result<Vec<_>, _>>()?;

        if flags.is_empty() || availability.is_empty() {
            warn!(interviewer = %name, "interviewer has no categories or no availability and can never be matched");
        }

        panel.push(PanelMember {
            name,
            flags,
            availability,
        });
    }

    Ok(panel)
}

/// Loads the interview requests
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<InterviewRequest>, LoadError> {
    read_requests(open(path.as_ref())?)
}

/// Reads request rows: Email, Start, Category
pub fn read_requests<R: Read>(reader: R) -> Result<Vec<InterviewRequest>, LoadError> {
    let mut reader = csv_reader(reader);
    check_columns(reader.headers()?, &REQUEST_COLUMNS)?;

    let records = reader
        .deserialize::<RequestRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    let requests = validate_requests(records)?;
    info!(requests = requests.len(), "requests loaded");
    Ok(requests)
}

/// Turns request records into validated requests, keeping their order
pub fn validate_requests(records: Vec<RequestRecord>) -> Result<Vec<InterviewRequest>, LoadError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let row = index + 1;
            let contact = required(row, "Email", &record.email)?;
            let start = parse_time_of_day(&record.start).ok_or_else(|| LoadError::InvalidTime {
                row,
                value: record.start.clone(),
            })?;
            let category = required(row, "Category", &record.category)?;
            Ok(InterviewRequest {
                contact,
                start,
                category,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::slot_utils::minutes_of_day;
    use std::io::Cursor;

    const ROSTER: &str = "\
Interviewer_ID,Name,Email,Day_Available,Night_Available,Day_Slots,Night_Slots
1,Ada Lovelace,ada@example.com,True,False,5,0
2,Grace Hopper,grace@example.com,false,TRUE,3,4
";

    #[test]
    fn test_read_roster() {
        let roster = read_roster(Cursor::new(ROSTER)).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, "1");
        assert_eq!(roster[0].name, "Ada Lovelace");
        assert_eq!(roster[0].day, ShiftCapacity { available: true, capacity: 5 });
        assert_eq!(roster[1].night, ShiftCapacity { available: true, capacity: 4 });
        assert!(!roster[1].day.available);
    }

    #[test]
    fn test_roster_without_email_column() {
        let csv = "Interviewer_ID,Name,Day_Available,Night_Available,Day_Slots,Night_Slots\n7,Linus,yes,no,2,0\n";
        let roster = read_roster(Cursor::new(csv)).unwrap();
        assert_eq!(roster[0].email, "");
        assert_eq!(roster[0].day.capacity, 2);
    }

    #[test]
    fn test_roster_missing_column() {
        let csv = "Interviewer_ID,Name,Day_Available,Night_Available,Day_Slots\n1,A,true,true,1\n";
        let err = read_roster(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "Night_Slots" }));
    }

    #[test]
    fn test_roster_negative_capacity() {
        let csv = "Interviewer_ID,Name,Day_Available,Night_Available,Day_Slots,Night_Slots\n1,A,true,true,2,0\n2,B,true,true,-1,0\n";
        let err = read_roster(Cursor::new(csv)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NegativeCapacity { row: 2, field: "Day_Slots", value: -1 }
        ));
    }

    #[test]
    fn test_roster_bad_values() {
        let bad_bool = "Interviewer_ID,Name,Day_Available,Night_Available,Day_Slots,Night_Slots\n1,A,maybe,true,2,0\n";
        assert!(matches!(
            read_roster(Cursor::new(bad_bool)).unwrap_err(),
            LoadError::InvalidBool { row: 1, field: "Day_Available", .. }
        ));

        let bad_number = "Interviewer_ID,Name,Day_Available,Night_Available,Day_Slots,Night_Slots\n1,A,true,true,two,0\n";
        assert!(matches!(
            read_roster(Cursor::new(bad_number)).unwrap_err(),
            LoadError::InvalidNumber { row: 1, field: "Day_Slots", .. }
        ));

        let empty_name = "Interviewer_ID,Name,Day_Available,Night_Available,Day_Slots,Night_Slots\n1,,true,true,1,0\n";
        assert!(matches!(
            read_roster(Cursor::new(empty_name)).unwrap_err(),
            LoadError::EmptyField { row: 1, field: "Name" }
        ));

        let duplicate = "Interviewer_ID,Name,Day_Available,Night_Available,Day_Slots,Night_Slots\n1,A,true,true,1,0\n1,B,true,true,1,0\n";
        assert!(matches!(
            read_roster(Cursor::new(duplicate)).unwrap_err(),
            LoadError::DuplicateInterviewer { row: 2, .. }
        ));
    }

    #[test]
    fn test_read_panel() {
        let csv = "\
Name,Categories,Availability
Alice,Engineering;Generalist,09:00-12:00;14:00-17:00
Bob,generalist,20:00-06:00
";
        let panel = read_panel(Cursor::new(csv)).unwrap();
        assert_eq!(panel.len(), 2);
        assert!(panel[0].has_flag("engineering"));
        assert!(panel[0].has_flag("generalist"));
        assert_eq!(panel[0].availability.len(), 2);
        assert_eq!(minutes_of_day(panel[0].availability[1].start), 14 * 60);
        assert_eq!(minutes_of_day(panel[1].availability[0].end), 6 * 60);
    }

    #[test]
    fn test_panel_rejects_bad_intervals() {
        for availability in ["09:00", "09:00-25:00", "09:00-09:00", "nine-ten"] {
            let csv = format!("Name,Categories,Availability\nAlice,generalist,{}\n", availability);
            let err = read_panel(Cursor::new(csv)).unwrap_err();
            assert!(matches!(err, LoadError::InvalidInterval { row: 1, .. }), "{}", availability);
        }
    }

    #[test]
    fn test_panel_duplicate_names() {
        let csv = "Name,Categories,Availability\nAlice,generalist,09:00-10:00\nAlice,engineering,10:00-11:00\n";
        assert!(matches!(
            read_panel(Cursor::new(csv)).unwrap_err(),
            LoadError::DuplicateInterviewer { row: 2, .. }
        ));
    }

    #[test]
    fn test_read_requests() {
        let csv = "\
Email,Start,Category
a@example.com,09:20,Engineering
b@example.com,13:00:00,Generalist
";
        let requests = read_requests(Cursor::new(csv)).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].contact, "a@example.com");
        assert_eq!(requests[0].start_minutes(), 9 * 60 + 20);
        assert_eq!(requests[1].category, "Generalist");
    }

    #[test]
    fn test_requests_invalid_time_fails_whole_load() {
        let csv = "Email,Start,Category\na@example.com,09:20,Engineering\nb@example.com,noon,Generalist\n";
        let err = read_requests(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::InvalidTime { row: 2, ref value } if value == "noon"));
    }

    #[test]
    fn test_times_with_seconds_rejected() {
        let csv = "Email,Start,Category\na@example.com,11:20:30,Engineering\n";
        let err = read_requests(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::InvalidTime { row: 1, ref value } if value == "11:20:30"));

        let err = validate_panel(vec![PanelRecord {
            name: "Alice".to_string(),
            categories: vec!["engineering".to_string()],
            availability: vec!["09:00:30-12:00".to_string()],
        }])
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidInterval { .. }));
    }

    #[test]
    fn test_validate_records_from_json() {
        let records: Vec<RequestRecord> = serde_json::from_str(
            r#"[{"email": "a@example.com", "start": "10:00", "category": "engineering"}]"#,
        )
        .unwrap();
        let requests = validate_requests(records).unwrap();
        assert_eq!(requests[0].start_minutes(), 600);

        let panel = validate_panel(vec![PanelRecord {
            name: "Alice".to_string(),
            categories: vec!["Engineering".to_string()],
            availability: vec!["09:00-12:00".to_string()],
        }])
        .unwrap();
        assert!(panel[0].has_flag("engineering"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_roster("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}

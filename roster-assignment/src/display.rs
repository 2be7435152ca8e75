use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::config::Shift;
use crate::schedule::{Allocation, InterviewRequest, MatchOutcome, SlotAllocation};
use crate::schedule::slot_utils::{minutes_to_time_string, slot_label};

/// Formats one interviewer line in the format: Name (ID: id) - Assigned Slots: n out of cap available
pub fn format_allocation_line(entry: &SlotAllocation) -> String {
    format!(
        "{} (ID: {}) - Assigned Slots: {} out of {} available",
        entry.name, entry.interviewer_id, entry.assigned, entry.capacity
    )
}

/// Formats an unassigned request: HH:MM contact [category]
pub fn format_request(request: &InterviewRequest) -> String {
    format!(
        "{} {} [{}]",
        minutes_to_time_string(request.start_minutes()),
        request.contact,
        request.category
    )
}

/// Plain-text report for a proportional run. Only interviewers available
/// for the shift are listed.
pub fn render_allocation(shift: Shift, slot_minutes: u32, allocation: &Allocation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Shift Roster Slot Assignment (1 slot = {} minutes):",
        shift.title(),
        slot_minutes
    );

    for entry in allocation.entries.iter().filter(|e| e.available) {
        let _ = writeln!(out, "{}", format_allocation_line(entry));
    }

    let _ = writeln!(
        out,
        "Total assigned: {} of {} requested slots",
        allocation.assigned, allocation.requested
    );
    if allocation.shortfall > 0 {
        let _ = writeln!(
            out,
            "Shortfall: {} slot(s) could not be assigned, available capacity is exhausted",
            allocation.shortfall
        );
    }
    out
}

/// Plain-text report for a window-matching run
pub fn render_match(slot_minutes: u32, outcome: &MatchOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Interview Assignment (1 slot = {} minutes):", slot_minutes);
    let _ = writeln!(out, "Total requests assigned: {}", outcome.assigned.len());

    for assignment in &outcome.assigned {
        let _ = writeln!(
            out,
            "  {} {} [{}] -> {}",
            assignment.slot, assignment.request.contact, assignment.request.category, assignment.interviewer
        );
    }

    if !outcome.unassigned.is_empty() {
        let _ = writeln!(out, "Unassigned requests ({}):", outcome.unassigned.len());
        for request in &outcome.unassigned {
            let _ = writeln!(
                out,
                "  - {} (wanted {})",
                format_request(request),
                slot_label(request.start_minutes(), slot_minutes)
            );
        }
    }
    out
}

/// Writes a rendered report to `path`, or to stdout when `path` is `None`
pub fn write_report(report: &str, path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(report.as_bytes())?;
            file.flush()
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(report.as_bytes())?;
            handle.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::slot_utils::parse_time_of_day;
    use crate::schedule::Assignment;

    fn entry(id: &str, name: &str, available: bool, capacity: u32, assigned: u32) -> SlotAllocation {
        SlotAllocation {
            interviewer_id: id.to_string(),
            name: name.to_string(),
            available,
            capacity,
            assigned,
        }
    }

    #[test]
    fn test_render_allocation() {
        let allocation = Allocation {
            entries: vec![
                entry("1", "Ada", true, 4, 4),
                entry("2", "Grace", false, 3, 0),
                entry("3", "Linus", true, 2, 2),
            ],
            requested: 10,
            assigned: 6,
            shortfall: 4,
        };
        let report = render_allocation(Shift::Day, 40, &allocation);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Day Shift Roster Slot Assignment (1 slot = 40 minutes):");
        assert_eq!(lines[1], "Ada (ID: 1) - Assigned Slots: 4 out of 4 available");
        assert_eq!(lines[2], "Linus (ID: 3) - Assigned Slots: 2 out of 2 available");
        assert_eq!(lines[3], "Total assigned: 6 of 10 requested slots");
        assert!(lines[4].starts_with("Shortfall: 4 slot(s)"));
        assert!(!report.contains("Grace"));
    }

    #[test]
    fn test_render_allocation_without_shortfall() {
        let allocation = Allocation {
            entries: vec![entry("1", "Ada", true, 4, 3)],
            requested: 3,
            assigned: 3,
            shortfall: 0,
        };
        let report = render_allocation(Shift::Night, 40, &allocation);
        assert!(report.starts_with("Night Shift"));
        assert!(!report.contains("Shortfall"));
    }

    #[test]
    fn test_render_match() {
        let request = |contact: &str, start: &str| InterviewRequest {
            contact: contact.to_string(),
            start: parse_time_of_day(start).unwrap(),
            category: "Engineering".to_string(),
        };
        let outcome = MatchOutcome {
            assigned: vec![Assignment {
                request: request("a@x.io", "09:20"),
                interviewer: "Alice".to_string(),
                slot: "09:20-10:00".to_string(),
            }],
            unassigned: vec![request("b@x.io", "11:40")],
        };
        let report = render_match(40, &outcome);
        assert!(report.contains("  09:20-10:00 a@x.io [Engineering] -> Alice"));
        assert!(report.contains("Unassigned requests (1):"));
        assert!(report.contains("  - 11:40 b@x.io [Engineering] (wanted 11:40-12:20)"));
    }
}

use std::io::Write;

use csv::WriterBuilder;

use crate::schedule::slot_utils::{minutes_to_time_string, slot_label};
use crate::schedule::{Allocation, MatchOutcome};

/// Writes a proportional result as CSV:
/// Interviewer_ID, Name, Available, Capacity, Assigned (one row per roster entry)
pub fn write_allocation_csv<W: Write>(writer: W, allocation: &Allocation) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["Interviewer_ID", "Name", "Available", "Capacity", "Assigned"])?;

    for entry in &allocation.entries {
        let capacity = entry.capacity.to_string();
        let assigned = entry.assigned.to_string();
        wtr.write_record([
            entry.interviewer_id.as_str(),
            entry.name.as_str(),
            if entry.available { "True" } else { "False" },
            capacity.as_str(),
            assigned.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a window-matching result as CSV:
/// Email, Category, Start, Slot, Interviewer, Status
/// Assigned rows come first in processing order, then the unassigned ones.
pub fn write_match_csv<W: Write>(writer: W, slot_minutes: u32, outcome: &MatchOutcome) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["Email", "Category", "Start", "Slot", "Interviewer", "Status"])?;

    for assignment in &outcome.assigned {
        let request = &assignment.request;
        let start = minutes_to_time_string(request.start_minutes());
        wtr.write_record([
            request.contact.as_str(),
            request.category.as_str(),
            start.as_str(),
            assignment.slot.as_str(),
            assignment.interviewer.as_str(),
            "assigned",
        ])?;
    }

    for request in &outcome.unassigned {
        let start = minutes_to_time_string(request.start_minutes());
        let wanted = slot_label(request.start_minutes(), slot_minutes);
        wtr.write_record([
            request.contact.as_str(),
            request.category.as_str(),
            start.as_str(),
            wanted.as_str(),
            "",
            "unassigned",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Renders the proportional CSV into a string
pub fn allocation_csv_string(allocation: &Allocation) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_allocation_csv(&mut buffer, allocation)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Renders the window-matching CSV into a string
pub fn match_csv_string(slot_minutes: u32, outcome: &MatchOutcome) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_match_csv(&mut buffer, slot_minutes, outcome)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

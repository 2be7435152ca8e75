use std::io::Cursor;

use roster_assignment::config::{Shift, DEFAULT_SLOT_MINUTES};
use roster_assignment::display::render_allocation;
use roster_assignment::parser::{read_panel, read_requests, read_roster};
use roster_assignment::schedule::{allocate_shift, allocate_slots, match_requests, CategoryTable, ShiftCandidate};

fn candidates(rows: &[(bool, u32)]) -> Vec<ShiftCandidate> {
    rows.iter()
        .enumerate()
        .map(|(i, &(available, capacity))| ShiftCandidate {
            id: format!("I{}", i + 1),
            name: format!("Interviewer {}", i + 1),
            available,
            capacity,
        })
        .collect()
}

#[test]
fn scenario_a_exact_split() {
    let result = allocate_slots(&candidates(&[(true, 3), (true, 1)]), 4);
    assert_eq!(result.get("I1"), Some(3));
    assert_eq!(result.get("I2"), Some(1));
    assert_eq!(result.shortfall, 0);
}

#[test]
fn scenario_b_tied_remainders() {
    let result = allocate_slots(&candidates(&[(true, 2), (true, 2), (true, 2)]), 5);
    assert_eq!(result.get("I1"), Some(2));
    assert_eq!(result.get("I2"), Some(2));
    assert_eq!(result.get("I3"), Some(1));
}

#[test]
fn scenario_c_and_d_window_coverage() {
    let panel = read_panel(Cursor::new("Name,Categories,Availability\nAlice,Engineering,09:00-12:00\n")).unwrap();
    let requests = read_requests(Cursor::new(
        "Email,Start,Category\nfits@example.com,09:20,Engineering\nlate@example.com,11:40,Engineering\n",
    ))
    .unwrap();

    let outcome = match_requests(&panel, &requests, &CategoryTable::default(), DEFAULT_SLOT_MINUTES);
    assert_eq!(outcome.assigned.len(), 1);
    assert_eq!(outcome.assigned[0].request.contact, "fits@example.com");
    assert_eq!(outcome.assigned[0].interviewer, "Alice");
    assert_eq!(outcome.assigned[0].slot, "09:20-10:00");
    assert_eq!(outcome.unassigned.len(), 1);
    assert_eq!(outcome.unassigned[0].contact, "late@example.com");
}

#[test]
fn scenario_e_shortfall_reported() {
    let result = allocate_slots(&candidates(&[(true, 4), (false, 7), (true, 2)]), 10);
    assert_eq!(result.assigned, 6);
    assert_eq!(result.shortfall, 4);
    assert_eq!(result.get("I2"), Some(0));
}

#[test]
fn roster_file_to_day_report() {
    let roster = read_roster(Cursor::new(
        "\
Interviewer_ID,Name,Email,Day_Available,Night_Available,Day_Slots,Night_Slots
101,Priya,priya@example.com,True,False,8,0
102,Tomas,tomas@example.com,True,True,6,5
103,Mei,mei@example.com,False,True,0,6
104,Omar,omar@example.com,True,False,7,0
",
    ))
    .unwrap();

    let total = Shift::Day.default_slots(DEFAULT_SLOT_MINUTES);
    let allocation = allocate_shift(&roster, Shift::Day, total);

    // 21 * 8/21 = 8, 21 * 6/21 = 6, 21 * 7/21 = 7
    assert_eq!(allocation.get("101"), Some(8));
    assert_eq!(allocation.get("102"), Some(6));
    assert_eq!(allocation.get("103"), Some(0));
    assert_eq!(allocation.get("104"), Some(7));

    let report = render_allocation(Shift::Day, DEFAULT_SLOT_MINUTES, &allocation);
    assert!(report.contains("Tomas (ID: 102) - Assigned Slots: 6 out of 6 available"));
    assert!(!report.contains("Mei"));
}

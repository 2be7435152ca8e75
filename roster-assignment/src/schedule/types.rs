use std::collections::{BTreeSet, HashMap};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::config::Shift;
use super::slot_utils::{minutes_of_day, seconds_of_day, SECONDS_PER_DAY};

/// Availability and slot limit for one shift
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCapacity {
    pub available: bool,
    pub capacity: u32,
}

/// One row of the interviewer roster, both shifts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub day: ShiftCapacity,
    pub night: ShiftCapacity,
}

impl RosterEntry {
    pub fn capacity_for(&self, shift: Shift) -> ShiftCapacity {
        match shift {
            Shift::Day => self.day,
            Shift::Night => self.night,
        }
    }

    /// Projects the entry onto a single shift for the proportional allocator
    pub fn candidate_for(&self, shift: Shift) -> ShiftCandidate {
        let ShiftCapacity { available, capacity } = self.capacity_for(shift);
        ShiftCandidate {
            id: self.id.clone(),
            name: self.name.clone(),
            available,
            capacity,
        }
    }
}

/// An interviewer as seen by the proportional allocator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    pub id: String,
    pub name: String,
    pub available: bool,
    pub capacity: u32,
}

/// Slots handed to one interviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAllocation {
    pub interviewer_id: String,
    pub name: String,
    pub available: bool,
    pub capacity: u32,
    pub assigned: u32,
}

/// Result of a proportional run, entries in roster order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub entries: Vec<SlotAllocation>,
    pub requested: u32,
    pub assigned: u32,
    /// `requested - assigned`; non-zero when capacity ran out
    pub shortfall: u32,
}

impl Allocation {
    pub fn get(&self, interviewer_id: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.interviewer_id == interviewer_id)
            .map(|e| e.assigned)
    }

    /// interviewer_id -> assigned count
    pub fn counts(&self) -> HashMap<String, u32> {
        self.entries
            .iter()
            .map(|e| (e.interviewer_id.clone(), e.assigned))
            .collect()
    }

    pub fn is_satisfied(&self) -> bool {
        self.shortfall == 0
    }
}

/// A contiguous time-of-day window. An `end` at or before `start` runs
/// past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Availability {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// True when `[start, start + duration]` lies entirely inside the window.
    /// Compared to the second, so a window opening at 09:00:30 does not
    /// cover a request at 09:00.
    pub fn covers(&self, start: NaiveTime, duration_minutes: u32) -> bool {
        let window_start = seconds_of_day(self.start);
        let mut window_end = seconds_of_day(self.end);
        if window_end <= window_start {
            window_end += SECONDS_PER_DAY;
        }

        // Before the window opens means the next day for a wrapping window,
        // and out of range for a plain one.
        let mut request_start = seconds_of_day(start);
        if request_start < window_start {
            request_start += SECONDS_PER_DAY;
        }
        let request_end = request_start + duration_minutes as u64 * 60;

        window_start <= request_start && request_end <= window_end
    }
}

/// An interviewer as seen by the window matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMember {
    /// Unique key
    pub name: String,
    /// Lower-case category flags, e.g. "engineering"
    pub flags: BTreeSet<String>,
    pub availability: Vec<Availability>,
}

impl PanelMember {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// First window that covers the request, if any
    pub fn covering_window(&self, start: NaiveTime, duration_minutes: u32) -> Option<&Availability> {
        self.availability
            .iter()
            .find(|w| w.covers(start, duration_minutes))
    }
}

/// A timestamped interview request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest {
    /// Opaque contact identity, usually an email address
    pub contact: String,
    pub start: NaiveTime,
    pub category: String,
}

impl InterviewRequest {
    pub fn start_minutes(&self) -> u32 {
        minutes_of_day(self.start)
    }
}

/// Lifecycle of a request inside one matcher pass.
/// Pending moves to exactly one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Assigned,
    Unassigned,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestState::Pending)
    }
}

/// A request paired with the interviewer who takes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub request: InterviewRequest,
    pub interviewer: String,
    /// "HH:MM-HH:MM"
    pub slot: String,
}

/// Result of a window-matching run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// In processing order (ascending start time)
    pub assigned: Vec<Assignment>,
    /// In original request order
    pub unassigned: Vec<InterviewRequest>,
}

impl MatchOutcome {
    pub fn total(&self) -> usize {
        self.assigned.len() + self.unassigned.len()
    }
}

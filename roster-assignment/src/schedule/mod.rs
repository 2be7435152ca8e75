pub mod types;
pub mod slot_utils;
pub mod categories;
pub mod proportional;
pub mod window;

pub use types::{
    Allocation, Assignment, Availability, InterviewRequest, MatchOutcome, PanelMember,
    RequestState, RosterEntry, ShiftCandidate, ShiftCapacity, SlotAllocation,
};
pub use categories::CategoryTable;
pub use proportional::{allocate_shift, allocate_slots};
pub use window::{match_requests, WindowMatcher};

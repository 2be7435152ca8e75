use tracing::{debug, warn};

use super::categories::CategoryTable;
use super::slot_utils::slot_label;
use super::types::{Assignment, InterviewRequest, MatchOutcome, PanelMember, RequestState};

/// First-fit matcher of timestamped requests to interviewer availability.
///
/// Requests are visited in ascending start time (input order on ties). Each
/// one goes to the first panel member, in panel order, who carries the flag
/// its category requires and has an availability window covering
/// `[start, start + slot_minutes]`. Interviewers have no capacity limit in
/// this mode, so a member stays eligible after taking a request.
#[derive(Debug, Clone)]
pub struct WindowMatcher<'a> {
    categories: &'a CategoryTable,
    slot_minutes: u32,
}

impl<'a> WindowMatcher<'a> {
    pub fn new(categories: &'a CategoryTable, slot_minutes: u32) -> Self {
        Self {
            categories,
            slot_minutes,
        }
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// Index of the first eligible panel member for `request`
    pub fn find_interviewer(&self, panel: &[PanelMember], request: &InterviewRequest) -> Option<usize> {
        let flag = self.categories.required_flag(&request.category)?;
        panel.iter().position(|member| {
            member.has_flag(flag) && member.covering_window(request.start, self.slot_minutes).is_some()
        })
    }

    /// Runs one forward pass over `requests`. Every request ends up in
    /// exactly one of `assigned` or `unassigned`.
    pub fn match_requests(&self, panel: &[PanelMember], requests: &[InterviewRequest]) -> MatchOutcome {
        let mut order: Vec<usize> = (0..requests.len()).collect();
        order.sort_by_key(|&i| requests[i].start);

        let mut states = vec![RequestState::Pending; requests.len()];
        let mut assigned = Vec::new();

        for i in order {
            let request = &requests[i];
            debug_assert!(!states[i].is_terminal());

            states[i] = match self.find_interviewer(panel, request) {
                Some(member) => {
                    let interviewer = &panel[member];
                    let slot = slot_label(request.start_minutes(), self.slot_minutes);
                    debug!(
                        contact = %request.contact,
                        interviewer = %interviewer.name,
                        %slot,
                        "request assigned"
                    );
                    assigned.push(Assignment {
                        request: request.clone(),
                        interviewer: interviewer.name.clone(),
                        slot,
                    });
                    RequestState::Assigned
                }
                None => {
                    debug!(
                        contact = %request.contact,
                        category = %request.category,
                        "no eligible interviewer"
                    );
                    RequestState::Unassigned
                }
            };
        }

        let unassigned: Vec<InterviewRequest> = requests
            .iter()
            .zip(&states)
            .filter(|(_, state)| matches!(state, RequestState::Unassigned))
            .map(|(request, _)| request.clone())
            .collect();

        if !unassigned.is_empty() {
            warn!(
                unassigned = unassigned.len(),
                total = requests.len(),
                "some requests have no eligible interviewer"
            );
        }

        MatchOutcome { assigned, unassigned }
    }
}

/// Convenience wrapper around [`WindowMatcher::match_requests`]
pub fn match_requests(
    panel: &[PanelMember],
    requests: &[InterviewRequest],
    categories: &CategoryTable,
    slot_minutes: u32,
) -> MatchOutcome {
    WindowMatcher::new(categories, slot_minutes).match_requests(panel, requests)
}

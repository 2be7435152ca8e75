use tracing::{debug, warn};

use crate::config::Shift;
use super::types::{Allocation, RosterEntry, ShiftCandidate, SlotAllocation};

/// Distributes `total_slots` across a roster for one shift
pub fn allocate_shift(roster: &[RosterEntry], shift: Shift, total_slots: u32) -> Allocation {
    let candidates: Vec<ShiftCandidate> = roster
        .iter()
        .map(|entry| entry.candidate_for(shift))
        .collect();
    allocate_slots(&candidates, total_slots)
}

/// Largest-remainder apportionment of `total_slots` over the candidates,
/// proportional to capacity.
///
/// Only available candidates with non-zero capacity take part. Each one
/// first gets the floor of its exact share; the slots left over go one at a
/// time to the largest fractional remainders, ties broken by roster order,
/// skipping anyone already at capacity. If the request exceeds the pool's
/// total capacity the pool is filled and the difference is returned as
/// `shortfall`.
///
/// Shares are kept as exact fractions (`to_assign * capacity / total_capacity`
/// as quotient and remainder), so equal remainders compare equal.
pub fn allocate_slots(candidates: &[ShiftCandidate], total_slots: u32) -> Allocation {
    let pool: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.available && c.capacity > 0)
        .map(|(i, _)| i)
        .collect();

    let total_capacity: u64 = pool.iter().map(|&i| candidates[i].capacity as u64).sum();
    let to_assign = (total_slots as u64).min(total_capacity);
    let mut assigned = vec![0u32; candidates.len()];

    if to_assign > 0 {
        // (candidate index, remainder numerator over total_capacity)
        let mut remainders: Vec<(usize, u64)> = Vec::with_capacity(pool.len());
        for &i in &pool {
            let scaled = to_assign * candidates[i].capacity as u64;
            assigned[i] = (scaled / total_capacity) as u32;
            remainders.push((i, scaled % total_capacity));
        }

        let assigned_so_far: u64 = pool.iter().map(|&i| assigned[i] as u64).sum();
        let mut remaining = to_assign - assigned_so_far;
        debug!(to_assign, assigned_so_far, remaining, "base shares computed");

        // Largest remainder first, roster order on ties
        remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        for (i, _) in remainders {
            if remaining == 0 {
                break;
            }
            let candidate = &candidates[i];
            if assigned[i] < candidate.capacity {
                assigned[i] += 1;
                remaining -= 1;
                debug!(interviewer = %candidate.id, "remainder slot assigned");
            } else {
                debug!(interviewer = %candidate.id, "at capacity, skipped for remainder slot");
            }
        }

        if remaining > 0 {
            warn!(remaining, "remainder slots left after a full pass, every interviewer is at capacity");
        }
    }

    let assigned_total: u32 = assigned.iter().sum();
    let shortfall = total_slots - assigned_total;
    if shortfall > 0 {
        warn!(
            requested = total_slots,
            assignable = assigned_total,
            shortfall,
            "requested slots exceed available capacity"
        );
    }

    let entries = candidates
        .iter()
        .zip(assigned)
        .map(|(c, n)| SlotAllocation {
            interviewer_id: c.id.clone(),
            name: c.name.clone(),
            available: c.available,
            capacity: c.capacity,
            assigned: n,
        })
        .collect();

    Allocation {
        entries,
        requested: total_slots,
        assigned: assigned_total,
        shortfall,
    }
}

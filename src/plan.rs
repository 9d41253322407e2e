//! Follow-up command planning
//!
//! Works out which page requests are needed to cover the rest of a listing.

use crate::payload::Command;

/// Entries the API returns per list call
pub const MAX_ENTRIES_PER_COMMAND: u64 = 50;

/// Number of page-sized commands needed to cover `start..total_to_reach`
pub fn commands_required(start: u64, total_to_reach: u64, page_size: u64) -> u64 {
    assert!(page_size > 0, "page size must be positive");
    total_to_reach.saturating_sub(start).div_ceil(page_size)
}

/// Build one command per remaining page.
///
/// Command `i` carries the original parameters with `start` set to
/// `start + page_size * i`. No commands are produced when `total_to_reach`
/// does not exceed `start`.
///
/// # Panics
///
/// Panics if `page_size` is zero.
pub fn plan_followup_commands(
    request: &Command,
    start: u64,
    total_to_reach: u64,
    page_size: u64,
) -> Vec<Command> {
    let count = commands_required(start, total_to_reach, page_size);

    (0..count)
        .map(|i| request.at_start(start + page_size * i))
        .collect()
}

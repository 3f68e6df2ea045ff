//! Source Line Lookup
//!
//! Best-effort: finds the first line that contains an element's whole
//! opening tag. Tags split over several lines are not found.

/// 1-based line of the first line containing `opening_tag`, or 0.
///
/// `lines` is the document split once with `str::lines`, shared across
/// all lookups of a run.
pub fn locate_line(lines: &[&str], opening_tag: &str) -> usize {
    if opening_tag.is_empty() || opening_tag.contains('\n') {
        return 0;
    }

    lines
        .iter()
        .position(|line| line.contains(opening_tag))
        .map(|idx| idx + 1)
        .unwrap_or(0)
}

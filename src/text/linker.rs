//! Parent assignment over a flat section list.

use crate::model::Section;

/// How a section's parent is chosen among earlier, shallower sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStrategy {
    /// Prefer a shallower section whose number contains this one's prefix,
    /// else take the nearest shallower section.
    #[default]
    NearestShallower,

    /// As `NearestShallower`, but never link two numeric paths that do not
    /// nest (`3.1` is not placed under `2`).
    PrefixValidated,
}

/// Fill in `parent` for every section by looking back for the nearest
/// section with a lower level.
///
/// Parents always refer to an earlier section, so the result has no cycles.
pub fn link_parents(sections: &mut [Section], strategy: LinkStrategy) {
    for i in 0..sections.len() {
        let parent = find_parent(&sections[..i], &sections[i], strategy)
            .and_then(|j| sections[j].number.clone());
        sections[i].parent = parent;
    }
}

fn find_parent(earlier: &[Section], section: &Section, strategy: LinkStrategy) -> Option<usize> {
    let mut nearest = None;

    for (j, candidate) in earlier.iter().enumerate().rev() {
        if candidate.level >= section.level {
            continue;
        }
        if nearest.is_none() {
            nearest = Some(j);
        }
        if let (Some(number), Some(candidate_number)) = (&section.number, &candidate.number) {
            if number.is_nested_under(candidate_number) {
                return Some(j);
            }
        }
    }

    let j = nearest?;
    if strategy == LinkStrategy::PrefixValidated {
        if let (Some(number), Some(candidate_number)) = (&section.number, &earlier[j].number) {
            if number.is_dotted() && candidate_number.is_numeric_path() {
                return None;
            }
        }
    }
    Some(j)
}

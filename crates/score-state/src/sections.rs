//! Section layout: insertion and boundary editing.
//!
//! Sections are kept sorted by `start_measure` and pairwise disjoint over
//! their inclusive measure ranges. Inserting refuses overlap outright;
//! editing boundaries shrinks neighbors to make room but never deletes one
//! implicitly — an edit that would leave a neighbor empty (or swallow it
//! whole) is refused with `SectionWouldSwallow`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScoreError;
use crate::piece::{Piece, Section, TimeSignature};

/// Partial update for `edit_section`. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionPatch {
    pub start_measure: Option<u32>,
    pub end_measure: Option<u32>,
    pub tempo: Option<u32>,
    pub time_signature: Option<TimeSignature>,
    pub key: Option<String>,
    pub description: Option<String>,
}

impl SectionPatch {
    fn touches_boundaries(&self) -> bool {
        self.start_measure.is_some() || self.end_measure.is_some()
    }
}

impl Piece {
    pub fn add_section(&mut self, section: Section) -> Result<(), ScoreError> {
        if self.section(&section.name).is_some() {
            return Err(ScoreError::DuplicateName {
                entity: "section",
                name: section.name,
            });
        }
        validate_measure_range(section.start_measure, section.end_measure)?;
        if let Some(other) = self.sections.iter().find(|s| s.overlaps(&section)) {
            return Err(ScoreError::SectionOverlap {
                name: section.name,
                other: other.name.clone(),
            });
        }

        self.checkpoint();
        debug!(section = %section.name, start = section.start_measure, end = section.end_measure, "add section");
        self.sections.push(section);
        self.sections.sort_by_key(|s| s.start_measure);
        Ok(())
    }

    /// Apply a partial edit. Boundary changes adjust neighboring sections:
    /// a neighbor overlapping the low end of the new range is trimmed to
    /// end just before it, symmetrically on the high end. A neighbor that
    /// the new range would cover entirely, or that trimming would leave
    /// empty, aborts the edit.
    pub fn edit_section(&mut self, name: &str, patch: SectionPatch) -> Result<(), ScoreError> {
        let idx = self
            .sections
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ScoreError::NotFound {
                entity: "section",
                name: name.to_string(),
            })?;

        // Work on a copy; the document is only touched once the whole
        // adjustment plan has validated.
        let mut sections = self.sections.clone();
        let patch_touches_boundaries = patch.touches_boundaries();
        {
            let section = &mut sections[idx];
            if let Some(s) = patch.start_measure {
                section.start_measure = s;
            }
            if let Some(e) = patch.end_measure {
                section.end_measure = e;
            }
            if let Some(t) = patch.tempo {
                section.tempo = t;
            }
            if let Some(ts) = patch.time_signature {
                section.time_signature = ts;
            }
            if let Some(k) = patch.key {
                section.key = k;
            }
            if let Some(d) = patch.description {
                section.description = d;
            }
        }

        if patch_touches_boundaries {
            let (start, end) = (sections[idx].start_measure, sections[idx].end_measure);
            validate_measure_range(start, end)?;
            adjust_neighbors(&mut sections, idx, start, end)?;
        }

        sections.sort_by_key(|s| s.start_measure);
        if let Some((a, b)) = first_overlap(&sections) {
            return Err(ScoreError::SectionOverlap {
                name: a.to_string(),
                other: b.to_string(),
            });
        }

        self.checkpoint();
        debug!(section = name, "edit section");
        self.sections = sections;
        Ok(())
    }

    pub fn remove_section(&mut self, name: &str) -> Result<(), ScoreError> {
        let idx = self
            .sections
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ScoreError::NotFound {
                entity: "section",
                name: name.to_string(),
            })?;
        self.checkpoint();
        self.sections.remove(idx);
        Ok(())
    }
}

fn validate_measure_range(start: u32, end: u32) -> Result<(), ScoreError> {
    if start < 1 {
        return Err(ScoreError::InvalidRange {
            reason: format!("start_measure must be >= 1, got {}", start),
        });
    }
    if end < start {
        return Err(ScoreError::InvalidRange {
            reason: format!("end_measure {} is before start_measure {}", end, start),
        });
    }
    Ok(())
}

/// Shrink every neighbor out of `[start, end]`, refusing when a neighbor
/// would be swallowed or trimmed to nothing.
fn adjust_neighbors(
    sections: &mut [Section],
    edited: usize,
    start: u32,
    end: u32,
) -> Result<(), ScoreError> {
    let edited_name = sections[edited].name.clone();
    for (i, neighbor) in sections.iter_mut().enumerate() {
        if i == edited {
            continue;
        }
        let inside = neighbor.start_measure >= start && neighbor.end_measure <= end;
        if inside {
            return Err(ScoreError::SectionWouldSwallow {
                name: edited_name,
                neighbor: neighbor.name.clone(),
            });
        }
        // Overlap on the low end: trim the neighbor to end just before us.
        if neighbor.start_measure <= start && neighbor.end_measure >= start {
            let new_end = start - 1;
            if new_end < neighbor.start_measure {
                return Err(ScoreError::SectionWouldSwallow {
                    name: edited_name,
                    neighbor: neighbor.name.clone(),
                });
            }
            neighbor.end_measure = new_end;
            continue;
        }
        // Overlap on the high end: push the neighbor's start past us.
        if neighbor.start_measure <= end && neighbor.end_measure >= end {
            let new_start = end + 1;
            if new_start > neighbor.end_measure {
                return Err(ScoreError::SectionWouldSwallow {
                    name: edited_name,
                    neighbor: neighbor.name.clone(),
                });
            }
            neighbor.start_measure = new_start;
        }
    }
    Ok(())
}

/// First pair of overlapping section names in a sorted slice, if any.
fn first_overlap(sections: &[Section]) -> Option<(&str, &str)> {
    sections.windows(2).find_map(|w| {
        w[0].overlaps(&w[1])
            .then(|| (w[0].name.as_str(), w[1].name.as_str()))
    })
}

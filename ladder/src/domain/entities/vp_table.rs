//! VP (points value) table
//!
//! Maps the rating gap between two players to the number of points exchanged
//! on a decisive result. A table is well-formed when its bands are contiguous,
//! non-overlapping and cover `[0, ∞)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One band of the VP table: `min_delta <= delta <= max_delta` yields `vp`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpTableEntry {
    pub min_delta: u32,
    /// `None` means unbounded
    #[serde(default)]
    pub max_delta: Option<u32>,
    pub vp: u32,
}

impl VpTableEntry {
    pub fn bounded(min_delta: u32, max_delta: u32, vp: u32) -> Self {
        Self {
            min_delta,
            max_delta: Some(max_delta),
            vp,
        }
    }

    pub fn open(min_delta: u32, vp: u32) -> Self {
        Self {
            min_delta,
            max_delta: None,
            vp,
        }
    }

    pub fn contains(&self, delta: u32) -> bool {
        delta >= self.min_delta && self.max_delta.map_or(true, |max| delta <= max)
    }
}

/// Why a VP table is not usable for lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VpTableError {
    #[error("VP table is empty")]
    Empty,

    #[error("first band starts at {0}, expected 0")]
    FirstBandNotAtZero(u32),

    #[error("band {index} has max_delta {max} below min_delta {min}")]
    InvertedBand { index: usize, min: u32, max: u32 },

    #[error("gap before band {index}: expected min_delta {expected}, found {found}")]
    Gap {
        index: usize,
        expected: u32,
        found: u32,
    },

    #[error("band {index} overlaps the previous band (min_delta {found})")]
    Overlap { index: usize, found: u32 },

    #[error("band {0} is unbounded but is not the last band")]
    UnboundedBeforeEnd(usize),

    #[error("band {0} has a zero VP value")]
    ZeroVp(usize),

    #[error("band {index} has VP {vp}, above the largest rating change {max}", max = MAX_VP)]
    VpTooLarge { index: usize, vp: u32 },
}

/// Largest VP value a rating change can carry
pub const MAX_VP: u32 = i32::MAX as u32;

/// Ordered list of VP bands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VpTable(Vec<VpTableEntry>);

impl VpTable {
    pub fn new(entries: Vec<VpTableEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[VpTableEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the contiguous-bands invariant, reporting the first violation
    pub fn validate(&self) -> Result<(), VpTableError> {
        let first = self.0.first().ok_or(VpTableError::Empty)?;
        if first.min_delta != 0 {
            return Err(VpTableError::FirstBandNotAtZero(first.min_delta));
        }

        let last_index = self.0.len() - 1;
        let mut expected_min: Option<u32> = Some(0);

        for (index, entry) in self.0.iter().enumerate() {
            if entry.vp == 0 {
                return Err(VpTableError::ZeroVp(index));
            }
            if entry.vp > MAX_VP {
                return Err(VpTableError::VpTooLarge {
                    index,
                    vp: entry.vp,
                });
            }

            match expected_min {
                Some(expected) if entry.min_delta > expected => {
                    return Err(VpTableError::Gap {
                        index,
                        expected,
                        found: entry.min_delta,
                    });
                }
                Some(expected) if entry.min_delta < expected => {
                    return Err(VpTableError::Overlap {
                        index,
                        found: entry.min_delta,
                    });
                }
                Some(_) => {}
                // previous band already reached u32::MAX
                None => {
                    return Err(VpTableError::Overlap {
                        index,
                        found: entry.min_delta,
                    });
                }
            }

            match entry.max_delta {
                Some(max) if max < entry.min_delta => {
                    return Err(VpTableError::InvertedBand {
                        index,
                        min: entry.min_delta,
                        max,
                    });
                }
                Some(max) => expected_min = max.checked_add(1),
                None if index != last_index => {
                    return Err(VpTableError::UnboundedBeforeEnd(index));
                }
                None => expected_min = None,
            }
        }

        Ok(())
    }

    pub fn is_well_formed(&self) -> bool {
        self.validate().is_ok()
    }

    /// First band containing `delta`; the last band is treated as unbounded
    pub fn band_for(&self, delta: u32) -> Option<&VpTableEntry> {
        let last_index = self.0.len().checked_sub(1)?;
        self.0.iter().enumerate().find_map(|(index, entry)| {
            let hit = if index == last_index {
                delta >= entry.min_delta
            } else {
                entry.contains(delta)
            };
            hit.then_some(entry)
        })
    }
}

impl From<Vec<VpTableEntry>> for VpTable {
    fn from(entries: Vec<VpTableEntry>) -> Self {
        Self(entries)
    }
}

/// Rating system settings edited by the administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSystemConfig {
    pub vp_table: VpTable,
    /// Used when the table is malformed or no band matches
    pub base_vp: u32,
    /// Re-check every applied rating change for zero-sum
    pub zero_sum_check: bool,
}

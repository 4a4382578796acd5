//! Snap point resolution: specs × viewport height → ascending pixel heights.

use smallvec::SmallVec;
use snapsheet_core::collections::{map::HashMap, F32Key};

use crate::config::SnapSpec;
use crate::error::SheetConfigError;

pub type SnapHeights = SmallVec<[f32; 4]>;

/// Resolved snap heights for one viewport. Index 0 is the smallest height,
/// the last index the most expanded.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapPoints {
    heights: SnapHeights,
    viewport_height: f32,
}

impl SnapPoints {
    pub fn resolve(specs: &[SnapSpec], viewport_height: f32) -> Result<Self, SheetConfigError> {
        if !viewport_height.is_finite() || viewport_height <= 0.0 {
            return Err(SheetConfigError::InvalidViewport(viewport_height));
        }
        if specs.is_empty() {
            return Err(SheetConfigError::EmptySnapPoints);
        }

        let mut heights = SnapHeights::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            spec.validate()?;
            let height = spec.resolve(viewport_height);
            if height > viewport_height {
                return Err(SheetConfigError::ExceedsViewport {
                    index,
                    height,
                    viewport: viewport_height,
                });
            }
            if let Some(&previous) = heights.last() {
                if height <= previous {
                    return Err(SheetConfigError::NotAscending {
                        index,
                        previous,
                        height,
                    });
                }
            }
            heights.push(height);
        }

        Ok(Self {
            heights,
            viewport_height,
        })
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Always false for a resolved set; kept for the usual slice-like API.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.heights.get(index).copied()
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn min_height(&self) -> f32 {
        self.heights.first().copied().unwrap_or(0.0)
    }

    pub fn max_height(&self) -> f32 {
        self.heights.last().copied().unwrap_or(0.0)
    }

    pub fn max_index(&self) -> usize {
        self.heights.len().saturating_sub(1)
    }

    /// Offset of the sheet top when resting at `index`.
    pub fn offset_for(&self, index: usize) -> Option<f32> {
        self.get(index).map(|height| self.viewport_height - height)
    }

    /// Offset when fully hidden.
    pub fn closed_offset(&self) -> f32 {
        self.viewport_height
    }

    /// Offset at the most expanded snap point.
    pub fn expanded_offset(&self) -> f32 {
        self.viewport_height - self.max_height()
    }

    /// Offset at the smallest snap point. Releases below it may dismiss.
    pub fn collapsed_offset(&self) -> f32 {
        self.viewport_height - self.min_height()
    }

    pub fn visible_height(&self, offset: f32) -> f32 {
        self.viewport_height - offset
    }
}

/// Viewports kept by [`SnapPointResolver`]; enough for a portrait and
/// landscape pair.
pub const CACHED_VIEWPORTS: usize = 2;

/// Caches resolved snap points per viewport height.
///
/// Rotating between portrait and landscape flips between two viewports, so
/// every viewport seen for the current spec list stays cached until the
/// specs change.
#[derive(Debug, Default)]
pub struct SnapPointResolver {
    specs: Vec<SnapSpec>,
    cache: HashMap<F32Key, SnapPoints>,
    /// Least recently used first.
    recency: SmallVec<[F32Key; CACHED_VIEWPORTS]>,
}

impl SnapPointResolver {
    pub fn new(specs: Vec<SnapSpec>) -> Self {
        Self {
            specs,
            cache: HashMap::default(),
            recency: SmallVec::new(),
        }
    }

    pub fn specs(&self) -> &[SnapSpec] {
        &self.specs
    }

    /// Replaces the spec list. The cache is dropped only if the list changed.
    pub fn set_specs(&mut self, specs: Vec<SnapSpec>) {
        if self.specs != specs {
            self.specs = specs;
            self.cache.clear();
            self.recency.clear();
        }
    }

    pub fn resolve(&mut self, viewport_height: f32) -> Result<SnapPoints, SheetConfigError> {
        let key = F32Key::new(viewport_height);
        if let Some(points) = self.cache.get(&key) {
            let points = points.clone();
            self.touch(key);
            return Ok(points);
        }
        let points = SnapPoints::resolve(&self.specs, viewport_height)?;
        log::debug!(
            "resolved snap points {:?} for viewport {}",
            points.heights(),
            viewport_height
        );
        if self.recency.len() == CACHED_VIEWPORTS {
            let evicted = self.recency.remove(0);
            self.cache.remove(&evicted);
            log::trace!("evicted snap points for viewport {}", evicted.get());
        }
        self.cache.insert(key, points.clone());
        self.recency.push(key);
        Ok(points)
    }

    fn touch(&mut self, key: F32Key) {
        if let Some(position) = self.recency.iter().position(|cached| *cached == key) {
            let key = self.recency.remove(position);
            self.recency.push(key);
        }
    }

    pub fn cached_viewports(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
#[path = "tests/snap_points_tests.rs"]
mod tests;

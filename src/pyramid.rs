//! Pyramid driver: runs the tiling pipeline over a zoom range.
//!
//! For every zoom level, independently:
//!
//! ```text
//!  markers ──▶ GeoPoint ──▶ locate + offset ──▶ fragment ──▶ TileSet ──▶ sort ──▶ TileConsumer
//! ```
//!
//! Nothing is carried from one zoom level to the next, so levels can be
//! processed in any order or in parallel ([`PyramidDriver::generate_concurrent`]).

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{PyramidError, TileError};
use crate::geo::{TileGrid, MAX_ZOOM};
use crate::placemark::Placemark;
use crate::source::Marker;
use crate::tile::{TileConsumer, TileSet};

// =============================================================================
// Zoom Range
// =============================================================================

/// Inclusive range of zoom levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomRange {
    min: u8,
    max: u8,
}

impl ZoomRange {
    /// Create a range `min..=max`.
    pub fn new(min: u8, max: u8) -> Result<Self, PyramidError> {
        if min > max {
            return Err(PyramidError::InvalidZoomRange { min, max });
        }
        if max > MAX_ZOOM {
            return Err(TileError::InvalidZoom {
                zoom: max,
                max: MAX_ZOOM,
            }
            .into());
        }
        Ok(Self { min, max })
    }

    /// A range covering one zoom level.
    pub fn single(zoom: u8) -> Result<Self, PyramidError> {
        Self::new(zoom, zoom)
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn len(&self) -> usize {
        (self.max - self.min) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> RangeInclusive<u8> {
        self.min..=self.max
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Totals for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Zoom levels processed
    pub zoom_levels: usize,

    /// Tiles handed to the consumer
    pub tiles: usize,

    /// Placemarks across all tiles (fragments counted individually)
    pub placemarks: usize,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl GenerationStats {
    fn absorb(&mut self, level: LevelStats) {
        self.zoom_levels += 1;
        self.tiles += level.tiles;
        self.placemarks += level.placemarks;
    }
}

#[derive(Debug, Clone, Copy)]
struct LevelStats {
    tiles: usize,
    placemarks: usize,
}

// =============================================================================
// Pyramid Driver
// =============================================================================

/// Builds tile sets per zoom level and hands finished tiles to a consumer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyramidDriver {
    grid: TileGrid,
}

impl PyramidDriver {
    pub fn new(grid: TileGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// All placemarks (anchor tile first, then neighbor fragments) for one
    /// marker at `zoom`.
    pub fn placemarks_for<M: Marker + ?Sized>(
        &self,
        marker: &M,
        zoom: u8,
    ) -> Result<Vec<Placemark>, PyramidError> {
        let point = marker.geo_point()?;
        let placemarks = Placemark::create(
            &self.grid,
            &point,
            zoom,
            marker.offset(zoom),
            marker.icon(zoom),
            marker.data(),
        )?;

        if let Some(anchor) = placemarks.first() {
            if !self.grid.contains(anchor.address, zoom) {
                warn!(
                    "Marker at ({}, {}) falls outside the world at zoom {} (tile {}, {})",
                    point.lng(),
                    point.lat(),
                    zoom,
                    anchor.address.x,
                    anchor.address.y
                );
            }
        }

        Ok(placemarks)
    }

    /// Place every marker at `zoom` and aggregate the result into sorted tiles.
    pub fn build_level<M: Marker>(
        &self,
        markers: &[M],
        zoom: u8,
    ) -> Result<TileSet, PyramidError> {
        let mut placemarks = Vec::with_capacity(markers.len());
        for marker in markers {
            placemarks.extend(self.placemarks_for(marker, zoom)?);
        }
        Ok(TileSet::build(zoom, placemarks))
    }

    /// Run the pipeline for every zoom in `zooms`, one level after another.
    ///
    /// Stops at the first error; tiles of earlier levels have been consumed by
    /// then.
    pub fn generate<M, C>(
        &self,
        markers: &[M],
        zooms: ZoomRange,
        consumer: &C,
    ) -> Result<GenerationStats, PyramidError>
    where
        M: Marker,
        C: TileConsumer + ?Sized,
    {
        let start = Instant::now();
        let mut stats = GenerationStats::default();

        for zoom in zooms.iter() {
            stats.absorb(self.emit_level(markers, zoom, consumer)?);
        }

        stats.elapsed = start.elapsed();
        log_summary(&stats);
        Ok(stats)
    }

    /// Run the pipeline with one blocking worker per zoom level.
    ///
    /// Produces the same tiles as [`generate`](Self::generate). On the first
    /// failing level the remaining workers are aborted and the error returned.
    pub async fn generate_concurrent<M, C>(
        &self,
        markers: Arc<[M]>,
        zooms: ZoomRange,
        consumer: Arc<C>,
    ) -> Result<GenerationStats, PyramidError>
    where
        M: Marker + Send + Sync + 'static,
        C: TileConsumer + 'static,
    {
        let start = Instant::now();
        let mut workers = JoinSet::new();

        for zoom in zooms.iter() {
            let driver = *self;
            let markers = Arc::clone(&markers);
            let consumer = Arc::clone(&consumer);
            workers.spawn_blocking(move || driver.emit_level(&markers, zoom, consumer.as_ref()));
        }

        let mut stats = GenerationStats::default();
        while let Some(joined) = workers.join_next().await {
            let level = joined.map_err(|e| PyramidError::Worker(e.to_string()))??;
            stats.absorb(level);
        }

        stats.elapsed = start.elapsed();
        log_summary(&stats);
        Ok(stats)
    }

    fn emit_level<M, C>(
        &self,
        markers: &[M],
        zoom: u8,
        consumer: &C,
    ) -> Result<LevelStats, PyramidError>
    where
        M: Marker,
        C: TileConsumer + ?Sized,
    {
        let set = self.build_level(markers, zoom)?;
        let level = LevelStats {
            tiles: set.len(),
            placemarks: set.placemark_count(),
        };
        debug!(
            "Zoom {}: {} placemark(s) on {} tile(s)",
            zoom, level.placemarks, level.tiles
        );

        for tile in set.into_tiles() {
            consumer.consume(&tile)?;
        }

        info!("Zoom {} done: {} tile(s)", zoom, level.tiles);
        Ok(level)
    }
}

fn log_summary(stats: &GenerationStats) {
    info!(
        "Created {} tile(s) across {} zoom level(s) in {:.2}s",
        stats.tiles,
        stats.zoom_levels,
        stats.elapsed.as_secs_f64()
    );
}

// =============================================================================
// Tests
// =============================================================================

//! Splitting placemark boxes across tile boundaries.
//!
//! A box is anchored at its top-left corner and grows right and down, so it
//! can only bleed into three neighbors:
//!
//! ```text
//!   ┌────────┬────────┐
//!   │ origin │ right  │
//!   │    ┌───┼──┐     │
//!   ├────┼───┼──┼─────┤
//!   │    └───┼──┘     │
//!   │ below  │diagonal│
//!   └────────┴────────┘
//! ```
//!
//! Each neighbor is found by moving the anchor one box dimension in its
//! direction and checking whether the move crossed a tile edge. The box is then
//! re-expressed in the neighbor's local frame, which puts part of it at
//! negative coordinates.

use serde::Serialize;

use crate::error::TileError;
use crate::geo::{Offset, TileAddress, TileGrid, TileLocation};

// =============================================================================
// Local Box
// =============================================================================

/// Rectangle in pixels relative to one tile's top-left corner.
///
/// Coordinates outside `[0, tile_size)` mean the box extends into a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LocalBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl LocalBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box of `width`×`height` whose top-left corner is at `(top, left)`.
    pub fn anchored(top: i32, left: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Horizontal extent, saturating at the `i32` bounds.
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Vertical extent, saturating at the `i32` bounds.
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// `[left, top, right, bottom]`
    pub fn to_array(&self) -> [i32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

impl From<(i32, i32, i32, i32)> for LocalBox {
    fn from((left, top, right, bottom): (i32, i32, i32, i32)) -> Self {
        Self::new(left, top, right, bottom)
    }
}

// =============================================================================
// Fragments
// =============================================================================

/// The part of a box that falls onto a neighboring tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub address: TileAddress,
    pub local_box: LocalBox,
}

/// Re-expresses a box in a neighbor's frame, given the moved anchor `(top, left)`.
type Translate = fn(top: i32, left: i32, width: i32, height: i32) -> LocalBox;

fn diagonal(top: i32, left: i32, width: i32, height: i32) -> LocalBox {
    LocalBox::new(left - width, top - height, left, top)
}

fn right(top: i32, left: i32, width: i32, height: i32) -> LocalBox {
    LocalBox::new(left - width, top, left, top + height)
}

fn below(top: i32, left: i32, width: i32, height: i32) -> LocalBox {
    LocalBox::new(left, top - height, left + width, top)
}

/// Compute the fragments of `local_box` that spill from tile `address` into
/// its neighbors.
///
/// Neighbors are tried in the order diagonal, right, below; each neighbor is
/// emitted at most once and never equals `address`. A box that fits inside
/// its tile yields no fragments.
///
/// # Errors
///
/// Returns [`TileError::UnsupportedGeometry`] when the box is wider or taller
/// than one tile edge (or has negative extent): such a box can cover more
/// than one neighbor per axis, which this scheme cannot express.
pub fn fragment(
    grid: &TileGrid,
    address: TileAddress,
    local_box: LocalBox,
) -> Result<Vec<Fragment>, TileError> {
    let width = local_box.width();
    let height = local_box.height();
    let tile_size = grid.tile_size();

    let fits = |extent: i32| extent >= 0 && extent as u32 <= tile_size;
    if !fits(width) || !fits(height) {
        return Err(TileError::UnsupportedGeometry {
            width,
            height,
            tile_size,
        });
    }

    let rules: [(Offset, Translate); 3] = [
        (Offset::new(height, width), diagonal),
        (Offset::new(0, width), right),
        (Offset::new(height, 0), below),
    ];

    let anchor = TileLocation::new(address, local_box.top, local_box.left);
    let mut fragments: Vec<Fragment> = Vec::with_capacity(rules.len());

    for (offset, translate) in rules {
        let moved = grid.move_anchor(anchor, offset);
        if moved.address == address || fragments.iter().any(|f| f.address == moved.address) {
            continue;
        }
        fragments.push(Fragment {
            address: moved.address,
            local_box: translate(moved.top, moved.left, width, height),
        });
    }

    Ok(fragments)
}

// =============================================================================
// Tests
// =============================================================================

//! Heatmap module - sector groups of color-classed tiles with range markers.

mod board;
mod heatmap_model;

pub use board::{build_board, build_tile};
pub use heatmap_model::{
    classify_change, range_position, HeatmapBoard, HeatmapTile, Holding, RangeMarker,
    SectorGroup, TileClass, FLAT_THRESHOLD_PCT,
};

//! World geometry
//!
//! The world is a fixed 640 units tall; its width follows the viewport aspect
//! ratio so the playfield always fills the screen without letterboxing.

use serde::{Deserialize, Serialize};

use super::state::SimulationState;
use crate::assets::AssetCatalog;
use crate::consts::*;

/// Logical world dimensions and render scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub ground_height: f32,
    pub pipe_width: f32,
    pub background_tile_width: f32,
    /// Canvas pixels per world unit
    pub render_scale_x: f32,
    pub render_scale_y: f32,
    /// Backing canvas size in device pixels
    pub canvas_size: (u32, u32),
}

impl WorldConfig {
    /// World at the base width with no viewport information yet
    pub fn base(ground_height: f32, assets: &AssetCatalog) -> Self {
        let width = BASE_WORLD_WIDTH;
        Self {
            width,
            height: WORLD_HEIGHT,
            ground_height,
            pipe_width: pipe_width_for(width, assets),
            background_tile_width: background_tile_width_for(width, assets),
            render_scale_x: 1.0,
            render_scale_y: 1.0,
            canvas_size: (width as u32, WORLD_HEIGHT as u32),
        }
    }

    /// Derive the world for a viewport (CSS pixels) and device pixel ratio
    pub fn recompute(
        viewport_width: f32,
        viewport_height: f32,
        device_pixel_ratio: f32,
        ground_height: f32,
        assets: &AssetCatalog,
    ) -> Self {
        let width = world_width_for(viewport_width, viewport_height);
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let canvas_w = ((viewport_width.max(1.0) * dpr).floor() as u32).max(1);
        let canvas_h = ((viewport_height.max(1.0) * dpr).floor() as u32).max(1);

        Self {
            width,
            height: WORLD_HEIGHT,
            ground_height,
            pipe_width: pipe_width_for(width, assets),
            background_tile_width: background_tile_width_for(width, assets),
            render_scale_x: canvas_w as f32 / width,
            render_scale_y: canvas_h as f32 / WORLD_HEIGHT,
            canvas_size: (canvas_w, canvas_h),
        }
    }

    /// Recompute the asset-dependent widths (after assets finish loading)
    pub fn refresh_asset_widths(&mut self, assets: &AssetCatalog) {
        self.pipe_width = pipe_width_for(self.width, assets);
        self.background_tile_width = background_tile_width_for(self.width, assets);
    }

    /// Y coordinate of the top of the ground band
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height
    }
}

/// World width for a viewport, falling back to the base width
pub fn world_width_for(viewport_width: f32, viewport_height: f32) -> f32 {
    let aspect = viewport_width / viewport_height;
    if aspect.is_finite() && aspect > 0.0 {
        WORLD_HEIGHT * aspect
    } else {
        BASE_WORLD_WIDTH
    }
}

/// Obstacle width: the reference art width, clamped, then gently scaled with
/// the world width so wide screens get slightly wider pipes.
pub fn pipe_width_for(world_width: f32, assets: &AssetCatalog) -> f32 {
    let asset_width = assets
        .reference_pipe_width()
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(PIPE_DEFAULT_ASSET_WIDTH);
    let clamped = asset_width.clamp(PIPE_MIN_WIDTH, PIPE_MAX_WIDTH);
    let ratio = (world_width / BASE_WORLD_WIDTH).max(PIPE_WIDTH_RATIO_FLOOR);
    let scale = ratio.powf(PIPE_WIDTH_EXPONENT).min(PIPE_WIDTH_CAP_SCALE);
    (clamped * scale).clamp(PIPE_MIN_WIDTH, PIPE_MAX_WIDTH)
}

/// Background tile width: the art's aspect at full world height, never narrower
/// than the world itself.
pub fn background_tile_width_for(world_width: f32, assets: &AssetCatalog) -> f32 {
    match assets.background.and_then(|bg| bg.aspect()) {
        Some(aspect) => (aspect * WORLD_HEIGHT).max(world_width),
        None => world_width,
    }
}

/// Carry the simulation over to a new world width.
///
/// Obstacle positions and the background offset scale by new/old width so the
/// scene keeps its proportions; obstacles take the new pipe width.
pub fn apply_width_change(state: &mut SimulationState, world: &WorldConfig, previous_width: f32) {
    let scale = if previous_width > 0.0 {
        world.width / previous_width
    } else {
        1.0
    };

    state.avatar.pos.x = world.width * BIRD_X_RATIO;

    for obstacle in &mut state.obstacles {
        obstacle.x *= scale;
        obstacle.width = world.pipe_width;
    }

    let tile = tile_or_world(world);
    state.background_offset = (state.background_offset * scale).rem_euclid(tile);
}

/// Tile width guarded against zero
#[inline]
pub fn tile_or_world(world: &WorldConfig) -> f32 {
    if world.background_tile_width > 0.0 {
        world.background_tile_width
    } else {
        world.width
    }
}

//! Scene assembly
//!
//! Turns the read-only simulation state into one vertex list in world units,
//! split into batches that each sample a single texture.
//! Draw order: background, pipes, ground, bird, HUD.

use std::ops::Range;

use glam::Vec2;

use super::shapes;
use super::texture::TextureSlot;
use super::vertex::{Vertex, colors};
use crate::assets::AssetCatalog;
use crate::sim::{Avatar, Obstacle, SimulationState, WorldConfig};

/// Bird visual tilt relative to its physical rotation
const BIRD_TILT_SCALE: f32 = 0.75;
/// Bird sprite height relative to its collision radius
const BIRD_DRAW_SCALE: f32 = 2.2;
const GROUND_STRIPE_SPACING: f32 = 40.0;
const GROUND_STRIPE_SIZE: Vec2 = Vec2::new(20.0, 8.0);

/// HUD score panel, centered horizontally
const HUD_PANEL_SIZE: Vec2 = Vec2::new(160.0, 60.0);
const HUD_PANEL_TOP: f32 = 30.0;
const HUD_DIGIT_HEIGHT: f32 = 38.0;

/// Consecutive vertices drawn with one texture
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureSlot,
    pub vertices: Range<u32>,
}

/// One frame's geometry
#[derive(Debug, Default)]
pub struct Scene {
    pub vertices: Vec<Vertex>,
    pub batches: Vec<Batch>,
}

impl Scene {
    /// Append vertices, extending the last batch when the texture matches
    pub fn push(&mut self, texture: TextureSlot, vertices: Vec<Vertex>) {
        if vertices.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend(vertices);
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.vertices.end = end,
            _ => self.batches.push(Batch {
                texture,
                vertices: start..end,
            }),
        }
    }

    /// Vertices drawn with the given texture
    pub fn textured_with(&self, texture: TextureSlot) -> impl Iterator<Item = &Vertex> {
        self.batches
            .iter()
            .filter(move |b| b.texture == texture)
            .flat_map(move |b| &self.vertices[b.vertices.start as usize..b.vertices.end as usize])
    }
}

/// Build every vertex for one frame
pub fn build_scene(state: &SimulationState, world: &WorldConfig, assets: &AssetCatalog) -> Scene {
    let mut scene = Scene {
        vertices: Vec::with_capacity(1024),
        batches: Vec::new(),
    };

    background(&mut scene, state.background_offset, world, assets);
    for obstacle in &state.obstacles {
        pipe(&mut scene, obstacle, world, assets);
    }
    ground(&mut scene, world);
    bird(&mut scene, &state.avatar, assets);
    hud(&mut scene, state.score(), world);

    scene
}

fn background(scene: &mut Scene, offset: f32, world: &WorldConfig, assets: &AssetCatalog) {
    if assets.background.is_none() {
        scene.push(
            TextureSlot::Blank,
            shapes::rect(Vec2::ZERO, Vec2::new(world.width, world.height), colors::SKY),
        );
        return;
    }

    // Tile the image from -offset until the world is covered
    let tile = world.background_tile_width.max(1.0);
    let mut x = -offset;
    while x < world.width + tile {
        scene.push(
            TextureSlot::Background,
            shapes::image_rect(
                Vec2::new(x, 0.0),
                Vec2::new(x + tile, world.height),
                false,
                colors::IMAGE_TINT,
            ),
        );
        x += tile;
    }
}

fn pipe(scene: &mut Scene, obstacle: &Obstacle, world: &WorldConfig, assets: &AssetCatalog) {
    let left = obstacle.x;
    let right = obstacle.right();
    let gap_top = obstacle.gap_y;
    let gap_bottom = obstacle.gap_bottom();
    let ground_y = world.ground_y();

    let art = obstacle
        .variant
        .filter(|i| *i < assets.variant_count())
        .map(TextureSlot::Pipe);

    let Some(slot) = art else {
        if gap_top > 0.0 {
            scene.push(
                TextureSlot::Blank,
                shapes::rect(Vec2::new(left, 0.0), Vec2::new(right, gap_top), colors::PIPE),
            );
        }
        if ground_y > gap_bottom {
            scene.push(
                TextureSlot::Blank,
                shapes::rect(Vec2::new(left, gap_bottom), Vec2::new(right, ground_y), colors::PIPE),
            );
        }
        return;
    };

    // Top half is the same pillar mirrored, its end resting on the gap
    if gap_top > 0.0 {
        scene.push(
            slot,
            shapes::image_rect(
                Vec2::new(left, 0.0),
                Vec2::new(right, gap_top),
                true,
                colors::IMAGE_TINT,
            ),
        );
    }
    if ground_y > gap_bottom {
        scene.push(
            slot,
            shapes::image_rect(
                Vec2::new(left, gap_bottom),
                Vec2::new(right, ground_y),
                false,
                colors::IMAGE_TINT,
            ),
        );
    }
}

fn ground(scene: &mut Scene, world: &WorldConfig) {
    let top = world.ground_y();
    scene.push(
        TextureSlot::Blank,
        shapes::rect_gradient(
            Vec2::new(0.0, top),
            Vec2::new(world.width, world.height),
            colors::GROUND_TOP,
            colors::GROUND_BOTTOM,
        ),
    );

    let mut x = 0.0;
    while x < world.width {
        let min = Vec2::new(x, top);
        scene.push(
            TextureSlot::Blank,
            shapes::rect(min, min + GROUND_STRIPE_SIZE, colors::GROUND_STRIPE),
        );
        x += GROUND_STRIPE_SPACING;
    }
}

fn bird(scene: &mut Scene, avatar: &Avatar, assets: &AssetCatalog) {
    let Some(aspect) = assets.bird.and_then(|b| b.aspect()) else {
        scene.push(
            TextureSlot::Blank,
            shapes::circle(avatar.pos, avatar.radius, colors::BIRD, 32),
        );
        return;
    };

    let half_h = avatar.radius * BIRD_DRAW_SCALE / 2.0;
    scene.push(
        TextureSlot::Bird,
        shapes::image_rotated(
            avatar.pos,
            Vec2::new(half_h * aspect, half_h),
            avatar.rotation * BIRD_TILT_SCALE,
            colors::IMAGE_TINT,
        ),
    );
}

fn hud(scene: &mut Scene, score: u32, world: &WorldConfig) {
    let min = Vec2::new(world.width / 2.0 - HUD_PANEL_SIZE.x / 2.0, HUD_PANEL_TOP);
    scene.push(
        TextureSlot::Blank,
        shapes::rect(min, min + HUD_PANEL_SIZE, colors::HUD_PANEL),
    );
    scene.push(
        TextureSlot::Blank,
        shapes::number(
            score,
            min + HUD_PANEL_SIZE / 2.0,
            HUD_DIGIT_HEIGHT,
            colors::HUD_TEXT,
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageInfo;
    use crate::tuning::Tuning;

    fn setup(assets: &AssetCatalog) -> (SimulationState, WorldConfig) {
        let tuning = Tuning::default();
        let world = WorldConfig::base(tuning.ground_height, assets);
        let state = SimulationState::new(world.width, &tuning, 0);
        (state, world)
    }

    fn count_color(scene: &Scene, color: [f32; 4]) -> usize {
        scene.vertices.iter().filter(|v| v.color == color).count()
    }

    fn obstacle(variant: Option<usize>) -> Obstacle {
        Obstacle {
            x: 200.0,
            width: 86.0,
            gap_y: 150.0,
            gap_height: 160.0,
            passed: false,
            variant,
        }
    }

    fn pillar_catalog() -> AssetCatalog {
        AssetCatalog {
            pipe_variants: vec![ImageInfo::new(86.0, 500.0)],
            ..AssetCatalog::default()
        }
    }

    #[test]
    fn test_flat_sky_without_background() {
        let assets = AssetCatalog::default();
        let (state, world) = setup(&assets);
        let scene = build_scene(&state, &world, &assets);
        assert_eq!(count_color(&scene, colors::SKY), 6);
        // Plain disc bird
        assert_eq!(count_color(&scene, colors::BIRD), 32 * 3);
        // No art loaded: everything samples the blank texture in one batch
        assert_eq!(scene.batches.len(), 1);
        assert_eq!(scene.batches[0].texture, TextureSlot::Blank);
        assert_eq!(scene.batches[0].vertices, 0..scene.vertices.len() as u32);
    }

    #[test]
    fn test_background_tiles_cover_world() {
        let assets = AssetCatalog {
            background: Some(ImageInfo::new(600.0, 640.0)),
            ..AssetCatalog::default()
        };
        let (mut state, world) = setup(&assets);
        state.background_offset = 300.0;
        let scene = build_scene(&state, &world, &assets);

        let tiles: Vec<&Vertex> = scene.textured_with(TextureSlot::Background).collect();
        assert!(!tiles.is_empty());
        assert_eq!(tiles.len() % 6, 0);
        let min_x = tiles.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = tiles.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!(min_x, -300.0);
        assert!(max_x >= world.width);
        // Each tile shows the whole image
        assert!(tiles.iter().all(|v| v.uv[0] == 0.0 || v.uv[0] == 1.0));
        assert_eq!(count_color(&scene, colors::SKY), 0);
        // Backdrop is drawn first
        assert_eq!(scene.batches[0].texture, TextureSlot::Background);
    }

    #[test]
    fn test_flat_pipe_halves_frame_the_gap() {
        let assets = AssetCatalog::default();
        let (mut state, world) = setup(&assets);
        state.obstacles.push(obstacle(None));
        let scene = build_scene(&state, &world, &assets);
        let pipe_ys: Vec<f32> = scene
            .vertices
            .iter()
            .filter(|v| v.color == colors::PIPE)
            .map(|v| v.position[1])
            .collect();
        assert_eq!(pipe_ys.len(), 12);
        // Nothing drawn inside the gap
        assert!(pipe_ys.iter().all(|y| *y <= 150.0 || *y >= 310.0));
        assert!(pipe_ys.iter().any(|y| *y == world.ground_y()));
    }

    #[test]
    fn test_pipe_art_drawn_with_flipped_top() {
        let assets = pillar_catalog();
        let (mut state, world) = setup(&assets);
        state.obstacles.push(obstacle(Some(0)));
        let scene = build_scene(&state, &world, &assets);

        assert_eq!(count_color(&scene, colors::PIPE), 0);
        let pillar: Vec<&Vertex> = scene.textured_with(TextureSlot::Pipe(0)).collect();
        assert_eq!(pillar.len(), 12);

        let (top, bottom) = pillar.split_at(6);
        // Top half mirrored: the image's first row sits on the gap
        for v in top {
            if v.position[1] == 150.0 {
                assert_eq!(v.uv[1], 0.0);
            } else {
                assert_eq!(v.position[1], 0.0);
                assert_eq!(v.uv[1], 1.0);
            }
        }
        // Bottom half upright, stretched down to the ground
        for v in bottom {
            if v.position[1] == 310.0 {
                assert_eq!(v.uv[1], 0.0);
            } else {
                assert_eq!(v.position[1], world.ground_y());
                assert_eq!(v.uv[1], 1.0);
            }
        }
    }

    #[test]
    fn test_pipe_art_changes_the_frame() {
        let (mut state, world) = setup(&pillar_catalog());
        state.obstacles.push(obstacle(Some(0)));

        let with_art = build_scene(&state, &world, &pillar_catalog());
        let without_art = build_scene(&state, &world, &AssetCatalog::default());
        assert_ne!(with_art.batches, without_art.batches);
        assert_eq!(without_art.textured_with(TextureSlot::Pipe(0)).count(), 0);

        // A variant index with no loaded art falls back to flat color
        state.obstacles[0].variant = Some(3);
        let unknown = build_scene(&state, &world, &pillar_catalog());
        assert_eq!(count_color(&unknown, colors::PIPE), 12);
    }

    #[test]
    fn test_bird_sprite_sized_and_tilted() {
        let assets = AssetCatalog {
            bird: Some(ImageInfo::new(120.0, 90.0)),
            ..AssetCatalog::default()
        };
        let (mut state, world) = setup(&assets);
        state.avatar.rotation = 0.4;
        let scene = build_scene(&state, &world, &assets);

        assert_eq!(count_color(&scene, colors::BIRD), 0);
        let sprite: Vec<&Vertex> = scene.textured_with(TextureSlot::Bird).collect();
        assert_eq!(sprite.len(), 6);

        let corner = |uv: [f32; 2]| {
            Vec2::from(sprite.iter().find(|v| v.uv == uv).unwrap().position)
        };
        let top_edge = corner([1.0, 0.0]) - corner([0.0, 0.0]);
        let left_edge = corner([0.0, 1.0]) - corner([0.0, 0.0]);

        let height = state.avatar.radius * 2.2;
        assert!((left_edge.length() - height).abs() < 1e-3);
        assert!((top_edge.length() - height * 120.0 / 90.0).abs() < 1e-3);
        assert!((top_edge.to_angle() - 0.4 * 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_hud_shows_score() {
        let assets = AssetCatalog::default();
        let (state, world) = setup(&assets);
        let scene = build_scene(&state, &world, &assets);
        // "0" lights six segments
        assert_eq!(count_color(&scene, colors::HUD_TEXT), 6 * 6);
    }

    #[test]
    fn test_push_merges_same_texture() {
        let mut scene = Scene::default();
        let quad = || shapes::rect(Vec2::ZERO, Vec2::ONE, colors::PIPE);
        scene.push(TextureSlot::Blank, quad());
        scene.push(TextureSlot::Blank, quad());
        scene.push(TextureSlot::Bird, quad());
        scene.push(TextureSlot::Blank, Vec::new());
        scene.push(TextureSlot::Blank, quad());

        let batches: Vec<(TextureSlot, Range<u32>)> = scene
            .batches
            .iter()
            .map(|b| (b.texture, b.vertices.clone()))
            .collect();
        assert_eq!(
            batches,
            vec![
                (TextureSlot::Blank, 0..12),
                (TextureSlot::Bird, 12..18),
                (TextureSlot::Blank, 18..24),
            ]
        );
    }
}

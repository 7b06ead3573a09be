//! Draw list construction

use glam::{Mat4, Quat, Vec3};

use crate::platform::Renderer;
use crate::sim::{EntityField, FieldKind, HitMarkerQueue, SimulationState};
use crate::{billboard_yaw, yaw_from_degrees};

/// Full-screen overlay scale (title and game over cards)
const OVERLAY_SCALE: Vec3 = Vec3::new(5.0, 6.5, 3.0);
/// HUD damage icon layout
const ICON_SCALE: f32 = 0.015;
const ICON_ORIGIN: Vec3 = Vec3::new(-0.5, 0.25, 0.0);
const ICON_SPACING: f32 = 0.06;

/// Which mesh/texture pair to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Player,
    Collectible,
    Hazard,
    CollectMarker,
    HazardMarker,
    DamageIcon,
    TitleScreen,
    GameOverScreen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub transform: Mat4,
    pub texture: TextureId,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub title_visible: bool,
    pub game_over: bool,
    pub hits_taken: u32,
    pub camera_position: Vec3,
    pub camera_heading: Vec3,
    /// Walk cycle sample time for the player skeleton
    pub animation_seconds: f32,
    pub screenshot_requested: bool,
    pub items: Vec<DrawItem>,
}

impl RenderSnapshot {
    pub fn count(&self, texture: TextureId) -> usize {
        self.items.iter().filter(|i| i.texture == texture).count()
    }
}

fn field_items(field: &EntityField, yaw: f32, items: &mut Vec<DrawItem>) {
    let texture = match field.kind() {
        FieldKind::Collectible => TextureId::Collectible,
        FieldKind::Hazard => TextureId::Hazard,
    };
    let rotation = Quat::from_rotation_y(yaw);
    let scale = Vec3::splat(field.radius_scale());
    items.extend(field.drawable().map(|(_, e)| DrawItem {
        transform: Mat4::from_scale_rotation_translation(scale, rotation, e.position),
        texture,
    }));
}

fn marker_items(
    markers: &HitMarkerQueue,
    texture: TextureId,
    yaw: f32,
    marker_scale: f32,
    rise_offset: f32,
    items: &mut Vec<DrawItem>,
) {
    let rotation = Quat::from_rotation_y(yaw);
    let scale = Vec3::splat(marker_scale);
    items.extend(markers.active_markers().map(|(pos, age)| {
        // Rise by up to two marker heights over the marker's life
        let y = pos.y + age * 2.0 * marker_scale + rise_offset;
        DrawItem {
            transform: Mat4::from_scale_rotation_translation(
                scale,
                rotation,
                Vec3::new(pos.x, y, pos.z),
            ),
            texture,
        }
    }));
}

fn overlay(texture: TextureId) -> DrawItem {
    DrawItem {
        transform: Mat4::from_scale(OVERLAY_SCALE),
        texture,
    }
}

/// Capture the drawable world
pub fn build_snapshot(state: &SimulationState) -> RenderSnapshot {
    let player = &state.player;
    let mut snapshot = RenderSnapshot {
        frame: state.frame,
        title_visible: state.in_title(),
        game_over: state.game.is_game_over(),
        hits_taken: state.game.hits_taken(),
        camera_position: player.position,
        camera_heading: player.heading,
        animation_seconds: state.animation.sample_seconds(),
        screenshot_requested: state.screenshot_requested,
        items: Vec::new(),
    };

    if snapshot.title_visible {
        snapshot.items.push(overlay(TextureId::TitleScreen));
        return snapshot;
    }

    snapshot.items.push(DrawItem {
        transform: Mat4::from_scale_rotation_translation(
            Vec3::splat(player.scale),
            Quat::from_rotation_y(yaw_from_degrees(player.facing_degrees)),
            player.position,
        ),
        texture: TextureId::Player,
    });

    let yaw = billboard_yaw(player.heading);
    for kind in [FieldKind::Collectible, FieldKind::Hazard] {
        field_items(state.field(kind), yaw, &mut snapshot.items);
    }

    let settings = &state.settings;
    for (kind, texture) in [
        (FieldKind::Collectible, TextureId::CollectMarker),
        (FieldKind::Hazard, TextureId::HazardMarker),
    ] {
        marker_items(
            state.markers(kind),
            texture,
            yaw,
            settings.hit_marker_scale,
            settings.hit_marker_rise_offset,
            &mut snapshot.items,
        );
    }

    // HUD: one icon per hit taken, left to right
    let icon_rotation = Quat::from_rotation_y(std::f32::consts::PI);
    for i in 0..snapshot.hits_taken {
        let offset = ICON_ORIGIN + Vec3::new(ICON_SPACING * i as f32, 0.0, 0.0);
        snapshot.items.push(DrawItem {
            transform: Mat4::from_scale_rotation_translation(
                Vec3::splat(ICON_SCALE),
                icon_rotation,
                offset,
            ),
            texture: TextureId::DamageIcon,
        });
    }

    if snapshot.game_over {
        snapshot.items.push(overlay(TextureId::GameOverScreen));
    }

    snapshot
}

/// Replay a snapshot against the renderer and present it
pub fn submit(snapshot: &RenderSnapshot, renderer: &mut dyn Renderer) {
    renderer.begin_frame();
    for item in &snapshot.items {
        renderer.draw_entity(&item.transform, item.texture);
    }
    renderer.end_frame();
    renderer.present();
}

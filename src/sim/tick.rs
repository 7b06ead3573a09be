//! One frame of simulation
//!
//! A frame is split in two so the driver can run locomotion in between:
//! `process_input` folds at most one key event into the state, then `tick`
//! takes the new player pose and advances everything else in a fixed order.

use glam::Vec3;
use rand::Rng;

use super::field::{EntityField, FieldEvent, FieldKind};
use super::input::{Key, KeyEvent};
use super::markers::HitMarkerQueue;
use super::sphere::Sphere;
use super::state::{GameStateMachine, SimulationState};
use crate::settings::FieldSettings;

/// Everything the simulation needs for one frame after input is processed
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Wall-clock time since the previous frame (0 on the first frame)
    pub elapsed_ms: u32,
    /// Player position from locomotion
    pub position: Vec3,
    /// Player heading from locomotion
    pub heading: Vec3,
}

/// Things that happened this frame, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A movement key went down
    MovementKeyPressed(Key),
    /// A key event was processed; `moving` is whether any movement key is held
    InputProcessed { moving: bool },
    /// The player touched an entity
    Collision { kind: FieldKind, position: Vec3 },
    /// An entity reached the ground uncollected
    Missed { kind: FieldKind },
    /// The session just ended (emitted once)
    GameOver,
    ScreenshotRequested,
    QuitRequested,
}

/// Apply one drained input event (or none) to the player and animation
pub fn process_input(state: &mut SimulationState, event: Option<KeyEvent>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.screenshot_requested = false;

    let Some(event) = event else {
        return events;
    };

    match event {
        KeyEvent::Down(Key::Escape) => {
            state.quit_requested = true;
            events.push(GameEvent::QuitRequested);
        }
        KeyEvent::Down(Key::Screenshot) => {
            state.screenshot_requested = true;
            events.push(GameEvent::ScreenshotRequested);
        }
        KeyEvent::Down(key) => {
            if let Some(bit) = key.move_bit() {
                state.player.move_mask |= bit;
                if let Some(facing) = key.facing_degrees() {
                    state.player.facing_degrees = facing;
                }
                state.animation.on_movement_press();
                events.push(GameEvent::MovementKeyPressed(key));
            }
        }
        KeyEvent::Up(key) => {
            if let Some(bit) = key.move_bit() {
                state.player.move_mask.remove(bit);
                state.animation.on_movement_release(state.player.move_mask);
            }
        }
    }

    events.push(GameEvent::InputProcessed {
        moving: !state.player.move_mask.is_empty(),
    });
    events
}

/// Advance, recycle and collide one field, feeding markers and the hit counter
#[allow(clippy::too_many_arguments)]
fn step_field<R: Rng + ?Sized>(
    field: &mut EntityField,
    markers: &mut HitMarkerQueue,
    game: &mut GameStateMachine,
    tuning: &FieldSettings,
    marker_ms: i32,
    player: &Sphere,
    elapsed_ms: u32,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    // A hit earlier this frame may already have ended the game
    if game.is_game_over() {
        return;
    }

    for event in field.advance(elapsed_ms, rng) {
        if let FieldEvent::Recycled { kind, .. } = event {
            if tuning.counts_ground_misses {
                game.record_hit();
            }
            events.push(GameEvent::Missed { kind });
        }
    }

    if game.is_game_over() {
        return;
    }

    for event in field.test_collisions(player) {
        if let FieldEvent::Collision { kind, position, .. } = event {
            markers.push(position, marker_ms);
            if tuning.counts_collisions {
                game.record_hit();
            }
            events.push(GameEvent::Collision { kind, position });
        }
    }
}

/// Advance the world by one frame
pub fn tick(state: &mut SimulationState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    state.frame += 1;
    state.session_ms += u64::from(input.elapsed_ms);

    state.player.position = input.position;
    state.player.heading = input.heading;
    state.player.update_bound_sphere();

    // Title screen: the world holds still
    if state.in_title() {
        return events;
    }

    let player = state.player.bound_sphere;
    let marker_ms = state.settings.hit_marker_ms;

    step_field(
        &mut state.collectibles,
        &mut state.collect_markers,
        &mut state.game,
        state.settings.field(FieldKind::Collectible),
        marker_ms,
        &player,
        input.elapsed_ms,
        &mut state.rng,
        &mut events,
    );
    step_field(
        &mut state.hazards,
        &mut state.hazard_markers,
        &mut state.game,
        state.settings.field(FieldKind::Hazard),
        marker_ms,
        &player,
        input.elapsed_ms,
        &mut state.rng,
        &mut events,
    );

    state.collect_markers.tick(input.elapsed_ms);
    state.hazard_markers.tick(input.elapsed_ms);

    state.animation.advance(input.elapsed_ms);

    if state.game.evaluate() {
        state.collectibles.suspend();
        state.hazards.suspend();
        log::info!(
            "Game over after {} hits (frame {})",
            state.game.hits_taken(),
            state.frame
        );
        events.push(GameEvent::GameOver);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::MeshBounds;

    fn new_state(seed: u64) -> SimulationState {
        SimulationState::new(seed, Settings::default().without_title(), MeshBounds::default())
            .expect("valid settings")
    }

    fn still(elapsed_ms: u32, position: Vec3) -> TickInput {
        TickInput {
            elapsed_ms,
            position,
            heading: Vec3::Z,
        }
    }

    /// Somewhere no entity can ever reach
    const FAR_AWAY: Vec3 = Vec3::new(1000.0, 0.0, 1000.0);

    #[test]
    fn test_key_down_sets_mask_and_facing() {
        let mut state = new_state(1);
        let events = process_input(&mut state, Some(KeyEvent::Down(Key::Left)));
        assert_eq!(state.player.move_mask, crate::sim::MoveMask::LEFT);
        assert_eq!(state.player.facing_degrees, 270.0);
        assert!(state.animation.is_playing());
        assert_eq!(
            events,
            vec![
                GameEvent::MovementKeyPressed(Key::Left),
                GameEvent::InputProcessed { moving: true }
            ]
        );

        let events = process_input(&mut state, Some(KeyEvent::Up(Key::Left)));
        assert!(state.player.move_mask.is_empty());
        // Facing sticks, animation keeps playing
        assert_eq!(state.player.facing_degrees, 270.0);
        assert!(state.animation.is_playing());
        assert_eq!(events, vec![GameEvent::InputProcessed { moving: false }]);
    }

    #[test]
    fn test_escape_requests_quit() {
        let mut state = new_state(1);
        let events = process_input(&mut state, Some(KeyEvent::Down(Key::Escape)));
        assert!(state.quit_requested);
        assert!(events.contains(&GameEvent::QuitRequested));
    }

    #[test]
    fn test_screenshot_is_one_shot() {
        let mut state = new_state(1);
        process_input(&mut state, Some(KeyEvent::Down(Key::Screenshot)));
        assert!(state.screenshot_requested);
        process_input(&mut state, None);
        assert!(!state.screenshot_requested);
    }

    #[test]
    fn test_no_input_is_not_an_error() {
        let mut state = new_state(1);
        assert!(process_input(&mut state, None).is_empty());
    }

    #[test]
    fn test_title_screen_freezes_world() {
        let mut state =
            SimulationState::new(3, Settings::default(), MeshBounds::default()).unwrap();
        let before: Vec<_> = state.collectibles.entities().to_vec();

        tick(&mut state, &still(0, FAR_AWAY));
        tick(&mut state, &still(4000, FAR_AWAY));
        assert!(state.in_title());
        assert_eq!(state.collectibles.entities(), &before[..]);

        tick(&mut state, &still(1000, FAR_AWAY));
        assert!(!state.in_title());
        assert_ne!(state.collectibles.entities(), &before[..]);
    }

    #[test]
    fn test_collision_pushes_marker_and_counts() {
        let mut state = new_state(5);
        let target = state.hazards.entities()[0].position;
        // Stand right where hazard 0 will be after its first descent
        let speed = state.hazards.entities()[0].descent_speed;
        let standing = target - Vec3::new(0.0, speed, 0.0);

        let events = tick(&mut state, &still(16, standing));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Collision {
                kind: FieldKind::Hazard,
                ..
            }
        )));
        assert!(state.hazards.entities()[0].consumed);
        assert_eq!(state.game.hits_taken(), 1);
        assert_eq!(state.hazard_markers.active_markers().count(), 1);
    }

    /// One collectible dropping onto a player at the origin; hazards out of reach
    fn collectible_overhead() -> Settings {
        let mut settings = Settings::default().without_title();
        settings.collectibles.count = 1;
        settings.collectibles.base_height = 2.0;
        settings.collectibles.speed_range = [0.5, 0.5];
        settings.collectibles.x_range = [0.0, 0.0];
        settings.collectibles.z_range = [0.0, 0.0];
        settings.hazards.count = 1;
        settings.hazards.base_height = 1.0e6;
        settings
    }

    #[test]
    fn test_collectible_collision_counts_one_hit() {
        let mut state =
            SimulationState::new(4, collectible_overhead(), MeshBounds::default()).unwrap();

        let events = tick(&mut state, &still(16, Vec3::ZERO));
        assert_eq!(
            events,
            vec![GameEvent::Collision {
                kind: FieldKind::Collectible,
                position: Vec3::new(0.0, 1.5, 0.0),
            }]
        );
        assert_eq!(state.game.hits_taken(), 1);
        assert!(state.collectibles.entities()[0].consumed);
        assert_eq!(state.collect_markers.active_markers().count(), 1);
        assert_eq!(state.hazard_markers.active_markers().count(), 0);
    }

    #[test]
    fn test_collisions_can_be_ignored() {
        let mut settings = collectible_overhead();
        settings.collectibles.counts_collisions = false;
        let mut state = SimulationState::new(4, settings, MeshBounds::default()).unwrap();

        let events = tick(&mut state, &still(16, Vec3::ZERO));
        assert_eq!(events.len(), 1);
        assert_eq!(state.game.hits_taken(), 0);
        // Still consumed and marked, just not counted
        assert!(state.collectibles.entities()[0].consumed);
        assert_eq!(state.collect_markers.active_markers().count(), 1);
    }

    #[test]
    fn test_fields_stop_once_a_hit_ends_the_game() {
        let mut settings = Settings::default().without_title();
        settings.game_over_threshold = 0;
        // Collectible misses the ground on the first frame
        settings.collectibles.count = 1;
        settings.collectibles.base_height = 1.0;
        settings.collectibles.speed_range = [1.0, 1.0];
        // Hazard lands on the player on the same frame
        settings.hazards.count = 1;
        settings.hazards.base_height = 2.0;
        settings.hazards.speed_range = [0.5, 0.5];
        settings.hazards.x_range = [0.0, 0.0];
        settings.hazards.z_range = [0.0, 0.0];
        let mut state = SimulationState::new(8, settings, MeshBounds::default()).unwrap();

        let events = tick(&mut state, &still(16, Vec3::ZERO));
        assert_eq!(
            events,
            vec![
                GameEvent::Missed {
                    kind: FieldKind::Collectible
                },
                GameEvent::GameOver,
            ]
        );
        assert_eq!(state.game.hits_taken(), 1);
        let hazard = &state.hazards.entities()[0];
        assert!(!hazard.consumed);
        assert_eq!(hazard.position.y, 2.0);
        assert_eq!(state.hazard_markers.active_markers().count(), 0);
    }

    #[test]
    fn test_ground_misses_end_the_game() {
        let mut settings = Settings::default().without_title();
        settings.collectibles.count = 1;
        settings.collectibles.base_height = 1.0;
        settings.collectibles.speed_range = [1.0, 1.0];
        settings.hazards.count = 1;
        settings.hazards.base_height = 1.0e6;
        let mut state = SimulationState::new(9, settings, MeshBounds::default()).unwrap();

        let mut game_over_frames = 0;
        for _ in 0..20 {
            let events = tick(&mut state, &still(16, FAR_AWAY));
            game_over_frames += events.iter().filter(|e| **e == GameEvent::GameOver).count();
        }

        // Every frame recycles the collectible; the sixth miss ends the game
        assert!(state.game.is_game_over());
        assert_eq!(state.game.hits_taken(), 6);
        assert_eq!(game_over_frames, 1);
        assert!(state.collectibles.is_suspended());
        assert_eq!(state.collectibles.drawable().count(), 0);
    }

    #[test]
    fn test_ground_misses_can_be_ignored() {
        let mut settings = Settings::default().without_title();
        settings.collectibles.counts_ground_misses = false;
        settings.collectibles.count = 1;
        settings.collectibles.base_height = 1.0;
        settings.collectibles.speed_range = [1.0, 1.0];
        settings.hazards.count = 1;
        settings.hazards.base_height = 1.0e6;
        let mut state = SimulationState::new(9, settings, MeshBounds::default()).unwrap();

        for _ in 0..20 {
            tick(&mut state, &still(16, FAR_AWAY));
        }
        assert_eq!(state.game.hits_taken(), 0);
        assert!(!state.game.is_game_over());
    }

    #[test]
    fn test_animation_clock_follows_frames() {
        let mut state = new_state(2);
        process_input(&mut state, Some(KeyEvent::Down(Key::Forward)));
        tick(&mut state, &still(16, FAR_AWAY));
        for _ in 0..10 {
            process_input(&mut state, None);
            tick(&mut state, &still(16, FAR_AWAY));
            assert!(state.animation.is_playing());
        }
        assert_eq!(state.animation.local_time_ms(), 160.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(99999);
        let mut b = new_state(99999);

        for i in 0..600 {
            let input = still(16, Vec3::new((i % 40) as f32 - 20.0, 0.0, 0.0));
            let ea = tick(&mut a, &input);
            let eb = tick(&mut b, &input);
            assert_eq!(ea, eb);
        }
        assert_eq!(a.collectibles.entities(), b.collectibles.entities());
        assert_eq!(a.hazards.entities(), b.hazards.entities());
        assert_eq!(a.game.hits_taken(), b.game.hits_taken());
    }
}

use bevy::{prelude::*, window::PrimaryWindow};

use crate::{
    actions::{MoveTo, OnArrival},
    config::GameConfig,
    physics::{BodyShape, Category, CollisionBody},
    play_scene::Player,
    scenes::{GameScene, PlaySet},
    sprites::SpriteAssets,
};

pub struct ShootingPlugin;

impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_fire).add_systems(
            Update,
            read_release_system
                .in_set(PlaySet::Input)
                .run_if(in_state(GameScene::Play)),
        );
    }
}

/// Asks the player to shoot toward `target`, in scene coordinates.
#[derive(Event, Clone, Copy, Debug)]
pub struct Fire {
    pub target: Vec2,
}

#[derive(Component)]
pub struct Projectile;

/// A shot that passed the aiming rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub direction: Vec2,
    pub destination: Vec2,
}

/// Works out where a shot from `origin` toward `target` ends up.
///
/// Returns None when the target is behind the player (`target.x < origin.x`)
/// or exactly on it, since there is no direction to shoot in.
pub fn aim_shot(origin: Vec2, target: Vec2, distance: f32) -> Option<Shot> {
    let offset = target - origin;
    if offset.x < 0.0 {
        return None;
    }
    let direction = offset.try_normalize()?;
    Some(Shot {
        direction,
        destination: origin + direction * distance,
    })
}

/// Turns the first touch (or left click) released this frame into a Fire event.
fn read_release_system(
    mut commands: Commands,
    touches: Res<Touches>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
) {
    let screen_point = match touches.iter_just_released().next() {
        Some(touch) => Some(touch.position()),
        None if mouse.just_released(MouseButton::Left) => windows
            .single()
            .ok()
            .and_then(|window| window.cursor_position()),
        None => None,
    };
    let Some(screen_point) = screen_point else {
        return;
    };

    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    // Before the first render the camera doesn't know its target size yet
    if let Ok(target) = camera.viewport_to_world_2d(camera_transform, screen_point) {
        commands.trigger(Fire { target });
    }
}

fn on_fire(
    fire: On<Fire>,
    mut commands: Commands,
    player: Query<&Transform, With<Player>>,
    config: Res<GameConfig>,
    sprites: Res<SpriteAssets>,
) {
    let Ok(player_transform) = player.single() else {
        return;
    };
    let origin = player_transform.translation.truncate();

    let Some(shot) = aim_shot(origin, fire.target, config.shot_distance) else {
        debug!(at = ?fire.target, "Shot rejected");
        return;
    };
    debug!(?shot, "Firing");

    let size = config.projectile_size.as_vec2();
    commands.spawn((
        Projectile,
        SpriteAssets::sized(&sprites.projectile, size),
        Transform::from_translation(origin.extend(1.0)),
        CollisionBody {
            shape: BodyShape::circle(size.x / 2.0),
            category: Category::PROJECTILE,
            contact_test: Category::MONSTER,
        },
        MoveTo::new(
            origin,
            shot.destination,
            config.projectile_travel_secs,
            OnArrival::Despawn,
        ),
        DespawnOnExit(GameScene::Play),
    ));
}

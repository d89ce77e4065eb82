use bevy::prelude::*;

use crate::{
    config::GameConfig,
    scenes::GameScene,
    sprites::SpriteAssets,
    transition::{flipped_out, FlipReveal},
};

pub struct PlayScenePlugin;

impl Plugin for PlayScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::WHITE))
            .add_systems(Startup, spawn_camera)
            .add_systems(OnEnter(GameScene::Play), spawn_player);
    }
}

/// The ninja. Purely visual: it has no body and can't be hit.
/// Shots start from its position.
#[derive(Component)]
pub struct Player;

/// Where the player stands: 10% in from the left, halfway up.
pub fn player_position(scene_size: Vec2) -> Vec2 {
    Vec2::new(scene_size.x * 0.1, scene_size.y * 0.5)
}

/// The camera looks at the middle of the scene, so world coordinates run from
/// (0, 0) bottom-left to (width, height) top-right.
fn spawn_camera(mut commands: Commands, config: Res<GameConfig>) {
    let center = config.scene_size() / 2.0;
    commands.spawn((Camera2d, Transform::from_xyz(center.x, center.y, 0.0)));
}

fn spawn_player(mut commands: Commands, config: Res<GameConfig>, sprites: Res<SpriteAssets>) {
    let position = player_position(config.scene_size());
    commands.spawn((
        Player,
        SpriteAssets::sized(&sprites.player, config.player_size.as_vec2()),
        flipped_out(position.extend(1.0)),
        FlipReveal::new(config.transition_secs),
        DespawnOnExit(GameScene::Play),
    ));
}

// main.rs - Ninja Attack: a tiny 2D shooter.
//
// A ninja on the left throws shurikens wherever you tap (or click). Monsters
// walk in from the right. Let one reach the left edge and you lose; take out
// enough of them and you win. Either way a result screen shows for a few
// seconds and a new round starts.
//
// Flow is driven by the GameScene state (see scenes.rs):
//   Play: player, monster spawner, shooting, contacts
//   End:  result text, countdown back to Play

use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            // Config goes first: everything below reads GameConfig, and it
            // sets the window's title and size
            config::ConfigPlugin,
            sprites::SpritesPlugin,
            scenes::ScenePlugin,
            play_scene::PlayScenePlugin,
            spawn_monsters::SpawnMonstersPlugin,
            shooting::ShootingPlugin,
            actions::ActionsPlugin,
            physics::PhysicsPlugin,
            combat::CombatPlugin,
            end_scene::EndScenePlugin,
            transition::TransitionPlugin,
        ))
        .run();
}

mod actions;
mod combat;
mod config;
mod end_scene;
mod physics;
mod play_scene;
mod scenes;
mod shooting;
mod spawn_monsters;
mod sprites;
mod transition;

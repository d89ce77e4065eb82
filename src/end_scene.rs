use bevy::prelude::*;

use crate::{
    config::GameConfig,
    scenes::{GameScene, Session},
    transition::{flipped_out, FlipReveal},
};

pub struct EndScenePlugin;

impl Plugin for EndScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameScene::End), show_result_system)
            .add_systems(OnExit(GameScene::End), clear_end_timer_system)
            .add_systems(
                Update,
                end_timer_system.run_if(in_state(GameScene::End).and(resource_exists::<EndTimer>)),
            );
    }
}

/// Counts down the result screen before a new session starts.
#[derive(Resource)]
pub struct EndTimer(pub Timer);

/// Marker so the result text can be found while the end screen is up.
#[derive(Component)]
pub struct ResultText;

pub fn result_message(won: bool) -> &'static str {
    if won {
        "You Won!"
    } else {
        "You Lose :["
    }
}

fn show_result_system(mut commands: Commands, session: Res<Session>, config: Res<GameConfig>) {
    // A session only ends with an outcome; treat anything else as a loss
    let won = session.outcome.unwrap_or(false);
    let center = config.scene_size() / 2.0;

    commands.spawn((
        ResultText,
        Text2d::new(result_message(won)),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::BLACK),
        flipped_out(center.extend(1.0)),
        FlipReveal::new(config.transition_secs),
        DespawnOnExit(GameScene::End),
    ));

    commands.insert_resource(EndTimer(Timer::from_seconds(
        config.end_screen_secs,
        TimerMode::Once,
    )));
}

fn end_timer_system(
    mut timer: ResMut<EndTimer>,
    mut next_scene: ResMut<NextState<GameScene>>,
    time: Res<Time>,
) {
    timer.0.tick(time.delta());

    if timer.0.just_finished() {
        next_scene.set(GameScene::Play);
    }
}

fn clear_end_timer_system(mut commands: Commands) {
    commands.remove_resource::<EndTimer>();
}

use std::time::Duration;

use bevy::prelude::*;

use crate::scenes::{end_session, GameScene, PlaySet, Session};

pub struct ActionsPlugin;

impl Plugin for ActionsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            move_to_system
                .in_set(PlaySet::Actions)
                .run_if(in_state(GameScene::Play)),
        );
    }
}

/// Straight-line move from `from` to `to` over the timer's duration,
/// followed by `on_arrival` once the destination is reached.
#[derive(Component, Debug)]
pub struct MoveTo {
    pub from: Vec2,
    pub to: Vec2,
    pub timer: Timer,
    pub on_arrival: OnArrival,
    /// Where the entity was before the latest `advance`. Contact detection
    /// sweeps from here so fast movers can't skip over a body.
    pub previous: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnArrival {
    /// Remove the entity quietly (a shot that missed).
    Despawn,
    /// Remove the entity and end the session (a monster that got through).
    EndSession { won: bool },
}

impl MoveTo {
    pub fn new(from: Vec2, to: Vec2, secs: f32, on_arrival: OnArrival) -> Self {
        MoveTo {
            from,
            to,
            timer: Timer::from_seconds(secs, TimerMode::Once),
            on_arrival,
            previous: from,
        }
    }

    /// Advances the move and returns the new position.
    pub fn advance(&mut self, delta: Duration) -> Vec2 {
        self.previous = self.position();
        self.timer.tick(delta);
        self.position()
    }

    pub fn position(&self) -> Vec2 {
        self.from.lerp(self.to, self.timer.fraction())
    }

    pub fn arrived(&self) -> bool {
        self.timer.just_finished()
    }
}

fn move_to_system(
    mut commands: Commands,
    mut movers: Query<(Entity, &mut Transform, &mut MoveTo)>,
    mut session: ResMut<Session>,
    mut next_scene: ResMut<NextState<GameScene>>,
    time: Res<Time>,
) {
    for (entity, mut transform, mut move_to) in movers.iter_mut() {
        let position = move_to.advance(time.delta());
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        if !move_to.arrived() {
            continue;
        }

        commands.entity(entity).despawn();
        match move_to.on_arrival {
            OnArrival::Despawn => {}
            OnArrival::EndSession { won } => {
                end_session(&mut session, &mut next_scene, won);
            }
        }
    }
}

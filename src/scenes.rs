// scenes.rs - The two screens of the game and the session that links them.
//
// Play -> (monster escapes, or enough kills) -> End -> (timer) -> Play
//
// Everything spawned for a scene carries DespawnOnExit(scene), so leaving a
// scene throws away its monsters, projectiles and their pending MoveTo actions.

use bevy::prelude::*;

use crate::config::GameConfig;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameScene>()
            .init_resource::<Session>()
            .configure_sets(
                Update,
                (
                    PlaySet::Input,
                    PlaySet::Spawn,
                    PlaySet::Actions,
                    PlaySet::Contacts,
                )
                    .chain(),
            )
            .add_systems(OnEnter(GameScene::Play), start_session_system);
    }
}

#[derive(States, Clone, Copy, Default, Eq, PartialEq, Debug, Hash)]
pub enum GameScene {
    #[default]
    Play,
    End,
}

/// Ordering of the play scene's per-frame work: input, spawning, actions, contacts.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaySet {
    Input,
    Spawn,
    Actions,
    Contacts,
}

/// State of the current play session.
#[derive(Resource, Debug, Default)]
pub struct Session {
    pub kills: u32,
    /// Some(true) = won, Some(false) = lost, None = still playing.
    /// The first result of a session sticks.
    pub outcome: Option<bool>,
}

impl Session {
    /// Prepares the counter for a new session.
    pub fn reset(&mut self, keep_kills: bool) {
        if !keep_kills {
            self.kills = 0;
        }
        self.outcome = None;
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Records the result. Returns false if the session was already decided.
    pub fn conclude(&mut self, won: bool) -> bool {
        if self.is_over() {
            return false;
        }
        self.outcome = Some(won);
        true
    }
}

/// Ends the session and queues the switch to the end screen.
/// Later calls in the same session do nothing.
pub fn end_session(session: &mut Session, next_scene: &mut NextState<GameScene>, won: bool) {
    if session.conclude(won) {
        info!(won, kills = session.kills, "Session over");
        next_scene.set(GameScene::End);
    }
}

fn start_session_system(mut session: ResMut<Session>, config: Res<GameConfig>) {
    session.reset(config.keep_kills_between_sessions);
    info!(kills = session.kills, "New session");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[test]
    fn first_outcome_sticks() {
        let mut session = Session::default();
        assert!(session.conclude(false));
        assert!(!session.conclude(true));
        assert_eq!(session.outcome, Some(false));
    }

    #[test]
    fn reset_clears_kills_unless_kept() {
        let mut session = Session {
            kills: 3,
            outcome: Some(true),
        };
        session.reset(true);
        assert_eq!(session.kills, 3);
        assert!(!session.is_over());

        session.reset(false);
        assert_eq!(session.kills, 0);
    }

    fn scene_app(config: GameConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, ScenePlugin))
            .insert_resource(config);
        app
    }

    #[test]
    fn entering_play_resets_the_session() {
        let mut app = scene_app(GameConfig::default());
        app.insert_resource(Session {
            kills: 7,
            outcome: Some(true),
        });

        app.update();

        let session = app.world().resource::<Session>();
        assert_eq!(session.kills, 0);
        assert_eq!(session.outcome, None);
    }

    #[test]
    fn kills_carry_over_when_configured() {
        let mut app = scene_app(GameConfig {
            keep_kills_between_sessions: true,
            ..default()
        });
        app.insert_resource(Session {
            kills: 1,
            outcome: Some(false),
        });

        app.update();

        let session = app.world().resource::<Session>();
        assert_eq!(session.kills, 1);
        assert_eq!(session.outcome, None);
    }
}

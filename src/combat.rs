use bevy::prelude::*;

use crate::{
    config::GameConfig,
    physics::{Category, ContactBegan},
    scenes::{end_session, GameScene, Session},
};

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_contact_began);
    }
}

/// A projectile touched a monster: both go away and the kill counts.
/// Enough kills wins the session.
///
/// The contact detector reports each entity at most once per step, so the
/// despawns here can't double up.
fn on_contact_began(
    contact: On<ContactBegan>,
    mut commands: Commands,
    mut session: ResMut<Session>,
    mut next_scene: ResMut<NextState<GameScene>>,
    config: Res<GameConfig>,
) {
    let (first, second) = contact.ordered();
    if first.category & Category::MONSTER == Category::NONE
        || second.category & Category::PROJECTILE == Category::NONE
    {
        return;
    }

    commands.entity(first.entity).despawn();
    commands.entity(second.entity).despawn();
    session.kills += 1;
    info!(kills = session.kills, "Monster destroyed");

    if session.kills >= config.kills_to_win {
        end_session(&mut session, &mut next_scene, true);
    }
}

use bevy::prelude::*;
use rand::Rng;

use crate::{
    actions::{MoveTo, OnArrival},
    config::GameConfig,
    physics::{BodyShape, Category, CollisionBody},
    scenes::{GameScene, PlaySet},
    sprites::SpriteAssets,
};

pub struct SpawnMonstersPlugin;

impl Plugin for SpawnMonstersPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameScene::Play), start_monster_spawning_system)
            .add_systems(OnExit(GameScene::Play), stop_monster_spawning_system)
            .add_systems(
                Update,
                spawn_monsters_system
                    .in_set(PlaySet::Spawn)
                    .run_if(in_state(GameScene::Play).and(resource_exists::<MonsterSpawnTimer>)),
            );
    }
}

#[derive(Component)]
pub struct Monster;

/// Fires once per spawn interval while the play scene is running.
#[derive(Resource)]
pub struct MonsterSpawnTimer(pub Timer);

/// Where a monster enters, where it leaves, and how long the crossing takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterPlan {
    pub start: Vec2,
    pub end: Vec2,
    pub duration_secs: f32,
}

/// Rolls a monster that enters just past the right edge at a random height
/// (fully on screen vertically) and walks straight to just past the left edge.
pub fn plan_monster<R: Rng + ?Sized>(
    rng: &mut R,
    scene_size: Vec2,
    monster_size: Vec2,
    min_secs: f32,
    max_secs: f32,
) -> MonsterPlan {
    let half = monster_size / 2.0;

    let min_y = half.y;
    let max_y = scene_size.y - half.y;
    // A scene shorter than the monster leaves no valid band; use the middle.
    let y = if min_y < max_y {
        rng.gen_range(min_y..=max_y)
    } else {
        scene_size.y / 2.0
    };

    let duration_secs = if min_secs < max_secs {
        rng.gen_range(min_secs..=max_secs)
    } else {
        min_secs
    };

    MonsterPlan {
        start: Vec2::new(scene_size.x + half.x, y),
        end: Vec2::new(-half.x, y),
        duration_secs,
    }
}

fn start_monster_spawning_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    sprites: Res<SpriteAssets>,
) {
    // The first monster shows up right away, then one per interval
    spawn_monster(&mut commands, &config, &sprites);
    commands.insert_resource(MonsterSpawnTimer(Timer::from_seconds(
        config.spawn_interval_secs,
        TimerMode::Repeating,
    )));
}

fn stop_monster_spawning_system(mut commands: Commands) {
    commands.remove_resource::<MonsterSpawnTimer>();
}

fn spawn_monsters_system(
    mut commands: Commands,
    mut timer: ResMut<MonsterSpawnTimer>,
    config: Res<GameConfig>,
    sprites: Res<SpriteAssets>,
    time: Res<Time>,
) {
    timer.0.tick(time.delta());

    // A long frame can cover more than one interval
    for _ in 0..timer.0.times_finished_this_tick() {
        spawn_monster(&mut commands, &config, &sprites);
    }
}

fn spawn_monster(commands: &mut Commands, config: &GameConfig, sprites: &SpriteAssets) {
    let mut rng = rand::thread_rng();
    let size = config.monster_size.as_vec2();
    let plan = plan_monster(
        &mut rng,
        config.scene_size(),
        size,
        config.monster_min_secs,
        config.monster_max_secs,
    );
    debug!(?plan, "Spawning monster");

    commands.spawn((
        Monster,
        SpriteAssets::sized(&sprites.monster, size),
        Transform::from_translation(plan.start.extend(1.0)),
        CollisionBody {
            shape: BodyShape::rect(size),
            category: Category::MONSTER,
            contact_test: Category::PROJECTILE,
        },
        MoveTo::new(
            plan.start,
            plan.end,
            plan.duration_secs,
            OnArrival::EndSession { won: false },
        ),
        DespawnOnExit(GameScene::Play),
    ));
}

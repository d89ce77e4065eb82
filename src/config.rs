use bevy::{prelude::*, window::PrimaryWindow};
use serde::{Deserialize, Serialize};

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        // Must be added after DefaultPlugins so the load is logged.
        let config = storage::load().map(GameConfig::sanitized).unwrap_or_default();
        app.insert_resource(config)
            .add_systems(Startup, apply_window_config);
    }
}

/// Width and height of a sprite, in scene units.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpriteSize {
    pub width: f32,
    pub height: f32,
}

impl SpriteSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Tunables for the whole game, read from a RON file at startup.
///
/// Every field is `#[serde(default)]`, so a config file only needs to name
/// the values it changes:
///
/// ```ron
/// (kills_to_win: 5, monster_min_secs: 1.5)
/// ```
#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    /// Logical window size. The scene uses the same units, origin bottom-left.
    pub width: u32,
    pub height: u32,

    pub spawn_interval_secs: f32,
    pub monster_min_secs: f32,
    pub monster_max_secs: f32,

    pub projectile_travel_secs: f32,
    /// How far past the player a shot travels; large enough to leave the screen.
    pub shot_distance: f32,

    pub kills_to_win: u32,
    /// When false the kill counter starts from zero every session.
    pub keep_kills_between_sessions: bool,

    pub end_screen_secs: f32,
    pub transition_secs: f32,

    pub player_size: SpriteSize,
    pub monster_size: SpriteSize,
    /// Projectiles collide as a circle of radius `projectile_size.width / 2`.
    pub projectile_size: SpriteSize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Ninja Attack".to_string(),
            width: 480,
            height: 320,
            spawn_interval_secs: 1.0,
            monster_min_secs: 2.0,
            monster_max_secs: 4.0,
            projectile_travel_secs: 2.0,
            shot_distance: 1000.0,
            kills_to_win: 2,
            keep_kills_between_sessions: false,
            end_screen_secs: 3.0,
            transition_secs: 0.5,
            player_size: SpriteSize::new(27.0, 40.0),
            monster_size: SpriteSize::new(24.0, 40.0),
            projectile_size: SpriteSize::new(14.0, 14.0),
        }
    }
}

impl GameConfig {
    pub fn scene_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Replaces values the game can't run with by their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = GameConfig::default();

        if self.width == 0 || self.height == 0 {
            warn!(
                "Config has an empty scene ({}x{}). Using {}x{}.",
                self.width, self.height, defaults.width, defaults.height
            );
            self.width = defaults.width;
            self.height = defaults.height;
        }

        for (name, value, default) in [
            (
                "spawn_interval_secs",
                &mut self.spawn_interval_secs,
                defaults.spawn_interval_secs,
            ),
            (
                "projectile_travel_secs",
                &mut self.projectile_travel_secs,
                defaults.projectile_travel_secs,
            ),
            ("shot_distance", &mut self.shot_distance, defaults.shot_distance),
            ("end_screen_secs", &mut self.end_screen_secs, defaults.end_screen_secs),
        ] {
            if !(*value > 0.0) {
                warn!("Config value {name} = {value} must be positive. Using {default}.");
                *value = default;
            }
        }

        // A zero-length flip is fine, it just shows the scene immediately.
        if !(self.transition_secs >= 0.0) {
            warn!(
                "Config value transition_secs = {} is negative. Using {}.",
                self.transition_secs, defaults.transition_secs
            );
            self.transition_secs = defaults.transition_secs;
        }

        if !(self.monster_min_secs > 0.0 && self.monster_min_secs <= self.monster_max_secs) {
            warn!(
                "Config monster duration range {}..={} is invalid. Using {}..={}.",
                self.monster_min_secs,
                self.monster_max_secs,
                defaults.monster_min_secs,
                defaults.monster_max_secs
            );
            self.monster_min_secs = defaults.monster_min_secs;
            self.monster_max_secs = defaults.monster_max_secs;
        }

        if self.kills_to_win == 0 {
            warn!("Config kills_to_win = 0 would win instantly. Using {}.", defaults.kills_to_win);
            self.kills_to_win = defaults.kills_to_win;
        }

        for (name, size, default) in [
            ("player_size", &mut self.player_size, defaults.player_size),
            ("monster_size", &mut self.monster_size, defaults.monster_size),
            ("projectile_size", &mut self.projectile_size, defaults.projectile_size),
        ] {
            if !size.is_valid() {
                warn!("Config value {name} = {size:?} must be positive. Using {default:?}.");
                *size = default;
            }
        }

        self
    }
}

/// Parses a RON config document.
pub fn parse(contents: &str) -> Result<GameConfig, ron::error::SpannedError> {
    ron::from_str::<GameConfig>(contents)
}

fn apply_window_config(
    config: Res<GameConfig>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    window.title = config.title.clone();
    window.resolution.set(config.width as f32, config.height as f32);
    window.resizable = false;
}

// =============================================================================
// Storage backend: Native (macOS, Linux, Windows)
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod storage {
    use std::path::PathBuf;

    use super::{parse, GameConfig};
    use bevy::prelude::*;

    const LOCAL_FILE: &str = "ninja_attack.ron";

    /// A file next to the working directory wins over the per-user one.
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("ninja-attack").join("config.ron"));
        }
        paths
    }

    /// Reads GameConfig from the first config file found, or returns None.
    pub fn load() -> Option<GameConfig> {
        let Some(path) = candidate_paths().into_iter().find(|path| path.exists()) else {
            info!("No config file found. Using default settings.");
            return None;
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match parse(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}: {:?}", path, config);
                    Some(config)
                }
                Err(e) => {
                    error!("Failed to parse config file {:?}: {}. Using defaults.", path, e);
                    None
                }
            },
            Err(e) => {
                error!("Failed to read config file {:?}: {}. Using defaults.", path, e);
                None
            }
        }
    }
}

// =============================================================================
// Storage backend: WASM (browser). There is no file to read.
// =============================================================================

#[cfg(target_arch = "wasm32")]
mod storage {
    use super::GameConfig;
    use bevy::prelude::*;

    pub fn load() -> Option<GameConfig> {
        info!("Config files are not supported on the web. Using default settings.");
        None
    }
}

use bevy::prelude::*;

pub struct SpritesPlugin;

impl Plugin for SpritesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_sprites);
    }
}

/// Image handles shared by every scene, so each spawn doesn't hit the asset server.
#[derive(Resource, Default)]
pub struct SpriteAssets {
    pub player: Handle<Image>,
    pub monster: Handle<Image>,
    pub projectile: Handle<Image>,
}

impl SpriteAssets {
    /// A sprite drawn at `size`, whatever the image's own dimensions are.
    /// Keeps what you see in line with the collision bodies.
    pub fn sized(image: &Handle<Image>, size: Vec2) -> Sprite {
        Sprite {
            image: image.clone(),
            custom_size: Some(size),
            ..default()
        }
    }
}

fn load_sprites(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SpriteAssets {
        player: asset_server.load("sprites/player.png"),
        monster: asset_server.load("sprites/monster.png"),
        projectile: asset_server.load("sprites/projectile.png"),
    });
}

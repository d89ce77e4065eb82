use bevy::prelude::*;

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, flip_reveal_system);
    }
}

/// Horizontal flip-in played when a scene appears: the entity's x scale grows
/// from 0 to 1 over the timer.
#[derive(Component)]
pub struct FlipReveal {
    pub timer: Timer,
}

impl FlipReveal {
    pub fn new(secs: f32) -> Self {
        FlipReveal {
            timer: Timer::from_seconds(secs, TimerMode::Once),
        }
    }

    pub fn scale_x(&self) -> f32 {
        EaseFunction::CubicOut.sample_clamped(self.timer.fraction())
    }
}

/// Transform for something that starts edge-on and flips in.
pub fn flipped_out(translation: Vec3) -> Transform {
    Transform::from_translation(translation).with_scale(Vec3::new(0.0, 1.0, 1.0))
}

fn flip_reveal_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut Transform, &mut FlipReveal)>,
    time: Res<Time>,
) {
    for (entity, mut transform, mut reveal) in query.iter_mut() {
        reveal.timer.tick(time.delta());

        if reveal.timer.just_finished() {
            // Snap to full width and stop animating
            transform.scale.x = 1.0;
            commands.entity(entity).remove::<FlipReveal>();
        } else {
            transform.scale.x = reveal.scale_x();
        }
    }
}

// physics.rs - Just enough 2D physics for the game: category bitmasks,
// rectangle/circle bodies, and a "contact began" event.
//
// There is no gravity and no collision response. Bodies are moved by their
// MoveTo actions; this module only reports when two relevant bodies start
// overlapping. Reactions live in observers (see combat.rs).
//
// Bodies are swept along the straight line their MoveTo covered this step, so
// a long frame can't carry a shot through a monster unnoticed.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::{
    actions::MoveTo,
    scenes::{GameScene, PlaySet},
};

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            detect_contacts_system
                .in_set(PlaySet::Contacts)
                .run_if(in_state(GameScene::Play)),
        );
    }
}

/// Collision categories. A body belongs to one category and lists which
/// categories it wants contact events for.
pub struct Category;

impl Category {
    pub const NONE: u32 = 0;
    pub const MONSTER: u32 = 0b1;
    pub const PROJECTILE: u32 = 0b10;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyShape {
    Rect { half_extents: Vec2 },
    Circle { radius: f32 },
}

impl BodyShape {
    pub fn rect(size: Vec2) -> Self {
        BodyShape::Rect {
            half_extents: size / 2.0,
        }
    }

    pub fn circle(radius: f32) -> Self {
        BodyShape::Circle { radius }
    }

    /// Half size of the axis-aligned box around the shape.
    fn half_bounds(self) -> Vec2 {
        match self {
            BodyShape::Rect { half_extents } => half_extents,
            BodyShape::Circle { radius } => Vec2::splat(radius),
        }
    }
}

/// Returns true when `a` centered at `pos_a` overlaps `b` centered at `pos_b`.
/// Touching edges count as overlapping.
pub fn shapes_overlap(a: BodyShape, pos_a: Vec2, b: BodyShape, pos_b: Vec2) -> bool {
    match (a, b) {
        (BodyShape::Rect { half_extents: ha }, BodyShape::Rect { half_extents: hb }) => {
            let delta = (pos_a - pos_b).abs();
            delta.x <= ha.x + hb.x && delta.y <= ha.y + hb.y
        }
        (BodyShape::Circle { radius: ra }, BodyShape::Circle { radius: rb }) => {
            pos_a.distance_squared(pos_b) <= (ra + rb) * (ra + rb)
        }
        (BodyShape::Rect { half_extents }, BodyShape::Circle { radius }) => {
            rect_circle_overlap(pos_a, half_extents, pos_b, radius)
        }
        (BodyShape::Circle { radius }, BodyShape::Rect { half_extents }) => {
            rect_circle_overlap(pos_b, half_extents, pos_a, radius)
        }
    }
}

fn rect_circle_overlap(rect_center: Vec2, half_extents: Vec2, circle_center: Vec2, radius: f32) -> bool {
    // Closest point of the rectangle to the circle's center
    let closest = circle_center.clamp(rect_center - half_extents, rect_center + half_extents);
    closest.distance_squared(circle_center) <= radius * radius
}

/// Returns true when `a` and `b` touch at any point while each moves in a
/// straight line from its first path point to its second during one step.
///
/// Circles against circles are swept exactly. Any pair with a rectangle
/// sweeps against the combined bounding box, which is slightly generous
/// around a circle's corners while in motion.
pub fn paths_meet(a: BodyShape, a_path: (Vec2, Vec2), b: BodyShape, b_path: (Vec2, Vec2)) -> bool {
    if shapes_overlap(a, a_path.1, b, b_path.1) {
        return true;
    }

    // Hold b still at the origin and move a by the relative motion
    let start = a_path.0 - b_path.0;
    let end = a_path.1 - b_path.1;
    if start == end {
        return false;
    }
    match (a, b) {
        (BodyShape::Circle { radius: ra }, BodyShape::Circle { radius: rb }) => {
            closest_on_segment(start, end).length_squared() <= (ra + rb) * (ra + rb)
        }
        _ => segment_hits_box(start, end, a.half_bounds() + b.half_bounds()),
    }
}

/// Point of the segment `start..end` closest to the origin.
fn closest_on_segment(start: Vec2, end: Vec2) -> Vec2 {
    let delta = end - start;
    let length_squared = delta.length_squared();
    if length_squared == 0.0 {
        return start;
    }
    let t = (-start.dot(delta) / length_squared).clamp(0.0, 1.0);
    start + delta * t
}

/// Slab test of the segment `start..end` against the box centered on the
/// origin with the given half extents.
fn segment_hits_box(start: Vec2, end: Vec2, half_extents: Vec2) -> bool {
    let delta = end - start;
    let (mut t_enter, mut t_exit) = (0.0_f32, 1.0_f32);

    for axis in 0..2 {
        let (from, step, half) = (start[axis], delta[axis], half_extents[axis]);
        if step == 0.0 {
            if from.abs() > half {
                return false;
            }
            continue;
        }
        let near = (-half - from) / step;
        let far = (half - from) / step;
        t_enter = t_enter.max(near.min(far));
        t_exit = t_exit.min(near.max(far));
        if t_enter > t_exit {
            return false;
        }
    }
    true
}

#[derive(Component, Clone, Copy, Debug)]
pub struct CollisionBody {
    pub shape: BodyShape,
    pub category: u32,
    pub contact_test: u32,
}

impl CollisionBody {
    /// A contact is reported if either body asked to hear about the other.
    pub fn wants_contact_with(&self, other: &CollisionBody) -> bool {
        self.contact_test & other.category != 0 || other.contact_test & self.category != 0
    }
}

/// Triggered once when two bodies start touching.
#[derive(Event, Clone, Copy, Debug)]
pub struct ContactBegan {
    pub a: ContactBody,
    pub b: ContactBody,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactBody {
    pub entity: Entity,
    pub category: u32,
}

impl ContactBegan {
    /// The two bodies with the lower category first.
    pub fn ordered(&self) -> (ContactBody, ContactBody) {
        if self.a.category < self.b.category {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// Pairwise overlap check over every body. A pair fires ContactBegan only on
/// the step it starts touching. Within a step, each entity is reported in at
/// most one new contact, so whoever reacts can despawn both safely.
///
/// Bodies with a MoveTo are swept from where they were before this step's
/// move. Other bodies are tested where they stand.
fn detect_contacts_system(
    bodies: Query<(Entity, &CollisionBody, &Transform, Option<&MoveTo>)>,
    mut touching: Local<HashSet<(Entity, Entity)>>,
    mut commands: Commands,
) {
    let snapshot: Vec<(Entity, CollisionBody, (Vec2, Vec2))> = bodies
        .iter()
        .map(|(entity, body, transform, move_to)| {
            let now = transform.translation.truncate();
            let before = move_to.map_or(now, |move_to| move_to.previous);
            (entity, *body, (before, now))
        })
        .collect();

    let mut still_touching = HashSet::new();
    let mut claimed: HashSet<Entity> = HashSet::new();

    for i in 0..snapshot.len() {
        for j in (i + 1)..snapshot.len() {
            let (entity_a, body_a, path_a) = snapshot[i];
            let (entity_b, body_b, path_b) = snapshot[j];

            if !body_a.wants_contact_with(&body_b)
                || !paths_meet(body_a.shape, path_a, body_b.shape, path_b)
            {
                continue;
            }

            let key = (entity_a.min(entity_b), entity_a.max(entity_b));
            if touching.contains(&key) {
                still_touching.insert(key);
                continue;
            }
            // Left unrecorded so the pair is reported next step if both survive.
            if claimed.contains(&entity_a) || claimed.contains(&entity_b) {
                continue;
            }
            still_touching.insert(key);
            claimed.insert(entity_a);
            claimed.insert(entity_b);

            commands.trigger(ContactBegan {
                a: ContactBody {
                    entity: entity_a,
                    category: body_a.category,
                },
                b: ContactBody {
                    entity: entity_b,
                    category: body_b.category,
                },
            });
        }
    }

    *touching = still_touching;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    use crate::actions::OnArrival;

    #[test]
    fn rects_overlap_on_each_axis() {
        let a = BodyShape::rect(Vec2::new(24.0, 40.0));
        assert!(shapes_overlap(a, Vec2::ZERO, a, Vec2::new(23.0, 0.0)));
        assert!(shapes_overlap(a, Vec2::ZERO, a, Vec2::new(24.0, 40.0)));
        assert!(!shapes_overlap(a, Vec2::ZERO, a, Vec2::new(10.0, 41.0)));
    }

    #[test]
    fn circles_overlap_by_distance() {
        let c = BodyShape::circle(7.0);
        assert!(shapes_overlap(c, Vec2::ZERO, c, Vec2::new(9.0, 9.0)));
        assert!(!shapes_overlap(c, Vec2::ZERO, c, Vec2::new(10.0, 10.5)));
    }

    #[test]
    fn circle_near_rect_corner() {
        let rect = BodyShape::rect(Vec2::new(20.0, 20.0));
        let circle = BodyShape::circle(5.0);
        // Corner at (10, 10); circle center 3,3 away is inside its radius
        assert!(shapes_overlap(rect, Vec2::ZERO, circle, Vec2::new(13.0, 13.0)));
        // 4,4 away is ~5.66 > 5
        assert!(!shapes_overlap(circle, Vec2::new(14.0, 14.0), rect, Vec2::ZERO));
        // Straight out from an edge
        assert!(shapes_overlap(circle, Vec2::new(15.0, 0.0), rect, Vec2::ZERO));
    }

    #[test]
    fn fast_circle_sweeps_through_a_rect() {
        let monster = BodyShape::rect(Vec2::new(24.0, 40.0));
        let shot = BodyShape::circle(7.0);
        let still = (Vec2::new(100.0, 160.0), Vec2::new(100.0, 160.0));

        // 125 units in one step, clean past the monster on both ends
        let through = (Vec2::new(32.0, 160.0), Vec2::new(157.0, 160.0));
        assert!(!shapes_overlap(shot, through.1, monster, still.1));
        assert!(paths_meet(shot, through, monster, still));
        assert!(paths_meet(monster, still, shot, through));

        // Same distance, but passing well above it
        let above = (Vec2::new(32.0, 200.0), Vec2::new(157.0, 200.0));
        assert!(!paths_meet(shot, above, monster, still));
    }

    #[test]
    fn sweep_uses_relative_motion() {
        let monster = BodyShape::rect(Vec2::new(24.0, 40.0));
        let shot = BodyShape::circle(7.0);

        // Both move right at the same speed, so the gap never closes
        let shot_path = (Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        let monster_path = (Vec2::new(50.0, 0.0), Vec2::new(150.0, 0.0));
        assert!(!paths_meet(shot, shot_path, monster, monster_path));

        // Moving toward each other they cross in the middle
        let monster_path = (Vec2::new(150.0, 0.0), Vec2::new(-20.0, 0.0));
        assert!(paths_meet(shot, shot_path, monster, monster_path));
    }

    #[test]
    fn circles_sweep_by_closest_approach() {
        let c = BodyShape::circle(7.0);
        let still = (Vec2::ZERO, Vec2::ZERO);
        assert!(paths_meet(c, (Vec2::new(-50.0, 13.0), Vec2::new(50.0, 13.0)), c, still));
        assert!(!paths_meet(c, (Vec2::new(-50.0, 15.0), Vec2::new(50.0, 15.0)), c, still));
    }

    #[test]
    fn contact_masks_are_checked_both_ways() {
        let shape = BodyShape::circle(1.0);
        let monster = CollisionBody {
            shape,
            category: Category::MONSTER,
            contact_test: Category::PROJECTILE,
        };
        let projectile = CollisionBody {
            shape,
            category: Category::PROJECTILE,
            contact_test: Category::NONE,
        };
        assert!(monster.wants_contact_with(&projectile));
        assert!(projectile.wants_contact_with(&monster));
        assert!(!monster.wants_contact_with(&monster));
        assert!(!projectile.wants_contact_with(&projectile));
    }

    #[test]
    fn ordered_puts_lower_category_first() {
        let mut world = World::new();
        let monster = ContactBody {
            entity: world.spawn_empty().id(),
            category: Category::MONSTER,
        };
        let projectile = ContactBody {
            entity: world.spawn_empty().id(),
            category: Category::PROJECTILE,
        };
        let contact = ContactBegan {
            a: projectile,
            b: monster,
        };
        assert_eq!(contact.ordered(), (monster, projectile));
    }

    #[derive(Resource, Default)]
    struct Seen(Vec<ContactBegan>);

    fn record(contact: On<ContactBegan>, mut seen: ResMut<Seen>) {
        seen.0.push(*contact);
    }

    fn contact_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, PhysicsPlugin))
            .init_state::<GameScene>()
            .init_resource::<Seen>()
            .add_observer(record);
        app
    }

    fn spawn_body(app: &mut App, category: u32, contact_test: u32, at: Vec2) -> Entity {
        app.world_mut()
            .spawn((
                CollisionBody {
                    shape: BodyShape::rect(Vec2::splat(10.0)),
                    category,
                    contact_test,
                },
                Transform::from_translation(at.extend(0.0)),
            ))
            .id()
    }

    #[test]
    fn contact_fires_once_while_touching() {
        let mut app = contact_app();
        spawn_body(&mut app, Category::MONSTER, Category::PROJECTILE, Vec2::ZERO);
        spawn_body(&mut app, Category::PROJECTILE, Category::MONSTER, Vec2::new(5.0, 0.0));

        app.update();
        app.update();
        app.update();

        assert_eq!(app.world().resource::<Seen>().0.len(), 1);
    }

    #[test]
    fn contact_fires_again_after_separating() {
        let mut app = contact_app();
        spawn_body(&mut app, Category::MONSTER, Category::PROJECTILE, Vec2::ZERO);
        let projectile =
            spawn_body(&mut app, Category::PROJECTILE, Category::MONSTER, Vec2::new(5.0, 0.0));

        app.update();
        app.world_mut()
            .get_mut::<Transform>(projectile)
            .unwrap()
            .translation
            .x = 100.0;
        app.update();
        app.world_mut()
            .get_mut::<Transform>(projectile)
            .unwrap()
            .translation
            .x = 0.0;
        app.update();

        assert_eq!(app.world().resource::<Seen>().0.len(), 2);
    }

    #[test]
    fn one_projectile_claims_only_one_monster_per_step() {
        let mut app = contact_app();
        spawn_body(&mut app, Category::MONSTER, Category::PROJECTILE, Vec2::new(-4.0, 0.0));
        spawn_body(&mut app, Category::MONSTER, Category::PROJECTILE, Vec2::new(4.0, 0.0));
        spawn_body(&mut app, Category::PROJECTILE, Category::MONSTER, Vec2::ZERO);

        app.update();
        assert_eq!(app.world().resource::<Seen>().0.len(), 1);

        // Nobody despawned anything, so the other monster gets its turn
        app.update();
        assert_eq!(app.world().resource::<Seen>().0.len(), 2);
    }

    #[test]
    fn moving_body_is_swept_from_its_last_position() {
        let mut app = contact_app();
        spawn_body(&mut app, Category::MONSTER, Category::PROJECTILE, Vec2::new(100.0, 0.0));
        // Not advanced yet, so it still remembers the origin
        let move_to = MoveTo::new(Vec2::ZERO, Vec2::new(1000.0, 0.0), 1.0, OnArrival::Despawn);
        app.world_mut().spawn((
            CollisionBody {
                shape: BodyShape::circle(5.0),
                category: Category::PROJECTILE,
                contact_test: Category::MONSTER,
            },
            Transform::from_xyz(200.0, 0.0, 0.0),
            move_to,
        ));

        app.update();

        assert_eq!(app.world().resource::<Seen>().0.len(), 1);
    }

    #[test]
    fn monsters_ignore_each_other() {
        let mut app = contact_app();
        spawn_body(&mut app, Category::MONSTER, Category::PROJECTILE, Vec2::ZERO);
        spawn_body(&mut app, Category::MONSTER, Category::PROJECTILE, Vec2::ZERO);

        app.update();

        assert!(app.world().resource::<Seen>().0.is_empty());
    }
}

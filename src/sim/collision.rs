//! World-space collision between the player ship and spawned entities
//!
//! Plain AABB overlap on translated local boxes. Every alive entity touching
//! the ship deals its damage once and starts dying; there is no early exit,
//! so simultaneous hits all count.

use super::entity::{Entity, EntityId, PlayerShip};

/// What one collision sweep did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Entities that struck the player and the damage each dealt, in sweep order
    pub hits: Vec<(EntityId, f32)>,
    /// Total health removed from the player
    pub damage: f32,
}

impl CollisionOutcome {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.hits.iter().map(|&(id, _)| id)
    }

    /// Fold another sweep's results into this one
    pub fn merge(&mut self, other: CollisionOutcome) {
        self.hits.extend(other.hits);
        self.damage += other.damage;
    }
}

/// Test every alive entity against the player; apply damage and kill on overlap
pub fn sweep<'a, I>(player: &mut PlayerShip, entities: I) -> CollisionOutcome
where
    I: IntoIterator<Item = &'a mut Entity>,
{
    let player_box = player.world_bounds();
    let mut outcome = CollisionOutcome::default();

    for entity in entities {
        if !entity.is_alive() || !player_box.overlaps(&entity.world_bounds()) {
            continue;
        }
        if entity.kill() {
            player.take_damage(entity.damage);
            outcome.damage += entity.damage;
            outcome.hits.push((entity.id, entity.damage));
            log::debug!(
                "{:?} {:?} hit player for {} (health {})",
                entity.kind,
                entity.id,
                entity.damage,
                player.health
            );
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelName;
    use crate::consts::*;
    use crate::sim::bounds::Aabb;
    use crate::sim::entity::{EntityKind, Lifecycle};
    use glam::Vec3;

    fn player() -> PlayerShip {
        PlayerShip::new(Vec3::ZERO, Aabb::from_half_extents(Vec3::ONE), PLAYER_HEALTH)
    }

    fn asteroid(id: u32, pos: Vec3, damage: f32) -> Entity {
        let mut e = Entity::new(
            EntityId(id),
            EntityKind::Asteroid,
            ModelName::Asteroid1,
            Aabb::from_half_extents(Vec3::ONE),
            pos,
            Vec3::ZERO,
        );
        e.damage = damage;
        e
    }

    #[test]
    fn test_collision_damage() {
        let mut p = player();
        let mut rock = asteroid(1, Vec3::new(0.5, 0.0, 0.0), 10.0);

        let outcome = sweep(&mut p, [&mut rock]);
        assert_eq!(p.health, 90.0);
        assert_eq!(outcome.hits, vec![(EntityId(1), 10.0)]);
        assert_eq!(outcome.damage, 10.0);
        assert_eq!(
            rock.lifecycle,
            Lifecycle::Dying {
                countdown: DEATH_COUNTDOWN_TICKS
            }
        );
    }

    #[test]
    fn test_simultaneous_hits_all_apply() {
        let mut p = player();
        let mut rocks = vec![
            asteroid(1, Vec3::new(1.0, 0.0, 0.0), 10.0),
            asteroid(2, Vec3::new(-1.0, 0.0, 0.0), 15.0),
            asteroid(3, Vec3::new(0.0, 50.0, 0.0), 99.0),
        ];
        let outcome = sweep(&mut p, rocks.iter_mut());
        assert_eq!(outcome.hits, vec![(EntityId(1), 10.0), (EntityId(2), 15.0)]);
        assert_eq!(outcome.ids().collect::<Vec<_>>(), vec![EntityId(1), EntityId(2)]);
        assert_eq!(p.health, 75.0);
        assert!(rocks[2].is_alive());
    }

    #[test]
    fn test_dying_entity_deals_no_more_damage() {
        let mut p = player();
        let mut rock = asteroid(1, Vec3::ZERO, 10.0);

        sweep(&mut p, [&mut rock]);
        rock.step_lifecycle(CULL_Z);
        let second = sweep(&mut p, [&mut rock]);

        assert!(second.is_empty());
        assert_eq!(p.health, 90.0);
    }

    #[test]
    fn test_face_contact_counts() {
        let mut p = player();
        // Player box spans x in [-1, 1]; rock spans [1, 3]
        let mut rock = asteroid(1, Vec3::new(2.0, 0.0, 0.0), 5.0);
        assert_eq!(sweep(&mut p, [&mut rock]).hits.len(), 1);
    }

    #[test]
    fn test_player_position_moves_its_box() {
        let mut p = player();
        p.position = Vec3::new(0.0, 0.0, -20.0);
        let mut rock = asteroid(1, Vec3::ZERO, 5.0);
        assert!(sweep(&mut p, [&mut rock]).is_empty());
        assert!(rock.is_alive());
    }

    #[test]
    fn test_merge() {
        let mut a = CollisionOutcome {
            hits: vec![(EntityId(1), 10.0)],
            damage: 10.0,
        };
        a.merge(CollisionOutcome {
            hits: vec![(EntityId(4), 5.0)],
            damage: 5.0,
        });
        assert_eq!(a.hits, vec![(EntityId(1), 10.0), (EntityId(4), 5.0)]);
        assert_eq!(a.damage, 15.0);
    }
}

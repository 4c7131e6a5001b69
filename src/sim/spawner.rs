//! Probabilistic entity spawner
//!
//! Owns the run's RNG and the entity ID counter, so spawning is the only way
//! new entities enter the world.

use glam::{Quat, Vec3};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityId, EntityKind};
use crate::catalog::{Catalog, Prototype};
use crate::direction_or;
use crate::settings::Settings;

/// Direction used when an asteroid would otherwise have no heading
pub const FALLBACK_HEADING: Vec3 = Vec3::Z;

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    next_id: u32,
    hostile_chance: f64,
    asteroid_chance: f64,
    launch_chance: f64,
    half_extent: f32,
    spawn_z: f32,
    hostile_speed: f32,
    asteroid_speed: f32,
    max_spin: f32,
}

impl Spawner {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            hostile_chance: settings.hostile_spawn_chance,
            asteroid_chance: settings.asteroid_spawn_chance,
            launch_chance: settings.asteroid_launch_chance,
            half_extent: settings.spawn_half_extent,
            spawn_z: settings.spawn_z,
            hostile_speed: settings.hostile_speed,
            asteroid_speed: settings.asteroid_speed,
            max_spin: settings.asteroid_max_spin,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_point(&mut self) -> Vec3 {
        let e = self.half_extent;
        Vec3::new(
            self.rng.random_range(-e..=e),
            self.rng.random_range(-e..=e),
            self.spawn_z,
        )
    }

    fn pick_prototype<'a>(
        &mut self,
        catalog: &'a Catalog,
        kind: EntityKind,
    ) -> Option<&'a Prototype> {
        catalog.of_kind(kind).choose(&mut self.rng).copied()
    }

    fn instantiate(&mut self, proto: &Prototype, position: Vec3, velocity: Vec3) -> Entity {
        let id = self.allocate_id();
        let mut entity = Entity::new(
            id,
            proto.name.kind(),
            proto.name,
            proto.bounds,
            position,
            velocity,
        );
        entity.damage = proto.damage;
        entity
    }

    /// Random tumble for asteroids; cosmetic only, boxes never rotate
    fn random_spin(&mut self) -> Quat {
        if self.max_spin <= 0.0 {
            return Quat::IDENTITY;
        }
        let axis = Vec3::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        )
        .try_normalize()
        .unwrap_or(Vec3::Y);
        Quat::from_axis_angle(axis, self.rng.random_range(0.0..=self.max_spin))
    }

    /// Roll for a new hostile at the far plane
    pub fn maybe_spawn_hostile(&mut self, catalog: &Catalog) -> Option<Entity> {
        if !self.rng.random_bool(self.hostile_chance) {
            return None;
        }
        let proto = self.pick_prototype(catalog, EntityKind::Hostile)?;
        let position = self.spawn_point();
        let velocity = Vec3::new(0.0, 0.0, self.hostile_speed);
        let entity = self.instantiate(proto, position, velocity);
        log::debug!("spawned hostile {:?} ({:?}) at {}", entity.id, entity.model, position);
        Some(entity)
    }

    /// Roll for a new asteroid at the far plane, aimed at `target`
    pub fn maybe_spawn_asteroid(&mut self, catalog: &Catalog, target: Vec3) -> Option<Entity> {
        if !self.rng.random_bool(self.asteroid_chance) {
            return None;
        }
        let position = self.spawn_point();
        self.asteroid(catalog, position, target)
    }

    /// Roll for a hostile at `origin` to launch an asteroid at `target`
    pub fn maybe_launch_asteroid(
        &mut self,
        catalog: &Catalog,
        origin: Vec3,
        target: Vec3,
    ) -> Option<Entity> {
        if !self.rng.random_bool(self.launch_chance) {
            return None;
        }
        let entity = self.asteroid(catalog, origin, target)?;
        log::debug!("hostile launched asteroid {:?} from {}", entity.id, origin);
        Some(entity)
    }

    fn asteroid(&mut self, catalog: &Catalog, position: Vec3, target: Vec3) -> Option<Entity> {
        let proto = self.pick_prototype(catalog, EntityKind::Asteroid)?;
        let velocity = direction_or(position, target, FALLBACK_HEADING) * self.asteroid_speed;
        let spin = self.random_spin();
        let mut entity = self.instantiate(proto, position, velocity);
        entity.spin = spin;
        log::debug!("spawned asteroid {:?} ({:?}) at {}", entity.id, entity.model, position);
        Some(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn spawner(seed: u64) -> Spawner {
        Spawner::new(seed, &Settings::default())
    }

    fn always(settings: Settings) -> Settings {
        Settings {
            hostile_spawn_chance: 1.0,
            asteroid_spawn_chance: 1.0,
            asteroid_launch_chance: 1.0,
            ..settings
        }
    }

    #[test]
    fn test_spawn_rate_matches_probability() {
        let catalog = Catalog::builtin();
        let mut s = spawner(0xC0FFEE);
        let count = (0..3000)
            .filter(|_| s.maybe_spawn_hostile(&catalog).is_some())
            .count();
        // Expected 10, sd ~3.2; a fixed seed keeps this stable
        assert!((2..=20).contains(&count), "spawned {count}");
    }

    #[test]
    fn test_spawn_rate_averaged_over_seeds() {
        let catalog = Catalog::builtin();
        let total: usize = (0..20u64)
            .map(|seed| {
                let mut s = spawner(seed);
                (0..3000)
                    .filter(|_| s.maybe_spawn_hostile(&catalog).is_some())
                    .count()
            })
            .sum();
        let mean = total as f64 / 20.0;
        assert!((7.0..=13.0).contains(&mean), "mean {mean}");
    }

    #[test]
    fn test_asteroid_spawn_rate_averaged_over_seeds() {
        let catalog = Catalog::builtin();
        let total: usize = (0..20u64)
            .map(|seed| {
                let mut s = spawner(seed);
                (0..3000)
                    .filter(|_| s.maybe_spawn_asteroid(&catalog, Vec3::ZERO).is_some())
                    .count()
            })
            .sum();
        // 1/300 per tick: expected 10 per 3000 ticks
        let mean = total as f64 / 20.0;
        assert!((7.0..=13.0).contains(&mean), "mean {mean}");
    }

    #[test]
    fn test_launch_rate_averaged_over_seeds() {
        let catalog = Catalog::builtin();
        let origin = Vec3::new(0.0, 0.0, SPAWN_Z);
        let total: usize = (0..20u64)
            .map(|seed| {
                let mut s = spawner(seed);
                (0..30_000)
                    .filter(|_| s.maybe_launch_asteroid(&catalog, origin, Vec3::ZERO).is_some())
                    .count()
            })
            .sum();
        // 1/1000 per hostile per tick: expected 30 per 30000 rolls
        let mean = total as f64 / 20.0;
        assert!((24.0..=36.0).contains(&mean), "mean {mean}");
    }

    #[test]
    fn test_hostile_placement_and_velocity() {
        let catalog = Catalog::builtin();
        let mut s = Spawner::new(1, &always(Settings::default()));
        for _ in 0..200 {
            let e = s.maybe_spawn_hostile(&catalog).unwrap();
            assert_eq!(e.kind, EntityKind::Hostile);
            assert!(e.world_position.x.abs() <= SPAWN_HALF_EXTENT);
            assert!(e.world_position.y.abs() <= SPAWN_HALF_EXTENT);
            assert_eq!(e.world_position.z, SPAWN_Z);
            assert_eq!(e.velocity, Vec3::new(0.0, 0.0, HOSTILE_SPEED));
            assert!(e.is_alive());
        }
    }

    #[test]
    fn test_asteroid_heads_for_target() {
        let catalog = Catalog::builtin();
        let mut s = Spawner::new(2, &always(Settings::default()));
        let target = Vec3::new(3.0, -2.0, 0.0);
        let e = s.maybe_spawn_asteroid(&catalog, target).unwrap();
        assert_eq!(e.kind, EntityKind::Asteroid);
        assert!((e.velocity.length() - ASTEROID_SPEED).abs() < 1e-5);
        let expected = (target - e.world_position).normalize();
        assert!(e.velocity.normalize().dot(expected) > 0.9999);
    }

    #[test]
    fn test_launch_from_coincident_point_uses_fallback() {
        let catalog = Catalog::builtin();
        let mut s = Spawner::new(3, &always(Settings::default()));
        let p = Vec3::new(1.0, 1.0, 1.0);
        let e = s.maybe_launch_asteroid(&catalog, p, p).unwrap();
        assert_eq!(e.world_position, p);
        assert_eq!(e.velocity, FALLBACK_HEADING * ASTEROID_SPEED);
        assert!(e.velocity.is_finite());
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let catalog = Catalog::builtin();
        let mut s = Spawner::new(4, &always(Settings::default()));
        let a = s.maybe_spawn_hostile(&catalog).unwrap();
        let b = s.maybe_spawn_asteroid(&catalog, Vec3::ZERO).unwrap();
        let c = s.maybe_launch_asteroid(&catalog, Vec3::ONE, Vec3::ZERO).unwrap();
        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let catalog = Catalog::builtin();
        let mut a = Spawner::new(99, &always(Settings::default()));
        let mut b = Spawner::new(99, &always(Settings::default()));
        for _ in 0..50 {
            let ea = a.maybe_spawn_hostile(&catalog).unwrap();
            let eb = b.maybe_spawn_hostile(&catalog).unwrap();
            assert_eq!(ea.world_position, eb.world_position);
            assert_eq!(ea.model, eb.model);
        }
    }

    #[test]
    fn test_empty_catalog_spawns_nothing() {
        let catalog = Catalog::new();
        let mut s = Spawner::new(5, &always(Settings::default()));
        assert!(s.maybe_spawn_hostile(&catalog).is_none());
        assert!(s.maybe_spawn_asteroid(&catalog, Vec3::ZERO).is_none());
    }
}

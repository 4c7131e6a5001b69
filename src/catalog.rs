//! Prototype model catalog
//!
//! The asset loader hands over mesh vertices per model; each prototype bakes
//! its canonical pose into those vertices once and keeps only the resulting
//! local bounding box. The catalog is filled at startup and read-only after.

use std::collections::BTreeMap;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DAMAGE;
use crate::error::{Result, SimError};
use crate::sim::bounds::Aabb;
use crate::sim::entity::EntityKind;

/// Every model the game ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelName {
    E45Aircraft,
    EnterpriseNcc1701d,
    Venator,
    MysteriousAsteroid,
    Asteroid1,
}

impl ModelName {
    pub const ALL: [ModelName; 5] = [
        ModelName::E45Aircraft,
        ModelName::EnterpriseNcc1701d,
        ModelName::Venator,
        ModelName::MysteriousAsteroid,
        ModelName::Asteroid1,
    ];

    /// Which spawn pool the model belongs to
    pub fn kind(&self) -> EntityKind {
        match self {
            ModelName::E45Aircraft | ModelName::EnterpriseNcc1701d | ModelName::Venator => {
                EntityKind::Hostile
            }
            ModelName::MysteriousAsteroid | ModelName::Asteroid1 => EntityKind::Asteroid,
        }
    }

    /// Asset path relative to the game's data directory
    pub fn asset_path(&self) -> &'static str {
        match self {
            ModelName::E45Aircraft => "models/E-45-Aircraft/E 45 Aircraft_obj.obj",
            ModelName::EnterpriseNcc1701d => "models/Enterprise NCC 1701 D/enterprise1701d.obj",
            ModelName::Venator => "models/Venator/export.obj",
            ModelName::MysteriousAsteroid => "models/mysterious_asteroid/A2.obj",
            ModelName::Asteroid1 => "models/asteroid1/planet3.obj",
        }
    }

    /// Correction some source meshes need to face down -z at the origin
    pub fn canonical_pose(&self) -> Pose {
        match self {
            ModelName::E45Aircraft => Pose {
                rotation: Quat::from_rotation_y(std::f32::consts::PI),
                offset: Vec3::new(0.0, 0.0, 3.0),
                scale: 1.0,
            },
            ModelName::EnterpriseNcc1701d => Pose {
                offset: Vec3::new(-44.15, -4.0, 8.0),
                ..Pose::default()
            },
            _ => Pose::default(),
        }
    }
}

/// Rotation, translation and uniform scale applied to raw mesh vertices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub rotation: Quat,
    pub offset: Vec3,
    pub scale: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Pose {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.offset)
    }
}

/// A loaded model reduced to what the simulation needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prototype {
    pub name: ModelName,
    /// Local box of the posed mesh
    pub bounds: Aabb,
    /// Health removed from the player on collision
    pub damage: f32,
}

impl Prototype {
    /// Build from raw mesh vertices (all sub-meshes concatenated)
    pub fn from_vertices(
        name: ModelName,
        vertices: &[Vec3],
        pose: Pose,
        damage: f32,
    ) -> Result<Self> {
        let m = pose.matrix();
        let bounds = Aabb::from_points(vertices.iter().map(|v| m.transform_point3(*v)))
            .ok_or(SimError::EmptyPrototype(name))?;
        Ok(Self { name, bounds, damage })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    prototypes: BTreeMap<ModelName, Prototype>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prototype, replacing any previous one with the same name
    pub fn insert(&mut self, prototype: Prototype) {
        log::debug!(
            "catalog: {:?} bounds {} .. {}",
            prototype.name,
            prototype.bounds.min,
            prototype.bounds.max
        );
        self.prototypes.insert(prototype.name, prototype);
    }

    pub fn get(&self, name: ModelName) -> Result<&Prototype> {
        self.prototypes.get(&name).ok_or(SimError::MissingPrototype(name))
    }

    /// Prototypes of one kind, in stable name order
    pub fn of_kind(&self, kind: EntityKind) -> Vec<&Prototype> {
        self.prototypes
            .values()
            .filter(|p| p.name.kind() == kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Both spawn pools must be populated before a run starts
    pub fn validate(&self) -> Result<()> {
        if self.of_kind(EntityKind::Hostile).is_empty() {
            return Err(SimError::EmptyCatalog("hostile"));
        }
        if self.of_kind(EntityKind::Asteroid).is_empty() {
            return Err(SimError::EmptyCatalog("asteroid"));
        }
        Ok(())
    }

    /// Placeholder hulls for every model, used when no mesh data is loaded
    /// (headless runs and tests). Sizes approximate the real meshes after
    /// their canonical pose.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for name in ModelName::ALL {
            let (half, damage) = match name {
                ModelName::E45Aircraft => (Vec3::new(1.5, 0.5, 1.5), DEFAULT_DAMAGE),
                ModelName::EnterpriseNcc1701d => (Vec3::new(3.0, 1.0, 4.0), 20.0),
                ModelName::Venator => (Vec3::new(2.5, 1.0, 5.0), 25.0),
                ModelName::MysteriousAsteroid => (Vec3::splat(1.0), DEFAULT_DAMAGE),
                ModelName::Asteroid1 => (Vec3::splat(1.5), 15.0),
            };
            let hull = Aabb::from_half_extents(half).corners();
            // Placeholders are authored already posed
            match Prototype::from_vertices(name, &hull, Pose::default(), damage) {
                Ok(p) => catalog.insert(p),
                Err(e) => log::error!("builtin prototype {name:?}: {e}"),
            }
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_baked_into_bounds() {
        let verts = [Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 2.0)];
        let pose = ModelName::E45Aircraft.canonical_pose();
        let p = Prototype::from_vertices(ModelName::E45Aircraft, &verts, pose, 10.0).unwrap();

        // Half turn about y mirrors x and z, then shifts z by 3
        assert!((p.bounds.min - Vec3::new(-1.0, 0.0, 1.0)).length() < 1e-5);
        assert!((p.bounds.max - Vec3::new(1.0, 1.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_scale_applies_before_offset() {
        let verts = [Vec3::splat(-1.0), Vec3::splat(1.0)];
        let pose = Pose {
            scale: 2.0,
            offset: Vec3::X * 10.0,
            ..Pose::default()
        };
        let p = Prototype::from_vertices(ModelName::Venator, &verts, pose, 1.0).unwrap();
        assert_eq!(p.bounds.min, Vec3::new(8.0, -2.0, -2.0));
        assert_eq!(p.bounds.max, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let err = Prototype::from_vertices(ModelName::Venator, &[], Pose::default(), 1.0);
        assert!(matches!(err, Err(SimError::EmptyPrototype(ModelName::Venator))));
    }

    #[test]
    fn test_builtin_catalog_is_complete() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), ModelName::ALL.len());
        catalog.validate().unwrap();
        assert_eq!(catalog.of_kind(EntityKind::Hostile).len(), 3);
        assert_eq!(catalog.of_kind(EntityKind::Asteroid).len(), 2);
    }

    #[test]
    fn test_validate_reports_missing_pool() {
        let mut catalog = Catalog::new();
        catalog.insert(
            Prototype::from_vertices(ModelName::Venator, &[Vec3::ZERO], Pose::default(), 1.0)
                .unwrap(),
        );
        assert!(matches!(catalog.validate(), Err(SimError::EmptyCatalog("asteroid"))));
        assert!(matches!(
            catalog.get(ModelName::Asteroid1),
            Err(SimError::MissingPrototype(ModelName::Asteroid1))
        ));
    }
}

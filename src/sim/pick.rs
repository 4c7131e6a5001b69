//! Screen-space hitscan picking
//!
//! An entity's box corners `min` and `max` are pushed through its world
//! transform, the camera view and the projection into window coordinates.
//! The rectangle they span is tested against the cursor. Candidates are
//! checked in the order given and the first hit wins, so callers control
//! priority by ordering (hostiles before asteroids), never by depth.

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind};

/// Window rectangle the projection maps onto, bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Project a world point to window coordinates (bottom-left origin).
/// Returns `None` for points on or behind the eye plane.
pub fn project(point: Vec3, view_projection: Mat4, viewport: &Viewport) -> Option<Vec2> {
    let clip = view_projection * Vec4::new(point.x, point.y, point.z, 1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        viewport.x + (ndc.x + 1.0) * 0.5 * viewport.width,
        viewport.y + (ndc.y + 1.0) * 0.5 * viewport.height,
    ))
}

/// Screen rectangle covered by an entity's projected box corners
pub fn screen_rect(
    entity: &Entity,
    view_projection: Mat4,
    viewport: &Viewport,
) -> Option<(Vec2, Vec2)> {
    let mvp = view_projection * entity.world_transform();
    let a = project(entity.bounds.min, mvp, viewport)?;
    let b = project(entity.bounds.max, mvp, viewport)?;
    Some((a.min(b), a.max(b)))
}

/// Does the cursor (top-left origin, as the mouse reports it) hit the entity?
pub fn hits(entity: &Entity, cursor: Vec2, view_projection: Mat4, viewport: &Viewport) -> bool {
    let Some((lo, hi)) = screen_rect(entity, view_projection, viewport) else {
        return false;
    };
    let x = cursor.x;
    let y = viewport.height - cursor.y;
    x >= lo.x && x <= hi.x && y >= lo.y && y <= hi.y
}

/// First alive candidate under the cursor, in iteration order
pub fn pick<'a, I>(
    cursor: Vec2,
    candidates: I,
    view: Mat4,
    projection: Mat4,
    viewport: &Viewport,
) -> Option<EntityId>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let view_projection = projection * view;
    candidates
        .into_iter()
        .filter(|e| e.is_alive())
        .find(|e| hits(e, cursor, view_projection, viewport))
        .map(|e| e.id)
}

/// Pick and kill in one pass. At most one entity dies per call; the kill is
/// reported with its kind.
pub fn pick_and_kill<'a, I>(
    cursor: Vec2,
    candidates: I,
    view: Mat4,
    projection: Mat4,
    viewport: &Viewport,
) -> Option<(EntityId, EntityKind)>
where
    I: IntoIterator<Item = &'a mut Entity>,
{
    let view_projection = projection * view;
    for entity in candidates {
        if entity.is_alive() && hits(entity, cursor, view_projection, viewport) {
            entity.kill();
            return Some((entity.id, entity.kind));
        }
    }
    None
}

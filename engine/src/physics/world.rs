//! Static AABB world
//!
//! A flat list of axis-aligned boxes implementing [`SurfaceQuery`]. Level
//! geometry in this game is boxes: platforms, walls, trigger volumes. Ray
//! queries use the slab method; the body sweep resolves one axis at a time
//! (x, z, then y) so sliding along walls and landing on floors fall out of
//! the clamping with no impulse math.
//!
//! Surfaces never get removed; they deactivate. Mechanics (beep blocks,
//! falling platforms) move surfaces by writing a per-surface offset from the
//! home bounds, which keeps handles stable across a respawn reset.

use glam::Vec3;

use super::query::{Contact, Hit, SurfaceEffect, SurfaceId, SurfaceQuery, SweepResult};

/// Gap left between the body and any face it was clamped against, in
/// meters. Keeps the next tick's overlap tests from re-reporting the same
/// face as a penetration.
const SKIN: f32 = 1e-3;

/// Performs ray-AABB intersection using the slab method.
///
/// Returns the distance along the ray to the nearest intersection at or in
/// front of the origin, or `None`. A ray starting inside the box reports
/// the exit face. `ray_dir` must be normalized.
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Inverse direction, with near-zero components pushed to huge values so
    // the slab test still works for axis-parallel rays.
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (aabb_max.x - ray_origin.x) * inv_dir.x;
    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (aabb_max.y - ray_origin.y) * inv_dir.y;
    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (aabb_max.z - ray_origin.z) * inv_dir.z;
    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Outward axis-aligned normal for a point on an AABB surface.
///
/// Picks the face whose plane the point is closest to in normalized box
/// space.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = (aabb_max - aabb_min) * 0.5;
    let local = point - center;

    let normalized = Vec3::new(
        local.x / half_extents.x,
        local.y / half_extents.y,
        local.z / half_extents.z,
    );
    let abs = normalized.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.x && abs.y >= abs.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// One axis-aligned box surface.
#[derive(Debug, Clone, Copy)]
struct Surface {
    home_min: Vec3,
    home_max: Vec3,
    /// Displacement from home, written by level mechanics.
    offset: Vec3,
    layers: u32,
    effect: SurfaceEffect,
    active: bool,
}

impl Surface {
    fn bounds(&self) -> (Vec3, Vec3) {
        (self.home_min + self.offset, self.home_max + self.offset)
    }
}

/// The query substrate: a list of AABB surfaces.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    surfaces: Vec<Surface>,
}

impl StaticWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface; returns its handle. Surfaces start active at their
    /// home bounds.
    pub fn add_surface(
        &mut self,
        min: Vec3,
        max: Vec3,
        layers: u32,
        effect: SurfaceEffect,
    ) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(Surface {
            home_min: min,
            home_max: max,
            offset: Vec3::ZERO,
            layers,
            effect,
            active: true,
        });
        id
    }

    /// Activate or deactivate a surface. Inactive surfaces are invisible to
    /// all queries.
    pub fn set_active(&mut self, surface: SurfaceId, active: bool) {
        if let Some(s) = self.surfaces.get_mut(surface.0 as usize) {
            s.active = active;
        }
    }

    /// Whether a surface is currently active.
    pub fn is_active(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(surface.0 as usize).is_some_and(|s| s.active)
    }

    /// Set a surface's displacement from its home bounds.
    pub fn set_offset(&mut self, surface: SurfaceId, offset: Vec3) {
        if let Some(s) = self.surfaces.get_mut(surface.0 as usize) {
            s.offset = offset;
        }
    }

    /// Handles of all surfaces whose effect matches the predicate,
    /// active or not.
    pub fn surfaces_where(&self, pred: impl Fn(&SurfaceEffect) -> bool) -> Vec<SurfaceId> {
        self.surfaces
            .iter()
            .enumerate()
            .filter(|(_, s)| pred(&s.effect))
            .map(|(i, _)| SurfaceId(i as u32))
            .collect()
    }

    fn active_matching(&self, mask: u32) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.surfaces
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.active && s.layers & mask != 0)
            .map(|(i, s)| (SurfaceId(i as u32), s))
    }
}

impl SurfaceQuery for StaticWorld {
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32) -> Vec<SurfaceId> {
        self.active_matching(mask)
            .filter(|(_, s)| {
                let (min, max) = s.bounds();
                let closest = center.clamp(min, max);
                // Inclusive on the face: a sphere just touching counts.
                (closest - center).length_squared() <= radius * radius
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32, mask: u32) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut closest_dist = max_distance;

        for (id, s) in self.active_matching(mask) {
            let (min, max) = s.bounds();
            if let Some(t) = ray_aabb_intersect(origin, dir, min, max) {
                if t <= closest_dist {
                    let point = origin + dir * t;
                    closest = Some(Hit {
                        point,
                        normal: aabb_surface_normal(point, min, max),
                        distance: t,
                        surface: id,
                    });
                    closest_dist = t;
                }
            }
        }
        closest
    }

    fn closest_point(&self, surface: SurfaceId, point: Vec3) -> Option<Vec3> {
        let s = self.surfaces.get(surface.0 as usize).filter(|s| s.active)?;
        let (min, max) = s.bounds();
        Some(point.clamp(min, max))
    }

    fn bounds(&self, surface: SurfaceId) -> Option<(Vec3, Vec3)> {
        self.surfaces
            .get(surface.0 as usize)
            .filter(|s| s.active)
            .map(|s| s.bounds())
    }

    fn effect(&self, surface: SurfaceId) -> SurfaceEffect {
        self.surfaces
            .get(surface.0 as usize)
            .map(|s| s.effect)
            .unwrap_or(SurfaceEffect::None)
    }

    fn sweep_move(
        &self,
        center: Vec3,
        half_extents: Vec3,
        motion: Vec3,
        mask: u32,
    ) -> SweepResult {
        let mut pos = center;
        let mut contacts: Vec<Contact> = Vec::new();

        // Horizontal axes first so walls clamp sideways motion before the
        // vertical pass lands the body on whatever is underneath.
        for axis in [0usize, 2, 1] {
            let delta = motion[axis];
            if delta == 0.0 {
                continue;
            }
            let start = pos[axis];
            let mut end = start + delta;
            // Faces that clamped the move; only the ones at the final
            // resolved position are real contacts.
            let mut blockers: Vec<(SurfaceId, Vec3, f32)> = Vec::new();

            for (id, s) in self.active_matching(mask) {
                let (smin, smax) = s.bounds();
                let others_overlap = (0..3).filter(|&a| a != axis).all(|a| {
                    pos[a] - half_extents[a] < smax[a] && pos[a] + half_extents[a] > smin[a]
                });
                if !others_overlap {
                    continue;
                }

                // Clamp against any face crossed over the whole traversed
                // interval; testing only the endpoint tunnels through thin
                // geometry at high speed.
                let mut normal = Vec3::ZERO;
                let limit = if delta > 0.0 {
                    if start >= smax[axis] + half_extents[axis] {
                        continue; // already past, moving away
                    }
                    normal[axis] = -1.0;
                    smin[axis] - half_extents[axis] - SKIN
                } else {
                    if start <= smin[axis] - half_extents[axis] {
                        continue;
                    }
                    normal[axis] = 1.0;
                    smax[axis] + half_extents[axis] + SKIN
                };

                let blocked = if delta > 0.0 { end > limit } else { end < limit };
                if blocked {
                    end = limit;
                    blockers.push((id, normal, limit));
                }
            }

            for (id, normal, limit) in blockers {
                if (limit - end).abs() <= 1e-5
                    && !contacts.iter().any(|c| c.surface == id && c.normal == normal)
                {
                    contacts.push(Contact { surface: id, normal });
                }
            }
            pos[axis] = end;
        }

        SweepResult { position: pos, contacts }
    }
}

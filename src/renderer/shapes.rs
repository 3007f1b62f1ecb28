//! Scene geometry built from boxes
//!
//! Every visible object is a transformed unit cube. Static parts (platform,
//! grid, doors, decorations) are built once; the avatar is rebuilt each
//! frame from its state. There is no depth buffer: parts are drawn ground
//! layer first, then upright parts far-to-near.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{AvatarState, DoorId, DoorSet};

/// Draw layer; lower layers are drawn first regardless of distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Ground,
    Upright,
}

/// A colored, transformed unit cube
#[derive(Debug, Clone, Copy)]
pub struct Part {
    pub transform: Mat4,
    pub color: [f32; 4],
    pub layer: Layer,
}

impl Part {
    /// Axis-aligned box with the given center and full size
    pub fn cuboid(center: Vec3, size: Vec3, color: [f32; 4], layer: Layer) -> Self {
        Self {
            transform: Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, center),
            color,
            layer,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

/// Outward face normals with tangents (u x v = n)
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// 36 vertices (CCW from outside) for a transformed unit cube
pub fn cuboid_vertices(transform: &Mat4, color: [f32; 4], out: &mut Vec<Vertex>) {
    for (n, u, v) in FACES {
        let c = n * 0.5;
        let h_u = u * 0.5;
        let h_v = v * 0.5;
        let corners = [c - h_u - h_v, c + h_u - h_v, c + h_u + h_v, c - h_u + h_v];
        let normal = transform.transform_vector3(n).normalize_or_zero().to_array();

        for i in [0, 1, 2, 0, 2, 3] {
            let p = transform.transform_point3(corners[i]);
            out.push(Vertex::new(p.to_array(), normal, color));
        }
    }
}

fn door_color(id: DoorId) -> [f32; 4] {
    match id {
        DoorId::A => colors::DOOR_A,
        DoorId::B => colors::DOOR_B,
        DoorId::C => colors::DOOR_C,
    }
}

/// Platform slab, neon border and floor grid
fn platform_parts(parts: &mut Vec<Part>) {
    let (w, d) = (30.0, 20.0);
    parts.push(Part::cuboid(
        Vec3::new(0.0, -0.25, 0.0),
        Vec3::new(w, 0.5, d),
        colors::PLATFORM,
        Layer::Ground,
    ));

    let edge = 0.1;
    for z in [d / 2.0, -d / 2.0] {
        parts.push(Part::cuboid(
            Vec3::new(0.0, -0.25, z),
            Vec3::new(w, 0.6, edge),
            colors::NEON_EDGE,
            Layer::Ground,
        ));
    }
    for x in [w / 2.0, -w / 2.0] {
        parts.push(Part::cuboid(
            Vec3::new(x, -0.25, 0.0),
            Vec3::new(edge, 0.6, d),
            colors::NEON_EDGE,
            Layer::Ground,
        ));
    }

    // 30 x 30 grid over a 30-unit square, clipped to the platform depth
    let line = 0.03;
    for i in 0..=30 {
        let offset = i as f32 - 15.0;
        let color = if i == 15 {
            colors::GRID_MAJOR
        } else {
            colors::GRID_MINOR
        };
        parts.push(Part::cuboid(
            Vec3::new(offset, 0.01, 0.0),
            Vec3::new(line, 0.01, d),
            color,
            Layer::Ground,
        ));
        if offset.abs() <= d / 2.0 {
            parts.push(Part::cuboid(
                Vec3::new(0.0, 0.01, offset),
                Vec3::new(w, 0.01, line),
                color,
                Layer::Ground,
            ));
        }
    }
}

/// Faint tiles scattered over the platform
fn hex_tile_parts(parts: &mut Vec<Part>, count: usize, seed: u64) {
    let mut rng = Pcg32::seed_from_u64(seed);
    for _ in 0..count {
        let x = rng.random_range(-14.0..14.0);
        let z = rng.random_range(-9.0..9.0);
        let spin = rng.random_range(0.0..std::f32::consts::FRAC_PI_3);
        parts.push(Part {
            transform: Mat4::from_scale_rotation_translation(
                Vec3::new(1.0, 0.05, 1.0),
                Quat::from_rotation_y(spin),
                Vec3::new(x, 0.05, z),
            ),
            color: colors::HEX_TILE,
            layer: Layer::Ground,
        });
    }
}

/// Frame, glowing panel and backlight for each door
fn door_parts(parts: &mut Vec<Part>, doors: &DoorSet) {
    for door in doors.doors() {
        let center = Vec3::new(door.x, 2.0, doors.row_z());
        let color = door_color(door.id);

        parts.push(Part::cuboid(
            center + Vec3::new(0.0, 0.0, -0.2),
            Vec3::new(3.5, 4.5, 0.01),
            colors::with_alpha(color, 0.2),
            Layer::Upright,
        ));
        parts.push(Part::cuboid(
            center,
            Vec3::new(3.0, 4.0, 0.3),
            colors::DOOR_FRAME,
            Layer::Upright,
        ));
        parts.push(Part::cuboid(
            center + Vec3::new(0.0, 0.0, 0.1),
            Vec3::new(2.6, 3.6, 0.2),
            color,
            Layer::Upright,
        ));
    }
}

/// Avatar body parts for the current state
pub fn avatar_parts(avatar: &AvatarState, reduced_motion: bool) -> Vec<Part> {
    let rot = if reduced_motion {
        Vec3::new(0.0, avatar.rotation.y, 0.0)
    } else {
        avatar.rotation
    };
    let root = Mat4::from_rotation_translation(
        Quat::from_euler(EulerRot::XYZ, rot.x, rot.y, rot.z),
        avatar.position,
    );
    let pose = avatar.limb_pose();

    // (offset, size, swing about X, color)
    let pieces = [
        (Vec3::new(0.0, 1.5, 0.0), Vec3::splat(0.5), 0.0, colors::SKIN),
        (Vec3::new(-0.1, 1.55, 0.2), Vec3::splat(0.1), 0.0, colors::EYE),
        (Vec3::new(0.1, 1.55, 0.2), Vec3::splat(0.1), 0.0, colors::EYE),
        (Vec3::new(0.0, 0.85, 0.0), Vec3::new(0.5, 0.7, 0.3), 0.0, colors::SUIT),
        (Vec3::new(-0.35, 0.85, 0.0), Vec3::new(0.15, 0.6, 0.15), pose.left_arm, colors::SUIT),
        (Vec3::new(0.35, 0.85, 0.0), Vec3::new(0.15, 0.6, 0.15), pose.right_arm, colors::SUIT),
        (Vec3::new(-0.15, 0.2, 0.0), Vec3::new(0.18, 0.6, 0.18), pose.left_leg, colors::SUIT),
        (Vec3::new(0.15, 0.2, 0.0), Vec3::new(0.18, 0.6, 0.18), pose.right_leg, colors::SUIT),
        (Vec3::new(-0.15, -0.05, 0.05), Vec3::new(0.18, 0.1, 0.25), 0.0, colors::BOOT),
        (Vec3::new(0.15, -0.05, 0.05), Vec3::new(0.18, 0.1, 0.25), 0.0, colors::BOOT),
        (Vec3::new(0.0, 0.7, 0.0), Vec3::splat(1.2), 0.0, colors::AURA),
    ];

    pieces
        .into_iter()
        .map(|(offset, size, swing, color)| Part {
            transform: root
                * Mat4::from_scale_rotation_translation(size, Quat::from_rotation_x(swing), offset),
            color,
            layer: Layer::Upright,
        })
        .collect()
}

/// Static scene plus per-frame avatar, flattened to vertices
#[derive(Debug, Clone)]
pub struct SceneMesh {
    static_parts: Vec<Part>,
}

impl SceneMesh {
    pub fn new(doors: &DoorSet, hex_tiles: usize, seed: u64) -> Self {
        let mut static_parts = Vec::new();
        platform_parts(&mut static_parts);
        hex_tile_parts(&mut static_parts, hex_tiles, seed);
        door_parts(&mut static_parts, doors);
        Self { static_parts }
    }

    pub fn part_count(&self) -> usize {
        self.static_parts.len()
    }

    /// Vertices for one frame, sorted for back-to-front drawing from `eye`
    pub fn frame_vertices(&self, avatar: &AvatarState, reduced_motion: bool, eye: Vec3) -> Vec<Vertex> {
        let mut parts: Vec<Part> = self.static_parts.clone();
        parts.extend(avatar_parts(avatar, reduced_motion));

        parts.sort_by(|a, b| {
            a.layer.cmp(&b.layer).then_with(|| {
                let da = a.center().distance_squared(eye);
                let db = b.center().distance_squared(eye);
                db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        let mut vertices = Vec::with_capacity(parts.len() * 36);
        for part in &parts {
            cuboid_vertices(&part.transform, part.color, &mut vertices);
        }
        vertices
    }
}

impl Default for SceneMesh {
    fn default() -> Self {
        Self::new(&DoorSet::standard(), 15, 0)
    }
}

/// Camera matrices for the fixed view
pub fn view_projection(aspect: f32) -> Mat4 {
    let proj = Mat4::perspective_rh(CAMERA_FOV_DEGREES.to_radians(), aspect, 0.1, 1000.0);
    let view = Mat4::look_at_rh(CAMERA_EYE, CAMERA_TARGET, Vec3::Y);
    proj * view
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_faces_point_outward() {
        let mut verts = Vec::new();
        cuboid_vertices(&Mat4::IDENTITY, [1.0; 4], &mut verts);
        assert_eq!(verts.len(), 36);

        for tri in verts.chunks(3) {
            let a = Vec3::from_array(tri[0].position);
            let b = Vec3::from_array(tri[1].position);
            let c = Vec3::from_array(tri[2].position);
            let winding = (b - a).cross(c - a).normalize();
            let normal = Vec3::from_array(tri[0].normal);
            assert!((winding - normal).length() < 1e-5);
            // Face center lies on the side the normal points to
            assert!(((a + b + c) / 3.0).dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_decorations_are_deterministic() {
        let doors = DoorSet::standard();
        let a = SceneMesh::new(&doors, 15, 42);
        let b = SceneMesh::new(&doors, 15, 42);
        let va = a.frame_vertices(&AvatarState::spawn(), false, CAMERA_EYE);
        let vb = b.frame_vertices(&AvatarState::spawn(), false, CAMERA_EYE);
        assert_eq!(va, vb);
        assert_eq!(
            SceneMesh::new(&doors, 20, 42).part_count(),
            a.part_count() + 5
        );
    }

    #[test]
    fn test_ground_layer_drawn_first() {
        let mesh = SceneMesh::default();
        let verts = mesh.frame_vertices(&AvatarState::spawn(), false, CAMERA_EYE);
        // Farthest ground part is the back neon edge
        assert_eq!(verts[0].color, colors::NEON_EDGE);
        // The avatar's eyes are nearest to the camera, so drawn last
        assert_eq!(verts.last().map(|v| v.color), Some(colors::EYE));
    }

    #[test]
    fn test_avatar_follows_position() {
        let avatar = AvatarState {
            position: Vec3::new(4.0, 1.0, -2.0),
            ..AvatarState::spawn()
        };
        let parts = avatar_parts(&avatar, false);
        let torso = parts[3].center();
        assert!((torso - Vec3::new(4.0, 1.85, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_reduced_motion_skips_tumble() {
        let avatar = AvatarState {
            rotation: Vec3::new(1.0, 0.0, 0.5),
            ..AvatarState::spawn()
        };
        let head = avatar_parts(&avatar, true)[0].center();
        assert!((head - (avatar.position + Vec3::new(0.0, 1.5, 0.0))).length() < 1e-5);
    }
}

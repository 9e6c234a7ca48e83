use axisfix_scene::mesh::MeshBuffer;
use glam::Vec3;

/// Odd multipliers per stream, so equal sums in different streams don't cancel out.
const VERTEX_MULTIPLIER: u64 = 3;
const INDEX_MULTIPLIER: u64 = 5;
const NORMAL_MULTIPLIER: u64 = 7;
const TANGENT_MULTIPLIER: u64 = 11;
const UV0_MULTIPLIER: u64 = 13;
const UV1_MULTIPLIER: u64 = 17;
const BOUNDS_MULTIPLIER: u64 = 19;

const FOLD_PRIME: u64 = 0x0000_0100_0000_01b3;
const FOLD_SEED: u64 = 0xcbf2_9ce4_8422_2325;

/// Structural hash of a mesh buffer. Two buffers with the same fingerprint are treated as the same
/// asset; there is no secondary comparison, so a collision merges two different meshes.
///
/// Streams are sums of integers (the bit patterns of the components) in wrapping `u64` arithmetic,
/// which makes them exactly independent of vertex and index order.
pub enum MeshContentHasher {}

impl MeshContentHasher {
    pub fn fingerprint(mesh: &MeshBuffer) -> u64 {
        let bounds = mesh.bounds;
        let size = bounds.size();

        let streams = [
            mesh.positions.len() as u64,
            Self::weighted_sum(
                mesh.positions
                    .iter()
                    .map(|position| Self::normalize_into(*position, bounds.min, size).to_array()),
                VERTEX_MULTIPLIER,
            ),
            Self::index_sum(&mesh.submeshes),
            Self::weighted_sum(mesh.normals.iter().map(|n| n.to_array()), NORMAL_MULTIPLIER),
            Self::weighted_sum(mesh.tangents.iter().map(|t| t.to_array()), TANGENT_MULTIPLIER),
            Self::weighted_sum(mesh.uv0.iter().map(|uv| uv.to_array()), UV0_MULTIPLIER),
            Self::weighted_sum(mesh.uv1.iter().map(|uv| uv.to_array()), UV1_MULTIPLIER),
            Self::weighted_sum([bounds.min.to_array(), bounds.max.to_array()], BOUNDS_MULTIPLIER),
        ];

        streams
            .iter()
            .fold(FOLD_SEED, |hash, stream| (hash ^ stream).wrapping_mul(FOLD_PRIME))
    }

    /// Positions relative to the bounds, 0..1 per axis. Axes without extent contribute 0.
    fn normalize_into(position: Vec3, min: Vec3, size: Vec3) -> Vec3 {
        let relative = position - min;
        Vec3::select(size.cmpgt(Vec3::ZERO), relative / size, Vec3::ZERO)
    }

    #[inline]
    fn component_bits(value: f32) -> u64 {
        // -0.0 and 0.0 are the same mesh
        (value + 0.0).to_bits() as u64
    }

    /// Order independent sum over all elements, components weighted by their position in the element.
    fn weighted_sum<const N: usize>(elements: impl IntoIterator<Item = [f32; N]>, multiplier: u64) -> u64 {
        elements
            .into_iter()
            .flat_map(|element| element.into_iter().enumerate())
            .fold(0u64, |sum, (component, value)| {
                let weight = (2 * component + 1) as u64;
                sum.wrapping_add(Self::component_bits(value).wrapping_mul(weight))
            })
            .wrapping_mul(multiplier)
    }

    /// Index sums weighted per submesh, so moving triangles between submeshes changes the hash.
    fn index_sum(submeshes: &[Vec<u32>]) -> u64 {
        submeshes
            .iter()
            .enumerate()
            .fold(0u64, |sum, (submesh, indices)| {
                let weight = (submesh + 1) as u64;
                let indices = indices
                    .iter()
                    .fold(0u64, |acc, index| acc.wrapping_add(*index as u64 + 1));
                sum.wrapping_add(indices.wrapping_mul(weight).wrapping_mul(INDEX_MULTIPLIER))
            })
    }
}

//! Meshlet-local index extraction: recovers a compact per-cluster vertex
//! table and triangle indirection from a cluster's global index buffer.

const CACHE_SIZE: usize = 1024;

/// Builds `(vertices, triangles)` from a cluster's global `indices` such that
/// `vertices[triangles[i] as usize] == indices[i]` for every `i`.
///
/// `vertices` holds each distinct global index once, in first-seen order;
/// its length never exceeds 256 for indices produced by [`crate::build`].
/// Lookups go through a 1024-entry direct-mapped cache keyed by the low bits
/// of the global index, falling back to a linear scan on a cache collision.
pub fn local_indices(indices: &[u32]) -> (Vec<u32>, Vec<u8>) {
    let mut cache = [-1i16; CACHE_SIZE];
    let mut vertices: Vec<u32> = Vec::with_capacity(indices.len().min(256));
    let mut triangles = vec![0u8; indices.len()];

    for (i, &v) in indices.iter().enumerate() {
        let key = v as usize & (CACHE_SIZE - 1);
        let cached = cache[key];

        if cached >= 0 && vertices[cached as usize] == v {
            triangles[i] = cached as u8;
            continue;
        }

        if cached < 0 {
            cache[key] = vertices.len() as i16;
            triangles[i] = vertices.len() as u8;
            vertices.push(v);
            continue;
        }

        let pos = match vertices.iter().position(|&x| x == v) {
            Some(pos) => pos,
            None => {
                vertices.push(v);
                vertices.len() - 1
            }
        };
        cache[key] = pos as i16;
        triangles[i] = pos as u8;
    }

    (vertices, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_round_trips() {
        let indices = [5u32, 9, 5, 9, 1, 5];
        let (vertices, triangles) = local_indices(&indices);
        assert_eq!(vertices, vec![5, 9, 1]);
        for (i, &idx) in indices.iter().enumerate() {
            assert_eq!(vertices[triangles[i] as usize], idx);
        }
    }

    #[test]
    fn low_bit_collisions_fall_back_to_linear_scan() {
        // 200 distinct vertex ids that all collide on the low 10 bits.
        let distinct: Vec<u32> = (0..200u32).map(|i| i * CACHE_SIZE as u32).collect();
        let mut indices = Vec::new();
        for chunk in distinct.chunks(3) {
            if chunk.len() == 3 {
                indices.extend_from_slice(chunk);
            }
        }
        // revisit earlier vertices so the cache slot gets reused by a collider.
        indices.extend_from_slice(&distinct[0..3]);

        let (vertices, triangles) = local_indices(&indices);
        assert_eq!(vertices.len(), 66 * 3);
        for (i, &idx) in indices.iter().enumerate() {
            assert_eq!(vertices[triangles[i] as usize], idx);
        }
    }
}

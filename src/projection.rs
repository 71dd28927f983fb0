//! Screen-space projection error, for consumers deciding a DAG cut at render time.

use crate::bounds::Bounds;

/// Approximate perspective-projected error of `bounds`, in normalized screen
/// units (0..1; multiply by screen height to get pixels).
///
/// `camera_proj` is `projection[1][1]`, i.e. `cot(fovy / 2)`; `camera_znear`
/// is the positive near-plane distance. Perspective distortion is ignored in
/// favor of a rotationally invariant size estimate, matching how the bounds
/// themselves are computed (a sphere, not an oriented box).
pub fn projected_error(bounds: &Bounds, camera_position: [f32; 3], camera_proj: f32, camera_znear: f32) -> f32 {
    let dx = bounds.center[0] - camera_position[0];
    let dy = bounds.center[1] - camera_position[1];
    let dz = bounds.center[2] - camera_position[2];
    let distance = (dx * dx + dy * dy + dz * dz).sqrt();

    bounds.error / (distance - bounds.radius).max(camera_znear) * (camera_proj * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closer_camera_increases_projected_error() {
        let bounds = Bounds {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
            error: 0.5,
        };
        let near = projected_error(&bounds, [0.0, 0.0, 5.0], 1.0, 0.1);
        let far = projected_error(&bounds, [0.0, 0.0, 50.0], 1.0, 0.1);
        assert!(near > far);
    }

    #[test]
    fn znear_floors_the_denominator() {
        let bounds = Bounds {
            center: [0.0, 0.0, 0.0],
            radius: 5.0,
            error: 1.0,
        };
        // camera inside the bounding sphere: distance - radius would be negative.
        let error = projected_error(&bounds, [0.0, 0.0, 1.0], 1.0, 0.1);
        assert_eq!(error, 1.0 / 0.1 * 0.5);
    }
}

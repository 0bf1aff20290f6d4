//! Semi-implicit Euler integration with friction
//!
//! Velocities are kicked by the current accelerations and damped, then
//! positions drift with the new velocities. One force evaluation per step.

use super::states::NVec2;

/// v <- (v + a dt) (1 - friction)
///
/// Friction is applied after the kick, so with no further forcing speeds
/// decay geometrically by `1 - friction` per step.
pub fn euler_velocities(velocities: &mut [NVec2], accelerations: &[NVec2], dt: f64, friction: f64) {
    debug_assert_eq!(velocities.len(), accelerations.len());
    let damping = 1.0 - friction;

    for (v, a) in velocities.iter_mut().zip(accelerations.iter()) {
        *v = (*v + *a * dt) * damping;
    }
}

/// x <- x + v dt
pub fn euler_positions(positions: &mut [NVec2], velocities: &[NVec2], dt: f64) {
    debug_assert_eq!(positions.len(), velocities.len());

    for (x, v) in positions.iter_mut().zip(velocities.iter()) {
        *x += *v * dt;
    }
}

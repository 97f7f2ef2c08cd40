//! Vertex welding keys

use glam::Vec3;

/// Integer lattice key of a position, used to weld vertices that are equal within `step`
pub type QuantizedKey = (i64, i64, i64);

/// Snaps a position onto a lattice with spacing `step`
///
/// Positions closer than `step / 2` along every axis map to the same key unless
/// they straddle a lattice boundary. A non-positive step falls back to exact bits.
#[inline]
pub fn quantize(p: &Vec3, step: f32) -> QuantizedKey {
    if step <= 0.0 {
        return (
            p.x.to_bits() as i64,
            p.y.to_bits() as i64,
            p.z.to_bits() as i64,
        );
    }
    let inv = 1.0 / step as f64;
    (
        (p.x as f64 * inv).round() as i64,
        (p.y as f64 * inv).round() as i64,
        (p.z as f64 * inv).round() as i64,
    )
}

//! 关键点几何计算
//!
//! 纯函数：距离、顶点夹角、线段倾角、肩线朝向。
//! 所有输入关键点必须达到置信度下限，否则返回 `InsufficientConfidence`，
//! 不返回退化值。

use crate::analysis::types::Landmark;
use crate::analysis::AnalysisError;

const EPSILON: f64 = 1e-9;

/// Which coordinates participate in a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// x/y only.
    #[default]
    Planar,
    /// x/y/z; every landmark must carry depth.
    Spatial,
}

#[derive(Debug, Clone, Copy)]
struct Vector {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector {
    fn between(
        from: &Landmark,
        to: &Landmark,
        projection: Projection,
    ) -> Result<Self, AnalysisError> {
        let z = match projection {
            Projection::Planar => 0.0,
            Projection::Spatial => {
                let (Some(fz), Some(tz)) = (from.z, to.z) else {
                    return Err(AnalysisError::MissingDepth);
                };
                tz - fz
            }
        };
        Ok(Self {
            x: to.x - from.x,
            y: to.y - from.y,
            z,
        })
    }

    fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

pub fn ensure_visible(landmark: &Landmark, floor: f64) -> Result<(), AnalysisError> {
    if landmark.visibility < floor {
        return Err(AnalysisError::InsufficientConfidence {
            visibility: landmark.visibility,
            floor,
        });
    }
    Ok(())
}

/// Euclidean distance between two landmarks.
pub fn distance(
    a: &Landmark,
    b: &Landmark,
    floor: f64,
    projection: Projection,
) -> Result<f64, AnalysisError> {
    ensure_visible(a, floor)?;
    ensure_visible(b, floor)?;
    Ok(Vector::between(a, b, projection)?.norm())
}

/// Angle A-B-C at vertex B, in degrees within [0, 180].
pub fn angle_at(
    a: &Landmark,
    vertex: &Landmark,
    c: &Landmark,
    floor: f64,
    projection: Projection,
) -> Result<f64, AnalysisError> {
    ensure_visible(a, floor)?;
    ensure_visible(vertex, floor)?;
    ensure_visible(c, floor)?;
    let ba = Vector::between(vertex, a, projection)?;
    let bc = Vector::between(vertex, c, projection)?;
    angle_between_vectors(&ba, &bc)
}

/// Acute angle (degrees, [0, 90]) between the lines through two segments.
pub fn line_angle(
    segment_a: (&Landmark, &Landmark),
    segment_b: (&Landmark, &Landmark),
    floor: f64,
) -> Result<f64, AnalysisError> {
    for lm in [segment_a.0, segment_a.1, segment_b.0, segment_b.1] {
        ensure_visible(lm, floor)?;
    }
    let u = Vector::between(segment_a.0, segment_a.1, Projection::Planar)?;
    let v = Vector::between(segment_b.0, segment_b.1, Projection::Planar)?;
    let angle = angle_between_vectors(&u, &v)?;
    Ok(if angle > 90.0 { 180.0 - angle } else { angle })
}

/// Inclination of a segment from the image horizontal, degrees in [0, 90].
pub fn inclination(from: &Landmark, to: &Landmark, floor: f64) -> Result<f64, AnalysisError> {
    ensure_visible(from, floor)?;
    ensure_visible(to, floor)?;
    let v = Vector::between(from, to, Projection::Planar)?;
    if v.norm() < EPSILON {
        return Err(AnalysisError::DegenerateSegment);
    }
    Ok(v.y.abs().atan2(v.x.abs()).to_degrees())
}

/// Yaw of the shoulder line in the x-z plane, degrees in (-180, 180].
///
/// 0 means square to the camera. Both shoulders must carry depth.
pub fn shoulder_yaw(left: &Landmark, right: &Landmark, floor: f64) -> Result<f64, AnalysisError> {
    ensure_visible(left, floor)?;
    ensure_visible(right, floor)?;
    let (Some(lz), Some(rz)) = (left.z, right.z) else {
        return Err(AnalysisError::MissingDepth);
    };
    let dx = left.x - right.x;
    let dz = lz - rz;
    if dx.abs() < EPSILON && dz.abs() < EPSILON {
        return Err(AnalysisError::DegenerateSegment);
    }
    Ok(dz.atan2(dx).to_degrees())
}

/// Signed horizontal span of the shoulder line in the image, `left.x - right.x`.
///
/// Positive while the subject faces the camera; shrinks toward 0 as they turn
/// side-on and changes sign once they face away.
pub fn shoulder_span(left: &Landmark, right: &Landmark, floor: f64) -> Result<f64, AnalysisError> {
    ensure_visible(left, floor)?;
    ensure_visible(right, floor)?;
    Ok(left.x - right.x)
}

/// Turn in degrees, [0, 180], implied by the shoulder span foreshortening
/// from `reference` to `span`.
///
/// `acos` of the narrower over the wider span; a sign flip means the turn went
/// past side-on.
pub fn foreshortened_turn(span: f64, reference: f64) -> Result<f64, AnalysisError> {
    let (a, b) = (span.abs(), reference.abs());
    let wider = a.max(b);
    if wider < EPSILON {
        return Err(AnalysisError::DegenerateSegment);
    }
    let turn = (a.min(b) / wider).clamp(0.0, 1.0).acos().to_degrees();
    Ok(if span * reference < 0.0 { 180.0 - turn } else { turn })
}

/// Signed smallest difference `a - b` between two angles, in [-180, 180].
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let mut diff = (a - b) % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

/// Midpoint of two landmarks; visibility is the weaker of the pair.
pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
    Landmark {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
        z: match (a.z, b.z) {
            (Some(az), Some(bz)) => Some((az + bz) / 2.0),
            _ => None,
        },
        visibility: a.visibility.min(b.visibility),
    }
}

fn angle_between_vectors(u: &Vector, v: &Vector) -> Result<f64, AnalysisError> {
    let denom = u.norm() * v.norm();
    if denom < EPSILON {
        return Err(AnalysisError::DegenerateSegment);
    }
    let cos = (u.dot(v) / denom).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees())
}

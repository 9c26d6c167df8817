use crate::derived_signals::SignalSet;
use crate::time_domain::mean;
use crate::types::{Axis, AxisGroup, SignalId};

pub type Vec3 = [f64; 3];

pub const UNIT_X: Vec3 = [1.0, 0.0, 0.0];
pub const UNIT_Y: Vec3 = [0.0, 1.0, 0.0];
pub const UNIT_Z: Vec3 = [0.0, 0.0, 1.0];

/// Features de ángulo, en el orden en que se ensamblan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleFeature {
    /// Ángulo entre la media de un grupo y la media de la gravedad
    GroupToGravity(AxisGroup),
    /// Ángulo entre un eje del dispositivo y la media de la gravedad
    AxisToGravity(Axis),
}

impl AngleFeature {
    pub const ALL: [AngleFeature; 7] = [
        AngleFeature::GroupToGravity(AxisGroup::BodyAcc),
        AngleFeature::GroupToGravity(AxisGroup::BodyAccJerk),
        AngleFeature::GroupToGravity(AxisGroup::BodyGyro),
        AngleFeature::GroupToGravity(AxisGroup::BodyGyroJerk),
        AngleFeature::AxisToGravity(Axis::X),
        AngleFeature::AxisToGravity(Axis::Y),
        AngleFeature::AxisToGravity(Axis::Z),
    ];

    pub fn name(self) -> String {
        match self {
            AngleFeature::GroupToGravity(group) => format!("angle(t{}Mean,gravity)", group.name()),
            AngleFeature::AxisToGravity(axis) => format!("angle({},gravityMean)", axis.name()),
        }
    }

    pub fn compute(self, signals: &SignalSet) -> f64 {
        let gravity = mean_vector(signals, AxisGroup::GravityAcc);
        match self {
            AngleFeature::GroupToGravity(group) => angle(mean_vector(signals, group), gravity),
            AngleFeature::AxisToGravity(Axis::X) => angle(UNIT_X, gravity),
            AngleFeature::AxisToGravity(Axis::Y) => angle(UNIT_Y, gravity),
            AngleFeature::AxisToGravity(Axis::Z) => angle(UNIT_Z, gravity),
        }
    }
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// `acos(clamp(a·b / |a||b|, -1, 1))` en radianes; 0 si algún vector es nulo
pub fn angle(a: Vec3, b: Vec3) -> f64 {
    let denom = norm(a) * norm(b);
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (dot(a, b) / denom).clamp(-1.0, 1.0).acos()
}

/// Media por eje de un grupo sobre la ventana
pub fn mean_vector(signals: &SignalSet, group: AxisGroup) -> Vec3 {
    Axis::ALL.map(|axis| {
        let values: Vec<f64> = signals
            .get(SignalId::Axis(group, axis))
            .iter()
            .map(|&v| f64::from(v))
            .collect();
        mean(&values)
    })
}

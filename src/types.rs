use serde::{Deserialize, Serialize};

/// Constantes del sistema (configuración de referencia)
pub const DEFAULT_SAMPLING_RATE: f64 = 50.0; // Hz
pub const DEFAULT_WINDOW_DURATION_S: f64 = 2.56; // -> 128 muestras
pub const DEFAULT_OVERLAP_RATIO: f64 = 0.5; // -> 64 muestras
pub const DEFAULT_FILTER_ALPHA: f32 = 0.8;
pub const DEFAULT_FEATURE_DIMENSION: usize = 561;

pub const NUM_AXES: usize = 3;
pub const NUM_AXIS_GROUPS: usize = 5;
pub const NUM_AXIS_SIGNALS: usize = NUM_AXIS_GROUPS * NUM_AXES; // 15
pub const NUM_SIGNALS: usize = NUM_AXIS_SIGNALS + NUM_AXIS_GROUPS; // 20

/// Vector de características de longitud fija `D` listo para el clasificador
pub type FeatureVector = Vec<f32>;

/// Una lectura cruda del acelerómetro y giroscopio
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub acc_x: f32,
    pub acc_y: f32,
    pub acc_z: f32,
    pub gyro_x: f32,
    pub gyro_y: f32,
    pub gyro_z: f32,
}

impl RawSample {
    pub fn new(acc: [f32; 3], gyro: [f32; 3]) -> Self {
        Self {
            acc_x: acc[0],
            acc_y: acc[1],
            acc_z: acc[2],
            gyro_x: gyro[0],
            gyro_y: gyro[1],
            gyro_z: gyro[2],
        }
    }

    pub fn acc(&self) -> [f32; 3] {
        [self.acc_x, self.acc_y, self.acc_z]
    }

    pub fn gyro(&self) -> [f32; 3] {
        [self.gyro_x, self.gyro_y, self.gyro_z]
    }
}

/// Muestra cruda más la separación gravedad / aceleración corporal.
/// Inmutable una vez creada.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessedSample {
    pub raw: RawSample,
    pub body_acc: [f32; 3],
    pub gravity_acc: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; NUM_AXES] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Grupos de señales de tres ejes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisGroup {
    BodyAcc,
    GravityAcc,
    BodyAccJerk,
    BodyGyro,
    BodyGyroJerk,
}

impl AxisGroup {
    pub const ALL: [AxisGroup; NUM_AXIS_GROUPS] = [
        AxisGroup::BodyAcc,
        AxisGroup::GravityAcc,
        AxisGroup::BodyAccJerk,
        AxisGroup::BodyGyro,
        AxisGroup::BodyGyroJerk,
    ];

    pub fn index(self) -> usize {
        match self {
            AxisGroup::BodyAcc => 0,
            AxisGroup::GravityAcc => 1,
            AxisGroup::BodyAccJerk => 2,
            AxisGroup::BodyGyro => 3,
            AxisGroup::BodyGyroJerk => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AxisGroup::BodyAcc => "BodyAcc",
            AxisGroup::GravityAcc => "GravityAcc",
            AxisGroup::BodyAccJerk => "BodyAccJerk",
            AxisGroup::BodyGyro => "BodyGyro",
            AxisGroup::BodyGyroJerk => "BodyGyroJerk",
        }
    }
}

/// Identificador cerrado de las 20 señales de una ventana.
/// Sustituye el acceso por nombre: un `match` sobre esta enum es exhaustivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalId {
    Axis(AxisGroup, Axis),
    Magnitude(AxisGroup),
}

impl SignalId {
    /// Posición canónica: 5 grupos x 3 ejes, luego las 5 magnitudes
    pub fn index(self) -> usize {
        match self {
            SignalId::Axis(group, axis) => group.index() * NUM_AXES + axis.index(),
            SignalId::Magnitude(group) => NUM_AXIS_SIGNALS + group.index(),
        }
    }

    /// Las 20 señales en orden canónico
    pub fn all() -> impl Iterator<Item = SignalId> {
        Self::axis_signals().chain(AxisGroup::ALL.into_iter().map(SignalId::Magnitude))
    }

    /// Las 15 señales de eje en orden canónico (grupo, luego eje)
    pub fn axis_signals() -> impl Iterator<Item = SignalId> {
        AxisGroup::ALL
            .into_iter()
            .flat_map(|group| Axis::ALL.into_iter().map(move |axis| SignalId::Axis(group, axis)))
    }

    /// Nombre en convención UCI-HAR, p.ej. `tBodyAccX` o `tBodyGyroJerkMag`
    pub fn name(self) -> String {
        match self {
            SignalId::Axis(group, axis) => format!("t{}{}", group.name(), axis.name()),
            SignalId::Magnitude(group) => format!("t{}Mag", group.name()),
        }
    }
}

//! Orden fijo del vector de características.
//!
//! El clasificador se entrena contra un orden concreto, así que el orden es
//! parte del contrato: el ensamblador recorre estas posiciones una a una y los
//! nombres exportados salen de la misma lista.

use std::collections::HashMap;

use crate::geometry::AngleFeature;
use crate::spectral::SpectralStat;
use crate::time_domain::TimeStat;
use crate::types::{Axis, AxisGroup, SignalId};

/// Orden de los coeficientes autorregresivos reservados por señal de eje
pub const AR_ORDER: usize = 4;

/// Grupos sobre los que se calculan correlaciones entre ejes
pub const CORRELATION_GROUPS: [AxisGroup; 4] = [
    AxisGroup::BodyAcc,
    AxisGroup::BodyAccJerk,
    AxisGroup::BodyGyro,
    AxisGroup::BodyGyroJerk,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisPair {
    XY,
    XZ,
    YZ,
}

impl AxisPair {
    pub const ALL: [AxisPair; 3] = [AxisPair::XY, AxisPair::XZ, AxisPair::YZ];

    pub fn axes(self) -> (Axis, Axis) {
        match self {
            AxisPair::XY => (Axis::X, Axis::Y),
            AxisPair::XZ => (Axis::X, Axis::Z),
            AxisPair::YZ => (Axis::Y, Axis::Z),
        }
    }
}

/// Una posición del vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureSlot {
    Time(TimeStat, SignalId),
    /// Área de magnitud (media de la señal de magnitud del grupo)
    Sma(AxisGroup),
    /// Coeficiente autorregresivo reservado: siempre 0 hasta que exista un estimador.
    /// Ocupa posición para no desalinear el resto del vector.
    Reserved { signal: SignalId, coefficient: usize },
    Correlation(AxisGroup, AxisPair),
    Spectral(SpectralStat, SignalId),
    Angle(AngleFeature),
    /// Relleno con ceros hasta la dimensión objetivo
    Padding(usize),
}

impl FeatureSlot {
    pub fn name(self) -> String {
        match self {
            FeatureSlot::Time(stat, signal) => format!("{}-{}()", signal.name(), stat.name()),
            FeatureSlot::Sma(group) => format!("{}-sma()", SignalId::Magnitude(group).name()),
            FeatureSlot::Reserved { signal, coefficient } => {
                format!("{}-arCoeff(){}", signal.name(), coefficient + 1)
            }
            FeatureSlot::Correlation(group, pair) => {
                let (a, b) = pair.axes();
                format!("t{}-correlation()-{},{}", group.name(), a.name(), b.name())
            }
            FeatureSlot::Spectral(stat, signal) => {
                // tBodyAccX -> fBodyAccX
                format!("f{}-{}()", &signal.name()[1..], stat.name())
            }
            FeatureSlot::Angle(angle) => angle.name(),
            FeatureSlot::Padding(i) => format!("reserved-pad-{}", i),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureLayout {
    slots: Vec<FeatureSlot>,
    natural_len: usize,
    positions: HashMap<FeatureSlot, usize>,
}

impl FeatureLayout {
    /// Construye el orden de referencia y lo ajusta a `dimension` posiciones
    pub fn new(dimension: usize) -> Self {
        let mut slots = Self::natural_slots();
        let natural_len = slots.len();

        let padding = dimension.saturating_sub(natural_len);
        slots.extend((0..padding).map(FeatureSlot::Padding));
        slots.truncate(dimension);

        let positions = slots.iter().enumerate().map(|(i, slot)| (*slot, i)).collect();

        Self {
            slots,
            natural_len,
            positions,
        }
    }

    fn natural_slots() -> Vec<FeatureSlot> {
        let mut slots = Vec::new();

        // 1. Estadísticas temporales: tipo -> grupo -> eje (magnitudes al final)
        for stat in TimeStat::ALL {
            slots.extend(SignalId::all().map(|signal| FeatureSlot::Time(stat, signal)));
        }

        // 2. SMA por señal de magnitud
        slots.extend(AxisGroup::ALL.into_iter().map(FeatureSlot::Sma));

        // 3. Coeficientes AR reservados
        for signal in SignalId::axis_signals() {
            slots.extend((0..AR_ORDER).map(|coefficient| FeatureSlot::Reserved { signal, coefficient }));
        }

        // 4. Correlaciones
        for group in CORRELATION_GROUPS {
            slots.extend(AxisPair::ALL.into_iter().map(|pair| FeatureSlot::Correlation(group, pair)));
        }

        // 5. Bloque frecuencial, mismo anidamiento que el temporal
        for stat in SpectralStat::ALL {
            slots.extend(SignalId::all().map(|signal| FeatureSlot::Spectral(stat, signal)));
        }

        // 6. Ángulos
        slots.extend(AngleFeature::ALL.into_iter().map(FeatureSlot::Angle));

        slots
    }

    pub fn slots(&self) -> &[FeatureSlot] {
        &self.slots
    }

    /// Dimensión final `D`
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Número de posiciones calculadas antes de rellenar o truncar
    pub fn natural_len(&self) -> usize {
        self.natural_len
    }

    /// Posición de una característica, o `None` si quedó fuera al truncar
    pub fn index_of(&self, slot: FeatureSlot) -> Option<usize> {
        self.positions.get(&slot).copied()
    }

    pub fn names(&self) -> Vec<String> {
        self.slots.iter().map(|slot| slot.name()).collect()
    }
}

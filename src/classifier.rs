use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feature_layout::{FeatureLayout, FeatureSlot};
use crate::geometry::AngleFeature;
use crate::time_domain::TimeStat;
use crate::types::{Axis, AxisGroup, SignalId};

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[cfg(feature = "onnx")]
    #[error("Fallo en ONNX Runtime: {0}")]
    Onnx(#[from] ort::Error),

    #[error("No se pudo leer el fichero de etiquetas: {0}")]
    Labels(#[from] std::io::Error),

    #[error("classes.json mal formado: {0}")]
    LabelsFormat(#[from] serde_json::Error),

    #[error("El vector tiene {actual} features y el modelo espera {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("El modelo no devolvió probabilidades")]
    EmptyScores,

    #[error("El modelo no declara ningún tensor de {0}")]
    MissingTensor(&'static str),
}

/// Resultado del clasificador para una ventana
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// Clasificador opaco que consume un vector de dimensión fija
pub trait Classifier {
    fn classify(&mut self, features: &[f32]) -> Result<Prediction, ClassifierError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct ClassesJson {
    index_to_class: HashMap<String, String>,
}

/// Lee `{"index_to_class": {"0": "WALKING", ...}}` y devuelve las etiquetas ordenadas por índice
pub fn load_class_labels(path: &Path) -> Result<Vec<String>, ClassifierError> {
    let content = fs::read_to_string(path)?;
    parse_class_labels(&content)
}

pub fn parse_class_labels(content: &str) -> Result<Vec<String>, ClassifierError> {
    let data: ClassesJson = serde_json::from_str(content)?;

    let mut pairs: Vec<(usize, String)> = data
        .index_to_class
        .into_iter()
        .filter_map(|(k, v)| k.parse::<usize>().ok().map(|idx| (idx, v)))
        .collect();

    pairs.sort_by_key(|(idx, _)| *idx);
    Ok(pairs.into_iter().map(|(_, name)| name).collect())
}

/// Umbrales del clasificador de reglas
#[derive(Debug, Clone, Copy)]
pub struct RuleThresholds {
    /// Desviación de `tBodyAccMag` por encima de la cual hay desplazamiento (m/s²)
    pub moving_std: f32,
    /// Ángulo eje X / gravedad por encima del cual el dispositivo está tumbado (rad)
    pub laying_angle: f32,
    /// Ángulo eje X / gravedad por encima del cual se considera sentado (rad)
    pub sitting_angle: f32,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            moving_std: 0.6,
            laying_angle: 1.2,
            sitting_angle: 0.45,
        }
    }
}

/// Respaldo sencillo cuando no hay modelo disponible.
/// Sólo mira la dispersión de la aceleración corporal y la orientación de la gravedad.
pub struct RuleBasedClassifier {
    thresholds: RuleThresholds,
    body_mag_std: Option<usize>,
    x_gravity_angle: Option<usize>,
}

impl RuleBasedClassifier {
    pub fn new(layout: &FeatureLayout, thresholds: RuleThresholds) -> Self {
        Self {
            thresholds,
            body_mag_std: layout.index_of(FeatureSlot::Time(
                TimeStat::Std,
                SignalId::Magnitude(AxisGroup::BodyAcc),
            )),
            x_gravity_angle: layout
                .index_of(FeatureSlot::Angle(AngleFeature::AxisToGravity(Axis::X))),
        }
    }
}

impl Classifier for RuleBasedClassifier {
    fn classify(&mut self, features: &[f32]) -> Result<Prediction, ClassifierError> {
        let read = |idx: Option<usize>| idx.and_then(|i| features.get(i).copied());

        let (Some(std), Some(angle)) = (read(self.body_mag_std), read(self.x_gravity_angle)) else {
            return Ok(Prediction {
                label: "UNKNOWN".to_string(),
                confidence: 0.0,
            });
        };

        let t = self.thresholds;
        let (label, confidence) = if std >= t.moving_std {
            ("WALKING", (std / (2.0 * t.moving_std)).min(1.0))
        } else if angle >= t.laying_angle {
            ("LAYING", 0.8)
        } else if angle >= t.sitting_angle {
            ("SITTING", 0.6)
        } else {
            ("STANDING", 0.6)
        };

        Ok(Prediction {
            label: label.to_string(),
            confidence,
        })
    }

    fn name(&self) -> &str {
        "reglas"
    }
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

#[cfg(feature = "onnx")]
mod onnx {
    use std::path::Path;

    use ort::session::Session;
    use ort::tensor::TensorElementType;
    use ort::value::ValueType;
    use tracing::info;

    use super::{load_class_labels, Classifier, ClassifierError, Prediction};

    /// Modelo con entrada `[1, D]` y una salida de probabilidades `f32` por clase
    pub struct OnnxClassifier {
        session: Session,
        labels: Vec<String>,
        input: String,
        scores: String,
        dimension: usize,
    }

    /// Primera salida `f32`; si no hay ninguna, la primera que declare el modelo
    fn scores_output(session: &Session) -> Option<String> {
        let is_f32 = |ty: &ValueType| {
            matches!(
                ty,
                ValueType::Tensor {
                    ty: TensorElementType::Float32,
                    ..
                }
            )
        };
        session
            .outputs
            .iter()
            .find(|o| is_f32(&o.output_type))
            .or(session.outputs.first())
            .map(|o| o.name.clone())
    }

    impl OnnxClassifier {
        pub fn new(model: &Path, classes: &Path, dimension: usize) -> Result<Self, ClassifierError> {
            let labels = load_class_labels(classes)?;
            let session = Session::builder()?.commit_from_file(model)?;

            let Some(input) = session.inputs.first().map(|i| i.name.clone()) else {
                return Err(ClassifierError::MissingTensor("entrada"));
            };
            let scores = scores_output(&session).ok_or(ClassifierError::MissingTensor("salida"))?;

            info!(
                model = %model.display(),
                labels = labels.len(),
                dimension,
                %input,
                %scores,
                "Modelo ONNX listo"
            );

            Ok(Self {
                session,
                labels,
                input,
                scores,
                dimension,
            })
        }
    }

    impl Classifier for OnnxClassifier {
        fn classify(&mut self, features: &[f32]) -> Result<Prediction, ClassifierError> {
            if features.len() != self.dimension {
                return Err(ClassifierError::DimensionMismatch {
                    expected: self.dimension,
                    actual: features.len(),
                });
            }

            let tensor = ort::value::Value::from_array((vec![1_usize, self.dimension], features.to_vec()))?;
            let outputs = self.session.run(ort::inputs![self.input.as_str() => &tensor])?;
            let (_, probabilities) = outputs[self.scores.as_str()].try_extract_tensor::<f32>()?;

            // Sólo cuentan las clases que tienen etiqueta
            let (idx, &confidence) = probabilities
                .iter()
                .take(self.labels.len())
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .ok_or(ClassifierError::EmptyScores)?;

            Ok(Prediction {
                label: self.labels[idx].clone(),
                confidence,
            })
        }

        fn name(&self) -> &str {
            "onnx"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_FEATURE_DIMENSION;

    fn vector_with(layout: &FeatureLayout, std: f32, angle: f32) -> Vec<f32> {
        let mut v = vec![0.0; layout.len()];
        v[layout
            .index_of(FeatureSlot::Time(TimeStat::Std, SignalId::Magnitude(AxisGroup::BodyAcc)))
            .unwrap()] = std;
        v[layout
            .index_of(FeatureSlot::Angle(AngleFeature::AxisToGravity(Axis::X)))
            .unwrap()] = angle;
        v
    }

    #[test]
    fn parses_class_labels_in_index_order() {
        let labels = parse_class_labels(
            r#"{"index_to_class": {"2": "SITTING", "0": "WALKING", "1": "LAYING", "x": "bad"}}"#,
        )
        .unwrap();
        assert_eq!(labels, vec!["WALKING", "LAYING", "SITTING"]);
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            parse_class_labels("{not json"),
            Err(ClassifierError::LabelsFormat(_))
        ));
    }

    #[test]
    fn rules_cover_basic_postures() {
        let layout = FeatureLayout::new(DEFAULT_FEATURE_DIMENSION);
        let mut classifier = RuleBasedClassifier::new(&layout, RuleThresholds::default());

        let walking = classifier.classify(&vector_with(&layout, 2.0, 0.1)).unwrap();
        assert_eq!(walking.label, "WALKING");
        assert_eq!(walking.confidence, 1.0);

        assert_eq!(classifier.classify(&vector_with(&layout, 0.05, 1.5)).unwrap().label, "LAYING");
        assert_eq!(classifier.classify(&vector_with(&layout, 0.05, 0.7)).unwrap().label, "SITTING");
        assert_eq!(classifier.classify(&vector_with(&layout, 0.05, 0.1)).unwrap().label, "STANDING");
    }

    #[test]
    fn truncated_layout_falls_back_to_unknown() {
        let layout = FeatureLayout::new(10);
        let mut classifier = RuleBasedClassifier::new(&layout, RuleThresholds::default());
        let prediction = classifier.classify(&[0.0; 10]).unwrap();
        assert_eq!(prediction.label, "UNKNOWN");
        assert_eq!(prediction.confidence, 0.0);
    }
}

//! Chamber placement: local-to-global transforms and their provider.

use event_types::DetId;
use hashbrown::HashMap;
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DisplayError, DisplayResult};

/// Affine map from a chamber's local frame to the global detector frame.
///
/// `global = rotation * local + translation`. The linear part is normally a
/// rotation but is not required to be orthonormal; alignment corrections can
/// add small shears.
///
/// # Example
///
/// ```
/// use muon_display::ChamberTransform;
/// use nalgebra::{Point3, Vector3};
///
/// let t = ChamberTransform::from_translation(Vector3::new(0.0, 0.0, 700.0));
/// let global = t.local_to_global(&Point3::new(1.0, 2.0, 3.0));
/// assert!((global.z - 703.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChamberTransform {
    /// Linear part, serialized row-major.
    #[serde(with = "row_major")]
    pub rotation: Matrix3<f64>,
    /// Position of the local origin in the global frame.
    pub translation: Vector3<f64>,
}

mod row_major {
    use nalgebra::Matrix3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(m: &Matrix3<f64>, s: S) -> Result<S::Ok, S::Error> {
        let rows: [f64; 9] = [
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 0)],
            m[(2, 1)],
            m[(2, 2)],
        ];
        rows.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Matrix3<f64>, D::Error> {
        let rows = <[f64; 9]>::deserialize(d)?;
        Ok(Matrix3::from_row_slice(&rows))
    }
}

impl Default for ChamberTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ChamberTransform {
    /// Creates a transform from its linear part and translation.
    #[must_use]
    pub const fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// A pure translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self::new(Matrix3::identity(), translation)
    }

    /// A rotation about the global `z` axis (the beam line), in radians.
    #[must_use]
    pub fn rotation_z(angle: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        #[rustfmt::skip]
        let rotation = Matrix3::new(
            cos_a, -sin_a, 0.0,
            sin_a,  cos_a, 0.0,
              0.0,    0.0, 1.0,
        );
        Self::new(rotation, Vector3::zeros())
    }

    /// Returns this transform with its translation replaced.
    #[must_use]
    pub const fn with_translation(mut self, translation: Vector3<f64>) -> Self {
        self.translation = translation;
        self
    }

    /// Maps a local point to the global frame.
    #[must_use]
    pub fn local_to_global(&self, local: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * local.coords + self.translation)
    }

    /// The global-to-local transform.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::NotInvertible`] if the linear part is singular.
    pub fn inverse(&self) -> DisplayResult<Self> {
        let inv = self
            .rotation
            .try_inverse()
            .ok_or(DisplayError::NotInvertible)?;
        Ok(Self::new(inv, -(inv * self.translation)))
    }

    /// Maps a global point back to the local frame.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::NotInvertible`] if the linear part is singular.
    pub fn global_to_local(&self, global: &Point3<f64>) -> DisplayResult<Point3<f64>> {
        Ok(self.inverse()?.local_to_global(global))
    }

    fn is_finite(&self) -> bool {
        self.rotation.iter().all(|v| v.is_finite()) && self.translation.iter().all(|v| v.is_finite())
    }
}

/// Source of chamber placements, looked up by detector id.
///
/// Implementations are read concurrently while chambers are projected in
/// parallel, hence the `Sync` bound.
pub trait GeometryProvider: Sync {
    /// Transform of the chamber `det_id`, or `None` if it is unknown.
    fn transform(&self, det_id: DetId) -> Option<&ChamberTransform>;
}

#[derive(Debug, Deserialize, Serialize)]
struct GeometryEntry {
    det_id: u32,
    #[serde(flatten)]
    transform: ChamberTransform,
}

/// In-memory geometry keyed by detector id.
///
/// # Example
///
/// ```
/// use event_types::DetId;
/// use muon_display::{GeometryProvider, GeometryTable};
///
/// let json = r#"[
///     {"det_id": 7, "rotation": [1,0,0, 0,1,0, 0,0,1], "translation": [0, 0, 600]}
/// ]"#;
/// let table = GeometryTable::from_json(json).unwrap();
/// assert!(table.transform(DetId::new(7)).is_some());
/// assert!(table.transform(DetId::new(8)).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeometryTable {
    transforms: HashMap<DetId, ChamberTransform>,
}

impl GeometryTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the transform of one chamber.
    pub fn insert(&mut self, det_id: DetId, transform: ChamberTransform) -> Option<ChamberTransform> {
        self.transforms.insert(det_id, transform)
    }

    /// Number of chambers with a transform.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Parses a JSON array of `{det_id, rotation, translation}` entries, with
    /// `rotation` as nine row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Json`] for malformed JSON and
    /// [`DisplayError::GeometryFormat`] for duplicate ids or non-finite
    /// values.
    pub fn from_json(json: &str) -> DisplayResult<Self> {
        let entries: Vec<GeometryEntry> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for entry in entries {
            if !entry.transform.is_finite() {
                return Err(DisplayError::geometry_format(format!(
                    "non-finite transform for det id {}",
                    entry.det_id
                )));
            }
            if table
                .insert(DetId::new(entry.det_id), entry.transform)
                .is_some()
            {
                return Err(DisplayError::geometry_format(format!(
                    "duplicate det id {}",
                    entry.det_id
                )));
            }
        }
        debug!(chambers = table.len(), "loaded geometry table");
        Ok(table)
    }
}

impl GeometryProvider for GeometryTable {
    fn transform(&self, det_id: DetId) -> Option<&ChamberTransform> {
        self.transforms.get(&det_id)
    }
}

impl FromIterator<(DetId, ChamberTransform)> for GeometryTable {
    fn from_iter<I: IntoIterator<Item = (DetId, ChamberTransform)>>(iter: I) -> Self {
        Self {
            transforms: iter.into_iter().collect(),
        }
    }
}

//! The boundary to the surrounding time-series store.
//!
//! The transforms only ever see arrays: times, rows of values and a small
//! amount of coordinate-system metadata. Whatever holds the series behind
//! [`TimeSeriesStore`] is not this crate's business; [`MemoryStore`] is a
//! plain in-memory implementation.
use hashbrown::HashMap;
use super::numeric::Float;
use super::geometry::Vector3f;
use super::matrix::Matrix3x3;
use super::error::{Error, Result};
use super::diagnostics::{Diagnostic, DiagnosticCode};

/// Declared input and output frames of a rotation-matrix series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateTag {
    pub input_frame: String,
    pub output_frame: String,
}

impl CoordinateTag {
    pub fn new<A: Into<String>, B: Into<String>>(input_frame: A, output_frame: B) -> CoordinateTag {
        CoordinateTag { input_frame: input_frame.into(), output_frame: output_frame.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Frame the values are expressed in.
    pub coordinate_system: Option<String>,
    /// Set on rotation-matrix series.
    pub transform: Option<CoordinateTag>,
}

impl Metadata {
    pub fn in_frame<S: Into<String>>(frame: S) -> Metadata {
        Metadata { coordinate_system: Some(frame.into()), transform: None }
    }

    pub fn rotation(tag: CoordinateTag) -> Metadata {
        Metadata { coordinate_system: None, transform: Some(tag) }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub times: Vec<Float>,
    pub values: Vec<Vec<Float>>,
    pub metadata: Metadata,
}

impl TimeSeries {
    pub fn new(times: Vec<Float>, values: Vec<Vec<Float>>, metadata: Metadata) -> TimeSeries {
        TimeSeries { times, values, metadata }
    }

    pub fn from_scalars(times: Vec<Float>, values: &[Float]) -> TimeSeries {
        TimeSeries::new(times, values.iter().map(|v| vec![*v]).collect(), Metadata::default())
    }

    pub fn from_vectors(times: Vec<Float>, values: &[Vector3f], metadata: Metadata) -> TimeSeries {
        TimeSeries::new(times, values.iter().map(|v| v.to_array().to_vec()).collect(), metadata)
    }

    pub fn from_matrices(times: Vec<Float>, values: &[Matrix3x3], tag: CoordinateTag) -> TimeSeries {
        TimeSeries::new(times, values.iter().map(Matrix3x3::to_vec).collect(), Metadata::rotation(tag))
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn check_rows(&self, name: &str) -> Result<()> {
        if self.values.len() != self.times.len() {
            return Err(Error::shape(format!("{} has {} times but {} samples", name, self.times.len(), self.values.len())));
        }
        Ok(())
    }

    /// Values as 3-vectors; every row must have exactly three components.
    pub fn vectors(&self, name: &str) -> Result<Vec<Vector3f>> {
        self.check_rows(name)?;
        self.values.iter()
            .map(|r| Vector3f::from_slice(r).map_err(|e| Error::shape(format!("{}: {}", name, e))))
            .collect()
    }

    /// Values as row-major 3x3 matrices; every row must have nine elements.
    pub fn matrices(&self, name: &str) -> Result<Vec<Matrix3x3>> {
        self.check_rows(name)?;
        self.values.iter()
            .map(|r| Matrix3x3::from_slice(r).map_err(|e| Error::shape(format!("{}: {}", name, e))))
            .collect()
    }

    /// Values of a single-column series.
    pub fn scalars(&self, name: &str) -> Result<Vec<Float>> {
        self.check_rows(name)?;
        self.values.iter()
            .map(|r| match r.as_slice() {
                [v] => Ok(*v),
                _ => Err(Error::shape(format!("{}: expected one value per sample, got {}", name, r.len()))),
            })
            .collect()
    }
}

/// Advisory check that a vector series is in the frame a rotation expects.
/// Missing tags on either side are not reported.
pub fn check_frame(vector: &Metadata, rotation: &CoordinateTag, context: &str) -> Option<Diagnostic> {
    match &vector.coordinate_system {
        Some(found) if !found.eq_ignore_ascii_case(&rotation.input_frame) => Some(Diagnostic::new(
            DiagnosticCode::FrameMismatch {
                expected: rotation.input_frame.clone(),
                found: found.clone(),
            },
            context,
        )),
        _ => None,
    }
}

pub trait TimeSeriesStore {
    fn get(&self, name: &str) -> Option<TimeSeries>;
    fn put(&mut self, name: &str, series: TimeSeries);

    /// Like `get`, but a missing series is an error.
    fn require(&self, name: &str) -> Result<TimeSeries> {
        self.get(name).ok_or_else(|| Error::MissingSeries(name.to_string()))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    series: HashMap<String, TimeSeries>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort();
        names
    }
}

impl TimeSeriesStore for MemoryStore {
    fn get(&self, name: &str) -> Option<TimeSeries> {
        self.series.get(name).cloned()
    }

    fn put(&mut self, name: &str, series: TimeSeries) {
        self.series.insert(name.to_string(), series);
    }
}

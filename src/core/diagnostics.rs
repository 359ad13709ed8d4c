//! Non-fatal findings returned alongside a result.
//!
//! A pipeline that can continue with degraded input (extrapolated rotations,
//! defaulted solar-wind parameters, mismatched frame tags) reports it here and
//! leaves the decision to ignore or escalate to the caller. Every diagnostic
//! is also logged as a warning when it is created.
use std::fmt;
use crate::transforms::validation::MatrixVerification;

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticCode {
    /// The rotation matrices did not all verify as proper rotations.
    InvalidMatrices(MatrixVerification),
    /// Output samples fell outside the matrix time range and reuse the
    /// nearest endpoint rotation.
    Extrapolated { before: usize, after: usize },
    /// A vector's declared frame differs from the rotation's input frame.
    FrameMismatch { expected: String, found: String },
    /// No solar-wind data, Dp and Bz fall back to their defaults.
    SolarWindDefaulted,
    /// Samples on the Sun-Earth line where the LMN frame falls back to the
    /// coordinate axes.
    DegenerateBoundaryNormal { count: usize },
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticCode::InvalidMatrices(state) => write!(f, "invalid rotation matrices ({:?})", state),
            DiagnosticCode::Extrapolated { before, after } =>
                write!(f, "{} samples before and {} after the matrix time range were extrapolated", before, after),
            DiagnosticCode::FrameMismatch { expected, found } =>
                write!(f, "vector frame {} does not match rotation input frame {}", found, expected),
            DiagnosticCode::SolarWindDefaulted => write!(f, "solar wind parameters defaulted"),
            DiagnosticCode::DegenerateBoundaryNormal { count } =>
                write!(f, "{} samples on the Sun-Earth line use the coordinate axes as LMN frame", count),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub context: String,
}

impl Diagnostic {
    pub fn new<S: Into<String>>(code: DiagnosticCode, context: S) -> Diagnostic {
        let d = Diagnostic { code, context: context.into() };
        warn!("{}", d);
        d
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.context, self.code)
        }
    }
}

/// A value together with the diagnostics raised while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosed<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Diagnosed<T> {
        Diagnosed { value, diagnostics }
    }

    pub fn has(&self, predicate: impl Fn(&DiagnosticCode) -> bool) -> bool {
        self.diagnostics.iter().any(|d| predicate(&d.code))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Diagnosed<U> {
        Diagnosed { value: f(self.value), diagnostics: self.diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::new(DiagnosticCode::Extrapolated { before: 2, after: 0 }, "rotate");
        assert_eq!(d.to_string(), "rotate: 2 samples before and 0 after the matrix time range were extrapolated");
        let out = Diagnosed::new(1, vec![d]).map(|v| v + 1);
        assert_eq!(out.value, 2);
        assert!(out.has(|c| match c { DiagnosticCode::Extrapolated { .. } => true, _ => false }));
    }
}

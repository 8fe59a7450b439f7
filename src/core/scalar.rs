//! Scalar kinds carried by operators and arrays.
//!
//! Operators only ever see two element types: double precision reals and
//! double precision complex numbers. Mixing them promotes to complex, the
//! same way a common-type lookup would for `float64` and `complex128`.

use num_complex::Complex64;
use num_traits::Zero;
use std::fmt;

/// Scalar element type of an operator or array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Float64,
    Complex128,
}

impl ElementType {
    /// Common type of `self` and `other`.
    pub fn promote(self, other: ElementType) -> ElementType {
        match (self, other) {
            (ElementType::Float64, ElementType::Float64) => ElementType::Float64,
            _ => ElementType::Complex128,
        }
    }

    /// Common type of a list of element types, `None` for an empty list.
    pub fn common<I: IntoIterator<Item = ElementType>>(types: I) -> Option<ElementType> {
        types.into_iter().reduce(ElementType::promote)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, ElementType::Complex128)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Float64 => write!(f, "float64"),
            ElementType::Complex128 => write!(f, "complex128"),
        }
    }
}

/// A real or complex scalar, used as the factor of a scaled operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Real(f64),
    Complex(Complex64),
}

impl Scalar {
    pub fn element_type(&self) -> ElementType {
        match self {
            Scalar::Real(_) => ElementType::Float64,
            Scalar::Complex(_) => ElementType::Complex128,
        }
    }

    /// Complex conjugate; reals are returned unchanged.
    pub fn conj(&self) -> Scalar {
        match *self {
            Scalar::Real(a) => Scalar::Real(a),
            Scalar::Complex(z) => Scalar::Complex(z.conj()),
        }
    }

    pub fn to_complex(&self) -> Complex64 {
        match *self {
            Scalar::Real(a) => Complex64::new(a, 0.0),
            Scalar::Complex(z) => z,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Real(a) => *a == 0.0,
            Scalar::Complex(z) => z.is_zero(),
        }
    }
}

impl From<f64> for Scalar {
    fn from(a: f64) -> Self {
        Scalar::Real(a)
    }
}

impl From<i32> for Scalar {
    fn from(a: i32) -> Self {
        Scalar::Real(f64::from(a))
    }
}

impl From<Complex64> for Scalar {
    fn from(z: Complex64) -> Self {
        Scalar::Complex(z)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Real(a) => write!(f, "{a}"),
            Scalar::Complex(z) => write!(f, "{z}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_prefers_complex() {
        use ElementType::*;
        assert_eq!(Float64.promote(Float64), Float64);
        assert_eq!(Float64.promote(Complex128), Complex128);
        assert_eq!(Complex128.promote(Float64), Complex128);
        assert_eq!(ElementType::common([Float64, Float64, Complex128]), Some(Complex128));
        assert_eq!(ElementType::common(Vec::new()), None);
    }

    #[test]
    fn scalar_conjugate() {
        let z = Scalar::from(Complex64::new(1.0, 2.0));
        assert_eq!(z.conj(), Scalar::Complex(Complex64::new(1.0, -2.0)));
        assert_eq!(Scalar::from(3.0).conj(), Scalar::Real(3.0));
        assert!(Scalar::from(0).is_zero());
    }
}

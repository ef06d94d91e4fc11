//! Dynamic values passed to and returned from namespace calls.

use ndarray::{Array1, Array2, Array3, ArrayD, Ix1, Ix2, Ix3};

use crate::error::{Error, Result};

/// Argument or return value of a facade call.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value.
    Unit,
    /// A scalar.
    Number(f64),
    /// A string, e.g. a title or a line spec.
    Text(String),
    /// An n-dimensional array of samples.
    Array(ArrayD<f64>),
    /// Several values, e.g. the outputs of `cart2sph`.
    Tuple(Vec<Self>),
}

impl Value {
    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Array(_) => "array",
            Self::Tuple(_) => "tuple",
        }
    }

    /// The scalar, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The array, if this is an array.
    pub fn as_array(&self) -> Option<&ArrayD<f64>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The elements, if this is a tuple.
    pub fn as_tuple(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(v) => Some(v),
            _ => None,
        }
    }

    /// Interpret as a number, reporting `symbol` on mismatch.
    pub(crate) fn number(&self, symbol: &str) -> Result<f64> {
        self.as_number().ok_or_else(|| {
            Error::args(symbol, format!("expected a number, got {}", self.type_name()))
        })
    }

    /// Interpret as text, reporting `symbol` on mismatch.
    pub(crate) fn text(&self, symbol: &str) -> Result<&str> {
        self.as_text().ok_or_else(|| {
            Error::args(symbol, format!("expected text, got {}", self.type_name()))
        })
    }

    /// Interpret as a numeric array of any shape. Numbers become 0-d arrays.
    pub(crate) fn array(&self, symbol: &str) -> Result<ArrayD<f64>> {
        match self {
            Self::Array(a) => Ok(a.clone()),
            Self::Number(n) => Ok(ArrayD::from_elem(vec![], *n)),
            other => Err(Error::args(
                symbol,
                format!("expected an array, got {}", other.type_name()),
            )),
        }
    }

    /// Interpret as a vector.
    pub(crate) fn vector(&self, symbol: &str) -> Result<Array1<f64>> {
        self.array(symbol)?.into_dimensionality::<Ix1>().map_err(|_| {
            Error::args(symbol, "expected a one-dimensional array")
        })
    }

    /// Interpret as a matrix.
    pub(crate) fn matrix(&self, symbol: &str) -> Result<Array2<f64>> {
        self.array(symbol)?.into_dimensionality::<Ix2>().map_err(|_| {
            Error::args(symbol, "expected a two-dimensional array")
        })
    }

    /// Interpret as a three-dimensional array.
    pub(crate) fn volume(&self, symbol: &str) -> Result<Array3<f64>> {
        self.array(symbol)?.into_dimensionality::<Ix3>().map_err(|_| {
            Error::args(symbol, "expected a three-dimensional array")
        })
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<ArrayD<f64>> for Value {
    fn from(a: ArrayD<f64>) -> Self {
        Self::Array(a)
    }
}

impl From<Array1<f64>> for Value {
    fn from(a: Array1<f64>) -> Self {
        Self::Array(a.into_dyn())
    }
}

impl From<Array2<f64>> for Value {
    fn from(a: Array2<f64>) -> Self {
        Self::Array(a.into_dyn())
    }
}

impl From<Array3<f64>> for Value {
    fn from(a: Array3<f64>) -> Self {
        Self::Array(a.into_dyn())
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Self::Array(Array1::from(v).into_dyn())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Tuple(v)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn shape_checks() {
        let v = Value::from(array![[1.0, 2.0], [3.0, 4.0]]);
        assert!(v.matrix("surf").is_ok());
        let err = v.vector("plot").unwrap_err();
        assert!(err.to_string().starts_with("plot:"));
    }

    #[test]
    fn numbers_promote_to_arrays() {
        let a = Value::from(2.5).array("cart2sph").unwrap();
        assert_eq!(a.ndim(), 0);
        assert_eq!(a.sum(), 2.5);
    }

    #[test]
    fn text_is_not_numeric() {
        assert!(Value::from("r--").number("hold").is_err());
        assert_eq!(Value::from("r--").text("plot").unwrap(), "r--");
    }
}

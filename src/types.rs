use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Global type definitions
///
/// Stores element kinds, the boxed cell value, constants and capacity helpers used
/// globally by the table engine

/// Default row capacity for a new builder
pub const DEFAULT_ROW_CAPACITY: usize = 1000;

/// Default column capacity for a new builder
pub const DEFAULT_COL_CAPACITY: usize = 10;

/// Smallest capacity any index or array is created with
pub const MIN_CAPACITY: usize = 10;

/// Fill percent that selects dense storage
pub const DENSE_FILL_PCT: f64 = 1.0;

/// Returns the capacity to grow to so that `required` slots fit.
///
/// Capacity grows by half again each time so that repeated appends stay amortized O(1).
pub fn grow_capacity(current: usize, required: usize) -> usize {
    let grown = current.max(MIN_CAPACITY) + (current >> 1);
    grown.max(required)
}

/// Returns true if `pct` is a legal fill percent, which must be > 0 and <= 1
pub fn is_valid_fill_pct(pct: f64) -> bool {
    pct > 0.0 && pct <= DENSE_FILL_PCT
}

/// Element kind enumeration for column storage
///
/// Each primitive kind has its own unboxed storage; `Object` is the single
/// fallback for everything else and stores boxed [`Value`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayType {
    /// Boolean values
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 64-bit floating point
    Double,
    /// Boxed values of any kind
    Object,
}

impl ArrayType {
    /// Returns true if this is a numeric kind (int, long or double).
    pub fn is_numeric(&self) -> bool {
        matches!(self, ArrayType::Int | ArrayType::Long | ArrayType::Double)
    }

    /// Returns the numeric kind wide enough to hold both kinds, if both are numeric.
    ///
    /// Int widens to Long, and anything numeric widens to Double.
    pub fn widen(self, other: ArrayType) -> Option<ArrayType> {
        use ArrayType::*;
        match (self, other) {
            (a, b) if a == b => Some(a),
            (Int, Long) | (Long, Int) => Some(Long),
            (Double, Int | Long) | (Int | Long, Double) => Some(Double),
            _ => None,
        }
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayType::Boolean => write!(f, "BOOLEAN"),
            ArrayType::Int => write!(f, "INT"),
            ArrayType::Long => write!(f, "LONG"),
            ArrayType::Double => write!(f, "DOUBLE"),
            ArrayType::Object => write!(f, "OBJECT"),
        }
    }
}

/// A single boxed cell value
///
/// Object columns store these directly. Primitive columns only produce them
/// when a caller asks for a boxed read.
///
/// Doubles compare and hash by their bit pattern with every NaN treated as
/// the same value, so `Value` can be used as a row key, column key or group key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Value {
    /// Missing value
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 64-bit floating point
    Double(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Returns the element kind a typed column would need to hold this value.
    ///
    /// `Null` and `Text` both map to `Object`.
    pub fn array_type(&self) -> ArrayType {
        match self {
            Value::Boolean(_) => ArrayType::Boolean,
            Value::Int(_) => ArrayType::Int,
            Value::Long(_) => ArrayType::Long,
            Value::Double(_) => ArrayType::Double,
            Value::Null | Value::Text(_) => ArrayType::Object,
        }
    }

    /// Returns true for `Null` and for a NaN double
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Double(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of this value, if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Long(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Integral view of this value, if it is an int or long
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean view of this value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Text view of this value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Canonical bits for a double, folding every NaN onto one pattern and -0.0 onto 0.0
fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Long(v) => v.hash(state),
            Value::Double(v) => canonical_bits(*v).hash(state),
            Value::Text(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod array_type_tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_array_type_display() {
        assert_eq!(ArrayType::Boolean.to_string(), "BOOLEAN");
        assert_eq!(ArrayType::Int.to_string(), "INT");
        assert_eq!(ArrayType::Long.to_string(), "LONG");
        assert_eq!(ArrayType::Double.to_string(), "DOUBLE");
        assert_eq!(ArrayType::Object.to_string(), "OBJECT");
    }

    #[test]
    fn test_array_type_widen() {
        assert_eq!(ArrayType::Int.widen(ArrayType::Int), Some(ArrayType::Int));
        assert_eq!(ArrayType::Int.widen(ArrayType::Long), Some(ArrayType::Long));
        assert_eq!(ArrayType::Long.widen(ArrayType::Double), Some(ArrayType::Double));
        assert_eq!(ArrayType::Double.widen(ArrayType::Int), Some(ArrayType::Double));
        assert_eq!(ArrayType::Boolean.widen(ArrayType::Int), None);
        assert_eq!(ArrayType::Object.widen(ArrayType::Double), None);
    }

    #[test]
    fn test_grow_capacity() {
        assert_eq!(grow_capacity(100, 101), 150);
        assert_eq!(grow_capacity(100, 400), 400);
        assert_eq!(grow_capacity(0, 1), MIN_CAPACITY);
    }

    #[test]
    fn test_fill_pct_validation() {
        assert!(is_valid_fill_pct(1.0));
        assert!(is_valid_fill_pct(0.25));
        assert!(!is_valid_fill_pct(0.0));
        assert!(!is_valid_fill_pct(1.5));
        assert!(!is_valid_fill_pct(-0.1));
        assert!(!is_valid_fill_pct(f64::NAN));
    }

    #[test]
    fn test_value_nan_equality_and_hash() {
        let mut set = HashSet::new();
        set.insert(Value::Double(f64::NAN));
        set.insert(Value::Double(-f64::NAN));
        set.insert(Value::Double(0.0));
        set.insert(Value::Double(-0.0));
        assert_eq!(set.len(), 2);
        assert_ne!(Value::Int(1), Value::Long(1));
    }

    #[test]
    fn test_value_missing() {
        assert!(Value::Null.is_missing());
        assert!(Value::Double(f64::NAN).is_missing());
        assert!(!Value::Double(0.0).is_missing());
        assert!(!Value::Int(0).is_missing());
        assert!(!Value::from("x").is_missing());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
        assert_eq!(Value::from(3i64).as_i64(), Some(3));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(2.5).array_type(), ArrayType::Double);
        assert_eq!(Value::Null.array_type(), ArrayType::Object);
    }
}

//! ArrayBuilder for incremental column construction
//!
//! Provides a growable, ordinal-addressed column with:
//! - Dense or sparse storage chosen from the fill percent
//! - Geometric capacity growth that preserves existing values
//! - Typed setters and accumulators that never box primitives
//! - Kind resolution: the first write fixes the kind, numeric kinds widen,
//!   and any other conflict falls back to object storage

use crate::array::array::{Array, ArrayData};
use crate::error::{FrameError, FrameResult};
use crate::types::{
    grow_capacity, is_valid_fill_pct, ArrayType, Value, DENSE_FILL_PCT, MIN_CAPACITY,
};
use tracing::trace;

/// Builder for constructing [`Array`] instances
///
/// # Example
/// ```
/// use framestore::array::ArrayBuilder;
///
/// let mut builder = ArrayBuilder::new(10, 1.0).unwrap();
/// builder.set_double(0, 1.5);
/// builder.plus_double(0, 2.0).unwrap();
/// builder.set_double(25, 3.0);
///
/// let array = builder.to_array();
/// assert_eq!(array.len(), 26);
/// assert_eq!(array.get_double(0).unwrap(), 3.5);
/// assert!(array.get_double(1).unwrap().is_nan());
/// ```
#[derive(Debug, Clone)]
pub struct ArrayBuilder {
    data: Option<ArrayData>,
    capacity: usize,
    fill_pct: f64,
    len: usize,
}

impl ArrayBuilder {
    /// Create a builder whose kind is fixed by its first write
    ///
    /// `fill_pct` must be > 0 and <= 1. 1 selects dense storage, anything lower sparse.
    pub fn new(capacity: usize, fill_pct: f64) -> FrameResult<Self> {
        if !is_valid_fill_pct(fill_pct) {
            return Err(FrameError::InvalidConfig(format!(
                "fill percent must be > 0 and <= 1, not {}",
                fill_pct
            )));
        }
        Ok(Self::create(None, capacity, fill_pct))
    }

    /// Create a dense builder of an unresolved kind
    pub fn dense(capacity: usize) -> Self {
        Self::create(None, capacity, DENSE_FILL_PCT)
    }

    /// Create a builder with its kind fixed up front
    pub fn typed(kind: ArrayType, capacity: usize, fill_pct: f64) -> FrameResult<Self> {
        let builder = Self::new(capacity, fill_pct)?;
        Ok(Self::create(Some(kind), builder.capacity, fill_pct))
    }

    /// Builder for a fill percent the caller has already validated
    pub(crate) fn create(kind: Option<ArrayType>, capacity: usize, fill_pct: f64) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            data: kind.map(|kind| ArrayData::new(kind, capacity, fill_pct)),
            capacity,
            fill_pct,
            len: 0,
        }
    }

    /// Number of ordinals covered so far (highest ordinal written plus one)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ordinals that fit before the next growth
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn fill_pct(&self) -> f64 {
        self.fill_pct
    }

    pub fn is_sparse(&self) -> bool {
        self.fill_pct < DENSE_FILL_PCT
    }

    /// Element kind, once resolved by a write
    pub fn array_type(&self) -> Option<ArrayType> {
        self.data.as_ref().map(ArrayData::array_type)
    }

    /// Boxed read of the current value at an ordinal
    pub fn get_value(&self, ordinal: usize) -> Value {
        self.data
            .as_ref()
            .map(|data| data.value(ordinal))
            .unwrap_or(Value::Null)
    }

    /// Grow the capacity if needed so `ordinal` is addressable, and extend the length
    ///
    /// Returns the length covered before this call.
    fn reserve(&mut self, ordinal: usize) -> usize {
        let covered = self.len;
        if ordinal >= self.capacity {
            let capacity = grow_capacity(self.capacity, ordinal + 1);
            trace!(from = self.capacity, to = capacity, "growing array builder");
            self.capacity = capacity;
            if let Some(data) = self.data.as_mut() {
                data.ensure_capacity(capacity);
            }
        }
        if ordinal >= self.len {
            self.len = ordinal + 1;
        }
        covered
    }

    /// Storage able to take a value of `kind`, converting the current storage if required
    ///
    /// Values below `covered` survive a conversion; later ordinals read as
    /// unset in the new kind.
    fn data_for(&mut self, kind: ArrayType, covered: usize) -> &mut ArrayData {
        let (capacity, fill_pct) = (self.capacity, self.fill_pct);
        let data = self
            .data
            .get_or_insert_with(|| ArrayData::new(kind, capacity, fill_pct));
        let current = data.array_type();
        if current != kind && current != ArrayType::Object {
            let target = current.widen(kind).unwrap_or(ArrayType::Object);
            if target != current {
                trace!(from = %current, to = %target, "converting array builder storage");
                *data = data.convert(target, covered);
            }
        }
        data
    }

    /// Fail before touching anything if an accumulator cannot apply at `ordinal`
    pub(crate) fn check_numeric(&self, ordinal: usize, expected: ArrayType) -> FrameResult<()> {
        let actual = match &self.data {
            Some(ArrayData::Boolean(_)) => ArrayType::Boolean,
            Some(ArrayData::Object(_)) => match self.get_value(ordinal) {
                Value::Null | Value::Int(_) | Value::Long(_) | Value::Double(_) => return Ok(()),
                other => other.array_type(),
            },
            _ => return Ok(()),
        };
        Err(FrameError::TypeMismatch { expected, actual })
    }

    pub fn set_boolean(&mut self, ordinal: usize, value: bool) {
        let covered = self.reserve(ordinal);
        match self.data_for(ArrayType::Boolean, covered) {
            ArrayData::Boolean(s) => s.set(ordinal, value),
            ArrayData::Object(s) => s.set(ordinal, Value::Boolean(value)),
            _ => unreachable!("boolean writes resolve to boolean or object storage"),
        }
    }

    pub fn set_int(&mut self, ordinal: usize, value: i32) {
        let covered = self.reserve(ordinal);
        match self.data_for(ArrayType::Int, covered) {
            ArrayData::Int(s) => s.set(ordinal, value),
            ArrayData::Long(s) => s.set(ordinal, value as i64),
            ArrayData::Double(s) => s.set(ordinal, value as f64),
            ArrayData::Object(s) => s.set(ordinal, Value::Int(value)),
            ArrayData::Boolean(_) => unreachable!("int writes never resolve to boolean storage"),
        }
    }

    pub fn set_long(&mut self, ordinal: usize, value: i64) {
        let covered = self.reserve(ordinal);
        match self.data_for(ArrayType::Long, covered) {
            ArrayData::Long(s) => s.set(ordinal, value),
            ArrayData::Double(s) => s.set(ordinal, value as f64),
            ArrayData::Object(s) => s.set(ordinal, Value::Long(value)),
            _ => unreachable!("long writes resolve to long, double or object storage"),
        }
    }

    pub fn set_double(&mut self, ordinal: usize, value: f64) {
        let covered = self.reserve(ordinal);
        match self.data_for(ArrayType::Double, covered) {
            ArrayData::Double(s) => s.set(ordinal, value),
            ArrayData::Object(s) => s.set(ordinal, Value::Double(value)),
            _ => unreachable!("double writes resolve to double or object storage"),
        }
    }

    /// Write a boxed value, unboxing primitives into typed storage
    ///
    /// A null written into a double column is stored as NaN.
    pub fn set_value(&mut self, ordinal: usize, value: Value) {
        if self.array_type() == Some(ArrayType::Object) {
            self.set_object(ordinal, value);
            return;
        }
        match value {
            Value::Boolean(v) => self.set_boolean(ordinal, v),
            Value::Int(v) => self.set_int(ordinal, v),
            Value::Long(v) => self.set_long(ordinal, v),
            Value::Double(v) => self.set_double(ordinal, v),
            Value::Null if self.array_type() == Some(ArrayType::Double) => {
                self.set_double(ordinal, f64::NAN)
            }
            other => self.set_object(ordinal, other),
        }
    }

    fn set_object(&mut self, ordinal: usize, value: Value) {
        let covered = self.reserve(ordinal);
        match self.data_for(ArrayType::Object, covered) {
            ArrayData::Object(s) => s.set(ordinal, value),
            _ => unreachable!("object writes always resolve to object storage"),
        }
    }

    /// Add to the value at an ordinal, treating an unset value as zero
    pub fn plus_int(&mut self, ordinal: usize, value: i32) -> FrameResult<()> {
        self.check_numeric(ordinal, ArrayType::Int)?;
        let covered = self.reserve(ordinal);
        match self.data_for(ArrayType::Int, covered) {
            ArrayData::Int(s) => {
                let prior = *s.get(ordinal);
                s.set(ordinal, prior.wrapping_add(value));
            }
            ArrayData::Long(s) => {
                let prior = *s.get(ordinal);
                s.set(ordinal, prior.wrapping_add(value as i64));
            }
            ArrayData::Double(s) => {
                let prior = zero_if_nan(*s.get(ordinal));
                s.set(ordinal, prior + value as f64);
            }
            ArrayData::Object(s) => {
                let sum = plus_boxed(s.get(ordinal), Value::Int(value));
                s.set(ordinal, sum);
            }
            ArrayData::Boolean(_) => unreachable!("rejected by check_numeric"),
        }
        Ok(())
    }

    /// Add to the value at an ordinal, treating an unset value as zero
    pub fn plus_long(&mut self, ordinal: usize, value: i64) -> FrameResult<()> {
        self.check_numeric(ordinal, ArrayType::Long)?;
        let covered = self.reserve(ordinal);
        match self.data_for(ArrayType::Long, covered) {
            ArrayData::Long(s) => {
                let prior = *s.get(ordinal);
                s.set(ordinal, prior.wrapping_add(value));
            }
            ArrayData::Double(s) => {
                let prior = zero_if_nan(*s.get(ordinal));
                s.set(ordinal, prior + value as f64);
            }
            ArrayData::Object(s) => {
                let sum = plus_boxed(s.get(ordinal), Value::Long(value));
                s.set(ordinal, sum);
            }
            _ => unreachable!("rejected by check_numeric or widened to long"),
        }
        Ok(())
    }

    /// Add to the value at an ordinal, treating an unset (NaN) value as zero
    pub fn plus_double(&mut self, ordinal: usize, value: f64) -> FrameResult<()> {
        self.check_numeric(ordinal, ArrayType::Double)?;
        let covered = self.reserve(ordinal);
        match self.data_for(ArrayType::Double, covered) {
            ArrayData::Double(s) => {
                let prior = zero_if_nan(*s.get(ordinal));
                s.set(ordinal, prior + value);
            }
            ArrayData::Object(s) => {
                let sum = plus_boxed(s.get(ordinal), Value::Double(value));
                s.set(ordinal, sum);
            }
            _ => unreachable!("rejected by check_numeric or widened to double"),
        }
        Ok(())
    }

    /// Finalize into an independent array covering the current length
    pub fn to_array(&self) -> Array {
        self.finish(self.len)
    }

    /// Finalize into an independent array of exactly `len` ordinals
    ///
    /// Ordinals beyond the builder's length read as unset. Later writes to
    /// this builder are not visible through the returned array.
    pub fn finish(&self, len: usize) -> Array {
        let data = match &self.data {
            Some(data) => data.snapshot(len),
            None => ArrayData::new(ArrayType::Object, 0, self.fill_pct).snapshot(len),
        };
        Array::from_data(data, len, self.fill_pct)
    }
}

fn zero_if_nan(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

/// Numeric sum of two boxed values, keeping the narrowest kind that holds it
fn plus_boxed(prior: &Value, value: Value) -> Value {
    match (prior, value) {
        (Value::Null, value) => value,
        (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(b)),
        (Value::Int(a), Value::Long(b)) => Value::Long((*a as i64).wrapping_add(b)),
        (Value::Long(a), Value::Int(b)) => Value::Long(a.wrapping_add(b as i64)),
        (Value::Long(a), Value::Long(b)) => Value::Long(a.wrapping_add(b)),
        (prior, value) => {
            let a = prior.as_f64().map(zero_if_nan).unwrap_or(0.0);
            let b = value.as_f64().unwrap_or(0.0);
            Value::Double(a + b)
        }
    }
}

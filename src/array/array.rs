//! Finalized, typed column arrays

use crate::array::store::{Element, Store};
use crate::error::{FrameError, FrameResult};
use crate::types::{ArrayType, Value, DENSE_FILL_PCT};
use std::ops::Range;

/// Type-tagged storage shared by [`Array`] and the array builder
#[derive(Debug, Clone)]
pub(crate) enum ArrayData {
    Boolean(Store<bool>),
    Int(Store<i32>),
    Long(Store<i64>),
    Double(Store<f64>),
    Object(Store<Value>),
}

fn boxed<T: Element + Copy + Into<Value>>(store: &Store<T>, len: usize) -> Store<Value> {
    store.convert(len, |v| (*v).into())
}

impl ArrayData {
    pub(crate) fn new(kind: ArrayType, capacity: usize, fill_pct: f64) -> Self {
        match kind {
            ArrayType::Boolean => ArrayData::Boolean(Store::new(capacity, fill_pct)),
            ArrayType::Int => ArrayData::Int(Store::new(capacity, fill_pct)),
            ArrayType::Long => ArrayData::Long(Store::new(capacity, fill_pct)),
            ArrayType::Double => ArrayData::Double(Store::new(capacity, fill_pct)),
            ArrayType::Object => ArrayData::Object(Store::new(capacity, fill_pct)),
        }
    }

    pub(crate) fn array_type(&self) -> ArrayType {
        match self {
            ArrayData::Boolean(_) => ArrayType::Boolean,
            ArrayData::Int(_) => ArrayType::Int,
            ArrayData::Long(_) => ArrayType::Long,
            ArrayData::Double(_) => ArrayType::Double,
            ArrayData::Object(_) => ArrayType::Object,
        }
    }

    pub(crate) fn is_sparse(&self) -> bool {
        match self {
            ArrayData::Boolean(s) => s.is_sparse(),
            ArrayData::Int(s) => s.is_sparse(),
            ArrayData::Long(s) => s.is_sparse(),
            ArrayData::Double(s) => s.is_sparse(),
            ArrayData::Object(s) => s.is_sparse(),
        }
    }

    pub(crate) fn ensure_capacity(&mut self, capacity: usize) {
        match self {
            ArrayData::Boolean(s) => s.ensure_capacity(capacity),
            ArrayData::Int(s) => s.ensure_capacity(capacity),
            ArrayData::Long(s) => s.ensure_capacity(capacity),
            ArrayData::Double(s) => s.ensure_capacity(capacity),
            ArrayData::Object(s) => s.ensure_capacity(capacity),
        }
    }

    pub(crate) fn snapshot(&self, len: usize) -> Self {
        match self {
            ArrayData::Boolean(s) => ArrayData::Boolean(s.snapshot(len)),
            ArrayData::Int(s) => ArrayData::Int(s.snapshot(len)),
            ArrayData::Long(s) => ArrayData::Long(s.snapshot(len)),
            ArrayData::Double(s) => ArrayData::Double(s.snapshot(len)),
            ArrayData::Object(s) => ArrayData::Object(s.snapshot(len)),
        }
    }

    pub(crate) fn select(&self, ordinals: &[usize]) -> Self {
        match self {
            ArrayData::Boolean(s) => ArrayData::Boolean(s.select(ordinals)),
            ArrayData::Int(s) => ArrayData::Int(s.select(ordinals)),
            ArrayData::Long(s) => ArrayData::Long(s.select(ordinals)),
            ArrayData::Double(s) => ArrayData::Double(s.select(ordinals)),
            ArrayData::Object(s) => ArrayData::Object(s.select(ordinals)),
        }
    }

    /// Boxed value at an ordinal
    pub(crate) fn value(&self, ordinal: usize) -> Value {
        match self {
            ArrayData::Boolean(s) => Value::Boolean(*s.get(ordinal)),
            ArrayData::Int(s) => Value::Int(*s.get(ordinal)),
            ArrayData::Long(s) => Value::Long(*s.get(ordinal)),
            ArrayData::Double(s) => Value::Double(*s.get(ordinal)),
            ArrayData::Object(s) => s.get(ordinal).clone(),
        }
    }

    /// Numeric value at an ordinal, NaN where the cell is not numeric
    pub(crate) fn double_or_nan(&self, ordinal: usize) -> f64 {
        match self {
            ArrayData::Double(s) => *s.get(ordinal),
            ArrayData::Int(s) => *s.get(ordinal) as f64,
            ArrayData::Long(s) => *s.get(ordinal) as f64,
            ArrayData::Object(s) => s.get(ordinal).as_f64().unwrap_or(f64::NAN),
            ArrayData::Boolean(_) => f64::NAN,
        }
    }

    pub(crate) fn is_missing(&self, ordinal: usize) -> bool {
        match self {
            ArrayData::Double(s) => s.get(ordinal).is_nan(),
            ArrayData::Object(s) => s.get(ordinal).is_missing(),
            _ => false,
        }
    }

    /// Convert into storage of another kind
    ///
    /// Numeric kinds widen element by element; every other conversion boxes
    /// into an object store. The dense or sparse representation is kept.
    /// Ordinals below `len` keep their current value; the rest read as unset
    /// in the new kind.
    pub(crate) fn convert(&self, kind: ArrayType, len: usize) -> Self {
        match (self, kind) {
            (data, kind) if data.array_type() == kind => data.clone(),
            (ArrayData::Int(s), ArrayType::Long) => ArrayData::Long(s.convert(len, |v| *v as i64)),
            (ArrayData::Int(s), ArrayType::Double) => {
                ArrayData::Double(s.convert(len, |v| *v as f64))
            }
            (ArrayData::Long(s), ArrayType::Double) => {
                ArrayData::Double(s.convert(len, |v| *v as f64))
            }
            (ArrayData::Boolean(s), _) => ArrayData::Object(boxed(s, len)),
            (ArrayData::Int(s), _) => ArrayData::Object(boxed(s, len)),
            (ArrayData::Long(s), _) => ArrayData::Object(boxed(s, len)),
            (ArrayData::Double(s), _) => ArrayData::Object(boxed(s, len)),
            (ArrayData::Object(s), _) => ArrayData::Object(s.clone()),
        }
    }
}

/// An immutable, typed column of values addressed by ordinal
///
/// Produced by [`ArrayBuilder`](crate::array::ArrayBuilder) or one of the
/// `of_*` constructors. Primitive kinds are stored unboxed; typed getters
/// read them without allocation.
///
/// # Example
/// ```
/// use framestore::array::Array;
///
/// let array = Array::of_ints(vec![1, 2, 3]);
/// assert_eq!(array.get_int(1).unwrap(), 2);
/// assert_eq!(array.get_double(2).unwrap(), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct Array {
    data: ArrayData,
    len: usize,
    fill_pct: f64,
}

impl Array {
    pub(crate) fn from_data(data: ArrayData, len: usize, fill_pct: f64) -> Self {
        Self { data, len, fill_pct }
    }

    pub(crate) fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Dense array of `len` unset values of the given kind
    pub fn of_type(kind: ArrayType, len: usize) -> Self {
        Self::from_data(ArrayData::new(kind, len, DENSE_FILL_PCT), len, DENSE_FILL_PCT)
    }

    pub fn of_booleans(values: Vec<bool>) -> Self {
        let len = values.len();
        Self::from_data(ArrayData::Boolean(Store::from_vec(values)), len, DENSE_FILL_PCT)
    }

    pub fn of_ints(values: Vec<i32>) -> Self {
        let len = values.len();
        Self::from_data(ArrayData::Int(Store::from_vec(values)), len, DENSE_FILL_PCT)
    }

    pub fn of_longs(values: Vec<i64>) -> Self {
        let len = values.len();
        Self::from_data(ArrayData::Long(Store::from_vec(values)), len, DENSE_FILL_PCT)
    }

    pub fn of_doubles(values: Vec<f64>) -> Self {
        let len = values.len();
        Self::from_data(ArrayData::Double(Store::from_vec(values)), len, DENSE_FILL_PCT)
    }

    pub fn of_values(values: Vec<Value>) -> Self {
        let len = values.len();
        Self::from_data(ArrayData::Object(Store::from_vec(values)), len, DENSE_FILL_PCT)
    }

    /// Element kind of this array
    pub fn array_type(&self) -> ArrayType {
        self.data.array_type()
    }

    /// Number of ordinals in this array
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if only non-default values hold their own storage
    pub fn is_sparse(&self) -> bool {
        self.data.is_sparse()
    }

    /// Fill percent this array was built with
    pub fn fill_pct(&self) -> f64 {
        self.fill_pct
    }

    /// Copy of this array resized to `len`, padding with unset values
    pub fn resized(&self, len: usize) -> Self {
        Self::from_data(self.data.snapshot(len), len, self.fill_pct)
    }

    /// Copy of the values at `ordinals`, in that order
    pub(crate) fn select(&self, ordinals: &[usize]) -> Self {
        Self::from_data(self.data.select(ordinals), ordinals.len(), self.fill_pct)
    }

    fn check(&self, ordinal: usize) -> FrameResult<()> {
        if ordinal < self.len {
            Ok(())
        } else {
            Err(FrameError::OutOfBounds {
                ordinal,
                len: self.len,
            })
        }
    }

    fn mismatch(&self, expected: ArrayType) -> FrameError {
        FrameError::TypeMismatch {
            expected,
            actual: self.array_type(),
        }
    }

    pub fn get_boolean(&self, ordinal: usize) -> FrameResult<bool> {
        self.check(ordinal)?;
        match &self.data {
            ArrayData::Boolean(s) => Ok(*s.get(ordinal)),
            ArrayData::Object(s) => s
                .get(ordinal)
                .as_bool()
                .ok_or_else(|| self.mismatch(ArrayType::Boolean)),
            _ => Err(self.mismatch(ArrayType::Boolean)),
        }
    }

    pub fn get_int(&self, ordinal: usize) -> FrameResult<i32> {
        self.check(ordinal)?;
        match &self.data {
            ArrayData::Int(s) => Ok(*s.get(ordinal)),
            ArrayData::Object(s) => match s.get(ordinal) {
                Value::Int(v) => Ok(*v),
                _ => Err(self.mismatch(ArrayType::Int)),
            },
            _ => Err(self.mismatch(ArrayType::Int)),
        }
    }

    /// Read a long, widening from int
    pub fn get_long(&self, ordinal: usize) -> FrameResult<i64> {
        self.check(ordinal)?;
        match &self.data {
            ArrayData::Long(s) => Ok(*s.get(ordinal)),
            ArrayData::Int(s) => Ok(*s.get(ordinal) as i64),
            ArrayData::Object(s) => s
                .get(ordinal)
                .as_i64()
                .ok_or_else(|| self.mismatch(ArrayType::Long)),
            _ => Err(self.mismatch(ArrayType::Long)),
        }
    }

    /// Read a double, widening from int and long
    ///
    /// A null object cell reads as NaN.
    pub fn get_double(&self, ordinal: usize) -> FrameResult<f64> {
        self.check(ordinal)?;
        match &self.data {
            ArrayData::Boolean(_) => Err(self.mismatch(ArrayType::Double)),
            ArrayData::Object(s) => match s.get(ordinal) {
                Value::Null => Ok(f64::NAN),
                value => value.as_f64().ok_or_else(|| self.mismatch(ArrayType::Double)),
            },
            data => Ok(data.double_or_nan(ordinal)),
        }
    }

    /// Read any cell as a boxed value
    pub fn get_value(&self, ordinal: usize) -> FrameResult<Value> {
        self.check(ordinal)?;
        Ok(self.data.value(ordinal))
    }

    /// Returns true if the cell is null or NaN
    pub fn is_missing(&self, ordinal: usize) -> FrameResult<bool> {
        self.check(ordinal)?;
        Ok(self.data.is_missing(ordinal))
    }

    pub(crate) fn set_boolean(&mut self, ordinal: usize, value: bool) -> FrameResult<()> {
        self.check(ordinal)?;
        match &mut self.data {
            ArrayData::Boolean(s) => s.set(ordinal, value),
            ArrayData::Object(s) => s.set(ordinal, Value::Boolean(value)),
            _ => return Err(self.mismatch(ArrayType::Boolean)),
        }
        Ok(())
    }

    pub(crate) fn set_int(&mut self, ordinal: usize, value: i32) -> FrameResult<()> {
        self.check(ordinal)?;
        match &mut self.data {
            ArrayData::Int(s) => s.set(ordinal, value),
            ArrayData::Long(s) => s.set(ordinal, value as i64),
            ArrayData::Double(s) => s.set(ordinal, value as f64),
            ArrayData::Object(s) => s.set(ordinal, Value::Int(value)),
            ArrayData::Boolean(_) => return Err(self.mismatch(ArrayType::Int)),
        }
        Ok(())
    }

    pub(crate) fn set_long(&mut self, ordinal: usize, value: i64) -> FrameResult<()> {
        self.check(ordinal)?;
        match &mut self.data {
            ArrayData::Long(s) => s.set(ordinal, value),
            ArrayData::Double(s) => s.set(ordinal, value as f64),
            ArrayData::Object(s) => s.set(ordinal, Value::Long(value)),
            _ => return Err(self.mismatch(ArrayType::Long)),
        }
        Ok(())
    }

    pub(crate) fn set_double(&mut self, ordinal: usize, value: f64) -> FrameResult<()> {
        self.check(ordinal)?;
        match &mut self.data {
            ArrayData::Double(s) => s.set(ordinal, value),
            ArrayData::Object(s) => s.set(ordinal, Value::Double(value)),
            _ => return Err(self.mismatch(ArrayType::Double)),
        }
        Ok(())
    }

    /// Write a boxed value, unboxing it into a typed column when the kinds agree
    pub(crate) fn set_value(&mut self, ordinal: usize, value: Value) -> FrameResult<()> {
        self.check(ordinal)?;
        if let ArrayData::Object(s) = &mut self.data {
            s.set(ordinal, value);
            return Ok(());
        }
        match value {
            Value::Boolean(v) => self.set_boolean(ordinal, v),
            Value::Int(v) => self.set_int(ordinal, v),
            Value::Long(v) => self.set_long(ordinal, v),
            Value::Double(v) => self.set_double(ordinal, v),
            Value::Null if self.array_type() == ArrayType::Double => {
                self.set_double(ordinal, f64::NAN)
            }
            other => Err(FrameError::TypeMismatch {
                expected: self.array_type(),
                actual: other.array_type(),
            }),
        }
    }

    /// Lazy sequence of every value as a double
    ///
    /// Fails for boolean columns. Non-numeric object cells read as NaN.
    pub fn doubles(&self) -> FrameResult<Doubles<'_>> {
        Doubles::new(self, Positions::All(0..self.len))
    }

    /// Lazy sequence of every value boxed
    pub fn values(&self) -> Values<'_> {
        Values {
            data: &self.data,
            positions: Positions::All(0..self.len),
        }
    }
}

/// Ordinals visited by a column iterator
#[derive(Debug, Clone)]
pub(crate) enum Positions<'a> {
    All(Range<usize>),
    Subset(std::slice::Iter<'a, usize>),
}

impl Iterator for Positions<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Positions::All(range) => range.next(),
            Positions::Subset(iter) => iter.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Positions::All(range) => range.size_hint(),
            Positions::Subset(iter) => iter.size_hint(),
        }
    }
}

/// Iterator over the values of an [`Array`] as doubles
#[derive(Debug, Clone)]
pub struct Doubles<'a> {
    data: &'a ArrayData,
    positions: Positions<'a>,
}

impl<'a> Doubles<'a> {
    pub(crate) fn new(array: &'a Array, positions: Positions<'a>) -> FrameResult<Self> {
        if array.array_type() == ArrayType::Boolean {
            return Err(array.mismatch(ArrayType::Double));
        }
        Ok(Self {
            data: &array.data,
            positions,
        })
    }
}

impl Iterator for Doubles<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.positions
            .next()
            .map(|ordinal| self.data.double_or_nan(ordinal))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for Doubles<'_> {}

/// Iterator over the values of an [`Array`] boxed
#[derive(Debug, Clone)]
pub struct Values<'a> {
    data: &'a ArrayData,
    positions: Positions<'a>,
}

impl<'a> Values<'a> {
    pub(crate) fn new(array: &'a Array, positions: Positions<'a>) -> Self {
        Self {
            data: &array.data,
            positions,
        }
    }
}

impl Iterator for Values<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.positions.next().map(|ordinal| self.data.value(ordinal))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}

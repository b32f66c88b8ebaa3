use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{
    Bound, Index, IndexMut, Range, RangeBounds, RangeFrom, RangeFull, RangeInclusive, RangeTo,
    RangeToInclusive,
};
use std::slice;
use std::vec;

use dynrec_types::errors::RecordError;
use dynrec_types::indexmap::IndexMap;
use dynrec_types::serde::de::Error;
use dynrec_types::serde::{Deserialize, Deserializer, Serialize, Serializer};
use dynrec_types::{serde_json, value_to_json, Value};

use crate::args::Args;
use crate::record_type::RecordType;
use crate::schema::Schema;

/// One record: a handle to its type plus exactly one value per declared
/// field. Fields can never be added or removed after construction.
#[derive(Clone)]
pub struct Record {
    ty: RecordType,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(ty: RecordType, values: Vec<Value>) -> Record {
        Record { ty, values }
    }

    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn get(&self, field: &str) -> Result<&Value, RecordError> {
        match self.ty.index_of(field) {
            Some(idx) => Ok(&self.values[idx]),
            None => Err(RecordError::UnknownField(field.to_string())),
        }
    }

    pub fn get_mut(&mut self, field: &str) -> Result<&mut Value, RecordError> {
        match self.ty.index_of(field) {
            Some(idx) => Ok(&mut self.values[idx]),
            None => Err(RecordError::UnknownField(field.to_string())),
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        match self.ty.index_of(field) {
            Some(idx) => {
                self.values[idx] = value.into();
                Ok(())
            }
            None => Err(RecordError::UnknownField(field.to_string())),
        }
    }

    pub fn get_at(&self, index: usize) -> Result<&Value, RecordError> {
        let len = self.values.len();
        match self.values.get(index) {
            Some(value) => Ok(value),
            None => Err(RecordError::IndexOutOfRange { index, len }),
        }
    }

    pub fn get_at_mut(&mut self, index: usize) -> Result<&mut Value, RecordError> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(value) => Ok(value),
            None => Err(RecordError::IndexOutOfRange { index, len }),
        }
    }

    pub fn set_at(&mut self, index: usize, value: impl Into<Value>) -> Result<(), RecordError> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(RecordError::IndexOutOfRange { index, len }),
        }
    }

    /// Assigns supplied values to the range in order. Surplus values are
    /// discarded, trailing range positions keep their previous values and
    /// out-of-range bounds are clamped. The record never changes size.
    pub fn set_range<R, I>(&mut self, range: R, values: I)
    where
        R: RangeBounds<usize>,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let num_fields = self.values.len();
        let start = match range.start_bound() {
            Bound::Included(start) => *start,
            Bound::Excluded(start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(end) => end.saturating_add(1),
            Bound::Excluded(end) => *end,
            Bound::Unbounded => num_fields,
        };
        let end = end.min(num_fields);
        let start = start.min(end);
        for (slot, value) in self.values[start..end].iter_mut().zip(values) {
            *slot = value.into();
        }
    }

    /// Assigns only the fields mentioned; every name is validated before any
    /// slot is written, so a failed update leaves the record unchanged.
    pub fn update(&mut self, args: Args) -> Result<(), RecordError> {
        let Args { positional, named } = args;
        let indices = self.ty.resolve_named(positional.len(), &named)?;
        for (idx, value) in positional.into_iter().enumerate() {
            self.values[idx] = value;
        }
        for (idx, (_, value)) in indices.into_iter().zip(named) {
            self.values[idx] = value;
        }
        Ok(())
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }

    pub fn count(&self, value: &Value) -> usize {
        self.values.iter().filter(|v| *v == value).count()
    }

    /// Index of the first field holding `value`.
    pub fn position(&self, value: &Value) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Name to value association in declared field order.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.ty
            .fieldnames()
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }

    pub fn items(&self) -> Vec<(String, Value)> {
        self.ty
            .fieldnames()
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }

    /// JSON object export in declared field order.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (name, value) in self.ty.fieldnames().iter().zip(&self.values) {
            object.insert(name.clone(), value_to_json(value));
        }
        serde_json::Value::Object(object)
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for Record {
    type Item = Value;
    type IntoIter = vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl Index<usize> for Record {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl IndexMut<usize> for Record {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        &mut self.values[index]
    }
}

impl Index<&str> for Record {
    type Output = Value;

    fn index(&self, field: &str) -> &Value {
        match self.ty.index_of(field) {
            Some(idx) => &self.values[idx],
            None => panic!("field {:?} is not defined", field),
        }
    }
}

impl IndexMut<&str> for Record {
    fn index_mut(&mut self, field: &str) -> &mut Value {
        match self.ty.index_of(field) {
            Some(idx) => &mut self.values[idx],
            None => panic!("field {:?} is not defined", field),
        }
    }
}

macro_rules! impl_range_index {
    ($($range:ty),* $(,)?) => {
        $(
            impl Index<$range> for Record {
                type Output = [Value];

                fn index(&self, range: $range) -> &[Value] {
                    &self.values[range]
                }
            }
        )*
    };
}

impl_range_index!(
    Range<usize>,
    RangeFrom<usize>,
    RangeTo<usize>,
    RangeFull,
    RangeInclusive<usize>,
    RangeToInclusive<usize>,
);

/// Structural equality: same shape (see [`RecordType`]) and element-wise
/// equal values.
impl PartialEq for Record {
    fn eq(&self, other: &Record) -> bool {
        self.ty == other.ty && self.values == other.values
    }
}

impl Eq for Record {}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ty.typename())?;
        for (i, (name, value)) in self.ty.fieldnames().iter().zip(&self.values).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str(")")
    }
}

impl Debug for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RecordRepr {
            typename: self.ty.typename().to_string(),
            fields: self.ty.fieldnames().to_vec(),
            values: self.values.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Record, D::Error>
    where
        D: Deserializer<'de>,
    {
        let RecordRepr {
            typename,
            fields,
            values,
        } = RecordRepr::deserialize(deserializer)?;
        if values.len() != fields.len() {
            return Err(D::Error::custom(format!(
                "record {:?} carries {} values for {} fields",
                typename,
                values.len(),
                fields.len()
            )));
        }
        let schema = Schema::from_validated(fields).map_err(D::Error::custom)?;
        let ty = RecordType::new(typename, schema).map_err(D::Error::custom)?;
        Ok(Record { ty, values })
    }
}

// Factories do not serialize; a deserialized record's type carries an empty
// defaults table.
#[derive(Serialize, Deserialize)]
#[serde(crate = "dynrec_types::serde")]
struct RecordRepr {
    typename: String,
    fields: Vec<String>,
    values: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let ty = RecordType::parse("Rec", "a, b, c").unwrap();
        ty.from_values([1, 2, 3]).unwrap()
    }

    #[test]
    fn test_named_access() {
        let mut rec = sample();
        assert_eq!(rec.get("b").unwrap(), &Value::Int(2));
        assert_eq!(rec["b"], Value::Int(2));
        rec.set("b", 7).unwrap();
        assert_eq!(rec["b"], Value::Int(7));
        rec["b"] = Value::Int(8);
        assert_eq!(rec.get("b").unwrap(), &Value::Int(8));

        assert_eq!(
            rec.get("z").unwrap_err(),
            RecordError::UnknownField("z".to_string())
        );
        assert_eq!(
            rec.set("z", 1).unwrap_err(),
            RecordError::UnknownField("z".to_string())
        );
    }

    #[test]
    fn test_positional_access() {
        let mut rec = sample();
        assert_eq!(rec[0], Value::Int(1));
        rec[0] = Value::Int(9);
        assert_eq!(rec.get_at(0).unwrap(), &Value::Int(9));
        rec.set_at(2, 30).unwrap();
        assert_eq!(rec[2], Value::Int(30));

        assert_eq!(
            rec.get_at(3).unwrap_err(),
            RecordError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            rec.set_at(9, 0).unwrap_err(),
            RecordError::IndexOutOfRange { index: 9, len: 3 }
        );
    }

    #[test]
    fn test_range_access() {
        let rec = sample();
        assert_eq!(&rec[1..3], &[Value::Int(2), Value::Int(3)]);
        assert_eq!(&rec[..2], &[Value::Int(1), Value::Int(2)]);
        assert_eq!(rec[..].len(), 3);
        assert_eq!(&rec[1..=1], &[Value::Int(2)]);
    }

    #[test]
    fn test_set_range_discards_surplus_values() {
        let mut rec = sample();
        rec.set_range(.., [10, 20, 30, 40, 50]);
        assert_eq!(
            rec.values(),
            &[Value::Int(10), Value::Int(20), Value::Int(30)]
        );
    }

    #[test]
    fn test_set_range_keeps_trailing_values() {
        let mut rec = sample();
        rec.set_range(.., [10]);
        assert_eq!(
            rec.values(),
            &[Value::Int(10), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn test_set_range_clamps_bounds() {
        let mut rec = sample();
        rec.set_range(1..10, [20, 30, 40]);
        assert_eq!(
            rec.values(),
            &[Value::Int(1), Value::Int(20), Value::Int(30)]
        );
        // start past the end is a no-op
        rec.set_range(5..9, [99]);
        assert_eq!(rec.len(), 3);
        assert_eq!(rec[2], Value::Int(30));
    }

    #[test]
    fn test_update_assigns_only_mentioned_fields() {
        let mut rec = sample();
        rec.update(Args::new().field("c", 30).field("a", 10)).unwrap();
        assert_eq!(
            rec.values(),
            &[Value::Int(10), Value::Int(2), Value::Int(30)]
        );
        rec.update(Args::new().value(100)).unwrap();
        assert_eq!(rec[0], Value::Int(100));
    }

    #[test]
    fn test_update_is_atomic_on_error() {
        let mut rec = sample();
        let err = rec
            .update(Args::new().field("a", 10).field("z", 1))
            .unwrap_err();
        assert_eq!(err, RecordError::UnknownField("z".to_string()));
        assert_eq!(rec, sample());

        let err = rec
            .update(Args::new().value(10).field("a", 11))
            .unwrap_err();
        assert_eq!(err, RecordError::MultipleValues("a".to_string()));
        assert_eq!(rec, sample());
    }

    #[test]
    fn test_iteration() {
        let rec = sample();
        let forward: Vec<&Value> = rec.iter().collect();
        assert_eq!(forward, [&Value::Int(1), &Value::Int(2), &Value::Int(3)]);
        let backward: Vec<&Value> = rec.iter().rev().collect();
        assert_eq!(backward, [&Value::Int(3), &Value::Int(2), &Value::Int(1)]);
        let owned: Vec<Value> = sample().into_iter().collect();
        assert_eq!(owned.len(), 3);
    }

    #[test]
    fn test_membership_queries() {
        let ty = RecordType::parse("Rec", "a b c d").unwrap();
        let rec = ty.from_values([1, 2, 3, 1]).unwrap();
        assert!(rec.contains(&Value::Int(2)));
        assert!(!rec.contains(&Value::Int(4)));
        assert_eq!(rec.count(&Value::Int(1)), 2);
        assert_eq!(rec.position(&Value::Int(1)), Some(0));
        assert_eq!(rec.position(&Value::Int(4)), None);
    }

    #[test]
    fn test_exports() {
        let rec = sample();
        let map = rec.to_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(map["b"], Value::Int(2));

        let items = rec.items();
        assert_eq!(items[0], ("a".to_string(), Value::Int(1)));

        assert_eq!(
            rec.to_json(),
            serde_json::json!({"a": 1, "b": 2, "c": 3})
        );
    }

    #[test]
    fn test_display() {
        let ty = RecordType::parse("Rec", "a, b").unwrap();
        let rec = ty.create(Args::new().value("1").field("b", 2)).unwrap();
        assert_eq!(rec.to_string(), "Rec(a=\"1\", b=2)");
        assert_eq!(format!("{:?}", rec), "Rec(a=\"1\", b=2)");

        let empty = RecordType::parse("Empty", "").unwrap();
        assert_eq!(empty.create(Args::new()).unwrap().to_string(), "Empty()");
    }

    #[test]
    fn test_equality() {
        let ty = RecordType::parse("Rec", "a, b").unwrap();
        let rec = ty.from_values([1, 2]).unwrap();
        assert_eq!(rec, rec.clone());
        assert_eq!(rec, ty.from_values([1, 2]).unwrap());
        assert_ne!(rec, ty.from_values([1, 3]).unwrap());

        // same shape built independently
        let same_shape = RecordType::parse("Rec", "a, b").unwrap();
        assert_eq!(rec, same_shape.from_values([1, 2]).unwrap());

        // same values under a different typename or field set
        let other_name = RecordType::parse("Other", "a, b").unwrap();
        assert_ne!(rec, other_name.from_values([1, 2]).unwrap());
        let other_fields = RecordType::parse("Rec", "a, z").unwrap();
        assert_ne!(rec, other_fields.from_values([1, 2]).unwrap());
    }

    #[test]
    fn test_serde_round_trip() {
        let ty = RecordType::parse("Rec", "a, b").unwrap();
        let rec = ty
            .create(
                Args::new()
                    .value(Value::Array(vec![Value::Int(1), Value::Null]))
                    .field("b", "x"),
            )
            .unwrap();
        let json = serde_json::to_string(&rec).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
        assert_eq!(back.record_type().typename(), "Rec");
        assert!(back.record_type().defaults().is_empty());
    }

    #[test]
    fn test_deserialize_rejects_corrupt_input() {
        let err = serde_json::from_str::<Record>(
            r#"{"typename":"Rec","fields":["a","b"],"values":[{"Int":1}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("2 fields"));

        assert!(serde_json::from_str::<Record>(
            r#"{"typename":"Rec","fields":["a","a"],"values":[{"Int":1},{"Int":2}]}"#,
        )
        .is_err());
    }

    #[test]
    #[should_panic(expected = "is not defined")]
    fn test_index_panics_on_unknown_field() {
        let _ = sample()["z"];
    }
}

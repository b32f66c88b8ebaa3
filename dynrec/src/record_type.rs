use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use dynrec_types::errors::{RecordError, SchemaError};
use dynrec_types::indexmap::IndexMap;
use dynrec_types::parking_lot::RwLock;
use dynrec_types::Value;

use crate::args::Args;
use crate::defaults::DefaultValue;
use crate::record::Record;
use crate::schema::{validate_typename, Schema};

/// A runtime-defined record shape, shared by every record built from it.
/// The field layout is immutable after creation; clones of the handle share
/// one defaults table.
#[derive(Clone)]
pub struct RecordType(Arc<Inner>);

struct Inner {
    typename: String,
    fields: Box<[String]>,
    index: HashMap<String, usize>,
    defaults: RwLock<IndexMap<String, DefaultValue>>,
}

impl RecordType {
    pub fn new(typename: impl Into<String>, schema: Schema) -> Result<RecordType, SchemaError> {
        let typename = typename.into();
        validate_typename(&typename)?;
        let (fields, index, defaults) = schema.into_parts();
        Ok(RecordType(Arc::new(Inner {
            typename,
            fields,
            index,
            defaults: RwLock::new(defaults),
        })))
    }

    /// One-call form for the string field specification, without renaming.
    pub fn parse(typename: impl Into<String>, spec: &str) -> Result<RecordType, SchemaError> {
        RecordType::new(typename, Schema::parse(spec, false)?)
    }

    pub fn typename(&self) -> &str {
        &self.0.typename
    }

    pub fn fieldnames(&self) -> &[String] {
        &self.0.fields
    }

    pub fn num_fields(&self) -> usize {
        self.0.fields.len()
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.0.index.get(field).copied()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.index.contains_key(field)
    }

    /// Builds a record. Positional values fill leading fields, named values
    /// fill theirs, every remaining field falls back to its default. A field
    /// supplied both ways, an unknown name, surplus positional values or a
    /// field left without value and default all fail before a record exists.
    pub fn create(&self, args: Args) -> Result<Record, RecordError> {
        let Args { positional, named } = args;
        let indices = self.resolve_named(positional.len(), &named)?;
        let num_fields = self.0.fields.len();
        let mut slots: Vec<Option<Value>> = positional.into_iter().map(Some).collect();
        slots.resize(num_fields, None);
        for (idx, (_, value)) in indices.into_iter().zip(named) {
            slots[idx] = Some(value);
        }
        self.apply_defaults(&mut slots)?;
        Ok(Record::new(
            self.clone(),
            slots.into_iter().flatten().collect(),
        ))
    }

    pub fn from_values<I>(&self, values: I) -> Result<Record, RecordError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.create(Args::positional(values))
    }

    pub fn from_map<I, N, V>(&self, pairs: I) -> Result<Record, RecordError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<Value>,
    {
        self.create(Args::named(pairs))
    }

    /// Snapshot of the current defaults table. Fields without a default are
    /// absent.
    pub fn defaults(&self) -> IndexMap<String, DefaultValue> {
        self.0.defaults.read().clone()
    }

    /// Replaces the defaults table wholesale. Fields not mentioned lose
    /// their default; no arguments clears the table. Existing records keep
    /// their values.
    pub fn replace_defaults(&self, args: Args<DefaultValue>) -> Result<(), RecordError> {
        let Args { positional, named } = args;
        let indices = self.resolve_named(positional.len(), &named)?;
        let mut table = IndexMap::with_capacity(positional.len() + named.len());
        for (idx, default) in positional.into_iter().enumerate() {
            table.insert(self.0.fields[idx].clone(), default);
        }
        for (idx, (_, default)) in indices.into_iter().zip(named) {
            table.insert(self.0.fields[idx].clone(), default);
        }
        *self.0.defaults.write() = table;
        Ok(())
    }

    /// Shared validation for construction, update and defaults replacement:
    /// arity first, then every unknown name, then positional/named conflicts
    /// and repeated names. Returns the slot index of each named argument.
    pub(crate) fn resolve_named<P>(
        &self,
        num_positional: usize,
        named: &[(String, P)],
    ) -> Result<Vec<usize>, RecordError> {
        let num_fields = self.0.fields.len();
        if num_positional > num_fields {
            return Err(RecordError::TooManyValues {
                expected: num_fields,
                given: num_positional,
            });
        }
        let mut indices = Vec::with_capacity(named.len());
        for (name, _) in named {
            match self.0.index.get(name.as_str()) {
                Some(idx) => indices.push(*idx),
                None => return Err(RecordError::UnknownField(name.clone())),
            }
        }
        let mut taken = vec![false; num_fields];
        taken[..num_positional].fill(true);
        for (idx, (name, _)) in indices.iter().zip(named) {
            if taken[*idx] {
                return Err(RecordError::MultipleValues(name.clone()));
            }
            taken[*idx] = true;
        }
        Ok(indices)
    }

    // Factories run with the lock released, so a factory may call back into
    // this type. An empty slot without a default fails before any factory
    // is invoked.
    fn apply_defaults(&self, slots: &mut [Option<Value>]) -> Result<(), RecordError> {
        let pending: Vec<(usize, DefaultValue)> = {
            let defaults = self.0.defaults.read();
            let mut pending = Vec::new();
            for (idx, slot) in slots.iter().enumerate() {
                if slot.is_some() {
                    continue;
                }
                let name = self.0.fields[idx].as_str();
                match defaults.get(name) {
                    Some(default) => pending.push((idx, default.clone())),
                    None => return Err(RecordError::MissingValue(name.to_string())),
                }
            }
            pending
        };
        for (idx, default) in pending {
            slots[idx] = Some(default.materialize());
        }
        Ok(())
    }
}

/// Shape equality: same typename and same field names. Two independently
/// built types with the same shape compare equal.
impl PartialEq for RecordType {
    fn eq(&self, other: &RecordType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.typename == other.0.typename && self.0.fields == other.0.fields)
    }
}

impl Eq for RecordType {}

impl Debug for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("typename", &self.0.typename)
            .field("fields", &self.0.fields)
            .finish_non_exhaustive()
    }
}

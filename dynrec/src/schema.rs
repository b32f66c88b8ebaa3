use std::collections::HashMap;

use dynrec_types::errors::SchemaError;
use dynrec_types::indexmap::IndexMap;

use crate::defaults::DefaultValue;

/// Keywords of the host language. Rejected as type and field names so that
/// every accepted name reads as a plain identifier.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

pub(crate) fn validate_typename(typename: &str) -> Result<(), SchemaError> {
    if !is_identifier(typename) {
        return Err(SchemaError::InvalidTypeName(typename.to_string()));
    }
    if is_keyword(typename) {
        return Err(SchemaError::KeywordTypeName(typename.to_string()));
    }
    Ok(())
}

fn validate_fieldname(name: &str, index: &HashMap<String, usize>) -> Result<(), SchemaError> {
    if !is_identifier(name) {
        return Err(SchemaError::InvalidFieldName(name.to_string()));
    }
    if is_keyword(name) {
        return Err(SchemaError::KeywordFieldName(name.to_string()));
    }
    if name.starts_with('_') {
        return Err(SchemaError::ReservedFieldName(name.to_string()));
    }
    if index.contains_key(name) {
        return Err(SchemaError::DuplicateFieldName(name.to_string()));
    }
    Ok(())
}

/// One entry of a field specification: a plain name, or a name with a
/// default attached.
#[derive(Clone, Debug)]
pub enum FieldSpec {
    Name(String),
    WithDefault(String, DefaultValue),
}

impl From<&str> for FieldSpec {
    fn from(name: &str) -> Self {
        FieldSpec::Name(name.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(name: String) -> Self {
        FieldSpec::Name(name)
    }
}

impl<N: Into<String>, D: Into<DefaultValue>> From<(N, D)> for FieldSpec {
    fn from((name, default): (N, D)) -> Self {
        FieldSpec::WithDefault(name.into(), default.into())
    }
}

/// An ordered, validated field layout: unique field names, a name to
/// position lookup and the defaults declared alongside the names.
#[derive(Clone, Debug)]
pub struct Schema {
    fields: Box<[String]>,
    index: HashMap<String, usize>,
    defaults: IndexMap<String, DefaultValue>,
}

impl Schema {
    /// Parses the string form of a field specification: names separated by
    /// whitespace and/or commas.
    pub fn parse(spec: &str, rename: bool) -> Result<Schema, SchemaError> {
        let spec = spec.replace(',', " ");
        Self::build(spec.split_whitespace().map(FieldSpec::from), rename)
    }

    /// Builds a schema from a sequence of names and (name, default) pairs.
    /// With `rename`, every rejected name is replaced by the positional
    /// placeholder `_<idx>`; its default, if any, survives under the
    /// placeholder.
    pub fn new<I>(specs: I, rename: bool) -> Result<Schema, SchemaError>
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        Self::build(specs.into_iter().map(Into::into), rename)
    }

    fn build(
        specs: impl Iterator<Item = FieldSpec>,
        rename: bool,
    ) -> Result<Schema, SchemaError> {
        let mut fields = Vec::new();
        let mut index = HashMap::new();
        let mut defaults = IndexMap::new();
        for (idx, spec) in specs.enumerate() {
            let (name, default) = match spec {
                FieldSpec::Name(name) => (name, None),
                FieldSpec::WithDefault(name, default) => (name, Some(default)),
            };
            // Placeholders cannot collide: user names never start with an
            // underscore and indexes are unique.
            let name = match validate_fieldname(&name, &index) {
                Ok(()) => name,
                Err(_) if rename => format!("_{}", idx),
                Err(err) => return Err(err),
            };
            index.insert(name.clone(), idx);
            if let Some(default) = default {
                defaults.insert(name.clone(), default);
            }
            fields.push(name);
        }
        Ok(Schema {
            fields: fields.into_boxed_slice(),
            index,
            defaults,
        })
    }

    /// Rebuilds a schema from names that were validated on a previous run.
    /// Only duplicate detection is repeated; placeholder names like `_1`
    /// pass through.
    pub(crate) fn from_validated(fields: Vec<String>) -> Result<Schema, SchemaError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (idx, name) in fields.iter().enumerate() {
            if index.insert(name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateFieldName(name.clone()));
            }
        }
        Ok(Schema {
            fields: fields.into_boxed_slice(),
            index,
            defaults: IndexMap::new(),
        })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn defaults(&self) -> &IndexMap<String, DefaultValue> {
        &self.defaults
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Box<[String]>,
        HashMap<String, usize>,
        IndexMap<String, DefaultValue>,
    ) {
        (self.fields, self.index, self.defaults)
    }
}

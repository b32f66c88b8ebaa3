use dynrec_types::Value;

use crate::defaults::DefaultValue;
use crate::record::Record;

/// Positional and named payloads for one call. `Args<Value>` feeds record
/// construction and update, `Args<DefaultValue>` feeds defaults replacement;
/// all three share the same merging rule.
#[derive(Clone, Debug)]
pub struct Args<P = Value> {
    pub(crate) positional: Vec<P>,
    pub(crate) named: Vec<(String, P)>,
}

impl<P> Args<P> {
    pub fn new() -> Args<P> {
        Args {
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Bulk form of [`Args::value`].
    pub fn positional<I>(values: I) -> Args<P>
    where
        I: IntoIterator,
        I::Item: Into<P>,
    {
        Args {
            positional: values.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }

    /// Bulk form of [`Args::field`].
    pub fn named<I, N, V>(pairs: I) -> Args<P>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<P>,
    {
        Args {
            positional: Vec::new(),
            named: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    pub fn value(mut self, value: impl Into<P>) -> Args<P> {
        self.positional.push(value.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<P>) -> Args<P> {
        self.named.push((name.into(), value.into()));
        self
    }
}

impl<P> Default for Args<P> {
    fn default() -> Args<P> {
        Args::new()
    }
}

impl Args<DefaultValue> {
    /// Seeds a defaults replacement from an existing record's values.
    pub fn defaults_of(record: &Record) -> Args<DefaultValue> {
        let named = record
            .record_type()
            .fieldnames()
            .iter()
            .cloned()
            .zip(record.values().iter().cloned().map(DefaultValue::Static))
            .collect();
        Args {
            positional: Vec::new(),
            named,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let args: Args = Args::new().value(1).value(2).field("c", 3).field("d", 4);
        assert_eq!(args.positional, [Value::Int(1), Value::Int(2)]);
        assert_eq!(
            args.named,
            [
                ("c".to_string(), Value::Int(3)),
                ("d".to_string(), Value::Int(4))
            ]
        );
    }

    #[test]
    fn test_bulk_constructors() {
        let args: Args = Args::positional(["x", "y"]);
        assert_eq!(args.positional.len(), 2);
        assert!(args.named.is_empty());

        let args: Args = Args::named([("a", 1), ("b", 2)]);
        assert!(args.positional.is_empty());
        assert_eq!(args.named[1].0, "b");
    }
}

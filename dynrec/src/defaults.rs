use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use dynrec_types::chrono::{DateTime, FixedOffset, NaiveDate};
use dynrec_types::indexmap::IndexMap;
use dynrec_types::rust_decimal::Decimal;
use dynrec_types::Value;

/// A callable default. Invoked once per constructed record that falls back
/// to it, so every instance gets a freshly produced value.
#[derive(Clone)]
pub struct DefaultFactory(Arc<dyn Fn() -> Value + Send + Sync>);

impl DefaultFactory {
    pub fn new<F>(factory: F) -> DefaultFactory
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DefaultFactory(Arc::new(factory))
    }

    pub fn invoke(&self) -> Value {
        (self.0)()
    }
}

impl Debug for DefaultFactory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultFactory(..)")
    }
}

/// A per-field default: either a static value cloned into each record, or a
/// factory producing one on demand.
#[derive(Clone, Debug)]
pub enum DefaultValue {
    Static(Value),
    Factory(DefaultFactory),
}

impl DefaultValue {
    pub fn factory<F>(factory: F) -> DefaultValue
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DefaultValue::Factory(DefaultFactory::new(factory))
    }

    /// Static defaults clone, factories run.
    pub fn materialize(&self) -> Value {
        match self {
            DefaultValue::Static(value) => value.clone(),
            DefaultValue::Factory(factory) => factory.invoke(),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Static(value)
    }
}

impl From<DefaultFactory> for DefaultValue {
    fn from(factory: DefaultFactory) -> Self {
        DefaultValue::Factory(factory)
    }
}

macro_rules! static_default_from {
    ($($from:ty),* $(,)?) => {
        $(
            impl From<$from> for DefaultValue {
                fn from(value: $from) -> Self {
                    DefaultValue::Static(Value::from(value))
                }
            }
        )*
    };
}

static_default_from!(
    bool,
    i32,
    i64,
    u32,
    u64,
    f32,
    f64,
    &str,
    String,
    Vec<u8>,
    Decimal,
    DateTime<FixedOffset>,
    NaiveDate,
    Vec<Value>,
    IndexMap<String, Value>,
);

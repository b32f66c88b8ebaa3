#![no_main]

use std::collections::HashSet;

use dynrec::{Args, RecordType, Schema};
use dynrec_types::Value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|spec: String| {
    // With renaming on, any input must parse into a usable schema.
    let schema = Schema::parse(&spec, true).unwrap();

    {
        let mut seen = HashSet::new();
        for (idx, name) in schema.fields().iter().enumerate() {
            assert!(seen.insert(name.as_str()));
            assert_eq!(schema.index_of(name), Some(idx));
        }
    }

    let num_fields = schema.num_fields();
    let ty = RecordType::new("Fuzzed", schema).unwrap();
    let record = ty
        .create(Args::positional((0..num_fields).map(|_| Value::Null)))
        .unwrap();
    assert_eq!(record.len(), num_fields);
});

//! Shape-preserving field mutation.

use codec::{MessageRecord, Value};
use rand::Rng;

/// Replaces `value` with a random value of the same shape.
///
/// Integers take any value of their width; byte blocks keep their length.
pub fn mutate_value<R: Rng + ?Sized>(value: &Value, rng: &mut R) -> Value {
    match value {
        Value::U8(_) => Value::U8(rng.gen()),
        Value::U16(_) => Value::U16(rng.gen()),
        Value::I32(_) => Value::I32(rng.gen()),
        Value::I64(_) => Value::I64(rng.gen()),
        Value::Bytes(bytes) => {
            let mut out = vec![0u8; bytes.len()];
            rng.fill(out.as_mut_slice());
            Value::Bytes(out)
        }
    }
}

/// Returns a copy of `seed` with every mutable field randomized.
///
/// Fields the schema marks immutable are copied unchanged.
pub fn mutate_record<R: Rng + ?Sized>(seed: &MessageRecord, rng: &mut R) -> MessageRecord {
    let mut variant = seed.clone();
    for field in seed.schema.fields.iter().filter(|field| field.mutable) {
        if let Some(value) = variant.values.get_mut(field.name) {
            *value = mutate_value(value, rng);
        }
    }
    variant
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bytes_keep_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let value = mutate_value(&Value::from("/tmp/file"), &mut rng);
        assert_eq!(value.as_bytes().unwrap().len(), 9);
    }

    #[test]
    fn integers_keep_width() {
        let mut rng = StdRng::seed_from_u64(2);
        for value in [Value::U8(0), Value::U16(0), Value::I32(0), Value::I64(0)] {
            assert_eq!(mutate_value(&value, &mut rng).kind_name(), value.kind_name());
        }
    }
}

//! JSON rendering of records.

use super::{quote, Record, SerializeError, Value, MAX_DEPTH};

/// Render a record as a JSON object string.
///
/// Fields appear in declaration order. Strings use the fixture's minimal
/// quoting, integers are decimal literals, nested records recurse.
pub fn to_json(record: &Record) -> Result<String, SerializeError> {
    let mut out = String::new();
    write_record(&mut out, record, 0)?;
    Ok(out)
}

fn write_record(out: &mut String, record: &Record, depth: usize) -> Result<(), SerializeError> {
    if depth > MAX_DEPTH {
        return Err(SerializeError::DepthExceeded(MAX_DEPTH));
    }

    out.push('{');
    for (i, (name, value)) in record.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote(name));
        out.push(':');
        match value {
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::Str(s) => out.push_str(&quote(s)),
            Value::Record(nested) => write_record(out, nested, depth + 1)?,
        }
    }
    out.push('}');
    Ok(())
}

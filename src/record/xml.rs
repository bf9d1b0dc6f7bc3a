//! XML rendering of records.

use super::{Record, SerializeError, Value, MAX_DEPTH};

/// XML declaration emitted before the root element.
const PROLOG: &str = "<?xml version=\"1.0\"?>";

/// Render a record as an XML document.
///
/// The whole record is wrapped in a `<root>` element; each field becomes
/// an element named after it, with nested records recursing inside.
pub fn to_xml(record: &Record) -> Result<String, SerializeError> {
    let mut out = String::from(PROLOG);
    out.push_str("<root>");
    write_fields(&mut out, record, 0)?;
    out.push_str("</root>");
    Ok(out)
}

fn write_fields(out: &mut String, record: &Record, depth: usize) -> Result<(), SerializeError> {
    if depth > MAX_DEPTH {
        return Err(SerializeError::DepthExceeded(MAX_DEPTH));
    }

    for (name, value) in record.iter() {
        out.push('<');
        out.push_str(name);
        out.push('>');
        match value {
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::Str(s) => out.push_str(s),
            Value::Record(nested) => write_fields(out, nested, depth + 1)?,
        }
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
    Ok(())
}

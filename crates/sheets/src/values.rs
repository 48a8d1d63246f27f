use serde_json::Value;

use crate::client::SheetsError;

/// Convert a `values.get` response body into rows of text cells.
///
/// A body without `values` is an empty range. Cells that are not strings
/// are rendered as text (`12`, `true`); `null` becomes an empty cell.
pub fn rows_from_values(body: &Value) -> Result<Vec<Vec<String>>, SheetsError> {
    let values = match body.get("values") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(rows)) => rows,
        Some(other) => {
            return Err(SheetsError::Parse(format!(
                "expected `values` to be an array, got {}",
                type_name(other)
            )))
        }
    };

    values
        .iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Array(cells) => Ok(cells.iter().map(cell_text).collect()),
            other => Err(SheetsError::Parse(format!(
                "row {} is {}, expected an array",
                i + 1,
                type_name(other)
            ))),
        })
        .collect()
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

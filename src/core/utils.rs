use serde_json::Value;

use crate::api::Vars;

/// Parse `key=value` assignments from the command line.
///
/// Values that parse as JSON (numbers, booleans, arrays, objects, quoted
/// strings) keep their JSON type; anything else is taken as a plain string.
pub fn parse_vars(assignments: &[String]) -> Result<Vars, String> {
    let mut vars = Vars::new();
    for assignment in assignments {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("Invalid variable '{}', expected key=value", assignment))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Invalid variable '{}', empty key", assignment));
        }
        vars.insert(key.to_string(), parse_value(value.trim()));
    }
    Ok(vars)
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

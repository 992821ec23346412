pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Resolve a command's full input: `--input` file first, then piped stdin.
/// `Ok(None)` means neither was supplied and the caller falls back to flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_input(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}

/// Shallow-merge the keys of `patch` over `base`. Non-object values replace
/// `base` wholesale.
pub fn overlay(base: &mut Value, patch: Value) {
    match (base.as_object_mut(), patch) {
        (Some(target), Value::Object(fields)) => {
            for (key, val) in fields {
                target.insert(key, val);
            }
        }
        (_, other) => *base = other,
    }
}

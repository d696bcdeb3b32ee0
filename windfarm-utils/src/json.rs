use serde::{Deserialize, Serialize};
use serde_json::{to_string, to_string_pretty, to_value, Map, Value};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("File {} is not a valid JSON: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize the content of {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub fn dejsonify<'a, T>(json_str: &'a str) -> serde_json::Result<T>
where
    T: Deserialize<'a>,
{
    serde_json::from_str::<T>(json_str)
}

/// Serializes with object keys sorted at every depth, so equal values always
/// produce the same string.
pub fn jsonify<T>(obj: &T) -> serde_json::Result<String>
where
    T: Serialize,
{
    to_string(&jsonify_internal(&to_value(obj)?))
}

pub fn jsonify_internal(json_value: &Value) -> Value {
    match json_value {
        Value::Object(obj) => {
            let mut sorted_map = Map::new();
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(value) = obj.get(key) {
                    sorted_map.insert(key.clone(), jsonify_internal(value));
                }
            }
            Value::Object(sorted_map)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(jsonify_internal).collect()),
        _ => json_value.clone(),
    }
}

/// Reads a JSON document from `path`.
///
/// A missing file and a file that is not JSON are reported as distinct errors.
pub fn load_json(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    dejsonify::<Value>(&content).map_err(|source| LoadError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_json<T>(obj: &T, path: impl AsRef<Path>) -> Result<(), LoadError>
where
    T: Serialize,
{
    let path = path.as_ref();
    let output = to_string_pretty(obj).map_err(|source| LoadError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, output).map_err(|source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    })
}

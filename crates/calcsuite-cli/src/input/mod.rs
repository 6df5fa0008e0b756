pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a calculator input from `--input <file>` or piped stdin.
///
/// Returns `Ok(None)` when neither is present so the caller can fall back
/// to flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Like [`load`], but for calculators that have no flag form.
pub fn require<T: DeserializeOwned>(
    path: Option<&str>,
    calculator: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    load(path)?.ok_or_else(|| format!("--input <file.json> or stdin required for {calculator}").into())
}

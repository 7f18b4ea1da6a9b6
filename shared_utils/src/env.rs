use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables. Values that are
/// empty after trimming count as missing.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    lookup_var(name, |key| std::env::var(key).ok())
}

/// Same as [`get_env_var`] but resolves keys through `lookup` instead of the
/// process environment.
pub fn lookup_var<F>(name: &str, lookup: F) -> Result<String, MissingEnvVarError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| MissingEnvVarError(name.to_string()))
}

/// Loads a `.env` file from the working directory (or its parents) into the
/// process environment. A missing file is not an error.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    dotenvy::dotenv().ok()
}

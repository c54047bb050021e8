/// Environment variable holding the GitHub token
pub const ENV_TOKEN_VAR: &str = "GH_API_KEY";

/// Read the GitHub token from the GH_API_KEY environment variable.
/// Returns None if the variable is unset or blank.
pub fn get_token_from_env() -> Option<String> {
    token_from_value(std::env::var(ENV_TOKEN_VAR).ok())
}

fn token_from_value(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

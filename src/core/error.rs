use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid archetype '{name}': {}", problems.join(", "))]
    InvalidArchetype { name: String, problems: Vec<String> },

    #[error("Archetype already registered: {0}")]
    DuplicateArchetype(String),

    #[error("Archetype not found: {0}")]
    UnknownArchetype(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_archetype_lists_every_problem() {
        let err = PartError::InvalidArchetype {
            name: "Golem".into(),
            problems: vec!["no parts".into(), "weight 0 for CORE".into()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid archetype 'Golem': no parts, weight 0 for CORE"
        );
    }
}

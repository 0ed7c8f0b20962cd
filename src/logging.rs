use std::fmt;

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Sanitized wrapper for personal names that shows only the first character
#[derive(Debug, Clone)]
pub struct SanitizedName(String);

impl SanitizedName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Self::sanitize(name.as_ref()))
    }

    fn sanitize(name: &str) -> String {
        match name.chars().next() {
            Some(first) if name.chars().count() > 1 => format!("{first}***"),
            Some(_) => "*".to_string(),
            None => String::new(),
        }
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(SanitizedName::new("Müller").to_string(), "M***");
        assert_eq!(SanitizedName::new("Ü").to_string(), "*");
        assert_eq!(SanitizedName::new("").to_string(), "");
    }
}

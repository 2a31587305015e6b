use serde::Deserialize;

use crate::Result;

/// Settings attached to a [`FrameGraph`](crate::FrameGraph) when it is created.
///
/// ```toml
/// auto_simplify = true
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Run the extra fraction cancellation pass on every coefficient produced
    /// by re-expression, `dot`, `cross` and `outer`.
    #[serde(default)]
    pub auto_simplify: bool,
}

impl Config {
    pub fn from_toml(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert!(!Config::default().auto_simplify);
    }

    #[test]
    fn test_parse() {
        let config = Config::from_toml("auto_simplify = true").unwrap();
        assert!(config.auto_simplify);
        assert!(Config::from_toml("auto_simplify = 3").is_err());
        assert!(Config::from_toml("unknown = true").is_err());
    }
}

use serde::{Deserialize, Serialize};
use showcase_cache::KeyValueStore;

/// Storage key of the persisted preference
pub const THEME_KEY: &str = "theme";

/// Light/dark preference of the site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Stored preference, dark when unset or unreadable
    pub fn load(store: &dyn KeyValueStore) -> crate::Result<Self> {
        let stored = store.get_item(THEME_KEY)?;
        Ok(stored
            .and_then(|value| value.parse().ok())
            .unwrap_or_default())
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> crate::Result<()> {
        store.set_item(THEME_KEY, self.as_str())?;
        Ok(())
    }

    /// Flip the stored preference and return the new one
    pub fn toggle(store: &dyn KeyValueStore) -> crate::Result<Self> {
        let next = Self::load(store)?.toggled();
        next.save(store)?;
        Ok(next)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(crate::Error::InvalidInput(format!("unknown theme '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_cache::MemoryStore;

    #[test]
    fn test_defaults_to_dark() {
        let store = MemoryStore::default();
        assert_eq!(Theme::load(&store).unwrap(), Theme::Dark);

        store.set_item(THEME_KEY, "sepia").unwrap();
        assert_eq!(Theme::load(&store).unwrap(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryStore::default();

        assert_eq!(Theme::toggle(&store).unwrap(), Theme::Light);
        assert_eq!(store.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));

        assert_eq!(Theme::toggle(&store).unwrap(), Theme::Dark);
        assert_eq!(Theme::load(&store).unwrap(), Theme::Dark);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
    }
}

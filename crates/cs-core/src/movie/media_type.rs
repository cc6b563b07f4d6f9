use serde::{Deserialize, Serialize};

/// Kind of catalogue entry, as reported by the `Type` field of the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
    Game,
    Other(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
            MediaType::Game => "game",
            MediaType::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for MediaType {
    fn from(value: &str) -> Self {
        match value {
            "movie" => MediaType::Movie,
            "series" => MediaType::Series,
            "episode" => MediaType::Episode,
            "game" => MediaType::Game,
            other => MediaType::Other(other.to_string()),
        }
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        MediaType::from(value.as_str())
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_types_are_kept_verbatim() {
        let kind = MediaType::from("short");
        assert_eq!(kind, MediaType::Other("short".to_string()));
        assert_eq!(kind.as_str(), "short");
    }

    #[test]
    fn known_types_map_to_variants() {
        assert_eq!(MediaType::from("series"), MediaType::Series);
        assert_eq!(String::from(MediaType::Game), "game");
    }
}

use serde::{Deserialize, Serialize};

/// Источник записи каталога
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Загружено из удалённого источника при первом запуске
    Api,
    /// Создано пользователем через форму
    #[default]
    User,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Api => "api",
            Origin::User => "user",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

use serde::{Deserialize, Serialize};

/// Роль пользователя в том виде, в каком её присылает сервер.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    // Неизвестная или отсутствующая роль трактуется как обычный пользователь
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim.map(str::trim) {
            Some("ROLE_ADMIN") | Some("ADMIN") | Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// Вошедший пользователь. Хранится в файле сессии как есть.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Сервер возвращает только токен и роль, поэтому id, имя и email берутся из логина.
    pub fn from_login(username: &str, role: Role) -> Self {
        Self {
            id: username.to_string(),
            name: username.to_string(),
            email: username.to_string(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

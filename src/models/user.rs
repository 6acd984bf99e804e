//! User model, permissions and token claims

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Named permissions granted to library staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    AddAuthor,
    ChangeAuthor,
    DeleteAuthor,
    AddBook,
    ChangeBook,
    DeleteBook,
    AddGenre,
    AddLanguage,
    AddBookinstance,
    ChangeBookinstance,
    DeleteBookinstance,
    /// Set book as returned; also grants the librarian loan views
    CanMarkReturned,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AddAuthor => "add_author",
            Permission::ChangeAuthor => "change_author",
            Permission::DeleteAuthor => "delete_author",
            Permission::AddBook => "add_book",
            Permission::ChangeBook => "change_book",
            Permission::DeleteBook => "delete_book",
            Permission::AddGenre => "add_genre",
            Permission::AddLanguage => "add_language",
            Permission::AddBookinstance => "add_bookinstance",
            Permission::ChangeBookinstance => "change_bookinstance",
            Permission::DeleteBookinstance => "delete_bookinstance",
            Permission::CanMarkReturned => "can_mark_returned",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Short user representation (borrowers)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Refuse the request unless the caller holds `permission`
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Permission '{}' required",
                permission
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(permissions: Vec<Permission>) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "librarian".to_string(),
            user_id: 1,
            permissions,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn require_checks_exact_permission() {
        let c = claims(vec![Permission::AddAuthor]);
        assert!(c.require(Permission::AddAuthor).is_ok());
        assert!(matches!(
            c.require(Permission::DeleteAuthor),
            Err(AppError::Authorization(_))
        ));
        assert!(c.require(Permission::AddBook).is_err());
    }

    #[test]
    fn no_permissions_refuses_everything() {
        let c = claims(vec![]);
        assert!(c.require(Permission::CanMarkReturned).is_err());
    }

    #[test]
    fn token_round_trip_keeps_permissions() {
        let c = claims(vec![Permission::CanMarkReturned, Permission::ChangeBook]);
        let token = c.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 1);
        assert!(decoded.has_permission(Permission::CanMarkReturned));
        assert!(decoded.has_permission(Permission::ChangeBook));
        assert!(!decoded.has_permission(Permission::DeleteBook));

        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn permissions_serialize_as_codenames() {
        assert_eq!(
            serde_json::to_value(Permission::CanMarkReturned).unwrap(),
            "can_mark_returned"
        );
        assert_eq!(
            serde_json::to_value(Permission::AddBookinstance).unwrap(),
            Permission::AddBookinstance.as_str()
        );
    }
}

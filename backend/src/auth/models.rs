use serde::{Deserialize, Serialize};
use shared::UserInfo;

use crate::db::models::User;

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub exp: usize,
    pub iat: usize,
}

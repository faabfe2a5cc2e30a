use serde::{Deserialize, Serialize};

use super::id::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub bot: bool,
    pub discriminator: u16,
    #[serde(rename = "username")]
    pub name: String,
}

impl User {
    /// Returns the `name#discriminator` tag of the user.
    pub fn tag(&self) -> String {
        format!("{}#{:04}", self.name, self.discriminator)
    }
}

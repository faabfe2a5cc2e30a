use serenity::model::user::User as SUser;

use super::user::User;

impl From<SUser> for User {
    fn from(src: SUser) -> Self {
        Self {
            id: src.id.into(),
            bot: src.bot,
            discriminator: src.discriminator,
            name: src.name,
        }
    }
}

//! Commands changing the per-guild and per-user configuration.
mod commands;

use nokari::model::permissions::Permissions;
use nokari_core::check::Check;
use nokari_core::module::{BoxError, Registry};

pub fn load(registry: &mut Registry) -> Result<(), BoxError> {
    let mut prefix = commands::prefix();
    prefix.set_guild_only(true);

    prefix.sub_command(commands::user());
    prefix.sub_command(commands::clear());

    let mut guild = commands::guild();
    guild.check(Check::Permissions(Permissions::MANAGE_GUILD));
    prefix.sub_command(guild);

    registry.command(prefix);
    Ok(())
}

pub fn unload() -> Result<(), BoxError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::load;

    use nokari_core::check::Check;
    use nokari_core::module::Registry;

    #[tokio::test]
    async fn test_load() {
        let mut registry = Registry::new();
        load(&mut registry).unwrap();

        let prefix = &registry.commands()[0];
        assert_eq!(prefix.name, "prefix");
        assert!(prefix.guild_only);

        let names: Vec<_> = prefix.sub_commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["user", "clear", "guild"]);

        // Sub commands inherit the guild only check.
        let guild = &prefix.sub_commands[2];
        assert!(matches!(
            guild.checks.as_slice(),
            [Check::Permissions(_), Check::GuildOnly]
        ));
    }
}

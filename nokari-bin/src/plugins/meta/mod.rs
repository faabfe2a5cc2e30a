//! Commands showing information about the bot itself.
mod commands;

use nokari_core::check::{BucketType, Check, Cooldown};
use nokari_core::module::{BoxError, Registry};

use std::time::Duration;

pub fn load(registry: &mut Registry) -> Result<(), BoxError> {
    let mut ping = commands::ping();
    ping.check(Check::cooldown(Cooldown::new(
        Duration::from_secs(10),
        1,
        BucketType::User,
    )));

    let mut stats = commands::stats();
    stats.check(Check::cooldown(Cooldown::new(
        Duration::from_secs(10),
        1,
        BucketType::User,
    )));

    registry.command(ping);
    registry.command(stats);
    Ok(())
}

pub fn unload() -> Result<(), BoxError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::load;

    use nokari_core::check::{BucketType, Check};
    use nokari_core::module::Registry;

    #[tokio::test]
    async fn test_load() {
        let mut registry = Registry::new();
        load(&mut registry).unwrap();

        let ping = &registry.commands()[0];
        assert_eq!(ping.name, "ping");
        assert_eq!(ping.aliases, ["pong", "latency"]);

        match ping.checks.as_slice() {
            [Check::Cooldown(cooldown)] => assert_eq!(cooldown.bucket_type(), BucketType::User),
            checks => panic!("unexpected checks {:?}", checks),
        }

        let stats = &registry.commands()[1];
        assert_eq!(stats.name, "stats");
        assert!(matches!(stats.checks.as_slice(), [Check::Cooldown(_)]));
    }
}

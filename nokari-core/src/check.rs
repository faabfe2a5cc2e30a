use crate::command::LoadedCommand;
use crate::context::MessageContext;
use crate::permissions;

use nokari::model::channel::Message;
use nokari::model::guild::Member;
use nokari::model::id::UserId;
use nokari::model::permissions::Permissions;

use parking_lot::Mutex;
use thiserror::Error;

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub type CheckFn = Arc<dyn Fn(&MessageContext) -> Result<(), CheckError> + Send + Sync>;

/// The reason a check failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("Command is disabled.")]
    Disabled,
    #[error("This command can only be used by the bot owner.")]
    NotOwner,
    #[error("This command can only be used in guilds.")]
    GuildOnly,
    #[error("You're on cooldown")]
    OnCooldown { retry_after: Duration },
    #[error("You're missing {} {} to invoke this command.", .0.names(), plural(.0))]
    MissingPermissions(Permissions),
    #[error("I'm missing {} {}.", .0.names(), plural(.0))]
    BotMissingPermissions(Permissions),
    #[error("{0}")]
    Custom(String),
    /// The check itself failed to run, e.g. because required data was not
    /// cached.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CheckError {
    /// Additional information shown below the error message.
    pub fn footer(&self) -> Option<String> {
        match self {
            Self::OnCooldown { retry_after } => Some(format!(
                "Please try again in {:.2} seconds.",
                retry_after.as_secs_f64()
            )),
            _ => None,
        }
    }
}

impl From<permissions::Error> for CheckError {
    fn from(err: permissions::Error) -> Self {
        Self::Unexpected(err.to_string())
    }
}

fn plural(perms: &Permissions) -> &'static str {
    if perms.iter().count() > 1 {
        "permissions"
    } else {
        "permission"
    }
}

#[derive(Clone)]
pub enum Check {
    /// Only the owners from the config may run the command.
    OwnerOnly,
    GuildOnly,
    Cooldown(Arc<Cooldown>),
    /// The author needs all permissions in the channel.
    Permissions(Permissions),
    /// The bot needs all permissions in the channel.
    BotPermissions(Permissions),
    Custom(CheckFn),
}

impl Check {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&MessageContext) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn cooldown(cooldown: Cooldown) -> Self {
        Self::Cooldown(Arc::new(cooldown))
    }

    pub fn run(&self, ctx: &MessageContext) -> Result<(), CheckError> {
        match self {
            Self::OwnerOnly => {
                if ctx.is_owner() {
                    Ok(())
                } else {
                    Err(CheckError::NotOwner)
                }
            }
            Self::GuildOnly => match ctx.event.guild_id {
                Some(_) => Ok(()),
                None => Err(CheckError::GuildOnly),
            },
            Self::Cooldown(cooldown) => {
                let key = cooldown.key(&ctx.event);
                cooldown
                    .acquire(key)
                    .map_err(|retry_after| CheckError::OnCooldown { retry_after })
            }
            Self::Permissions(required) => {
                let perms = member_permissions(ctx, ctx.event.author.id)?;
                let missing = required.difference(perms);

                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(CheckError::MissingPermissions(missing))
                }
            }
            Self::BotPermissions(required) => {
                let bot_id = ctx
                    .gateway
                    .current_user_id()
                    .ok_or_else(|| CheckError::Unexpected(String::from("client not ready")))?;

                let perms = member_permissions(ctx, bot_id)?;
                let missing = required.difference(perms);

                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(CheckError::BotMissingPermissions(missing))
                }
            }
            Self::Custom(f) => f(ctx),
        }
    }
}

impl Debug for Check {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::OwnerOnly => f.write_str("OwnerOnly"),
            Self::GuildOnly => f.write_str("GuildOnly"),
            Self::Cooldown(cooldown) => f.debug_tuple("Cooldown").field(cooldown).finish(),
            Self::Permissions(perms) => f.debug_tuple("Permissions").field(perms).finish(),
            Self::BotPermissions(perms) => f.debug_tuple("BotPermissions").field(perms).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Computes the permissions of `user_id` in the channel of the message.
fn member_permissions(ctx: &MessageContext, user_id: UserId) -> Result<Permissions, CheckError> {
    let guild_id = ctx.event.guild_id.ok_or(CheckError::GuildOnly)?;

    let guild = ctx
        .gateway
        .guild(guild_id)
        .ok_or_else(|| CheckError::Unexpected(format!("guild {} not cached", guild_id)))?;

    let member = match ctx.gateway.member(guild_id, user_id) {
        Some(member) => member,
        // The author's roles are part of the message.
        None if user_id == ctx.event.author.id => {
            Member::new(user_id, guild_id, ctx.event.member_roles.clone())
        }
        None => {
            return Err(CheckError::Unexpected(format!(
                "member {} not cached",
                user_id
            )))
        }
    };

    let perms = match ctx.gateway.channel(ctx.event.channel_id) {
        Some(channel) => permissions::channel_permissions(&guild, &member, &channel)?,
        None => permissions::guild_permissions(&guild, &member)?,
    };

    Ok(perms)
}

/// Runs all checks of `command`. The disabled flag is always checked first,
/// the remaining checks run in the order they were added. The first failing
/// check aborts the chain.
pub fn run_checks(command: &LoadedCommand, ctx: &MessageContext) -> Result<(), CheckError> {
    if command.is_disabled() {
        return Err(CheckError::Disabled);
    }

    for check in &command.checks {
        check.run(ctx)?;
    }

    Ok(())
}

/// The scope a cooldown bucket is shared in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BucketType {
    User,
    Channel,
    /// Shared per guild, or per channel outside of guilds.
    Guild,
    Global,
}

/// Number of buckets above which expired buckets are purged on acquire.
const PURGE_THRESHOLD: usize = 1024;
/// Minimum time between two purges of a map that is not growing.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Buckets {
    map: HashMap<u64, Bucket>,
    /// Size of the map at which the next purge runs. Grows with the number
    /// of live buckets so purging stays amortized.
    purge_at: usize,
    last_purge: Option<Instant>,
}

impl Buckets {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            purge_at: PURGE_THRESHOLD,
            last_purge: None,
        }
    }

    fn should_purge(&self, now: Instant) -> bool {
        if self.map.len() >= self.purge_at {
            return true;
        }

        self.map.len() >= PURGE_THRESHOLD
            && self
                .last_purge
                .map_or(true, |last| now.saturating_duration_since(last) >= PURGE_INTERVAL)
    }

    fn purge(&mut self, now: Instant) {
        self.map
            .retain(|_, b| now.saturating_duration_since(b.start) < b.length);
        self.purge_at = PURGE_THRESHOLD.max(self.map.len() * 2);
        self.last_purge = Some(now);
    }
}

#[derive(Copy, Clone, Debug)]
struct Bucket {
    start: Instant,
    length: Duration,
    remaining: u32,
}

/// A cooldown allowing a number of usages per time window.
#[derive(Debug)]
pub struct Cooldown {
    length: Duration,
    usages: u32,
    bucket_type: BucketType,
    /// Keys with alternative length and usages.
    overrides: HashMap<u64, (Duration, u32)>,
    buckets: Mutex<Buckets>,
}

impl Cooldown {
    pub fn new(length: Duration, usages: u32, bucket_type: BucketType) -> Self {
        Self {
            length,
            usages,
            bucket_type,
            overrides: HashMap::new(),
            buckets: Mutex::new(Buckets::new()),
        }
    }

    /// Uses `length` and `usages` for the bucket of `key` instead of the
    /// defaults of the cooldown.
    pub fn with_override(mut self, key: u64, length: Duration, usages: u32) -> Self {
        self.overrides.insert(key, (length, usages));
        self
    }

    pub fn bucket_type(&self) -> BucketType {
        self.bucket_type
    }

    /// Returns the bucket key for a message.
    pub fn key(&self, msg: &Message) -> u64 {
        match self.bucket_type {
            BucketType::User => msg.author.id.0,
            BucketType::Channel => msg.channel_id.0,
            BucketType::Guild => msg.guild_id.map(|id| id.0).unwrap_or(msg.channel_id.0),
            BucketType::Global => 0,
        }
    }

    pub fn acquire(&self, key: u64) -> Result<(), Duration> {
        self.acquire_at(key, Instant::now())
    }

    /// Takes one usage from the bucket of `key`. Returns the time until the
    /// bucket resets if no usages are left.
    pub fn acquire_at(&self, key: u64, now: Instant) -> Result<(), Duration> {
        let mut buckets = self.buckets.lock();

        if buckets.should_purge(now) {
            buckets.purge(now);
        }

        let (length, usages) = self
            .overrides
            .get(&key)
            .copied()
            .unwrap_or((self.length, self.usages));

        let bucket = buckets.map.entry(key).or_insert(Bucket {
            start: now,
            length,
            remaining: usages,
        });

        let elapsed = now.saturating_duration_since(bucket.start);
        if elapsed >= bucket.length {
            *bucket = Bucket {
                start: now,
                length,
                remaining: usages,
            };
        }

        if bucket.remaining == 0 {
            return Err(bucket.length - elapsed.min(bucket.length));
        }

        bucket.remaining -= 1;
        Ok(())
    }

    /// Removes all expired buckets.
    pub fn purge(&self, now: Instant) {
        self.buckets.lock().purge(now);
    }
}

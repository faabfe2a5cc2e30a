//! Effective permission computation for guild members.
//!
//! All functions are pure and operate on cache snapshots.
use nokari::model::channel::{GuildChannel, OverwriteTarget};
use nokari::model::guild::{Guild, Member};
use nokari::model::id::GuildId;
use nokari::model::permissions::Permissions;

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("guild {0} has no @everyone role")]
    MissingEveryoneRole(GuildId),
}

/// Removes permissions that can't be used without their base permission.
///
/// Without `SEND_MESSAGES` all message-dependent permissions are cleared,
/// without `VIEW_CHANNEL` all channel-dependent permissions are cleared.
pub fn ensure_permissions(mut perms: Permissions) -> Permissions {
    if !perms.contains(Permissions::SEND_MESSAGES) {
        perms.remove(Permissions::SEND_DEPENDENT);
    }

    if !perms.contains(Permissions::VIEW_CHANNEL) {
        perms.remove(Permissions::CHANNEL_DEPENDENT);
    }

    perms
}

/// Computes the guild-wide permissions of `member`.
pub fn guild_permissions(guild: &Guild, member: &Member) -> Result<Permissions, Error> {
    if guild.owner_id == member.user_id {
        return Ok(Permissions::all());
    }

    let everyone = guild
        .everyone_role()
        .ok_or(Error::MissingEveryoneRole(guild.id))?;

    let mut perms = everyone.permissions;
    for role in member.roles.iter().filter_map(|id| guild.roles.get(id)) {
        perms |= role.permissions;
    }

    if perms.contains(Permissions::ADMINISTRATOR) {
        return Ok(Permissions::all());
    }

    Ok(ensure_permissions(perms))
}

/// Computes the permissions of `member` in `channel`, applying the channel's
/// overwrites on top of the guild-wide permissions.
pub fn channel_permissions(
    guild: &Guild,
    member: &Member,
    channel: &GuildChannel,
) -> Result<Permissions, Error> {
    let mut perms = guild_permissions(guild, member)?;

    if perms == Permissions::all() {
        return Ok(perms);
    }

    let everyone_id = guild.id.everyone_role();

    if let Some(overwrite) = channel.overwrite(OverwriteTarget::Role(everyone_id)) {
        perms = perms.apply_overwrite(overwrite.allow, overwrite.deny);
    }

    // Role overwrites are merged into a single layer.
    let mut allow = Permissions::empty();
    let mut deny = Permissions::empty();
    for role_id in member.roles.iter().filter(|id| **id != everyone_id) {
        if let Some(overwrite) = channel.overwrite(OverwriteTarget::Role(*role_id)) {
            allow |= overwrite.allow;
            deny |= overwrite.deny;
        }
    }
    perms = perms.apply_overwrite(allow, deny);

    if let Some(overwrite) = channel.overwrite(OverwriteTarget::Member(member.user_id)) {
        perms = perms.apply_overwrite(overwrite.allow, overwrite.deny);
    }

    Ok(ensure_permissions(perms))
}

pub fn has_guild_permissions(
    guild: &Guild,
    member: &Member,
    required: Permissions,
) -> Result<bool, Error> {
    Ok(guild_permissions(guild, member)?.contains(required))
}

pub fn has_channel_permissions(
    guild: &Guild,
    member: &Member,
    channel: &GuildChannel,
    required: Permissions,
) -> Result<bool, Error> {
    Ok(channel_permissions(guild, member, channel)?.contains(required))
}

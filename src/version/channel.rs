//! Release channel selection and the "already up to date" rule

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::semver::compare_with_prerelease;

/// A bare channel name used in place of a version (`"beta"`, `"canary"`)
static CHANNEL_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("valid channel tag regex"));

/// Version line targeted by an upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    #[default]
    Latest,
    Beta,
    Canary,
}

impl Channel {
    /// Registry dist-tag for this channel
    pub fn tag(&self) -> &'static str {
        match self {
            Channel::Latest => "latest",
            Channel::Beta => "beta",
            Channel::Canary => "canary",
        }
    }

    pub fn is_prerelease(&self) -> bool {
        !matches!(self, Channel::Latest)
    }
}

/// Whether `current` already satisfies the channel target `target`.
///
/// - A bare tag such as `"beta"` is up to date only when the target
///   carries the same tag.
/// - On a pre-release channel, an untagged version never satisfies a target
///   carrying the channel tag, even when the numbers match.
/// - Otherwise the version must not be older than the target.
pub fn satisfies_target(current: &str, target: &str, channel: Channel) -> bool {
    let current = current.trim();

    if CHANNEL_TAG_REGEX.is_match(current) && !current.chars().all(|c| c.is_ascii_digit()) {
        return target.contains(current);
    }

    if channel.is_prerelease() && target.contains(channel.tag()) && !current.contains(channel.tag())
    {
        return false;
    }

    compare_with_prerelease(current, target) != Ordering::Less
}

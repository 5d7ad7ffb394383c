//! Group handle
//!
//! A snapshot of one resolved sync group with command helpers. Handles are
//! rebuilt from the registry on each query; membership edits go to the
//! server and show up in new snapshots once polls confirm them.

use lyrion_state::PlayerId;

use crate::{Player, SdkError};

/// Handle for one sync group
///
/// Transport commands address the leader, which drives the whole group
/// server-side. Volume is per-player even inside a group, so group volume
/// helpers fan out to every member.
#[derive(Debug, Clone)]
pub struct Group {
    /// The player driving the group
    pub leader: Player,
    /// Players mirroring the leader
    pub followers: Vec<Player>,
}

impl Group {
    /// All members, leader first
    pub fn members(&self) -> Vec<&Player> {
        std::iter::once(&self.leader)
            .chain(self.followers.iter())
            .collect()
    }

    /// Number of members including the leader
    pub fn member_count(&self) -> usize {
        1 + self.followers.len()
    }

    /// Whether the given player is part of this group
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.leader.id == *id || self.followers.iter().any(|p| p.id == *id)
    }

    /// Start group playback
    pub async fn play(&self) -> Result<(), SdkError> {
        self.leader.play().await
    }

    /// Pause group playback
    pub async fn pause(&self) -> Result<(), SdkError> {
        self.leader.pause().await
    }

    /// Stop group playback
    pub async fn stop(&self) -> Result<(), SdkError> {
        self.leader.stop().await
    }

    /// Set the same volume on every member
    pub async fn set_volume(&self, volume: u8) -> Result<(), SdkError> {
        for member in self.members() {
            member.set_volume(volume).await?;
        }
        Ok(())
    }

    /// Pull another player into this group
    pub async fn add(&self, player: &Player) -> Result<(), SdkError> {
        player.join(&self.leader.id).await
    }

    /// Release a follower from this group.
    ///
    /// Returns `PlayerNotFound` if the player is not a follower here.
    pub async fn remove(&self, id: &PlayerId) -> Result<(), SdkError> {
        let follower = self
            .followers
            .iter()
            .find(|p| p.id == *id)
            .ok_or_else(|| SdkError::PlayerNotFound(id.to_string()))?;
        follower.leave().await
    }

    /// Dissolve the group by releasing every follower
    pub async fn dissolve(&self) -> Result<(), SdkError> {
        for follower in &self.followers {
            follower.leave().await?;
        }
        Ok(())
    }
}

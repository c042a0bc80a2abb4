//! Authorization and state transitions for room actions.
//!
//! Admins may change any room. Everyone else may only change rooms assigned
//! to them: by linked Telegram id, or, for rooms without a linked id, by
//! case-insensitive match of their registered name against the staff name.

use crate::config::Config;
use crate::database::models::*;
use crate::error::{HousekeepingError, HousekeepingResult};
use crate::utils::validation::validate_comment;
use sqlx::SqlitePool;

/// The user performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub display_name: String,
    /// Name registered with `/iam`.
    pub registered_name: Option<String>,
    pub is_admin: bool,
}

impl Actor {
    pub async fn resolve(
        pool: &SqlitePool,
        config: &Config,
        user_id: i64,
        display_name: &str,
    ) -> Result<Self, sqlx::Error> {
        let user = User::find(pool, user_id).await?;
        let stored_admin = user.as_ref().is_some_and(|u| u.role() == Role::Admin);

        Ok(Actor {
            user_id,
            display_name: display_name.to_string(),
            registered_name: user.and_then(|u| u.name),
            is_admin: config.is_admin(user_id) || stored_admin,
        })
    }

    pub fn can_modify(&self, room: &RoomAssignment) -> bool {
        if self.is_admin {
            return true;
        }

        match room.staff_user_id {
            Some(linked) => linked == self.user_id,
            None => match (&self.registered_name, &room.staff_name) {
                (Some(mine), Some(assigned)) => {
                    let mine = normalize_name(mine);
                    !mine.is_empty() && mine == normalize_name(assigned)
                }
                _ => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomAction {
    SetStatus(RoomStatus),
    ToggleType,
    SetComment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    StatusChanged(RoomStatus),
    TypeChanged(CleaningType),
    CommentSaved(String),
}

/// Loads the room and checks that `actor` may change it.
pub async fn authorize(
    pool: &SqlitePool,
    actor: &Actor,
    room_id: i64,
) -> HousekeepingResult<RoomAssignment> {
    let room = RoomAssignment::find_by_id(pool, room_id)
        .await?
        .ok_or(HousekeepingError::RoomNotFound(room_id))?;

    if !actor.can_modify(&room) {
        tracing::warn!(
            "Forbidden: user {} ({}) tried to modify room {} on {}",
            actor.display_name,
            actor.user_id,
            room.room_no,
            room.work_date
        );
        return Err(HousekeepingError::Forbidden {
            user_id: actor.user_id,
            room_no: room.room_no,
        });
    }

    Ok(room)
}

/// Applies `action` to the room if `actor` is allowed to, returning the
/// updated room.
pub async fn apply_action(
    pool: &SqlitePool,
    actor: &Actor,
    room_id: i64,
    action: RoomAction,
) -> HousekeepingResult<(RoomAssignment, ActionOutcome)> {
    authorize(pool, actor, room_id).await?;

    if let RoomAction::SetComment(text) = &action {
        validate_comment(text).map_err(|e| HousekeepingError::InvalidInput(e.to_string()))?;
    }

    let outcome = match action {
        RoomAction::SetStatus(status) => {
            if !RoomAssignment::set_status(pool, room_id, status, &actor.display_name).await? {
                return Err(HousekeepingError::RoomNotFound(room_id));
            }
            ActionOutcome::StatusChanged(status)
        }
        RoomAction::ToggleType => {
            let next = RoomAssignment::toggle_cleaning_type(pool, room_id, &actor.display_name)
                .await?
                .ok_or(HousekeepingError::RoomNotFound(room_id))?;
            ActionOutcome::TypeChanged(next)
        }
        RoomAction::SetComment(text) => {
            let text = text.trim().to_string();
            if !RoomAssignment::set_comment(pool, room_id, &text, &actor.display_name).await? {
                return Err(HousekeepingError::RoomNotFound(room_id));
            }
            ActionOutcome::CommentSaved(text)
        }
    };

    let updated = RoomAssignment::find_by_id(pool, room_id)
        .await?
        .ok_or(HousekeepingError::RoomNotFound(room_id))?;

    tracing::info!(
        "Room {} on {} updated by {} ({}): {:?}",
        updated.room_no,
        updated.work_date,
        actor.display_name,
        actor.user_id,
        outcome
    );

    Ok((updated, outcome))
}

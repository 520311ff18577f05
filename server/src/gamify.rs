// XP / level / prediction-point bookkeeping. Mutations go through the
// profile row; level is derived from XP and only ever moves up.
use anyhow::Context;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::config::ScoringConfig;
use scoutdeck_db as db;

pub fn level_for_xp(xp: i64, xp_per_level: i64) -> i64 {
    xp / xp_per_level + 1
}

/// Adds XP to the account's profile and recomputes the level. When the
/// level increases, exactly one `Level` achievement is appended for the
/// final new level, even if the XP delta crossed several levels at once.
/// Returns the new level when a level-up occurred.
pub async fn add_experience<C: ConnectionTrait>(
    db: &C,
    scoring: &ScoringConfig,
    account_id: i64,
    points: i64,
) -> anyhow::Result<Option<i64>> {
    let profile = db_profile(db, account_id).await?;
    let old_level = profile.level;
    let xp = profile.experience_points + points;
    let new_level = level_for_xp(xp, scoring.xp_per_level);
    let profile_id = profile.id;
    let mut update: db::profiles::ActiveModel = profile.into();
    update.experience_points = Set(xp);
    update.update_time = Set(time::OffsetDateTime::now_utc());
    if new_level > old_level {
        update.level = Set(new_level);
    }
    update
        .update(db)
        .await
        .context(format!("Failed to update profile of account {account_id}"))?;
    if new_level <= old_level {
        return Ok(None);
    }
    let achievement = db::achievements::ActiveModel {
        profile_id: Set(profile_id),
        badge_type: Set(db::achievements::BadgeType::Level),
        description: Set(format!("Reached Level {new_level}")),
        level_achieved: Set(Some(new_level as i32)),
        earned_time: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    db::achievements::Entity::insert(achievement)
        .exec(db)
        .await
        .context(format!(
            "Failed to insert level achievement for profile {profile_id}"
        ))?;
    Ok(Some(new_level))
}

pub async fn add_prediction_point<C: ConnectionTrait>(
    db: &C,
    account_id: i64,
) -> anyhow::Result<()> {
    let profile = db_profile(db, account_id).await?;
    let points = profile.prediction_points + 1;
    let mut update: db::profiles::ActiveModel = profile.into();
    update.prediction_points = Set(points);
    update.update_time = Set(time::OffsetDateTime::now_utc());
    update
        .update(db)
        .await
        .context(format!("Failed to update profile of account {account_id}"))?;
    Ok(())
}

async fn db_profile<C: ConnectionTrait>(
    db: &C,
    account_id: i64,
) -> anyhow::Result<db::profiles::Model> {
    db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(account_id))
        .one(db)
        .await
        .context(format!("Failed to fetch profile of account {account_id}"))?
        .ok_or_else(|| anyhow::anyhow!("Account {account_id} has no profile"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_every_hundred_xp() {
        assert_eq!(level_for_xp(0, 100), 1);
        assert_eq!(level_for_xp(99, 100), 1);
        assert_eq!(level_for_xp(100, 100), 2);
        assert_eq!(level_for_xp(105, 100), 2);
        assert_eq!(level_for_xp(250, 100), 3);
    }
}

// Capability checks for protected operations. Roles form a closed set
// and every protected handler names the capability it needs instead of
// comparing role strings at the call site.
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::auth::Requester;
use crate::http_types::AppHttpError;
use scoutdeck_db as db;
use scoutdeck_db::profiles::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    ManageUsers,
    ManageEvents,
    AssignScouters,
    ConfirmReports,
    CompleteMatches,
    SubmitReports,
    ViewAnalytics,
}

pub fn role_allows(role: Role, cap: Capability) -> bool {
    match cap {
        Capability::ManageUsers => matches!(role, Role::Admin),
        Capability::ManageEvents
        | Capability::AssignScouters
        | Capability::ConfirmReports
        | Capability::CompleteMatches => matches!(role, Role::Admin | Role::Strategist),
        Capability::SubmitReports => {
            matches!(role, Role::Admin | Role::Strategist | Role::Scouter)
        }
        Capability::ViewAnalytics => true,
    }
}

/// Resolves the requester's profile and checks the capability. Returns
/// the profile so handlers can reuse it without a second query.
pub async fn check<C: ConnectionTrait>(
    db: &C,
    requester: Requester,
    cap: Capability,
) -> Result<db::profiles::Model, AppHttpError> {
    let Requester::Account(account_id) = requester else {
        return Err(AppHttpError::Unauthenticated);
    };
    let profile = db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(account_id))
        .one(db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch profile of account {account_id}: {e:?}");
            AppHttpError::Internal
        })?
        .ok_or(AppHttpError::Unauthenticated)?;
    if !role_allows(profile.role, cap) {
        return Err(AppHttpError::Unauthorized);
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_everything() {
        for cap in [
            Capability::ManageUsers,
            Capability::ManageEvents,
            Capability::AssignScouters,
            Capability::ConfirmReports,
            Capability::CompleteMatches,
            Capability::SubmitReports,
            Capability::ViewAnalytics,
        ] {
            assert!(role_allows(Role::Admin, cap), "{cap:?}");
        }
    }

    #[test]
    fn scouter_cannot_manage() {
        assert!(!role_allows(Role::Scouter, Capability::ManageUsers));
        assert!(!role_allows(Role::Scouter, Capability::ManageEvents));
        assert!(!role_allows(Role::Scouter, Capability::ConfirmReports));
        assert!(role_allows(Role::Scouter, Capability::SubmitReports));
        assert!(role_allows(Role::Scouter, Capability::ViewAnalytics));
    }

    #[test]
    fn strategist_cannot_manage_users() {
        assert!(!role_allows(Role::Strategist, Capability::ManageUsers));
        assert!(role_allows(Role::Strategist, Capability::ConfirmReports));
    }
}

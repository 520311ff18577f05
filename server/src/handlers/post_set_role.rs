use crate::handlers::prelude::*;
use sea_orm::{ActiveModelTrait, Set};

#[derive(Deserialize)]
pub struct SetRoleForm {
    role: String,
}

#[post("/account/{account_id}/set_role")]
pub async fn post_set_role(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<SetRoleForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let target_account_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    let admin = roles::check(&state.db, requester, Capability::ManageUsers).await?;
    // Admins cannot demote themselves; another admin has to do it.
    if admin.account_id == target_account_id {
        return Err(AppHttpError::OwnAccountRoleChange);
    }
    let role = match form.role.as_str() {
        "ADMIN" => db::profiles::Role::Admin,
        "STRATEGIST" => db::profiles::Role::Strategist,
        "SCOUTER" => db::profiles::Role::Scouter,
        _ => return Err(AppHttpError::BadClientData),
    };
    let profile = db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(target_account_id))
        .one(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch profile of account {target_account_id}: {e:?}");
            AppHttpError::Internal
        })?
        .ok_or(AppHttpError::NotFound)?;
    let mut update: db::profiles::ActiveModel = profile.into();
    update.role = Set(role);
    update.update_time = Set(time::OffsetDateTime::now_utc());
    update.update(&state.db).await.map_err(|e| {
        log::error!("Failed to update role of account {target_account_id}: {e:?}");
        AppHttpError::Internal
    })?;
    let base = &state.config.site_base_url_path;
    Ok(redirect_with_notice(
        &req,
        format!("{base}/leaderboard"),
        "Role updated.",
    ))
}

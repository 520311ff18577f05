use actix_session::Session;
use actix_web::HttpRequest;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::http_types::*;
use crate::server_state::*;
use scoutdeck_db as db;

#[derive(Clone, Copy)]
pub enum Requester {
    Unauthenticated,
    Account(i64),
}

pub async fn authenticate(
    req: &HttpRequest,
    session: &Session,
) -> Result<Option<i64>, AppHttpError> {
    if let Some(account_id) = session.get::<i64>("account_id").map_err(|e| {
        log::error!("Failed to get session: {e:?}");
        AppHttpError::Internal
    })? {
        return Ok(Some(account_id));
    }
    let state = server_state(req)?;
    // Dev-only backdoor, rejected by config validation in secure mode.
    let Some(name) = state.config.access_control.insecure_default_account.clone() else {
        return Ok(None);
    };
    let account = db::accounts::Entity::find()
        .filter(db::accounts::Column::Name.eq(&name))
        .one(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to look up insecure default account {name}: {e:?}");
            AppHttpError::Internal
        })?;
    let Some(account) = account else {
        return Ok(None);
    };
    session.insert("account_id", account.id).map_err(|e| {
        log::error!("Failed to insert account id {} into session: {e:?}", account.id);
        AppHttpError::Internal
    })?;
    Ok(Some(account.id))
}

pub async fn requester(req: &HttpRequest, session: &Session) -> Result<Requester, AppHttpError> {
    Ok(match authenticate(req, session).await? {
        Some(id) => Requester::Account(id),
        None => Requester::Unauthenticated,
    })
}

/// Registration is an explicit two-step construction: create the account,
/// then create its profile. New accounts always start as scouters; role
/// changes are a separate admin operation.
pub async fn register<C: ConnectionTrait>(
    db: &C,
    name: &str,
    email: Option<&str>,
) -> Result<i64, AppHttpError> {
    crate::validation::validate_account_name(name).map_err(AppHttpError::InvalidAccountName)?;
    let existing = db::accounts::Entity::find()
        .filter(db::accounts::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(|e| {
            log::error!("Failed to check for existing account {name}: {e:?}");
            AppHttpError::Internal
        })?;
    if existing.is_some() {
        return Err(AppHttpError::AccountAlreadyExists);
    }
    let account = db::accounts::ActiveModel {
        name: Set(name.to_owned()),
        email: Set(email.map(|e| e.to_lowercase())),
        ..Default::default()
    };
    let account_id = db::accounts::Entity::insert(account)
        .exec(db)
        .await
        .map_err(|e| {
            log::error!("Failed to insert account {name}: {e:?}");
            AppHttpError::Internal
        })?
        .last_insert_id;
    let now = time::OffsetDateTime::now_utc();
    let profile = db::profiles::ActiveModel {
        account_id: Set(account_id),
        role: Set(db::profiles::Role::Scouter),
        prediction_points: Set(0),
        experience_points: Set(0),
        level: Set(1),
        creation_time: Set(now),
        update_time: Set(now),
        ..Default::default()
    };
    db::profiles::Entity::insert(profile)
        .exec(db)
        .await
        .map_err(|e| {
            log::error!("Failed to insert profile for account {account_id}: {e:?}");
            AppHttpError::Internal
        })?;
    Ok(account_id)
}

pub async fn login(
    db: &sea_orm::DatabaseConnection,
    session: &Session,
    name: &str,
) -> Result<Option<i64>, AppHttpError> {
    let account = db::accounts::Entity::find()
        .filter(db::accounts::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(|e| {
            log::error!("Failed to look up account {name}: {e:?}");
            AppHttpError::Internal
        })?;
    let Some(account) = account else {
        return Ok(None);
    };
    session.insert("account_id", account.id).map_err(|e| {
        log::error!("Failed to insert account id {} into session: {e:?}", account.id);
        AppHttpError::Internal
    })?;
    Ok(Some(account.id))
}

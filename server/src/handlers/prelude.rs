pub use std::collections::HashMap;

pub use actix_session::Session;
pub use actix_web::http::header::ContentType;
pub use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
pub use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
pub use serde::{Deserialize, Serialize};

pub use scoutdeck_db as db;

pub use crate::auth::{requester, Requester};
pub use crate::handlers::tmpl_data::*;
pub use crate::http_types::*;
pub use crate::roles::{self, Capability};
pub use crate::server_state::*;

#[derive(Deserialize, Debug)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

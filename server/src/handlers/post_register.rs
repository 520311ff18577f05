use crate::handlers::prelude::*;

#[derive(Deserialize)]
pub struct RegisterForm {
    name: String,
    email: Option<String>,
}

#[post("/register")]
pub async fn post_register(
    req: HttpRequest,
    session: Session,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let state = server_state(&req)?;
    let name = form.name.trim();
    let email = form
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    let account_id = crate::auth::register(&state.db, name, email).await?;
    session.insert("account_id", account_id).map_err(|e| {
        log::error!("Failed to insert account id {account_id} into session: {e:?}");
        AppHttpError::Internal
    })?;
    let base = &state.config.site_base_url_path;
    Ok(redirect(&req, format!("{base}/dashboard")))
}

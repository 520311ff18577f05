use crate::handlers::prelude::*;

#[derive(Deserialize)]
pub struct LoginForm {
    name: String,
}

#[post("/login")]
pub async fn post_login(
    req: HttpRequest,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let state = server_state(&req)?;
    let base = &state.config.site_base_url_path;
    let name = form.name.trim();
    Ok(
        match crate::auth::login(&state.db, &session, name).await? {
            Some(_) => redirect(&req, format!("{base}/dashboard")),
            None => redirect_with_notice(
                &req,
                format!("{base}/login"),
                "No account with that name.",
            ),
        },
    )
}

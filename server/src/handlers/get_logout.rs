use crate::handlers::prelude::*;

#[get("/logout")]
pub async fn get_logout(
    req: HttpRequest,
    session: Session,
) -> Result<HttpResponse<()>, AppHttpError> {
    session.purge();
    let base = &server_state(&req)?.config.site_base_url_path;
    Ok(redirect(&req, format!("{base}/")))
}

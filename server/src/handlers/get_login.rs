use crate::handlers::prelude::*;

#[derive(Serialize)]
struct LoginTmplData<'a> {
    base_url_path: &'a str,
    notice: String,
}

#[get("/login")]
pub async fn get_login(req: HttpRequest, info: web::Query<NoticeQuery>) -> HttpResult {
    let state = server_state(&req)?;
    render_html(
        state,
        "login",
        &LoginTmplData {
            base_url_path: &state.config.site_base_url_path,
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}

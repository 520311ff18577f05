use crate::handlers::prelude::*;
use crate::engine;
use crate::validation::validate_event_key;

#[derive(Deserialize)]
pub struct CreateEventForm {
    event_key: String,
}

#[post("/create_event")]
pub async fn post_create_event(
    req: HttpRequest,
    session: Session,
    form: web::Form<CreateEventForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ManageEvents).await?;
    let event_key = form.event_key.trim().to_lowercase();
    validate_event_key(&event_key).map_err(|_| AppHttpError::BadClientData)?;
    let imported = engine::import_event(&state.db, &state.tba, &event_key)
        .await
        .map_err(|e| {
            log::error!("Failed to import event {event_key}: {e:?}");
            AppHttpError::Internal
        })?;
    let base = &state.config.site_base_url_path;
    Ok(match imported {
        Some((event, summary)) => {
            log::info!(
                "Imported event {event_key}: {} teams created, {} matches created, {} skipped",
                summary.teams_created,
                summary.matches_created,
                summary.matches_skipped
            );
            redirect(&req, format!("{base}/event/{}", event.id))
        }
        None => redirect_with_notice(
            &req,
            format!("{base}/events"),
            "Event not found at the schedule provider.",
        ),
    })
}

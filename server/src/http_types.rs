use actix_web::http::{header::ContentType, StatusCode};
use actix_web::HttpResponse;
use derive_more::Display;

pub type HttpResult = Result<HttpResponse, AppHttpError>;

#[derive(Debug, Display)]
pub enum AppHttpError {
    #[display(fmt = "Internal error.")]
    Internal,

    #[display(fmt = "Internal error: {_0}")]
    DetailedInternal(String),

    #[display(fmt = "Bad request.")]
    BadClientData,

    #[display(fmt = "Not found.")]
    NotFound,

    #[display(fmt = "Unauthenticated.")]
    Unauthenticated,

    #[display(fmt = "Unauthorized.")]
    Unauthorized,

    #[display(fmt = "Account with the given name already exists. Choose a different name.")]
    AccountAlreadyExists,

    #[display(fmt = "Invalid account name: {_0}")]
    InvalidAccountName(String),

    #[display(fmt = "You are not assigned to this match.")]
    NotAssigned,

    #[display(fmt = "Cannot change prediction - match has already started.")]
    PredictionLocked,

    #[display(fmt = "Both red and blue scores are required.")]
    MissingScores,

    #[display(fmt = "Invalid score values.")]
    InvalidScores,

    #[display(fmt = "You cannot change the role of your own account.")]
    OwnAccountRoleChange,

    #[display(fmt = "Need at least 6 scouters for auto-assignment (have {_0}).")]
    NotEnoughScouters(usize),
}

impl std::error::Error for AppHttpError {}

impl actix_web::error::ResponseError for AppHttpError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::html())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppHttpError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppHttpError::DetailedInternal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppHttpError::NotFound => StatusCode::NOT_FOUND,
            AppHttpError::BadClientData => StatusCode::BAD_REQUEST,
            AppHttpError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppHttpError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppHttpError::AccountAlreadyExists => StatusCode::CONFLICT,
            AppHttpError::InvalidAccountName(_) => StatusCode::BAD_REQUEST,
            AppHttpError::NotAssigned => StatusCode::FORBIDDEN,
            AppHttpError::PredictionLocked => StatusCode::CONFLICT,
            AppHttpError::MissingScores => StatusCode::BAD_REQUEST,
            AppHttpError::InvalidScores => StatusCode::BAD_REQUEST,
            AppHttpError::OwnAccountRoleChange => StatusCode::BAD_REQUEST,
            AppHttpError::NotEnoughScouters(_) => StatusCode::BAD_REQUEST,
        }
    }
}

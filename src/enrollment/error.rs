use axum::http::StatusCode;

#[derive(Debug)]
pub enum EnrollmentError {
    Validation(String),
    NotFound(String),
    Forbidden(String),
    Conflict(String),
    ExternalVerification(String),
    Database(String),
}

impl std::fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "Validation failed: {e}"),
            Self::NotFound(e) => write!(f, "Not found: {e}"),
            Self::Forbidden(e) => write!(f, "Forbidden: {e}"),
            Self::Conflict(e) => write!(f, "Conflict: {e}"),
            Self::ExternalVerification(e) => write!(f, "Gateway verification failed: {e}"),
            Self::Database(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for EnrollmentError {}

impl EnrollmentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ExternalVerification(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<diesel::result::Error> for EnrollmentError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            // A unique index rejecting a write is a lost race with a
            // concurrent request, not a server fault.
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::Conflict(info.message().to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            EnrollmentError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EnrollmentError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EnrollmentError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EnrollmentError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EnrollmentError::ExternalVerification("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_diesel_not_found_maps_to_not_found() {
        let err: EnrollmentError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, EnrollmentError::NotFound(_)));
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        // Two webhooks racing to settle the same correlation id: the loser
        // hits the unique index and must surface as 409, not 500.
        let err: EnrollmentError = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new(
                "duplicate key value violates unique constraint \"payments_gateway_payment_id_key\""
                    .to_string(),
            ),
        )
        .into();
        assert!(matches!(err, EnrollmentError::Conflict(_)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}

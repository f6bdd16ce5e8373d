use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_stack::Report;
use kernel::KernelError;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        match self.0.current_context() {
            // The latest `String` attachment is the reason shown to the caller.
            KernelError::Invalid => {
                let reason = self
                    .0
                    .downcast_ref::<String>()
                    .cloned()
                    .unwrap_or_else(|| KernelError::Invalid.to_string());
                tracing::debug!(%reason, "rejected request");
                (StatusCode::BAD_REQUEST, reason).into_response()
            }
            KernelError::Concurrency => StatusCode::CONFLICT.into_response(),
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT.into_response(),
            KernelError::Internal => {
                tracing::error!(error = ?self.0, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;
    use kernel::KernelError;

    use crate::error::ErrorStatus;

    #[tokio::test]
    async fn invalid_input_is_a_bad_request_with_reason() {
        let report =
            Report::new(KernelError::Invalid).attach_printable(String::from("Unknown field title"));
        let response = ErrorStatus::from(report).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Unknown field title");
    }

    #[test]
    fn conflicting_transaction_is_a_conflict() {
        let response = ErrorStatus::from(Report::new(KernelError::Concurrency)).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_is_a_server_error() {
        let response = ErrorStatus::from(Report::new(KernelError::Internal)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

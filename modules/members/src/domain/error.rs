use http::StatusCode;
use simple_endpoints::EndpointError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemberError {
    #[error("Member {id} not found")]
    NotFound { id: i64 },

    #[error("Member id {id} is out of range")]
    InvalidId { id: i64 },
}

impl MemberError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }
}

impl From<MemberError> for EndpointError {
    fn from(err: MemberError) -> Self {
        let (status, code) = match &err {
            MemberError::NotFound { .. } => (StatusCode::NOT_FOUND, "member_not_found"),
            MemberError::InvalidId { .. } => (StatusCode::BAD_REQUEST, "invalid_member_id"),
        };
        EndpointError::handler(status, code, err.to_string())
    }
}

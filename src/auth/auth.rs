use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

use crate::model::role::Role;

/// Caller identity, placed in request extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Missing token")),
        )
    }
}

impl AuthUser {
    pub fn require_hr_or_admin(&self) -> actix_web::Result<()> {
        if self.role.can_view_all_scores() {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("HR/Admin only"))
        }
    }

    /// Picks whose score to compute. Without an explicit id the caller's own
    /// employee record is used; other employees need HR/Admin rights.
    pub fn scoped_employee(&self, requested: Option<u64>) -> actix_web::Result<u64> {
        match (requested, self.employee_id) {
            (Some(id), Some(own)) if id == own => Ok(id),
            (Some(id), _) => {
                self.require_hr_or_admin()?;
                Ok(id)
            }
            (None, Some(own)) => Ok(own),
            (None, None) => Err(actix_web::error::ErrorBadRequest(
                "employee_id is required for users without an employee profile",
            )),
        }
    }
}

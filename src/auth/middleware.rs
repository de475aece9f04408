use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_access_token;
use crate::config::Config;
use crate::model::role::Role;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => h.to_str().map_err(|_| {
            actix_web::error::ErrorUnauthorized(
                json!({"error": "Invalid Authorization header encoding"}),
            )
        })?,
        None => return Ok(unauthorized(req, json!({"error": "Missing Authorization header"}))),
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            return Ok(unauthorized(
                req,
                json!({"error": "Authorization header must start with Bearer"}),
            ));
        }
    };

    let claims = match verify_access_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return Ok(unauthorized(
                req,
                json!({"error": "Invalid or expired token", "details": e}),
            ));
        }
    };

    let role = match Role::try_from(claims.role) {
        Ok(role) => role,
        Err(id) => {
            tracing::warn!(role_id = id, user_id = claims.user_id, "Token carries unknown role");
            return Ok(unauthorized(req, json!({"error": "Invalid role"})));
        }
    };

    req.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
        role,
        employee_id: claims.employee_id,
    });

    next.call(req).await
}

fn unauthorized(req: ServiceRequest, body: serde_json::Value) -> ServiceResponse<BoxBody> {
    let resp = HttpResponse::Unauthorized().json(body);
    req.into_response(resp.map_into_boxed_body())
}

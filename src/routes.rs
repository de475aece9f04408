use crate::{api::attendance, auth::middleware::auth_middleware, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let requests_per_min = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond((60_000 / u64::from(requests_per_min)).max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let attendance_scope = web::scope("/attendance")
        // /attendance/score
        .service(web::resource("/score").route(web::get().to(attendance::get_score)))
        // /attendance/score/days
        .service(web::resource("/score/days").route(web::get().to(attendance::get_score_days)))
        // /attendance/score/batch
        .service(web::resource("/score/batch").route(web::post().to(attendance::batch_scores)));

    // Protected routes
    let protected = web::scope(&config.api_prefix).wrap(from_fn(auth_middleware));

    match build_limiter(config.rate_protected_per_min) {
        Some(limiter) => cfg.service(protected.wrap(limiter).service(attendance_scope)),
        None => {
            tracing::warn!(
                rate = config.rate_protected_per_min,
                "Rate limiter config rejected, serving without rate limiting"
            );
            cfg.service(protected.service(attendance_scope))
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_builds_for_edge_rates() {
        assert!(build_limiter(0).is_some());
        assert!(build_limiter(1).is_some());
        assert!(build_limiter(120_000).is_some());
    }
}

use crate::api::attendance::{
    AttendanceScoreResponse, BatchScoreRequest, BatchScoreResponse, DayBreakdownResponse,
    ScoreQuery,
};
use crate::model::score::{AttendanceScoreSummary, DayScore, DayStatus};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Score API",
        version = "1.0.0",
        description = r#"
## Attendance scoring for the HRM system

Turns time-clock punches, approved leave and the holiday/weekend calendar into
a per-employee attendance score over any date range.

### 🔹 Scoring rules
- Weekends and holidays are not counted
- Approved leave scores **1.0**
- Earliest check-in at or before the cutoff (default 07:30) scores **1.0**
- A later check-in scores **0.5**
- No punch, or an unreadable one, scores **0.0**

`percentage = points / countable days * 100`, `normalized_score = percentage / 10`.

### 🔐 Security
All endpoints require a **JWT Bearer** access token. Employees may read their
own score; **Admin**, **HR** and **System** may read anyone's and use the
batch endpoint.
"#,
    ),
    paths(
        crate::api::attendance::get_score,
        crate::api::attendance::get_score_days,
        crate::api::attendance::batch_scores,
    ),
    components(
        schemas(
            ScoreQuery,
            AttendanceScoreResponse,
            AttendanceScoreSummary,
            DayBreakdownResponse,
            DayScore,
            DayStatus,
            BatchScoreRequest,
            BatchScoreResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance scoring APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::directory::handlers as directory;
use crate::matching::handlers as findjob;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job matching
        .route(
            "/api/findjob/tagname-to-job",
            get(findjob::handle_tag_to_jobs),
        )
        .route("/api/findjob/soc-details", get(findjob::handle_soc_details))
        .route(
            "/api/findjob/company-jobs",
            get(findjob::handle_company_jobs),
        )
        .route("/api/findjob/courses", get(findjob::handle_courses))
        .route(
            "/api/findjob/enroll-and-fetch-jobs",
            post(findjob::handle_enroll_and_fetch),
        )
        // Profile
        .route("/api/login", get(profile::handle_get_user))
        .route("/api/login/signup", post(profile::handle_signup))
        .route("/api/login/update", put(profile::handle_update))
        .route("/api/login/delete/:userId", delete(profile::handle_delete))
        // Company directory
        .route("/api/comsel/industries", get(directory::handle_industries))
        .route(
            "/api/comsel/company/:name",
            get(directory::handle_company),
        )
        .route(
            "/api/comsel/:industry",
            get(directory::handle_companies_by_industry),
        )
        .with_state(state)
}

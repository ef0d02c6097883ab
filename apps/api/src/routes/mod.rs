pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::{self, require_auth};
use crate::availability::handlers as availability;
use crate::dashboard::handlers as dashboard;
use crate::employees::handlers as employees;
use crate::matching::handlers as matching;
use crate::one_on_ones::handlers as one_on_ones;
use crate::projects::handlers as projects;
use crate::seed::handlers as seed;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let mut resources = resource_routes();
    if state.config.auth_required {
        resources = resources.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));
    }

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/auth/google", post(auth::handlers::handle_google_auth))
        .route("/api/auth/me", get(auth::handlers::handle_me))
        .merge(resources)
        .with_state(state)
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        // Employees (static segments ahead of /:id)
        .route(
            "/api/employees",
            get(employees::handle_list_employees).post(employees::handle_create_employee),
        )
        .route(
            "/api/employees/search",
            get(employees::handle_search_employees),
        )
        .route("/api/employees/matching", post(matching::handle_matching))
        .route(
            "/api/employees/:id",
            get(employees::handle_get_employee)
                .put(employees::handle_update_employee)
                .delete(employees::handle_delete_employee),
        )
        // Skills
        .route(
            "/api/skills",
            get(skills::handle_list_skills).post(skills::handle_create_skill),
        )
        .route("/api/skills/categories", get(skills::handle_list_categories))
        .route(
            "/api/skills/:id",
            get(skills::handle_get_skill)
                .put(skills::handle_update_skill)
                .delete(skills::handle_delete_skill),
        )
        // Projects
        .route(
            "/api/projects",
            get(projects::handle_list_projects).post(projects::handle_create_project),
        )
        .route(
            "/api/projects/:id",
            get(projects::handle_get_project)
                .put(projects::handle_update_project)
                .delete(projects::handle_delete_project),
        )
        // Availability, keyed by employee id
        .route(
            "/api/availability",
            get(availability::handle_list_availability)
                .post(availability::handle_create_availability),
        )
        .route(
            "/api/availability/:employee_id",
            get(availability::handle_get_availability)
                .put(availability::handle_update_availability)
                .delete(availability::handle_delete_availability),
        )
        // One-on-ones
        .route(
            "/api/one-on-ones",
            get(one_on_ones::handle_list_one_on_ones).post(one_on_ones::handle_create_one_on_one),
        )
        .route(
            "/api/one-on-ones/stats/completion-rate",
            get(one_on_ones::handle_completion_rate),
        )
        .route(
            "/api/one-on-ones/:id",
            get(one_on_ones::handle_get_one_on_one)
                .put(one_on_ones::handle_update_one_on_one)
                .delete(one_on_ones::handle_delete_one_on_one),
        )
        // Dashboard
        .route("/api/dashboard/stats", get(dashboard::handle_stats))
        .route(
            "/api/dashboard/skill-distribution",
            get(dashboard::handle_skill_distribution),
        )
        .route(
            "/api/dashboard/skill-distribution/:category",
            get(dashboard::handle_category_distribution),
        )
        .route(
            "/api/dashboard/availability-status",
            get(dashboard::handle_availability_status),
        )
        .route(
            "/api/dashboard/recent-one-on-ones",
            get(dashboard::handle_recent_one_on_ones),
        )
        // Seed
        .route("/api/seed/demo-data", post(seed::handle_demo_data))
        .route("/api/seed/reset", post(seed::handle_reset))
        .route("/api/seed/status", get(seed::handle_status))
}

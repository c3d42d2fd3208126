pub mod companies;
pub mod cover_letters;
pub mod fields;
pub mod health;
pub mod identities;
pub mod recipients;
pub mod shared;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::{handlers::handle_login, middleware::require_bearer};
use crate::dispatch::handlers as dispatch;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Protected routes (bearer token required)
    let protected = Router::new()
        // Fields
        .route(
            "/api/fields",
            get(fields::handle_list_fields).post(fields::handle_create_field),
        )
        .route(
            "/api/fields/:id",
            get(fields::handle_get_field)
                .put(fields::handle_update_field)
                .delete(fields::handle_delete_field),
        )
        // Companies
        .route(
            "/api/companies",
            get(companies::handle_list_companies).post(companies::handle_create_company),
        )
        .route(
            "/api/companies/:id",
            get(companies::handle_get_company).delete(companies::handle_delete_company),
        )
        .route(
            "/api/companies/:id/name",
            put(companies::handle_update_company_name),
        )
        .route(
            "/api/companies/:id/description",
            put(companies::handle_update_company_description),
        )
        .route(
            "/api/companies/:id/field",
            put(companies::handle_associate_company_field),
        )
        // Recipients
        .route(
            "/api/recipients",
            get(recipients::handle_list_recipients).post(recipients::handle_create_recipient),
        )
        .route(
            "/api/recipients/:id",
            get(recipients::handle_get_recipient).delete(recipients::handle_delete_recipient),
        )
        .route(
            "/api/recipients/:id/name",
            put(recipients::handle_update_recipient_name),
        )
        .route(
            "/api/recipients/:id/email",
            put(recipients::handle_update_recipient_email),
        )
        .route(
            "/api/recipients/:id/description",
            put(recipients::handle_update_recipient_description),
        )
        .route(
            "/api/recipients/:id/company",
            put(recipients::handle_associate_recipient_company),
        )
        .route(
            "/api/recipients/:id/generate",
            post(dispatch::handle_generate),
        )
        // Identities
        .route(
            "/api/identities",
            get(identities::handle_list_identities).post(identities::handle_create_identity),
        )
        .route(
            "/api/identities/:id",
            get(identities::handle_get_identity).delete(identities::handle_delete_identity),
        )
        .route(
            "/api/identities/:id/identity",
            put(identities::handle_update_identity_text),
        )
        .route(
            "/api/identities/:id/name",
            put(identities::handle_update_identity_name),
        )
        .route(
            "/api/identities/:id/description",
            put(identities::handle_update_identity_description),
        )
        .route(
            "/api/identities/:id/signature",
            put(identities::handle_update_identity_signature),
        )
        .route(
            "/api/identities/:id/field",
            put(identities::handle_associate_identity_field),
        )
        // Cover letters
        .route(
            "/api/cover-letters",
            get(cover_letters::handle_list_cover_letters)
                .post(cover_letters::handle_create_cover_letter),
        )
        .route(
            "/api/cover-letters/:id",
            get(cover_letters::handle_get_cover_letter)
                .put(cover_letters::handle_update_cover_letter)
                .delete(cover_letters::handle_delete_cover_letter),
        )
        .route(
            "/api/cover-letters/:id/refine",
            post(dispatch::handle_refine),
        )
        .route("/api/cover-letters/:id/send", post(dispatch::handle_send))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    // Public routes
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/login", post(handle_login));

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
}

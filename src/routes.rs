// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers::{agents, auth, customers, dashboard, locations, pages, products, reports, sales},
    middleware::auth::{api_guard, page_guard},
};

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn build_router(app_state: AppState) -> Router {
    let api_layer = axum_middleware::from_fn_with_state(app_state.clone(), api_guard);
    let page_layer = axum_middleware::from_fn_with_state(app_state.clone(), page_guard);

    // Login, logout and status work without a session
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/status", get(auth::status))
        .merge(
            Router::new()
                .route("/users", get(auth::list_users))
                .route("/users/{id}/access", put(auth::update_access))
                .route_layer(api_layer.clone()),
        );

    let customer_routes = Router::new()
        .route("/", get(customers::list_customers).post(customers::create_customer))
        .route(
            "/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route_layer(api_layer.clone());

    let product_routes = Router::new()
        .route("/", get(products::list_products).post(products::create_product))
        .route("/{id}", get(products::get_product).put(products::update_product))
        .route("/{id}/toggle", post(products::toggle_product))
        .route_layer(api_layer.clone());

    let sale_routes = Router::new()
        .route("/", get(sales::list_sales).post(sales::create_sale))
        .route(
            "/{id}",
            get(sales::get_sale).put(sales::update_sale).delete(sales::delete_sale),
        )
        .route("/{id}/payment", patch(sales::update_payment_status))
        .route_layer(api_layer.clone());

    let agent_routes = Router::new()
        .route("/", get(agents::list_agents).post(agents::create_agent))
        .route("/onboard", post(agents::onboard_agent))
        .route("/{id}", put(agents::update_agent))
        .route_layer(api_layer.clone());

    let location_routes = Router::new()
        .route("/provinces", get(locations::list_provinces))
        .route("/cities/{province_id}", get(locations::list_cities))
        .route("/towns/{city_id}", get(locations::list_towns))
        .route_layer(api_layer.clone());

    let dashboard_routes = Router::new()
        .route("/", get(dashboard::get_dashboard))
        .route_layer(api_layer.clone());

    let report_routes = Router::new()
        .route("/", get(reports::get_summary))
        .route("/sales", get(reports::get_rows))
        .route("/export/excel", get(reports::export_excel))
        .route("/export/pdf", get(reports::export_pdf))
        .route_layer(api_layer);

    let page_routes = Router::new()
        .route("/dashboard", get(pages::dashboard_page))
        .route("/customers", get(pages::customers_page))
        .route("/customers/edit/{id}", get(pages::customer_edit_page))
        .route("/sales", get(pages::sales_page))
        .route("/sales/new", get(pages::new_sale_page))
        .route("/products", get(pages::products_page))
        .route("/reports", get(pages::reports_page))
        .route("/sales-agents", get(pages::agents_page))
        .route_layer(page_layer);

    let static_dir = ServeDir::new(app_state.config.public_dir.join("static"));

    Router::new()
        .route("/", get(pages::login_page))
        .route("/login", get(pages::login_page))
        .route("/api/openapi.json", get(openapi_json))
        .nest("/api/auth", auth_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/products", product_routes)
        .nest("/api/sales", sale_routes)
        .nest("/api/sales-agents", agent_routes)
        .nest("/api/locations", location_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/reports", report_routes)
        .merge(page_routes)
        .nest_service("/static", static_dir)
        .fallback(pages::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        models::{
            auth::Principal,
            permissions::{AccessLevel, PermissionMap, Role},
        },
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::IntoResponse,
    };
    use axum_extra::extract::{cookie::Cookie, SignedCookieJar};
    use sqlx::postgres::PgPoolOptions;
    use std::collections::HashMap;
    use tower::ServiceExt;

    // The pool never connects: every request below is settled by the guards
    fn test_state() -> AppState {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SESSION_SECRET", "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"),
            ("DATABASE_URL", "postgres://postgres@localhost:5432/flour_crm_test"),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        let pool = PgPoolOptions::new().connect_lazy_with(config.connect_options().unwrap());
        AppState::with_pool(config, pool)
    }

    async fn session_cookie(state: &AppState, role: Role, access_level: Option<AccessLevel>) -> String {
        let principal = Principal {
            id: 1,
            name: "Test".into(),
            email: "test@flourcrm.com".into(),
            role,
            access_level,
            permissions: PermissionMap::default(),
        };
        let session_id = state.sessions.create(principal).await;

        let jar = SignedCookieJar::new(state.cookie_key.clone())
            .add(Cookie::new("sid", session_id.to_string()));
        let response = jar.into_response();
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_api_without_session_is_unauthorized() {
        let app = build_router(test_state());
        let response = app.oneshot(get("/api/customers")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_page_without_session_redirects_to_login() {
        let app = build_router(test_state());
        let response = app.oneshot(get("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_unknown_paths() {
        let app = build_router(test_state());

        let response = app.clone().oneshot(get("/api/nothing-here")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/nothing-here")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_status_without_session() {
        let app = build_router(test_state());
        let response = app.oneshot(get("/api/auth/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn test_status_with_session() {
        let state = test_state();
        let cookie = session_cookie(&state, Role::Accountant, None).await;
        let app = build_router(state);

        let request = Request::builder()
            .uri("/api/auth/status")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["authenticated"], true);
        assert_eq!(json["user"]["role"], "accountant");
    }

    #[tokio::test]
    async fn test_default_agent_cannot_delete_sales() {
        let state = test_state();
        let cookie = session_cookie(&state, Role::Agent, None).await;
        let app = build_router(state);

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/sales/1")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_exports_need_finance_role() {
        let state = test_state();
        let cookie = session_cookie(&state, Role::Agent, Some(AccessLevel::Full)).await;
        let app = build_router(state);

        let request = Request::builder()
            .uri("/api/reports/export/pdf")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_login_page_redirects_signed_in_users() {
        let state = test_state();
        let cookie = session_cookie(&state, Role::Admin, None).await;
        let app = build_router(state);

        let request = Request::builder()
            .uri("/login")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = build_router(test_state());
        let response = app.oneshot(get("/api/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

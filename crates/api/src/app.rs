use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use persistence::Storage;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{
    amenities, cities, fallback, index, place_amenities, places, reviews, states, users,
};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: Arc<Config>,
}

/// Builds the router. `storage` must already be loaded.
pub fn create_app(config: Config, storage: Arc<dyn Storage>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        storage,
        config: config.clone(),
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route("/status", get(index::status))
        .route("/stats", get(index::stats))
        // States
        .route("/states", get(states::list_states).post(states::create_state))
        .route(
            "/states/:state_id",
            get(states::get_state)
                .put(states::update_state)
                .delete(states::delete_state),
        )
        // Cities
        .route(
            "/states/:state_id/cities",
            get(cities::list_cities_of_state).post(cities::create_city),
        )
        .route(
            "/cities/:city_id",
            get(cities::get_city)
                .put(cities::update_city)
                .delete(cities::delete_city),
        )
        // Amenities
        .route(
            "/amenities",
            get(amenities::list_amenities).post(amenities::create_amenity),
        )
        .route(
            "/amenities/:amenity_id",
            get(amenities::get_amenity)
                .put(amenities::update_amenity)
                .delete(amenities::delete_amenity),
        )
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:user_id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Places
        .route(
            "/cities/:city_id/places",
            get(places::list_places_of_city).post(places::create_place),
        )
        .route(
            "/places/:place_id",
            get(places::get_place)
                .put(places::update_place)
                .delete(places::delete_place),
        )
        .route("/places_search", post(places::search_places))
        // Reviews
        .route(
            "/places/:place_id/reviews",
            get(reviews::list_reviews_of_place).post(reviews::create_review),
        )
        .route(
            "/reviews/:review_id",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        // Place amenities
        .route(
            "/places/:place_id/amenities",
            get(place_amenities::list_amenities_of_place),
        )
        .route(
            "/places/:place_id/amenities/:amenity_id",
            post(place_amenities::link_amenity).delete(place_amenities::unlink_amenity),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(metrics_handler))
        .fallback(fallback)
        // Global middleware (bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

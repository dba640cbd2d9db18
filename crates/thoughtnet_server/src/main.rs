#[macro_use]
extern crate rocket;
use catchers::{bad_request, internal_error, unprocessable_entity, wrong_route};
use integrity::Integrity;
use rocket::{Build, Rocket};
use routes::{THOUGHT_ROUTES, USER_ROUTES};
use std::sync::Arc;
use store::SocialStore;
use tracing::info;

mod catchers;
mod config;
mod guards;
mod integrity;
mod memory;
mod mongo;
mod routes;
mod store;

/**
 * Assemble the server around an already opened store
 *
 * @param store - the document store shared by every request
 * @returns - the rocket instance, ready to launch or to wrap in a local test client
 */
pub fn build_rocket(store: Arc<dyn SocialStore>) -> Rocket<Build> {
    let figment = rocket::Config::figment().merge(("port", *config::PORT));
    rocket::custom(figment)
        .manage(Integrity::new(store))
        .mount("/", routes![health])
        .mount("/api/users", USER_ROUTES.clone())
        .mount("/api/thoughts", THOUGHT_ROUTES.clone())
        .register("/", catchers![wrong_route, internal_error])
        .register(
            "/api",
            catchers![bad_request, unprocessable_entity, internal_error],
        )
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    tracing_subscriber::fmt::init();
    // connect to the document store
    let store = config::connect_store().await?;
    info!("API server starting on port {}", *config::PORT);
    let _ = build_rocket(store).launch().await?;
    Ok(())
}

#[get("/health")]
async fn health() -> &'static str {
    "Hello, world!"
}

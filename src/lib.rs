#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, DatabaseFairing};
use crate::cors::CorsFairing;
use crate::logging::LoggerFairing;

pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// Build the server: routes, catchers and every fairing, including the one
/// that connects to MongoDB.
pub fn build() -> Rocket<Build> {
    rocket_without_db().attach(DatabaseFairing)
}

/// Everything except the database connection.
fn rocket_without_db() -> Rocket<Build> {
    rocket::build()
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(CorsFairing)
        .mount("/api", api::routes())
        .mount("/api", cors::routes())
        .register("/", error::catchers())
}

/// Connect to the database server named by `db_uri` in the Rocket config.
#[cfg(test)]
async fn db_client() -> mongodb::Client {
    let db_uri = rocket::Config::figment()
        .extract_inner::<String>("db_uri")
        .expect("`db_uri` not set");
    mongodb::Client::with_uri_str(&db_uri)
        .await
        .expect("Could not connect to database")
}

/// A fresh database name for a single test.
#[cfg(test)]
fn database() -> String {
    config::get_database_name()
}

/// The full server, using the given database instead of the configured one.
#[cfg(test)]
async fn rocket_for_db(client: mongodb::Client, db_name: &str) -> Rocket<Build> {
    let db = client.database(db_name);
    config::setup_database(&db)
        .await
        .expect("Failed to set up test database");
    rocket_without_db().manage(client).manage(db)
}

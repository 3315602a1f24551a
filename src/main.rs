#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_derive;

use rocket::{Build, Rocket};
use std::{net::IpAddr, process::exit};
use tracing::{error, info, warn};
use yatube_models::{
    db_conn::{init_pool, DbPool},
    migrations::IMPORTED_MIGRATIONS,
    CONFIG,
};

mod cache;
mod db_conn;
mod routes;

use crate::{cache::PageCache, routes::timelines::IndexCache};

/// Mounts every route on `rocket`, with the shared state they need.
pub fn build(rocket: Rocket<Build>, pool: DbPool, index_cache: IndexCache) -> Rocket<Build> {
    rocket
        .mount(
            "/",
            routes![
                routes::about::author,
                routes::about::tech,
                routes::comments::create,
                routes::groups::create,
                routes::groups::details,
                routes::posts::create,
                routes::posts::delete,
                routes::posts::details,
                routes::posts::new,
                routes::posts::update,
                routes::timelines::follow_index,
                routes::timelines::index,
                routes::user::details,
                routes::user::follow,
                routes::user::unfollow,
            ],
        )
        .register(
            "/",
            catchers![
                routes::errors::unauthorized,
                routes::errors::forbidden,
                routes::errors::not_found,
                routes::errors::unprocessable_entity,
                routes::errors::server_error,
            ],
        )
        .manage(pool)
        .manage(index_cache)
}

#[rocket::main]
async fn main() {
    tracing_subscriber::fmt::init();

    match dotenv::dotenv() {
        Ok(path) => info!("Configuration read from {}", path.display()),
        Err(ref e) if e.not_found() => warn!("no .env was found"),
        Err(e) => warn!("Couldn't read .env: {}", e),
    }

    let pool = match init_pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Couldn't create the database pool: {}", e);
            exit(1);
        }
    };
    match pool.get() {
        Ok(conn) => {
            if IMPORTED_MIGRATIONS.is_pending(&conn).unwrap_or(true) {
                error!("The database is not up to date, run `ytb migration run` first");
                exit(1);
            }
        }
        Err(e) => {
            error!("Couldn't connect to the database: {}", e);
            exit(1);
        }
    }

    let address = match CONFIG.address.parse::<IpAddr>() {
        Ok(address) => address,
        Err(_) => {
            error!("Invalid configuration: ROCKET_ADDRESS must be an IP address");
            exit(1);
        }
    };
    let figment = rocket::Config::figment()
        .merge(("address", address))
        .merge(("port", CONFIG.port));

    let index_cache = PageCache::new(&CONFIG.index_cache);
    if let Err(e) = build(rocket::custom(figment), pool, index_cache)
        .launch()
        .await
    {
        error!("Yatube stopped: {}", e);
        exit(1);
    }
}

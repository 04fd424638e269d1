mod api;
mod blockchain;
mod config;
mod pow;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;

use api::AppState;
use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();

    println!(
        "⛓️ Starting prime-chain node at http://{}:{} (target chain length {})",
        config.host, config.port, config.chain_target
    );

    let state = web::Data::new(AppState::new(&config));
    let bind = (config.host.clone(), config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind(bind)?
    .run()
    .await
}

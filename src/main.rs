use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizgen_server::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    // lopdf logs every decoded font encoding at info.
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info,lopdf=warn"));

    let config = Config::from_env();
    config.validate_for_production();

    let bind_address = config.bind_address();
    let cors_origin = config.cors_allowed_origin.clone();
    let state = web::Data::new(AppState::new(config));

    log::info!(
        "starting HTTP server on http://{}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(state.clone())
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}

use std::sync::Arc;

use log::{error, info};

use gobarber_web::{
    config::Config,
    context::AppContext,
    logger,
    pages::Pages,
    routes::{self, AppState},
    templates::Templates,
    Error,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // The logger may not be up yet
        eprintln!("gobarber-web: {}", err);
        error!("Exiting: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    logger::init(config.log_level)?;

    info!("Starting GoBarber web at {}", config.bind);

    let ctx = AppContext::init(&config)?;
    let state = AppState {
        pages: Arc::new(Pages::new(&ctx)),
        templates: Arc::new(Templates::load(&config.templates)?),
        ctx: ctx.clone(),
    };
    let app = routes::router(state, &config.public_dir);

    let served = axum::Server::try_bind(&config.bind)
        .map_err(|err| Error::Server(err.into()))?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    ctx.shutdown();
    served.map_err(|err| Error::Server(err.into()))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received ctrl-c"),
        Err(err) => {
            error!("Failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await
        }
    }
}

pub mod chronometer;
pub mod configuration;
pub mod create_server;
pub mod error;
pub mod logger;
pub mod server;

use self::{
    configuration::Configuration,
    create_server::{create_server, State},
    logger::Logger,
};
use std::{net::SocketAddr, process, sync::Arc};
use tokio::runtime::Builder;

fn main() {
    let logger = Logger::new();

    let configuration = match Configuration::new() {
        Ok(configuration) => configuration,
        Err(message) => {
            logger.log(message);
            process::exit(1);
        }
    };

    let server = match create_server(Arc::new(State::default()), logger) {
        Ok(server) => server,
        Err(error) => {
            logger.log(format!("Invalid route: {}", error));
            process::exit(1);
        }
    };

    let runtime = match Builder::new_multi_thread().worker_threads(configuration.threads()).enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            logger.log(format!("Could not start runtime: {}", error));
            process::exit(1);
        }
    };

    let address = SocketAddr::new(configuration.host(), configuration.port());
    logger.log(format!("listening on {} with {} threads", address, configuration.threads()));
    if let Err(error) = runtime.block_on(server.run(address)) {
        logger.log(format!("Server error: {}", error));
        process::exit(1);
    }
}

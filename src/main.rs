//! # CGI HTTP Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.0: parsea la configuración,
//! inicializa los logs y corre el loop de accept hasta un error fatal.

use cgi_httpd::config::Config;
use cgi_httpd::server::Server;
use log::{error, LevelFilter};

fn main() {
    // Crear configuración (CLI con fallback a env)
    let config = Config::new();

    // RUST_LOG tiene prioridad sobre --verbose
    env_logger::Builder::new()
        .filter_level(if config.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    if let Err(e) = config.validate() {
        error!("❌ Configuración inválida: {}", e);
        std::process::exit(1);
    }
    config.print_summary();

    let server = match Server::from_config(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("💥 Error al iniciar servidor: {}", e);
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloqueará el proceso)
    if let Err(e) = server.run() {
        error!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}

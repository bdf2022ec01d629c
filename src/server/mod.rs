//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. `listener`: abre el socket de escucha
//! 2. `acceptor`: acepta conexiones y resuelve el nombre del cliente
//! 3. `concurrency`: decide en qué proceso se sirve cada request
//! 4. `tcp`: el loop que une todo lo anterior

pub mod acceptor;
pub mod concurrency;
pub mod listener;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use concurrency::{ConcurrencyModel, Forking, Sequential};
pub use tcp::Server;

//! # CGI HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 que sirve archivos estáticos, listados de directorios
//! y scripts CGI bajo una raíz de documentos.
//!
//! ## Arquitectura
//!
//! - `http`: parsing del request y armado de respuestas HTTP/1.0
//! - `server`: socket de escucha, acceptor y modelos de concurrencia
//! - `dispatch`: elige el handler según los atributos del archivo
//! - `handlers`: CGI, archivo, listado y página de error
//! - `resolver`: traduce URIs a rutas canónicas dentro de la raíz
//! - `mime`: tabla de tipos MIME por extensión
//! - `config`: argumentos de línea de comandos y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use cgi_httpd::config::Config;
//! use cgi_httpd::server::Server;
//!
//! let config = Config::default();
//! let server = Server::from_config(&config).expect("Error al iniciar servidor");
//! server.run().expect("Error fatal");
//! ```

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod http;
pub mod mime;
pub mod resolver;
pub mod server;

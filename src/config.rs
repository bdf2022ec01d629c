//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor HTTP con soporte completo
//! para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./cgi_httpd -p 9898 -r www -c forking \
//!   -m /etc/mime.types \
//!   -M text/plain
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 ROOT_PATH=/srv/www CONCURRENCY=forking ./cgi_httpd
//! ```

use clap::{Parser, ValueEnum};
use log::info;
use std::path::Path;

/// Estrategia de concurrencia
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConcurrencyMode {
    /// Un request a la vez, en orden de llegada
    Single,

    /// Un proceso hijo por request
    Forking,
}

impl std::fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConcurrencyMode::Single => write!(f, "Single"),
            ConcurrencyMode::Forking => write!(f, "Forking"),
        }
    }
}

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "cgi_httpd")]
#[command(about = "Servidor HTTP/1.0 de archivos, CGI y listados de directorio")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "9898", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz de documentos
    #[arg(short, long, default_value = "www", env = "ROOT_PATH")]
    pub root: String,

    /// Archivo mime.types (`tipo ext ext...` por línea)
    #[arg(short = 'm', long = "mime-types", default_value = "/etc/mime.types", env = "MIME_TYPES_PATH")]
    pub mime_types_path: String,

    /// Tipo MIME cuando la extensión no aparece en la tabla
    #[arg(short = 'M', long = "default-mime", default_value = "text/plain", env = "DEFAULT_MIME_TYPE")]
    pub default_mime_type: String,

    /// Modo de concurrencia: single o forking
    #[arg(short, long, value_enum, default_value = "single", env = "CONCURRENCY")]
    pub concurrency: ConcurrencyMode,

    /// Habilita logs de depuración
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use cgi_httpd::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:9898");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be >= 1".to_string());
        }

        if self.default_mime_type.trim().is_empty() {
            return Err("Default MIME type must not be empty".to_string());
        }

        if !Path::new(&self.root).is_dir() {
            return Err(format!("Root path {} is not a directory", self.root));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        info!("Listening on      {}", self.address());
        info!("RootPath        = {}", self.root);
        info!("MimeTypesPath   = {}", self.mime_types_path);
        info!("DefaultMimeType = {}", self.default_mime_type);
        info!("ConcurrencyMode = {}", self.concurrency);
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 9898,
            host: "0.0.0.0".to_string(),
            root: "www".to_string(),
            mime_types_path: "/etc/mime.types".to_string(),
            default_mime_type: "text/plain".to_string(),
            concurrency: ConcurrencyMode::Single,
            verbose: false,
        }
    }
}

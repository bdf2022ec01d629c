//! # Contexto del Servidor
//! src/context.rs
//!
//! Valor inmutable construido una sola vez a partir de [`Config`] y pasado
//! por referencia al dispatcher y a los handlers. En modo forking cada hijo
//! recibe su propia copia al hacer `fork`.

use crate::config::Config;
use crate::error::ServerError;
use crate::mime::{MimeTypeResolver, MimeTypes};
use crate::resolver::{PathResolver, RootResolver};
use std::path::{Path, PathBuf};

/// Configuración resuelta y colaboradores de un servidor
pub struct ServerContext {
    root: PathBuf,
    port: u16,
    resolver: Box<dyn PathResolver>,
    mime_types: Box<dyn MimeTypeResolver>,
}

impl ServerContext {
    /// Canonicaliza la raíz y carga la tabla MIME
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let root = Path::new(&config.root)
            .canonicalize()
            .map_err(|e| ServerError::Config(format!("root {}: {}", config.root, e)))?;

        let mime_types = MimeTypes::load(&config.mime_types_path, &config.default_mime_type);

        Ok(Self::new(
            root.clone(),
            config.port,
            Box::new(RootResolver::new(root)),
            Box::new(mime_types),
        ))
    }

    /// Contexto con colaboradores arbitrarios
    pub fn new(
        root: PathBuf,
        port: u16,
        resolver: Box<dyn PathResolver>,
        mime_types: Box<dyn MimeTypeResolver>,
    ) -> Self {
        Self {
            root,
            port,
            resolver,
            mime_types,
        }
    }

    /// Raíz canónica de documentos (`DOCUMENT_ROOT` para los CGI)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Puerto de escucha (`SERVER_PORT` para los CGI)
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn resolver(&self) -> &dyn PathResolver {
        self.resolver.as_ref()
    }

    pub fn mime_types(&self) -> &dyn MimeTypeResolver {
        self.mime_types.as_ref()
    }
}

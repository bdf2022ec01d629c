//! # Tipos MIME
//! src/mime.rs
//!
//! Tabla extensión → tipo MIME cargada desde un archivo `mime.types`:
//!
//! ```text
//! # comentario
//! text/html                   html htm
//! image/png                   png
//! application/octet-stream
//! ```
//!
//! Si el archivo no se puede leer se usa la tabla de `mime_guess`. Cuando la
//! extensión no aparece, la respuesta usa el tipo por defecto configurado.

use log::warn;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Determina el Content-Type de un archivo
pub trait MimeTypeResolver {
    /// Nunca falla: sin coincidencia retorna el tipo por defecto
    fn lookup(&self, path: &Path) -> String;
}

/// Origen de la tabla
#[derive(Debug, Clone)]
enum Table {
    /// Cargada de un archivo mime.types
    File(HashMap<String, String>),

    /// Tabla incluida en `mime_guess`
    Builtin,
}

/// Tabla MIME con tipo por defecto
#[derive(Debug, Clone)]
pub struct MimeTypes {
    table: Table,
    default_type: String,
}

impl MimeTypes {
    /// Carga `path`; si falla, registra un warning y usa la tabla incluida
    pub fn load(path: &str, default_type: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_contents(&contents, default_type),
            Err(e) => {
                warn!("Cannot read {}: {} (using built-in MIME table)", path, e);
                Self::builtin(default_type)
            }
        }
    }

    /// Construye la tabla desde el texto de un mime.types
    ///
    /// Si una extensión aparece en varias líneas gana la primera.
    ///
    /// # Ejemplo
    /// ```
    /// use cgi_httpd::mime::{MimeTypeResolver, MimeTypes};
    /// use std::path::Path;
    ///
    /// let mimes = MimeTypes::from_contents("text/html html htm\n", "text/plain");
    /// assert_eq!(mimes.lookup(Path::new("/www/index.htm")), "text/html");
    /// assert_eq!(mimes.lookup(Path::new("/www/README")), "text/plain");
    /// ```
    pub fn from_contents(contents: &str, default_type: &str) -> Self {
        let mut table = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(mime_type) = fields.next() else {
                continue;
            };
            for extension in fields {
                table
                    .entry(extension.to_string())
                    .or_insert_with(|| mime_type.to_string());
            }
        }

        Self {
            table: Table::File(table),
            default_type: default_type.to_string(),
        }
    }

    /// Tabla de `mime_guess`
    pub fn builtin(default_type: &str) -> Self {
        Self {
            table: Table::Builtin,
            default_type: default_type.to_string(),
        }
    }
}

impl MimeTypeResolver for MimeTypes {
    fn lookup(&self, path: &Path) -> String {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return self.default_type.clone();
        };

        let found = match &self.table {
            Table::File(table) => table.get(extension).map(String::as_str),
            Table::Builtin => mime_guess::from_ext(extension).first_raw(),
        };

        found.unwrap_or(self.default_type.as_str()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# MIME type                 Extensions
text/html                   html htm
text/css                    css
image/png                   png

application/octet-stream
text/x-html-alt             html
";

    #[test]
    fn test_lookup_from_file_contents() {
        let mimes = MimeTypes::from_contents(SAMPLE, "text/plain");

        assert_eq!(mimes.lookup(Path::new("/www/index.html")), "text/html");
        assert_eq!(mimes.lookup(Path::new("/www/style.css")), "text/css");
        assert_eq!(mimes.lookup(Path::new("/www/a/b/logo.png")), "image/png");
    }

    #[test]
    fn test_first_entry_wins() {
        let mimes = MimeTypes::from_contents(SAMPLE, "text/plain");
        assert_eq!(mimes.lookup(Path::new("page.html")), "text/html");
    }

    #[test]
    fn test_default_on_no_match() {
        let mimes = MimeTypes::from_contents(SAMPLE, "application/x-unknown");

        assert_eq!(mimes.lookup(Path::new("/www/data.xyz")), "application/x-unknown");
        assert_eq!(mimes.lookup(Path::new("/www/Makefile")), "application/x-unknown");
    }

    #[test]
    fn test_builtin_table() {
        let mimes = MimeTypes::builtin("text/plain");

        assert_eq!(mimes.lookup(Path::new("index.html")), "text/html");
        assert_eq!(mimes.lookup(Path::new("image.png")), "image/png");
        assert_eq!(mimes.lookup(Path::new("noextension")), "text/plain");
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let mimes = MimeTypes::load("/definitely/not/mime.types", "text/plain");
        assert_eq!(mimes.lookup(Path::new("index.html")), "text/html");
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("cgi_httpd_mime_{}.types", std::process::id()));
        fs::write(&path, "text/x-custom custom\n").unwrap();

        let mimes = MimeTypes::load(path.to_str().unwrap(), "text/plain");
        assert_eq!(mimes.lookup(Path::new("file.custom")), "text/x-custom");
        assert_eq!(mimes.lookup(Path::new("file.html")), "text/plain");

        let _ = fs::remove_file(&path);
    }
}

//! # Resolución de Rutas
//! src/resolver.rs
//!
//! Convierte la URI de un request en una ruta canónica dentro de la raíz de
//! documentos. Una URI que escapa de la raíz (`/../etc/passwd`, symlinks
//! hacia afuera) o que apunta a algo inexistente no se resuelve.
//!
//! La URI llega como bytes crudos del request line, así que un nombre de
//! archivo que no es UTF-8 se resuelve igual que cualquier otro.

use log::debug;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Resuelve URIs a rutas absolutas en disco
pub trait PathResolver {
    /// Ruta canónica para `uri`, o `None` si no existe o sale de la raíz
    fn resolve(&self, uri: &OsStr) -> Option<PathBuf>;
}

/// Resolver anclado a una raíz canónica
#[derive(Debug, Clone)]
pub struct RootResolver {
    root: PathBuf,
}

impl RootResolver {
    /// `root` debe ser ya canónica (ver `ServerContext::from_config`)
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl PathResolver for RootResolver {
    fn resolve(&self, uri: &OsStr) -> Option<PathBuf> {
        let relative = uri.as_bytes();
        let start = relative.iter().position(|&b| b != b'/').unwrap_or(relative.len());
        let candidate = self.root.join(Path::new(OsStr::from_bytes(&relative[start..])));

        let path = match candidate.canonicalize() {
            Ok(path) => path,
            Err(e) => {
                debug!("Cannot canonicalize {}: {}", candidate.display(), e);
                return None;
            }
        };

        if !path.starts_with(&self.root) {
            debug!("{} escapes root {}", path.display(), self.root.display());
            return None;
        }

        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn resolve(resolver: &RootResolver, uri: &str) -> Option<PathBuf> {
        resolver.resolve(OsStr::new(uri))
    }

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cgi_httpd_resolver_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("docs")).unwrap();
        fs::write(dir.join("docs/index.html"), "<html></html>").unwrap();
        dir.canonicalize().unwrap()
    }

    #[test]
    fn test_resolve_inside_root() {
        let root = temp_root("inside");
        let resolver = RootResolver::new(root.clone());

        assert_eq!(resolve(&resolver, "/"), Some(root.clone()));
        assert_eq!(resolve(&resolver, "/docs"), Some(root.join("docs")));
        assert_eq!(resolve(&resolver, "/docs/index.html"), Some(root.join("docs/index.html")));
        assert_eq!(resolve(&resolver, "/docs/../docs/index.html"), Some(root.join("docs/index.html")));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_resolve_missing() {
        let root = temp_root("missing");
        let resolver = RootResolver::new(root.clone());

        assert_eq!(resolve(&resolver, "/nope.txt"), None);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_resolve_escape() {
        let root = temp_root("escape");
        let resolver = RootResolver::new(root.join("docs"));

        // El padre existe pero está fuera de la raíz
        assert_eq!(resolve(&resolver, "/.."), None);
        assert_eq!(resolve(&resolver, "/../../"), None);

        let _ = fs::remove_dir_all(&root);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_escape() {
        let root = temp_root("symlink");
        std::os::unix::fs::symlink("/", root.join("docs/outside")).unwrap();
        let resolver = RootResolver::new(root.join("docs"));

        assert_eq!(resolve(&resolver, "/outside"), None);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_resolve_non_utf8_name() {
        let root = temp_root("bytes");
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        fs::write(root.join(name), "latin-1").unwrap();
        let resolver = RootResolver::new(root.clone());

        let uri = OsStr::from_bytes(b"/caf\xe9.txt");
        assert_eq!(resolver.resolve(uri), Some(root.join(name)));

        let _ = fs::remove_dir_all(&root);
    }
}

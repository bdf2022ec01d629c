//! # Handler de Errores
//!
//! Escribe la status line y una página HTML mínima. Es el handler terminal
//! cuando cualquier otro componente falla, por eso no propaga errores.

use crate::http::{Request, Response, StatusCode};
use log::debug;

/// Responde con la página de error de `status` y retorna ese mismo status
pub fn handle_error(request: &mut Request, status: StatusCode) -> StatusCode {
    debug!("HANDLE ERROR {}", status);

    if let Err(e) = Response::error_page(status).write_to(request.stream()) {
        debug!("Cannot write error page to {}: {}", request.host(), e);
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{exchange, read_response};

    #[test]
    fn test_error_page_written() {
        let (mut request, client) = exchange(b"");

        let status = handle_error(&mut request, StatusCode::NotFound);
        drop(request);

        assert_eq!(status, StatusCode::NotFound);
        let text = read_response(client);
        assert!(text.starts_with("HTTP/1.0 404 Not Found\r\nContent-Type: text/html\r\n\r\n"));
        assert!(text.contains("<h1>404 Not Found</h1>"));
    }

    #[test]
    fn test_error_after_client_left() {
        let (mut request, client) = exchange(b"");
        drop(client);

        // Aunque el cliente ya cerró, el status se retorna igual
        assert_eq!(
            handle_error(&mut request, StatusCode::InternalServerError),
            StatusCode::InternalServerError
        );
    }
}

//! # Hammer
//! src/bin/hammer.rs
//!
//! Generador de carga: N workers, cada uno con R requests GET secuenciales
//! contra la misma URL. Reporta el tiempo de cada request, el promedio por
//! worker y el promedio total.
//!
//! ```bash
//! hammer -p 4 -r 10 http://localhost:9898/index.html
//! ```

use clap::Parser;
use reqwest::blocking::Client;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(name = "hammer")]
#[command(about = "Martilla el servidor HTTP con requests concurrentes")]
struct Args {
    /// Cantidad de workers concurrentes
    #[arg(short, long, default_value = "1")]
    processes: usize,

    /// Requests por worker
    #[arg(short, long, default_value = "1")]
    requests: usize,

    /// Imprime el cuerpo de cada respuesta
    #[arg(short, long)]
    verbose: bool,

    /// URL a pedir
    url: String,
}

/// Cliente sin conexiones reutilizadas: el servidor cierra tras cada respuesta
fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(30))
        .tcp_nodelay(true)
        .build()
}

/// Un GET completo; retorna el cuerpo de la respuesta
fn fetch(client: &Client, url: &str) -> reqwest::Result<String> {
    client.get(url).send()?.text()
}

fn average(times: &[Duration]) -> f64 {
    if times.is_empty() {
        return 0.0;
    }
    times.iter().map(Duration::as_secs_f64).sum::<f64>() / times.len() as f64
}

fn worker(id: usize, client: &Client, url: &str, requests: usize, verbose: bool) -> f64 {
    let mut times = Vec::with_capacity(requests);

    for r in 0..requests {
        let start = Instant::now();
        let response = fetch(client, url);
        let elapsed = start.elapsed();

        match response {
            Ok(body) if verbose => println!("{}", body),
            Ok(_) => {}
            Err(e) => eprintln!("Process: {}, Request: {}, Error: {}", id, r, e),
        }
        println!(
            "Process: {}, Request: {}, Elapsed Time: {:.2}",
            id,
            r,
            elapsed.as_secs_f64()
        );
        times.push(elapsed);
    }

    let avg = average(&times);
    println!("Process: {}, AVERAGE:  , Elapsed Time: {:.2}", id, avg);
    avg
}

fn main() {
    let args = Args::parse();

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Cannot build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let handles: Vec<_> = (0..args.processes.max(1))
        .map(|id| {
            // Client es un Arc por dentro
            let client = client.clone();
            let url = args.url.clone();
            let requests = args.requests.max(1);
            let verbose = args.verbose;
            thread::spawn(move || worker(id, &client, &url, requests, verbose))
        })
        .collect();

    let averages: Vec<f64> = handles
        .into_iter()
        .filter_map(|handle| handle.join().ok())
        .collect();

    let total = if averages.is_empty() {
        0.0
    } else {
        averages.iter().sum::<f64>() / averages.len() as f64
    };
    println!("TOTAL AVERAGE ELAPSED TIME: {:.2}", total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Servidor de una sola respuesta; retorna el request recibido
    fn one_shot(response: &'static [u8]) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/x?q=1", listener.local_addr().unwrap());

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let n = stream.read(&mut buf).unwrap();
            stream.write_all(response).unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        (url, server)
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        let times = [Duration::from_millis(100), Duration::from_millis(300)];
        assert!((average(&times) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_fetch_returns_body() {
        let (url, server) = one_shot(b"HTTP/1.0 200 OK\r\nContent-Length: 2\r\n\r\nhi");
        let client = build_client().unwrap();

        let body = fetch(&client, &url).unwrap();

        assert_eq!(body, "hi");
        assert!(server.join().unwrap().starts_with("GET /x?q=1 HTTP/1.1\r\n"));
    }

    #[test]
    fn test_fetch_reads_until_close_without_length() {
        let (url, server) = one_shot(b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nstreamed");
        let client = build_client().unwrap();

        assert_eq!(fetch(&client, &url).unwrap(), "streamed");
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_rejects_bad_url() {
        let client = build_client().unwrap();
        assert!(fetch(&client, "not a url").is_err());
    }

    #[test]
    fn test_worker_counts_failed_requests() {
        let client = build_client().unwrap();
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        // Nadie escucha: cada request falla pero igual se cronometra
        let avg = worker(0, &client, &format!("http://127.0.0.1:{}/", port), 2, false);
        assert!(avg >= 0.0);
    }
}

//! Standalone REST server binary
//!
//! Usage: cargo run -p fivedraw_web --bin fivedraw-web-server -- --port 8000

use fivedraw_web::{ServerConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fivedraw_web::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let defaults = ServerConfig::default();
    let mut host = defaults.host().to_string();
    let mut port = match std::env::var("PORT") {
        Ok(value) => value.parse().map_err(|_| format!("invalid PORT value: {value}"))?,
        Err(_) => defaults.port(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --host requires a value");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a value");
                    std::process::exit(1);
                }
            }
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    let config = ServerConfig::new(host, port);
    tracing::info!(host = config.host(), port = config.port(), "starting fivedraw web server");

    let handle = WebServer::new(config).start().await?;
    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}

fn print_help() {
    println!("Fivedraw Web Server");
    println!();
    println!("Usage: fivedraw-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>   Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>   Port to bind to (default: $PORT or 8000)");
    println!("  --help              Show this help message");
}

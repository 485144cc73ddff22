use staticserve::{Dispatcher, FileHandler, ServerConfig, ServerResult};
use std::env;
use std::net::TcpListener;
use std::path::Path;
use std::thread;

fn main() -> ServerResult<()> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let config = if args.len() > 1 && Path::new(&args[1]).exists() {
        // Load configuration from file
        ServerConfig::from_json_file(&args[1])?
    } else {
        // Use default configuration
        ServerConfig::new()
    };

    let address = config.socket_address();
    let listener = TcpListener::bind(&address)?;

    println!("Serving {} on {}", config.root_dir.display(), address);

    // Set up a signal handler for graceful shutdown
    ctrlc::set_handler(move || {
        println!("Received shutdown signal. Stopping server...");
        std::process::exit(0);
    })
    .expect("Error setting Ctrl-C handler");

    // One thread per accepted connection; each connection carries exactly
    // one request/response cycle.
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("accept failed: {}", e);
                continue;
            }
        };

        let handler = FileHandler::new(&config.root_dir).with_index_file(&config.index_file);
        thread::spawn(move || {
            let mut dispatcher = Dispatcher::new(handler);
            if let Err(e) = dispatcher.run(&stream, &stream) {
                log::warn!("connection error: {}", e);
            }
        });
    }

    Ok(())
}

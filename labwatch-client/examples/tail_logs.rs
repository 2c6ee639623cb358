//! Follow the live-log stream for one service and print records as they
//! arrive.
//!
//! ```sh
//! STREAM_URL=ws://localhost:3001/ws STREAM_SERVICE=portainer \
//!     cargo run -p labwatch-client --example tail_logs
//! ```

use std::time::Duration;

use labwatch_client::LogStream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let url =
        std::env::var("STREAM_URL").unwrap_or_else(|_| "ws://localhost:3001/ws".to_string());
    let service = std::env::var("STREAM_SERVICE").unwrap_or_else(|_| "portainer".to_string());

    let stream = LogStream::connect(url, &service);
    println!("following logs for {service} (ctrl-c to quit)");

    // Give the handshake a moment before treating Disconnected as final
    for _ in 0..50 {
        if stream.is_connected() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let mut printed = 0;
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let logs = stream.logs();
        for record in logs.iter().skip(printed) {
            println!("{} [{}] {}", record.timestamp, record.level, record.message);
        }
        printed = logs.len();

        // No auto-reconnect; once the server goes away we are done
        if !stream.is_connected() {
            println!("stream disconnected");
            break;
        }
    }

    Ok(())
}

//! Poll a Portainer instance and print container counts as they refresh.
//!
//! ```sh
//! PORTAINER_URL=http://localhost:9000 PORTAINER_TOKEN=ptr_... \
//!     cargo run -p labwatch-client --example poll_containers
//! ```

use std::time::Duration;

use labwatch_adapters::portainer::PortainerAdapter;
use labwatch_client::PollHandle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let endpoint =
        std::env::var("PORTAINER_URL").unwrap_or_else(|_| "http://localhost:9000".to_string());
    let mut builder = PortainerAdapter::builder().endpoint(endpoint);
    if let Ok(token) = std::env::var("PORTAINER_TOKEN") {
        builder = builder.token(token);
    }
    let adapter = builder.build();

    let poller = PollHandle::spawn(
        move || {
            let adapter = adapter.clone();
            async move { adapter.collect().await }
        },
        Duration::from_secs(30),
    );

    let mut states = poller.subscribe();
    loop {
        states.changed().await?;
        let state = states.borrow_and_update().clone();
        if let Some(stats) = state.data() {
            println!(
                "containers: {} running, {} stopped, {} total",
                stats.running, stats.stopped, stats.total
            );
        } else if let Some(error) = state.error() {
            println!("poll failed: {error}");
        }
    }
}

#![allow(dead_code)]

use std::time::Duration;

use books_core::{ApiClient, ReportSettings, Session};
use uuid::Uuid;

/// Start the mock Books API on an ephemeral port and return its base URL.
pub fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            books_mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/v1/books")
}

pub fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

/// A session against a fresh server, with report handling switched off.
pub fn session() -> Session {
    books_core::telemetry::init_for_tests();
    let base_url = start_server();
    Session::with_client(client(&base_url), ReportSettings::disabled()).unwrap()
}

pub fn is_uuid_v4(id: &Uuid) -> bool {
    id.get_version() == Some(uuid::Version::Random)
}

#![allow(dead_code)]
use petfriends_core::Credential;
use petfriends_harness::{HarnessConfig, Session};
use rstest::fixture;
use tracing::info;

pub const EMAIL: &str = "user@example.com";
pub const PASSWORD: &str = "secret";

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Starts a fresh mock service on a random port and returns its base URL.
pub fn start_mock() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let addr = std_listener.local_addr().expect("local addr");
    std_listener.set_nonblocking(true).expect("set non-blocking");

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).expect("valid listener");
            petfriends_mock::run(listener, [(EMAIL, PASSWORD)]).await
        })
        .expect("mock server");
    });

    info!(%addr, "mock pet service started");
    format!("http://{addr}")
}

/// Configuration pointing at a dedicated mock service.
#[fixture]
pub fn config() -> HarnessConfig {
    init_tracing();
    HarnessConfig::new(Credential::new(EMAIL, PASSWORD), start_mock())
}

#[fixture]
pub fn session(config: HarnessConfig) -> Session {
    match Session::open(&config) {
        Ok(session) => session,
        Err(error) => panic!("fail to open session: {error:?}"),
    }
}

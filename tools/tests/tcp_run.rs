use std::sync::Arc;

use schema::Registry;
use session::{NoAuth, RunReport, Runner, SessionConfig, UnixAuth};
use tokio::net::TcpListener;
use xrdsim_tools::{FuzzClient, FuzzTarget, LoginClient, LoginServer};

async fn run_pair(
    client: Arc<dyn session::ClientScenario>,
    clients: usize,
    server_config: SessionConfig,
    client_config: SessionConfig,
) -> (RunReport, RunReport) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let server = Runner::new(
        Registry::shared(),
        server_config,
        Arc::new(UnixAuth::new("server", "server")),
    );
    let server = tokio::spawn(async move {
        server
            .run_passive(listener, clients, Arc::new(LoginServer))
            .await
    });

    let runner = Runner::new(
        Registry::shared(),
        client_config,
        Arc::new(UnixAuth::new("imposter", "users")),
    );
    let client_report = runner.run_active(&address, clients, client).await;
    let server_report = server.await.unwrap().unwrap();
    (client_report, server_report)
}

#[tokio::test]
async fn login_over_tcp() {
    let verifying = SessionConfig {
        verify_auth: true,
        ..SessionConfig::default()
    };
    let (client, server) =
        run_pair(Arc::new(LoginClient), 3, verifying, SessionConfig::default()).await;
    assert_eq!(client, RunReport { succeeded: 3, failed: 0 });
    assert_eq!(server, RunReport { succeeded: 3, failed: 0 });
}

#[tokio::test]
async fn seeded_ping_fuzzing_over_tcp() {
    let mut client_config = SessionConfig::default();
    client_config.fuzz.iterations = 20;
    client_config.fuzz.seed = Some(1);
    let scenario = Arc::new(FuzzClient {
        target: FuzzTarget::Ping,
    });
    let (client, server) =
        run_pair(scenario, 1, SessionConfig::default(), client_config).await;
    assert_eq!(client.succeeded, 1);
    assert_eq!(server.succeeded, 1);
}

#[tokio::test]
async fn refused_connections_are_counted() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let runner = Runner::new(Registry::shared(), SessionConfig::default(), Arc::new(NoAuth));
    let report = runner.run_active(&address, 2, Arc::new(LoginClient)).await;
    assert_eq!(report, RunReport { succeeded: 0, failed: 2 });
}

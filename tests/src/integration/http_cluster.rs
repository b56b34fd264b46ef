//! # HTTP Cluster
//!
//! Two complete nodes (`NodeRuntime` over `HttpPeerTransport`) on localhost
//! ports. Exercises the real wire path: JSON bodies, peer push to
//! `/api/p2p/receive-block` and periodic pull from `/api/p2p/get-chain`.

#[cfg(test)]
mod tests {
    use node_runtime::{NodeConfig, NodeContainer, NodeRuntime};
    use pl_04_api_gateway::ApiGatewayService;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    struct RunningNode {
        base_url: String,
        stop: oneshot::Sender<()>,
        task: JoinHandle<Result<(), node_runtime::NodeError>>,
    }

    impl RunningNode {
        async fn shutdown(self) {
            let _ = self.stop.send(());
            tokio::time::timeout(Duration::from_secs(10), self.task)
                .await
                .expect("node did not stop")
                .unwrap()
                .unwrap();
        }
    }

    fn config(vars: &[(&str, String)]) -> NodeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        let config = NodeConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        config.validate().unwrap();
        config
    }

    async fn start(config: NodeConfig, listener: TcpListener) -> RunningNode {
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let container = NodeContainer::with_http(config).unwrap();
        let gateway =
            ApiGatewayService::new(container.config.gateway_config(), container.app_state())
                .unwrap();
        let runtime = NodeRuntime::new(container);

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(runtime.serve_on(gateway, listener, async move {
            let _ = stopped.await;
        }));
        RunningNode {
            base_url,
            stop,
            task,
        }
    }

    async fn get(client: &reqwest::Client, url: String) -> Value {
        client.get(url).send().await.unwrap().json().await.unwrap()
    }

    /// Poll `url` until `done` holds on its JSON body.
    async fn wait_until(
        client: &reqwest::Client,
        url: String,
        done: impl Fn(&Value) -> bool,
    ) -> Value {
        for _ in 0..100 {
            let body = get(client, url.clone()).await;
            if done(&body) {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("condition on {url} not reached");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_two_nodes_replicate_over_http() {
        let listener_a = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let listener_b = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port_a = listener_a.local_addr().unwrap().port();
        let port_b = listener_b.local_addr().unwrap().port();

        // a is the designated seed node; b learns the examples by pulling
        let a = start(
            config(&[
                ("NODE_ID", "DNP-NODE".to_string()),
                ("NODE_ADDRESS", "127.0.0.1".to_string()),
                ("NODE_PORT", port_a.to_string()),
                ("INITIAL_PEERS", format!("NODE-B:127.0.0.1:{port_b}")),
            ]),
            listener_a,
        )
        .await;
        let b = start(
            config(&[
                ("NODE_ID", "NODE-B".to_string()),
                ("NODE_ADDRESS", "127.0.0.1".to_string()),
                ("NODE_PORT", port_b.to_string()),
                ("INITIAL_PEERS", format!("DNP-NODE:127.0.0.1:{port_a}")),
                ("SYNC_INTERVAL_SECS", "1".to_string()),
            ]),
            listener_b,
        )
        .await;
        let client = reqwest::Client::new();

        wait_until(&client, format!("{}/api/contracts", b.base_url), |body| {
            body["count"] == 2
        })
        .await;

        // push: a contract created on b reaches a
        let created: Value = client
            .post(format!("{}/api/contracts", b.base_url))
            .json(&json!({
                "entity_code": "GOB-ANT-003",
                "entity_name": "Gobernación de Antioquia",
                "contract_type": "CONSULTORIA",
                "description": "Interventoría de vías terciarias",
                "amount": "450000000",
                "created_by": "dev-003"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(created["success"], true);
        assert_eq!(created["block_index"], 3);
        let contract_id = created["contract_id"].as_str().unwrap().to_string();

        wait_until(&client, format!("{}/api/contracts", a.base_url), |body| {
            body["count"] == 3
        })
        .await;

        // and a step validated on a reaches b
        let response = client
            .post(format!("{}/api/contracts/{contract_id}/validate-step", a.base_url))
            .json(&json!({
                "step_number": 1,
                "validator_id": "dev-003",
                "validator_name": "Desarrollador",
                "role": "PROJECT_DEVELOPER",
                "approved": true,
                "comments": "Proyecto radicado"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let status = wait_until(
            &client,
            format!("{}/api/contracts/{contract_id}/workflow", b.base_url),
            |body| body["current_step"] == 2,
        )
        .await;
        assert_eq!(status["status"], "TECHNICAL_REVIEW");
        assert_eq!(status["next_role"], "TECHNICAL_COMMISSION");

        let chain_a = get(&client, format!("{}/api/p2p/get-chain", a.base_url)).await;
        let chain_b = get(&client, format!("{}/api/p2p/get-chain", b.base_url)).await;
        assert_eq!(chain_a["length"], 5);
        assert_eq!(chain_a["chain"], chain_b["chain"]);

        let peers = get(&client, format!("{}/api/p2p/peers", a.base_url)).await;
        assert_eq!(peers["count"], 1);

        a.shutdown().await;
        b.shutdown().await;
    }

    #[tokio::test]
    async fn test_manual_sync_against_stopped_peer_is_bad_gateway() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        // nothing listens on the peer's port once this listener is dropped
        let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_port = dead.local_addr().unwrap().port();
        drop(dead);

        let node = start(
            config(&[
                ("NODE_ID", "NODE-SOLO".to_string()),
                ("NODE_PORT", port.to_string()),
                ("INITIAL_PEERS", format!("NODE-GONE:127.0.0.1:{dead_port}")),
                ("PEER_TIMEOUT_SECS", "1".to_string()),
            ]),
            listener,
        )
        .await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/p2p/sync", node.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 502);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("no peer reachable"));

        node.shutdown().await;
    }
}

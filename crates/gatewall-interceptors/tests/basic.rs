use futures::FutureExt;
use gatewall_admission::prelude::*;
use gatewall_interceptors::prelude::*;
use gatewall_storage::prelude::*;
use gatewall_types::prelude::*;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

struct MockReq {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    peer: Option<IpAddr>,
}

struct MockRes {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<serde_json::Value>,
}

impl MockRes {
    fn empty() -> Self {
        Self {
            status: 0,
            headers: HashMap::new(),
            body: None,
        }
    }

    fn code(&self) -> &str {
        self.body.as_ref().unwrap()["code"].as_str().unwrap()
    }
}

impl ProtoRequest for MockReq {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).cloned()
    }

    fn peer_addr(&self) -> Option<IpAddr> {
        self.peer
    }
}

#[async_trait::async_trait]
impl ProtoResponse for MockRes {
    fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    fn insert_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    async fn write_json(&mut self, body: &serde_json::Value) -> Result<(), InterceptError> {
        self.body = Some(body.clone());
        Ok(())
    }
}

fn license(key: &str) -> License {
    License {
        key: key.into(),
        user_id: Id("user_1".into()),
        admin_id: Id("admin_1".into()),
        tier: LicenseTier::Premium,
        hwids: vec![],
        valid_until: Timestamp::now().plus_secs(3_600),
        request_limit: None,
        request_count: 0,
        last_used_ip: None,
        last_used_hwid: None,
        created_at: Timestamp(0),
    }
}

fn chain(vault: &MemoryVault, config: AdmissionConfig) -> (InterceptorChain, Arc<AdmissionPipeline>) {
    let pipeline = Arc::new(AdmissionPipeline::new(
        Arc::new(vault.clone()),
        Arc::new(vault.clone()),
        Arc::new(vault.clone()),
        config,
    ));
    let chain = InterceptorChain::new(vec![
        Box::new(ContextInitStage),
        Box::new(AdmissionStage {
            pipeline: Arc::clone(&pipeline),
        }),
        Box::new(ResponseStampStage),
    ]);
    (chain, pipeline)
}

fn request(headers: &[(&str, &str)], peer: &str) -> MockReq {
    MockReq {
        method: "POST".into(),
        path: "/v1/data".into(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        peer: Some(peer.parse().unwrap()),
    }
}

#[tokio::test]
async fn admitted_request_reaches_the_handler_with_license_context() {
    let vault = MemoryVault::new();
    vault.create(&license("lic_ok")).await.unwrap();
    let (chain, _) = chain(&vault, AdmissionConfig::default());

    let mut req = request(&[(LICENSE_KEY_HEADER, "lic_ok")], "10.0.0.1");
    let mut res = MockRes::empty();

    chain
        .run_with_handler(AdmitContext::default(), &mut req, &mut res, |cx, _| {
            let tier = cx.license.as_ref().unwrap().tier;
            async move { Ok(serde_json::json!({"ok": true, "tier": tier.as_str()})) }.boxed()
        })
        .await
        .unwrap();

    assert_eq!(res.status, 200);
    assert!(res.headers.contains_key(REQUEST_ID_HEADER));
    assert_eq!(res.body.as_ref().unwrap()["tier"], "PREMIUM");
}

#[tokio::test]
async fn missing_license_key_yields_401_with_stable_code() {
    let vault = MemoryVault::new();
    let (chain, _) = chain(&vault, AdmissionConfig::default());

    let mut req = request(&[], "10.0.0.2");
    let mut res = MockRes::empty();

    chain
        .run_with_handler(AdmitContext::default(), &mut req, &mut res, |_, _| {
            async move { Ok(serde_json::json!({"handler": "ran"})) }.boxed()
        })
        .await
        .unwrap();

    assert_eq!(res.status, 401);
    assert_eq!(res.code(), "LICENSE_REQUIRED");
}

#[tokio::test]
async fn forwarded_for_first_hop_is_the_caller_address() {
    let vault = MemoryVault::new();
    vault.create(&license("lic_fwd")).await.unwrap();
    let (chain, pipeline) = chain(&vault, AdmissionConfig::default());

    pipeline
        .registry()
        .block(
            "198.51.100.7".parse().unwrap(),
            ActorId::System,
            None,
            None,
            None,
        )
        .await
        .unwrap();

    let mut req = request(
        &[
            (LICENSE_KEY_HEADER, "lic_fwd"),
            (FORWARDED_FOR_HEADER, "198.51.100.7, 70.1.1.1"),
        ],
        "10.0.0.3",
    );
    let mut res = MockRes::empty();

    chain
        .run_with_handler(AdmitContext::default(), &mut req, &mut res, |_, _| {
            async move { Ok(serde_json::json!({"handler": "ran"})) }.boxed()
        })
        .await
        .unwrap();

    assert_eq!(res.status, 403);
    assert_eq!(res.code(), "IP_BLOCKED");
}

#[tokio::test]
async fn unparseable_forwarded_for_falls_back_to_peer_address() {
    let vault = MemoryVault::new();
    vault.create(&license("lic_peer")).await.unwrap();
    let (chain, pipeline) = chain(&vault, AdmissionConfig::default());

    pipeline
        .registry()
        .block("10.0.0.4".parse().unwrap(), ActorId::System, None, None, None)
        .await
        .unwrap();

    let mut req = request(
        &[
            (LICENSE_KEY_HEADER, "lic_peer"),
            (FORWARDED_FOR_HEADER, "unknown"),
        ],
        "10.0.0.4",
    );
    let mut res = MockRes::empty();

    chain
        .run_with_handler(AdmitContext::default(), &mut req, &mut res, |_, _| {
            async move { Ok(serde_json::json!({"handler": "ran"})) }.boxed()
        })
        .await
        .unwrap();

    assert_eq!(res.status, 403);
    assert_eq!(res.code(), "IP_BLOCKED");
}

#[tokio::test]
async fn budget_exhaustion_yields_429() {
    let vault = MemoryVault::new();
    vault.create(&license("lic_rate")).await.unwrap();
    let mut config = AdmissionConfig::default();
    config.budgets.premium = RateBudget {
        window_secs: 60,
        max_requests: 1,
    };
    let (chain, _) = chain(&vault, config);

    for expected in [200u16, 429] {
        let mut req = request(&[(LICENSE_KEY_HEADER, "lic_rate")], "10.0.0.5");
        let mut res = MockRes::empty();
        chain
            .run_with_handler(AdmitContext::default(), &mut req, &mut res, |_, _| {
                async move { Ok(serde_json::json!({"ok": true})) }.boxed()
            })
            .await
            .unwrap();
        assert_eq!(res.status, expected);
    }

    assert_eq!(vault.license_snapshot("lic_rate").unwrap().request_count, 1);
}

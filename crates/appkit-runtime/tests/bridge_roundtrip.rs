use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use appkit_common::{ActionNamespace, SurfaceId};
use appkit_config::AppConfig;
use appkit_runtime::actions::ActionResult;
use appkit_runtime::{
    ActionModule, AppRuntime, Args, ChannelSink, HeadlessHost, InvokeClient, OpenOptions, Services,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;

async fn add(params: Vec<Value>) -> ActionResult {
    let args = Args::new(params);
    let a: i64 = args.required(0, "a")?;
    let b: i64 = args.required(1, "b")?;
    Ok(json!(a + b))
}

async fn slow_add(params: Vec<Value>) -> ActionResult {
    let delay: u64 = Args::new(params.clone()).required(2, "delayMs")?;
    tokio::time::sleep(Duration::from_millis(delay)).await;
    add(params).await
}

fn math(_: &Services) -> Vec<ActionModule> {
    vec![ActionModule::new("actions/math")
        .action("add", add)
        .action("slowAdd", slow_add)]
}

struct Harness {
    runtime: Arc<AppRuntime>,
    clients: HashMap<SurfaceId, Arc<InvokeClient>>,
}

fn harness(surfaces: &[(&str, Option<&str>)]) -> Harness {
    let host = Arc::new(HeadlessHost::new());
    let (sink, mut outbound) = ChannelSink::new();
    let runtime = AppRuntime::builder(AppConfig::default(), host, Arc::new(sink))
        .user_actions(math)
        .build()
        .unwrap();

    let mut clients = HashMap::new();
    for (path, channel) in surfaces {
        let options = OpenOptions {
            channel: channel.map(str::to_string),
        };
        let surface = runtime.windows().open(path, options).unwrap();
        let rt = Arc::clone(&runtime);
        let client = InvokeClient::new(move |request| {
            rt.dispatch(surface, request);
        });
        clients.insert(surface, Arc::new(client));
    }

    let routes = clients.clone();
    tokio::spawn(async move {
        while let Some((surface, message)) = outbound.recv().await {
            if let Some(client) = routes.get(&surface) {
                client.handle_message(message);
            }
        }
    });

    Harness { runtime, clients }
}

#[tokio::test]
async fn concurrent_calls_resolve_to_their_own_results() {
    let h = harness(&[("/", None)]);
    let (&main, client) = h.clients.iter().next().unwrap();

    let slow = client.invoke(ActionNamespace::User, "actions/math", "slowAdd", vec![json!(1), json!(2), json!(40)]);
    let fast = client.invoke(ActionNamespace::User, "actions/math", "add", vec![json!(3), json!(4)]);
    let missing = client.invoke(ActionNamespace::User, "actions/math", "divide", vec![]);

    assert_eq!(fast.wait().await.unwrap(), json!(7));
    assert_eq!(slow.wait().await.unwrap(), json!(3));
    let err = missing.wait().await.unwrap_err();
    assert_eq!(err.name, "MainProcessApiNotFoundError");
    assert!(err.message.contains("divide"));

    assert_eq!(client.pending_count(), 0);
    assert_eq!(h.runtime.windows().surfaces(), vec![main]);
}

#[tokio::test]
async fn argument_errors_travel_back_with_their_name() {
    let h = harness(&[("/", None)]);
    let client = h.clients.values().next().unwrap();

    let err = client
        .invoke(ActionNamespace::User, "actions/math", "add", vec![json!("one"), json!(2)])
        .wait()
        .await
        .unwrap_err();
    assert_eq!(err.name, "InvalidArgumentsError");
}

#[tokio::test]
async fn builtins_see_the_surface_that_called_them() {
    let h = harness(&[("/", None), ("/prefs", Some("prefs"))]);

    for (&surface, client) in &h.clients {
        let current = client
            .invoke(ActionNamespace::Builtin, "window", "currentWindow", vec![])
            .wait()
            .await
            .unwrap();
        assert_eq!(current["id"], json!(surface.get()));
        let expected_channel = h.runtime.windows().channel_of(surface);
        assert_eq!(current["channel"], json!(expected_channel));
    }
}

#[tokio::test]
async fn state_writes_notify_every_surface() {
    let h = harness(&[("/", None), ("/side", Some("side"))]);
    let (tx, mut rx) = mpsc::unbounded_channel();
    for (&surface, client) in &h.clients {
        let tx = tx.clone();
        client.on_global_state_change(move |key| {
            let _ = tx.send((surface, key.map(str::to_string)));
        });
    }

    let writer = h.clients.values().next().unwrap();
    let applied = writer
        .invoke(
            ActionNamespace::Builtin,
            "global",
            "setGlobalState",
            vec![json!("theme"), json!({"data": "dark", "updatedAt": 1.0})],
        )
        .wait()
        .await
        .unwrap();
    assert_eq!(applied, json!(true));

    let mut notified = Vec::new();
    for _ in 0..h.clients.len() {
        let (surface, key) = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(key.as_deref(), Some("theme"));
        notified.push(surface);
    }
    notified.sort();
    let mut expected: Vec<SurfaceId> = h.clients.keys().copied().collect();
    expected.sort();
    assert_eq!(notified, expected);

    let reader = h.clients.values().last().unwrap();
    let value = reader
        .invoke(ActionNamespace::Builtin, "global", "getGlobalState", vec![json!("theme")])
        .wait()
        .await
        .unwrap();
    assert_eq!(value, json!({"data": "dark", "updatedAt": 1.0}));
}

#[tokio::test]
async fn closing_a_surface_through_a_builtin_releases_its_channel() {
    let h = harness(&[("/", None), ("/chat", Some("chat"))]);
    let chat = h.runtime.windows().get_by_channel("chat").unwrap();
    let main = h.runtime.windows().get_by_channel("_top").unwrap();

    h.clients[&main]
        .invoke(
            ActionNamespace::Builtin,
            "window",
            "close",
            vec![json!({"windowAtChannel": "chat"})],
        )
        .wait()
        .await
        .unwrap();

    assert!(h.runtime.windows().get_by_channel("chat").is_err());
    assert_eq!(h.runtime.windows().channel_of(chat), None);
    assert_eq!(h.runtime.windows().surfaces(), vec![main]);
}

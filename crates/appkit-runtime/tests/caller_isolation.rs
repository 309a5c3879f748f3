use std::sync::Arc;
use std::time::Duration;

use appkit_common::{ActionNamespace, SurfaceId};
use appkit_runtime::actions::ActionResult;
use appkit_runtime::{
    action, current_caller, run_with_context, spawn_with_caller, ActionsRegistry, ChannelSink,
    InvokeRequest, IpcBridge,
};
use proptest::prelude::*;
use serde_json::{json, Value};

async fn report_caller(params: Vec<Value>) -> ActionResult {
    let delay = params.first().and_then(Value::as_u64).unwrap_or(0);
    let before = current_caller()?;
    tokio::time::sleep(Duration::from_millis(delay)).await;
    tokio::task::yield_now().await;
    let after = current_caller()?;
    let background = spawn_with_caller(async { current_caller() })
        .await
        .map_err(|e| appkit_runtime::ActionError::new("JoinError", e.to_string()))??;
    Ok(json!([before.get(), after.get(), background.get()]))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn concurrent_invocations_each_see_their_own_caller(
        calls in prop::collection::vec((1u32..50, 0u64..8), 1..24),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let registry = Arc::new(ActionsRegistry::new());
            registry.register_action(ActionNamespace::User, "echo", "caller", action(report_caller));
            let (sink, _rx) = ChannelSink::new();
            let bridge = Arc::new(IpcBridge::new(registry, Arc::new(sink)));

            let handles: Vec<_> = calls
                .iter()
                .enumerate()
                .map(|(i, (surface, delay))| {
                    let request = InvokeRequest {
                        namespace: ActionNamespace::User,
                        source_id: "echo".into(),
                        function_name: "caller".into(),
                        params: vec![json!(delay)],
                        invoke_id: i as u64,
                    };
                    (*surface, bridge.spawn(SurfaceId::new(*surface), request))
                })
                .collect();

            for (surface, handle) in handles {
                let value = handle.await.unwrap().into_result().unwrap();
                assert_eq!(value, json!([surface, surface, surface]));
            }
        });
    }

    #[test]
    fn nested_scopes_restore_in_order(ids in prop::collection::vec(1u32..1000, 1..10)) {
        let rt = runtime();
        rt.block_on(async {
            fn nest(ids: Vec<u32>) -> futures_util::future::BoxFuture<'static, ()> {
                Box::pin(async move {
                    let Some((&first, rest)) = ids.split_first() else { return };
                    let rest = rest.to_vec();
                    run_with_context(SurfaceId::new(first), async move {
                        assert_eq!(current_caller().unwrap(), SurfaceId::new(first));
                        nest(rest).await;
                        assert_eq!(current_caller().unwrap(), SurfaceId::new(first));
                    })
                    .await;
                })
            }
            nest(ids).await;
            assert!(current_caller().is_err());
        });
    }
}

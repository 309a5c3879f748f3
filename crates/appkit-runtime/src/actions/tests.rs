use std::sync::Arc;

use appkit_common::{ActionNamespace, RegistryError};
use serde_json::{json, Value};

use super::*;

fn echo() -> ActionFn {
    action(|params: Vec<Value>| async move { Ok(Value::Array(params)) })
}

#[test]
fn lookup_returns_the_registered_handler() {
    let registry = ActionsRegistry::new();
    let handler = echo();
    registry
        .register(
            ActionNamespace::User,
            "actions/echo",
            "echo",
            Export::Async(Arc::clone(&handler)),
        )
        .unwrap();

    let found = registry
        .lookup(ActionNamespace::User, "actions/echo", "echo")
        .unwrap();
    assert!(Arc::ptr_eq(found.handler(), &handler));
    assert_eq!(found.namespace(), ActionNamespace::User);
    assert_eq!(found.source_id(), "actions/echo");
    assert_eq!(found.name(), "echo");
}

#[test]
fn lookup_is_keyed_by_all_three_parts() {
    let registry = ActionsRegistry::new();
    registry.register_action(ActionNamespace::Builtin, "window", "close", echo());

    assert!(registry.lookup(ActionNamespace::Builtin, "window", "close").is_some());
    assert!(registry.lookup(ActionNamespace::User, "window", "close").is_none());
    assert!(registry.lookup(ActionNamespace::Builtin, "app", "close").is_none());
    assert!(registry.lookup(ActionNamespace::Builtin, "window", "show").is_none());
}

#[test]
fn registering_a_value_fails_with_not_an_action() {
    let registry = ActionsRegistry::new();
    let err = registry
        .register(
            ActionNamespace::User,
            "actions/consts",
            "VERSION",
            Export::Value(json!("1.0")),
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotAnAction { ref name, .. } if name == "VERSION"));
    assert!(registry.is_empty());
}

#[test]
fn registering_a_sync_fn_fails_with_not_async() {
    let registry = ActionsRegistry::new();
    let err = registry
        .register(
            ActionNamespace::User,
            "actions/math",
            "add",
            Export::Sync(sync_fn(|_| Ok(json!(3)))),
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotAsync { ref source_id, .. } if source_id == "actions/math"));
    assert!(registry.lookup(ActionNamespace::User, "actions/math", "add").is_none());
}

#[test]
fn register_overwrites_same_key() {
    let registry = ActionsRegistry::new();
    let first = echo();
    let second = echo();
    registry.register_action(ActionNamespace::User, "a", "f", first);
    registry.register_action(ActionNamespace::User, "a", "f", Arc::clone(&second));

    assert_eq!(registry.len(), 1);
    let found = registry.lookup(ActionNamespace::User, "a", "f").unwrap();
    assert!(Arc::ptr_eq(found.handler(), &second));
}

#[test]
fn register_module_is_all_or_nothing() {
    let registry = ActionsRegistry::new();
    let module = ActionModule::new("actions/mixed")
        .action("ok", |_| async { Ok(Value::Null) })
        .export("bad", Export::Value(json!(1)));

    assert!(registry.register_module(ActionNamespace::User, &module).is_err());
    assert!(registry.is_empty());
}

#[test]
fn unregister_all_user_keeps_builtins() {
    let registry = ActionsRegistry::new();
    registry.register_action(ActionNamespace::Builtin, "window", "close", echo());
    registry.register_action(ActionNamespace::Builtin, "global", "getGlobalState", echo());
    registry.register_action(ActionNamespace::User, "actions/a", "one", echo());
    registry.register_action(ActionNamespace::User, "actions/b", "two", echo());

    assert_eq!(registry.unregister_all(ActionNamespace::User), 2);
    assert!(registry.names(ActionNamespace::User).is_empty());
    assert!(registry.lookup(ActionNamespace::Builtin, "window", "close").is_some());
    assert!(registry
        .lookup(ActionNamespace::Builtin, "global", "getGlobalState")
        .is_some());
}

#[test]
fn replace_namespace_swaps_user_actions() {
    let registry = ActionsRegistry::new();
    registry.register_action(ActionNamespace::Builtin, "app", "quit", echo());
    registry.register_action(ActionNamespace::User, "actions/old", "gone", echo());

    let modules = vec![
        ActionModule::new("actions/new").action("a", |_| async { Ok(json!("a")) }),
        ActionModule::new("actions/new").action("b", |_| async { Ok(json!("b")) }),
    ];
    let count = registry
        .replace_namespace(ActionNamespace::User, &modules)
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(
        registry.names(ActionNamespace::User),
        vec!["actions/new.a".to_string(), "actions/new.b".to_string()]
    );
    assert!(registry.lookup(ActionNamespace::User, "actions/old", "gone").is_none());
    assert!(registry.lookup(ActionNamespace::Builtin, "app", "quit").is_some());
}

#[test]
fn failed_replace_leaves_namespace_untouched() {
    let registry = ActionsRegistry::new();
    registry.register_action(ActionNamespace::User, "actions/keep", "me", echo());

    let modules = vec![
        ActionModule::new("actions/new").action("fine", |_| async { Ok(Value::Null) }),
        ActionModule::new("actions/new").export("broken", Export::Sync(sync_fn(|_| Ok(Value::Null)))),
    ];
    assert!(registry
        .replace_namespace(ActionNamespace::User, &modules)
        .is_err());

    assert!(registry.lookup(ActionNamespace::User, "actions/keep", "me").is_some());
    assert!(registry.lookup(ActionNamespace::User, "actions/new", "fine").is_none());
}

#[tokio::test]
async fn action_call_runs_the_handler() {
    let registry = ActionsRegistry::new();
    registry.register_action(ActionNamespace::User, "actions/echo", "echo", echo());

    let action = registry
        .lookup(ActionNamespace::User, "actions/echo", "echo")
        .unwrap();
    let value = action.call(vec![json!(1), json!("x")]).await.unwrap();
    assert_eq!(value, json!([1, "x"]));
}

#[test]
fn args_decode_required_and_optional() {
    let args = Args::new(vec![json!("/notes"), Value::Null, json!({"channel": "c"})]);
    let path: String = args.required(0, "path").unwrap();
    assert_eq!(path, "/notes");

    let missing: Option<String> = args.optional(1, "title").unwrap();
    assert!(missing.is_none());
    let absent: Option<String> = args.optional(9, "nothing").unwrap();
    assert!(absent.is_none());

    let err = args.required::<u32>(0, "count").unwrap_err();
    assert_eq!(err.name, "InvalidArgumentsError");
    assert!(err.message.contains("count"));

    let err = args.required::<String>(5, "late").unwrap_err();
    assert!(err.message.contains("missing argument #5"));
}

#[test]
fn export_debug_hides_closures() {
    assert_eq!(format!("{:?}", Export::Async(echo())), "async fn");
    assert_eq!(format!("{:?}", Export::Value(json!(2))), "Value(Number(2))");
}

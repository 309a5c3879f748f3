mod core;

pub use self::core::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_id_display() {
        let id = SurfaceId::new(42);
        assert_eq!(id.to_string(), "surface-42");
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn surface_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&SurfaceId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn surface_handle_wire_shape() {
        let handle = SurfaceHandle::from(SurfaceId::new(3));
        let json = serde_json::to_value(handle).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 3 }));

        let parsed: SurfaceHandle = serde_json::from_str(r#"{"id":3}"#).unwrap();
        assert_eq!(parsed, handle);
    }

    #[test]
    fn namespace_is_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&ActionNamespace::Builtin).unwrap(),
            "\"builtin\""
        );
        let ns: ActionNamespace = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(ns, ActionNamespace::User);
        assert!(serde_json::from_str::<ActionNamespace>("\"system\"").is_err());
    }

    #[test]
    fn namespace_display() {
        assert_eq!(ActionNamespace::User.to_string(), "user");
        assert_eq!(ActionNamespace::Builtin.as_str(), "builtin");
    }
}

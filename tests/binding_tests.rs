//! Integration tests for binding, lookup and unbinding through a context.

use std::ptr::NonNull;

use jsbind::prelude::*;

struct Widget {
    label: &'static str,
}

struct Gadget {
    serial: u64,
}

fn widget(label: &'static str) -> Widget {
    Widget { label }
}

// =============================================================================
// Bind / Lookup / Unbind
// =============================================================================

#[test]
fn bind_lookup_unbind_round() {
    let ctx = BindContext::new();
    let native = widget("a");
    let ptr = NonNull::from(&native);
    let key = BindKey::from_addr(0x4000).unwrap();

    assert!(bind_native(&ctx, key, ptr).is_ok());
    assert_eq!(get_bound_native::<Widget>(&ctx, key), Some(ptr));

    assert!(unbind_native(&ctx, key, ptr).is_ok());
    assert!(get_bound_native::<Widget>(&ctx, key).is_none());
}

#[test]
fn null_key_always_fails() {
    let ctx = BindContext::new();
    let native = widget("a");
    let ptr = NonNull::from(&native);

    assert_eq!(
        bind_native(&ctx, std::ptr::null::<Widget>(), ptr),
        Err(BindError::NullKey)
    );
    assert_eq!(bind_native(&ctx, 0usize, ptr), Err(BindError::NullKey));
    assert!(get_bound_native::<Widget>(&ctx, 0usize).is_none());
    assert_eq!(unbind_native(&ctx, 0usize, ptr), Err(BindError::NullKey));
    assert!(ctx.is_empty());
}

#[test]
fn duplicate_bind_fails_and_keeps_original() {
    let ctx = BindContext::new();
    let first = widget("first");
    let second = widget("second");
    let key = BindKey::of(&first);

    ctx.bind(key, NonNull::from(&first)).unwrap();
    let err = ctx.bind(key, NonNull::from(&second)).unwrap_err();

    assert_eq!(err.kind(), "already_bound");
    assert_eq!(err.key(), Some(key));
    let found = ctx.get::<Widget>(key).unwrap();
    assert_eq!(unsafe { found.as_ref() }.label, "first");
}

#[test]
fn mismatched_unbind_leaves_binding() {
    let ctx = BindContext::new();
    let bound = widget("bound");
    let other = widget("other");
    let key = BindKey::of(&bound);
    ctx.bind(key, NonNull::from(&bound)).unwrap();

    let err = ctx.unbind(key, NonNull::from(&other)).unwrap_err();
    assert!(matches!(err, BindError::Mismatch { .. }));
    assert_eq!(ctx.get::<Widget>(key), Some(NonNull::from(&bound)));
}

#[test]
fn unbind_of_unknown_key_fails() {
    let ctx = BindContext::new();
    let native = widget("a");
    let err = ctx.unbind_self(NonNull::from(&native)).unwrap_err();
    assert!(matches!(err, BindError::NotBound { .. }));
}

#[test]
fn types_do_not_collide_on_equal_keys() {
    let ctx = BindContext::new();
    let a = widget("a");
    let b = Gadget { serial: 99 };
    let key = BindKey::from_addr(0x7f00).unwrap();

    assert!(ctx.bind(key, NonNull::from(&a)).is_ok());
    assert!(ctx.bind(key, NonNull::from(&b)).is_ok());

    assert_eq!(ctx.get::<Widget>(key), Some(NonNull::from(&a)));
    assert_eq!(ctx.get::<Gadget>(key), Some(NonNull::from(&b)));
    let gadget = ctx.get::<Gadget>(key).unwrap();
    assert_eq!(unsafe { gadget.as_ref() }.serial, 99);

    // Unbinding one type leaves the other alone.
    ctx.unbind(key, NonNull::from(&b)).unwrap();
    assert!(ctx.get::<Gadget>(key).is_none());
    assert_eq!(ctx.get::<Widget>(key), Some(NonNull::from(&a)));
}

#[test]
fn separate_contexts_are_independent() {
    let first = BindContext::new();
    let second = BindContext::new();
    let native = widget("a");
    let ptr = NonNull::from(&native);

    first.bind_self(ptr).unwrap();
    assert!(second.get::<Widget>(ptr).is_none());
    second.bind_self(ptr).unwrap();

    first.unbind_self(ptr).unwrap();
    assert_eq!(second.get::<Widget>(ptr), Some(ptr));
    second.unbind_self(ptr).unwrap();
}

// =============================================================================
// Engine Values
// =============================================================================

#[test]
fn external_handle_round_trip() {
    let ctx = BindContext::new();
    let native = widget("external");
    let ptr = NonNull::from(&native);
    let key = BindKey::from_addr(0x9000).unwrap();
    let external = External::from_key(key);

    ctx.bind_external(&external, ptr).unwrap();

    let value = Value::from(external);
    assert_eq!(ctx.get_from_value::<Widget, _>(&value), Some(ptr));
    assert_eq!(ctx.get::<Widget>(external.value()), Some(ptr));

    ctx.unbind_external(&value, ptr).unwrap();
    assert!(ctx.get_from_value::<Widget, _>(&value).is_none());
}

#[test]
fn non_external_values_never_resolve() {
    let ctx = BindContext::new();
    let native = widget("a");
    let ptr = NonNull::from(&native);
    ctx.bind_self(ptr).unwrap();

    let addr = ptr.as_ptr() as usize;
    let values = [
        Value::Undefined,
        Value::Null,
        Value::Bool(true),
        Value::Number(addr as f64),
        Value::String(format!("{addr:#x}")),
    ];
    for value in &values {
        assert!(ctx.get_from_value::<Widget, _>(value).is_none());
        assert_eq!(
            ctx.unbind_external(value, ptr),
            Err(BindError::NotExternal {
                kind: value.type_name()
            })
        );
    }
    assert!(ctx.contains::<Widget>(ptr));
}

#[test]
fn empty_and_null_handles_fail() {
    let ctx = BindContext::new();
    let native = widget("a");
    let ptr = NonNull::from(&native);

    let empty: Option<External> = None;
    assert_eq!(ctx.bind_external(&empty, ptr), Err(BindError::EmptyHandle));

    let null = External::new(std::ptr::null::<()>());
    assert_eq!(ctx.bind_external(&null, ptr), Err(BindError::NullKey));
    assert!(ctx.get_from_value::<Widget, _>(&null).is_none());
    assert!(ctx.is_empty());
}

// =============================================================================
// Widget Scenario
// =============================================================================

#[test]
fn widget_scenario() {
    let ctx = BindContext::new();
    let a = widget("a");
    let b = widget("b");
    let ptr_a = NonNull::from(&a);
    let ptr_b = NonNull::from(&b);

    assert!(bind_native::<Widget>(&ctx, ptr_a, ptr_a).is_ok());
    assert_eq!(get_bound_native::<Widget>(&ctx, ptr_a), Some(ptr_a));
    assert!(bind_native::<Widget>(&ctx, ptr_a, ptr_a).is_err());
    assert!(unbind_native::<Widget>(&ctx, ptr_a, ptr_b).is_err());
    assert!(unbind_native::<Widget>(&ctx, ptr_a, ptr_a).is_ok());
    assert!(get_bound_native::<Widget>(&ctx, ptr_a).is_none());
}

// =============================================================================
// Introspection
// =============================================================================

#[test]
fn bound_types_reports_live_types() {
    let ctx = BindContext::new();
    let a = widget("a");
    let b = widget("b");
    let g = Gadget { serial: 1 };

    ctx.bind_self(NonNull::from(&a)).unwrap();
    ctx.bind_self(NonNull::from(&b)).unwrap();
    ctx.bind_self(NonNull::from(&g)).unwrap();

    let types = ctx.bound_types();
    assert_eq!(types.len(), 2);
    assert!(
        types
            .iter()
            .any(|(name, count)| name.ends_with("Widget") && *count == 2)
    );
    assert!(
        types
            .iter()
            .any(|(name, count)| name.ends_with("Gadget") && *count == 1)
    );

    ctx.clear();
    assert!(ctx.bound_types().is_empty());
    assert_eq!(ctx.len(), 0);
}

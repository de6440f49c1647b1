//! Registration and resolution fundamentals.

use std::sync::Arc;

use minject::{
    Constructor, DiError, DiResult, Injectable, Key, Lifetime, ServiceCollection, Scope,
};

#[derive(Debug)]
struct Config {
    app_name: &'static str,
}

trait Messenger: Send + Sync {
    fn deliver(&self) -> String;
}

struct EmailMessenger {
    config: Arc<Config>,
}

impl Messenger for EmailMessenger {
    fn deliver(&self) -> String {
        format!("email from {}", self.config.app_name)
    }
}

impl Injectable for EmailMessenger {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(vec![Key::of::<Config>()], |args| {
            let config = args.take::<Config>()?;
            Ok(Arc::new(EmailMessenger { config }))
        })]
    }
}

struct Controller {
    messenger: Arc<dyn Messenger>,
}

impl Injectable for Controller {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(vec![Key::of::<dyn Messenger>()], |args| {
            let messenger = args.take_trait::<dyn Messenger>()?;
            Ok(Arc::new(Controller { messenger }))
        })]
    }
}

#[test]
fn resolves_registered_instance() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Config { app_name: "orders" });

    let container = services.build();
    let scope = container.create_scope();

    let config = scope.resolve::<Config>().unwrap();
    assert_eq!(config.app_name, "orders");
}

#[test]
fn unregistered_type_is_not_found() {
    let container = ServiceCollection::new().build();
    let scope = container.create_scope();

    let err = scope.resolve::<Config>().unwrap_err();
    assert!(matches!(err, DiError::NotFound { .. }));
}

#[test]
fn transient_resolutions_are_distinct() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Config { app_name: "orders" });
    services.add_transient::<EmailMessenger>();

    let container = services.build();
    let scope = container.create_scope();

    let first = scope.resolve::<EmailMessenger>().unwrap();
    let second = scope.resolve::<EmailMessenger>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn trait_keyed_type_registration_resolves_through_trait() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Config { app_name: "orders" });
    services.add_transient_as::<dyn Messenger, EmailMessenger>(|m| m);

    let container = services.build();
    let scope = container.create_scope();

    let messenger = scope.resolve_trait::<dyn Messenger>().unwrap();
    assert_eq!(messenger.deliver(), "email from orders");

    let again = scope.resolve_trait::<dyn Messenger>().unwrap();
    assert!(!Arc::ptr_eq(&messenger, &again));
}

#[test]
fn mixed_lifetime_graph_resolves_end_to_end() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Config { app_name: "orders" });
    services.add_transient_as::<dyn Messenger, EmailMessenger>(|m| m);
    services.add_scoped::<Controller>();

    let container = services.build();
    let scope = container.create_scope();

    let first = scope.resolve::<Controller>().unwrap();
    let second = scope.resolve::<Controller>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.messenger.deliver(), "email from orders");

    let other_scope = container.create_scope();
    let third = other_scope.resolve::<Controller>().unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn factory_receives_the_requesting_scope() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Config { app_name: "billing" });
    services.add_transient_factory(|scope: &Scope| -> DiResult<String> {
        let config = scope.resolve::<Config>()?;
        Ok(format!("ready: {}", config.app_name))
    });

    let container = services.build();
    let scope = container.create_scope();

    let banner = scope.resolve::<String>().unwrap();
    assert_eq!(*banner, "ready: billing");
}

#[test]
fn trait_factory_registers_under_the_trait_key() {
    struct CannedMessenger;

    impl Messenger for CannedMessenger {
        fn deliver(&self) -> String {
            "canned".to_string()
        }
    }

    let mut services = ServiceCollection::new();
    services.add_trait_factory::<dyn Messenger, _>(Lifetime::Singleton, |_| {
        Ok(Arc::new(CannedMessenger) as Arc<dyn Messenger>)
    });

    let container = services.build();
    let scope = container.create_scope();

    let messenger = scope.resolve_trait::<dyn Messenger>().unwrap();
    assert_eq!(messenger.deliver(), "canned");
}

#[test]
fn registered_trait_instance_resolves_to_the_same_object() {
    struct FixedMessenger;

    impl Messenger for FixedMessenger {
        fn deliver(&self) -> String {
            "fixed".to_string()
        }
    }

    let registered: Arc<dyn Messenger> = Arc::new(FixedMessenger);

    let mut services = ServiceCollection::new();
    services.add_singleton_trait_instance::<dyn Messenger>(registered.clone());

    let container = services.build();
    let scope_a = container.create_scope();
    let scope_b = container.create_scope();

    let a = scope_a.resolve_trait::<dyn Messenger>().unwrap();
    let b = scope_b.resolve_trait::<dyn Messenger>().unwrap();
    assert!(Arc::ptr_eq(&registered, &a));
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn duplicate_registration_last_wins() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Config { app_name: "first" });
    services.add_singleton_instance(Config { app_name: "second" });

    let container = services.build();
    let scope = container.create_scope();

    let config = scope.resolve::<Config>().unwrap();
    assert_eq!(config.app_name, "second");
}

#[test]
fn constructor_consuming_arguments_wrongly_is_a_type_mismatch() {
    #[derive(Debug)]
    struct Miswired;

    impl Injectable for Miswired {
        fn constructors() -> Vec<Constructor> {
            // Declares a Config dependency but takes it as the wrong type.
            vec![Constructor::new(vec![Key::of::<Config>()], |args| {
                let _ = args.take::<Controller>()?;
                Ok(Arc::new(Miswired))
            })]
        }
    }

    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Config { app_name: "orders" });
    services.add_transient::<Miswired>();

    let container = services.build();
    let scope = container.create_scope();

    let err = scope.resolve::<Miswired>().unwrap_err();
    assert!(matches!(err, DiError::TypeMismatch { .. }));
}

#[test]
fn concrete_and_trait_keys_are_independent() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Config { app_name: "orders" });
    services.add_singleton::<EmailMessenger>();
    services.add_singleton_as::<dyn Messenger, EmailMessenger>(|m| m);

    let container = services.build();
    let scope = container.create_scope();

    // Two keys, two independently cached singletons.
    let concrete = scope.resolve::<EmailMessenger>().unwrap();
    let as_trait = scope.resolve_trait::<dyn Messenger>().unwrap();
    assert_eq!(concrete.deliver(), as_trait.deliver());
}

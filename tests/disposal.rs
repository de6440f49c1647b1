//! Teardown order and disposal tracking.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use minject::{
    AsyncDispose, Constructor, Dispose, DisposeHooks, Injectable, Key, Lifetime,
    ServiceCollection, ServiceDescriptor,
};

/// Shared teardown log; registered as an instance so every service under test
/// can record into it.
#[derive(Default)]
struct DisposeLog(Mutex<Vec<&'static str>>);

impl DisposeLog {
    fn record(&self, label: &'static str) {
        self.0.lock().unwrap().push(label);
    }

    fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

struct Repository {
    log: Arc<DisposeLog>,
}

impl Dispose for Repository {
    fn dispose(&self) {
        self.log.record("repository");
    }
}

impl Injectable for Repository {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(vec![Key::of::<DisposeLog>()], |args| {
            let log = args.take::<DisposeLog>()?;
            Ok(Arc::new(Repository { log }))
        })]
    }

    fn dispose_hooks() -> DisposeHooks {
        DisposeHooks::sync_of::<Repository>()
    }
}

struct UnitOfWork {
    #[allow(dead_code)]
    repository: Arc<Repository>,
    log: Arc<DisposeLog>,
}

impl Dispose for UnitOfWork {
    fn dispose(&self) {
        self.log.record("unit_of_work");
    }
}

impl Injectable for UnitOfWork {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(
            vec![Key::of::<Repository>(), Key::of::<DisposeLog>()],
            |args| {
                let repository = args.take::<Repository>()?;
                let log = args.take::<DisposeLog>()?;
                Ok(Arc::new(UnitOfWork { repository, log }))
            },
        )]
    }

    fn dispose_hooks() -> DisposeHooks {
        DisposeHooks::sync_of::<UnitOfWork>()
    }
}

#[test]
fn scope_disposes_in_reverse_construction_order() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(DisposeLog::default());
    services.add_scoped::<Repository>();
    services.add_scoped::<UnitOfWork>();

    let container = services.build();
    let scope = container.create_scope();

    // Resolving the dependent constructs the dependency first.
    let unit = scope.resolve::<UnitOfWork>().unwrap();
    let log = unit.log.clone();
    drop(unit);

    scope.dispose();
    assert_eq!(log.entries(), vec!["unit_of_work", "repository"]);
}

#[test]
fn scope_disposal_drains_only_once() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(DisposeLog::default());
    services.add_scoped::<Repository>();

    let container = services.build();
    let scope = container.create_scope();

    let repo = scope.resolve::<Repository>().unwrap();
    let log = repo.log.clone();
    drop(repo);

    scope.dispose();
    scope.dispose();
    assert_eq!(log.entries(), vec!["repository"]);
}

#[test]
fn transient_instances_are_tracked_by_the_resolving_scope() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(DisposeLog::default());
    services.add_transient::<Repository>();

    let container = services.build();
    let scope = container.create_scope();

    let first = scope.resolve::<Repository>().unwrap();
    let log = first.log.clone();
    scope.resolve::<Repository>().unwrap();
    drop(first);

    scope.dispose();
    assert_eq!(log.entries(), vec!["repository", "repository"]);
}

#[test]
fn container_disposal_releases_singletons() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(DisposeLog::default());
    services.add_singleton::<Repository>();

    let container = services.build();
    let scope = container.create_scope();

    let repo = scope.resolve::<Repository>().unwrap();
    let log = repo.log.clone();
    drop(repo);

    // The requesting scope does not own the singleton.
    scope.dispose();
    assert!(log.entries().is_empty());

    container.dispose();
    assert_eq!(log.entries(), vec!["repository"]);
}

#[test]
fn instance_registrations_are_never_tracked() {
    struct Flag(Arc<DisposeLog>);

    impl Dispose for Flag {
        fn dispose(&self) {
            self.0.record("flag");
        }
    }

    let log = Arc::new(DisposeLog::default());

    let mut services = ServiceCollection::new();
    services.add_singleton_instance(Flag(log.clone()));

    let container = services.build();
    let scope = container.create_scope();
    scope.resolve::<Flag>().unwrap();

    scope.dispose();
    container.dispose();
    assert!(log.entries().is_empty());
}

#[test]
fn factory_registration_with_hooks_is_tracked() {
    let log = Arc::new(DisposeLog::default());
    let captured = log.clone();

    struct Connection(Arc<DisposeLog>);

    impl Dispose for Connection {
        fn dispose(&self) {
            self.0.record("connection");
        }
    }

    let mut services = ServiceCollection::new();
    services.add(
        ServiceDescriptor::factory(Lifetime::Scoped, move |_| Ok(Connection(captured.clone())))
            .with_dispose_hooks(DisposeHooks::sync_of::<Connection>()),
    );

    let container = services.build();
    let scope = container.create_scope();
    scope.resolve::<Connection>().unwrap();

    scope.dispose();
    assert_eq!(log.entries(), vec!["connection"]);
}

struct Drain {
    log: Arc<DisposeLog>,
}

#[async_trait]
impl AsyncDispose for Drain {
    async fn dispose(&self) {
        self.log.record("drain");
    }
}

impl Injectable for Drain {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(vec![Key::of::<DisposeLog>()], |args| {
            let log = args.take::<DisposeLog>()?;
            Ok(Arc::new(Drain { log }))
        })]
    }

    fn dispose_hooks() -> DisposeHooks {
        DisposeHooks::async_of::<Drain>()
    }
}

#[tokio::test]
async fn async_disposal_awaits_hooks_in_reverse_order() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(DisposeLog::default());
    services.add_scoped::<Repository>();
    services.add_scoped::<Drain>();

    let container = services.build();
    let scope = container.create_scope();

    let repo = scope.resolve::<Repository>().unwrap();
    let log = repo.log.clone();
    drop(repo);
    scope.resolve::<Drain>().unwrap();

    // Drain was constructed last, so its async hook runs first; the
    // sync-only Repository hook is the fallback on the async path.
    scope.dispose_async().await;
    assert_eq!(log.entries(), vec!["drain", "repository"]);
}

#[test]
fn sync_disposal_blocks_on_async_only_hooks() {
    let mut services = ServiceCollection::new();
    services.add_singleton_instance(DisposeLog::default());
    services.add_scoped::<Drain>();

    let container = services.build();
    let scope = container.create_scope();

    let drain = scope.resolve::<Drain>().unwrap();
    let log = drain.log.clone();
    drop(drain);

    scope.dispose();
    assert_eq!(log.entries(), vec!["drain"]);
}

#[test]
fn sync_hook_is_preferred_when_both_are_present() {
    struct Dual {
        log: Arc<DisposeLog>,
    }

    impl Dispose for Dual {
        fn dispose(&self) {
            self.log.record("dual_sync");
        }
    }

    #[async_trait]
    impl AsyncDispose for Dual {
        async fn dispose(&self) {
            self.log.record("dual_async");
        }
    }

    impl Injectable for Dual {
        fn constructors() -> Vec<Constructor> {
            vec![Constructor::new(vec![Key::of::<DisposeLog>()], |args| {
                let log = args.take::<DisposeLog>()?;
                Ok(Arc::new(Dual { log }))
            })]
        }

        fn dispose_hooks() -> DisposeHooks {
            DisposeHooks::both_of::<Dual>()
        }
    }

    let mut services = ServiceCollection::new();
    services.add_singleton_instance(DisposeLog::default());
    services.add_scoped::<Dual>();

    let container = services.build();
    let scope = container.create_scope();

    let dual = scope.resolve::<Dual>().unwrap();
    let log = dual.log.clone();
    drop(dual);

    scope.dispose();
    assert_eq!(log.entries(), vec!["dual_sync"]);
}

//! End-to-end registration, eviction and removal scenarios

use cadence_runtime::{
    CadenceError, DispatcherConfig, FrameContext, FrameDispatcher, FrameLoop, FrameTarget,
    Lifeline, LivenessHandle, Phase, TargetRef,
};
use std::cell::RefCell;
use std::rc::Rc;

type EventLog = Rc<RefCell<Vec<String>>>;

/// A component attached to a destroyable host object
struct Component {
    name: &'static str,
    host: Option<Lifeline>,
    events: EventLog,
}

impl Component {
    fn attached(name: &'static str, events: &EventLog) -> Rc<Self> {
        Rc::new(Self {
            name,
            host: Some(Lifeline::new()),
            events: Rc::clone(events),
        })
    }

    fn detached(name: &'static str, events: &EventLog) -> Rc<Self> {
        Rc::new(Self {
            name,
            host: None,
            events: Rc::clone(events),
        })
    }

    fn destroy_host(&self) {
        if let Some(host) = &self.host {
            host.destroy();
        }
    }

    fn log(&self, event: &str) {
        self.events
            .borrow_mut()
            .push(format!("{}.{}", self.name, event));
    }
}

impl FrameTarget for Component {
    fn liveness(&self) -> Option<LivenessHandle> {
        self.host.as_ref().map(Lifeline::handle)
    }

    fn name(&self) -> &str {
        self.name
    }

    fn update(&self, _cx: &FrameContext<'_>) {
        self.log("update");
    }

    fn fixed_update(&self, _cx: &FrameContext<'_>) {
        self.log("fixed_update");
    }

    fn on_added(&self, cx: &FrameContext<'_>) {
        self.log(&format!("added:{}", cx.phase()));
    }

    fn on_removed(&self, cx: &FrameContext<'_>) {
        assert!(cx.is_registered(), "removal notification after removal");
        self.log(&format!("removed:{}", cx.phase()));
    }
}

fn events() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn drain(events: &EventLog) -> Vec<String> {
    std::mem::take(&mut *events.borrow_mut())
}

#[test]
fn update_sweep_evict_then_remove() {
    let log = events();
    let dispatcher = FrameDispatcher::new();
    let a = Component::attached("a", &log);
    let b = Component::attached("b", &log);
    let a_ref: TargetRef = a.clone();
    let b_ref: TargetRef = b.clone();

    dispatcher.add(Phase::Update, &a_ref).unwrap();
    dispatcher.add(Phase::Update, &b_ref).unwrap();
    assert_eq!(
        drain(&log),
        vec!["a.added:update", "a.update", "b.added:update", "b.update"]
    );

    dispatcher.update(0.016);
    assert_eq!(drain(&log), vec!["a.update", "b.update"]);

    a.destroy_host();
    let stats = dispatcher.update(0.016);
    assert_eq!(stats.evicted, 1);
    assert_eq!(drain(&log), vec!["a.removed:update", "b.update"]);
    assert!(!dispatcher.has(Phase::Update, &a_ref));

    assert!(dispatcher.remove(Phase::Update, &b_ref).unwrap());
    assert_eq!(drain(&log), vec!["b.removed:update"]);
    assert!(!dispatcher.has(Phase::Update, &b_ref));

    let stats = dispatcher.update(0.016);
    assert_eq!(stats.invoked, 0);
    assert!(drain(&log).is_empty());
}

#[test]
fn non_registrable_target_never_joins() {
    let log = events();
    let dispatcher = FrameDispatcher::new();
    let c: TargetRef = Component::detached("c", &log);

    let result = dispatcher.add(Phase::FixedUpdate, &c);
    assert!(matches!(result, Err(CadenceError::NotRegistrable { .. })));
    assert!(dispatcher.is_empty(Phase::FixedUpdate));
    assert!(!dispatcher.has(Phase::FixedUpdate, &c));

    let mut frame_loop = FrameLoop::new();
    for _ in 0..10 {
        frame_loop.step(&dispatcher, 0.05);
    }
    assert!(drain(&log).is_empty());
}

#[test]
fn double_add_calls_once_per_tick() {
    let log = events();
    let dispatcher = FrameDispatcher::new();
    let a: TargetRef = Component::attached("a", &log);

    assert!(dispatcher.add(Phase::Update, &a).unwrap());
    assert!(!dispatcher.add(Phase::Update, &a).unwrap());
    drain(&log);

    dispatcher.update(0.016);
    assert_eq!(drain(&log), vec!["a.update"]);
}

#[test]
fn remove_of_unregistered_target_changes_nothing() {
    let log = events();
    let dispatcher = FrameDispatcher::new();
    let a: TargetRef = Component::attached("a", &log);
    let b: TargetRef = Component::attached("b", &log);
    dispatcher.add(Phase::Update, &b).unwrap();
    drain(&log);

    assert!(!dispatcher.has(Phase::Update, &a));
    assert!(!dispatcher.remove(Phase::Update, &a).unwrap());
    assert!(!dispatcher.has(Phase::Update, &a));
    assert_eq!(dispatcher.len(Phase::Update), 1);
    assert!(drain(&log).is_empty());
}

#[test]
fn many_evictions_in_one_sweep_visit_survivors_once() {
    let log = events();
    let dispatcher = FrameDispatcher::new();
    let components: Vec<Rc<Component>> = ["a", "b", "c", "d", "e", "f"]
        .into_iter()
        .map(|n| Component::attached(n, &log))
        .collect();
    for component in &components {
        let target: TargetRef = component.clone();
        dispatcher.add(Phase::Update, &target).unwrap();
    }
    drain(&log);

    for name in ["a", "b", "d", "f"] {
        components
            .iter()
            .find(|c| c.name == name)
            .unwrap()
            .destroy_host();
    }

    let stats = dispatcher.update(0.016);
    assert_eq!(stats.visited, 6);
    assert_eq!(stats.evicted, 4);
    assert_eq!(stats.invoked, 2);
    assert_eq!(
        drain(&log),
        vec![
            "a.removed:update",
            "b.removed:update",
            "c.update",
            "d.removed:update",
            "e.update",
            "f.removed:update"
        ]
    );
    assert_eq!(dispatcher.len(Phase::Update), 2);
}

#[test]
fn dropping_the_host_evicts() {
    let log = events();
    let dispatcher = FrameDispatcher::new();
    let host = Rc::new(());
    let watcher = Rc::new(Watcher {
        host: Rc::downgrade(&host),
        log: Rc::clone(&log),
    });
    let target: TargetRef = watcher;

    dispatcher.add(Phase::Update, &target).unwrap();
    drain(&log);

    drop(host);
    dispatcher.update(0.016);
    assert_eq!(drain(&log), vec!["watcher.removed"]);
    assert!(dispatcher.is_empty(Phase::Update));
}

struct Watcher {
    host: std::rc::Weak<()>,
    log: EventLog,
}

impl FrameTarget for Watcher {
    fn liveness(&self) -> Option<LivenessHandle> {
        Some(LivenessHandle::watch(self.host.clone()))
    }

    fn update(&self, _cx: &FrameContext<'_>) {
        self.log.borrow_mut().push("watcher.update".into());
    }

    fn on_removed(&self, _cx: &FrameContext<'_>) {
        self.log.borrow_mut().push("watcher.removed".into());
    }
}

#[test]
fn fixed_update_runs_per_fixed_step() {
    let log = events();
    let config = DispatcherConfig::from_toml_str("fixed_timestep_hz = 20.0").unwrap();
    let dispatcher = FrameDispatcher::with_config(&config);
    let mut frame_loop = FrameLoop::from_config(&config);
    let a: TargetRef = Component::attached("a", &log);

    dispatcher.add(Phase::FixedUpdate, &a).unwrap();
    assert_eq!(drain(&log), vec!["a.added:fixed_update", "a.fixed_update"]);

    let report = frame_loop.step(&dispatcher, 0.12);
    assert_eq!(report.fixed_steps, 2);
    assert_eq!(drain(&log), vec!["a.fixed_update", "a.fixed_update"]);
}

//! Testing utilities for ECB workspace
//!
//! Scene fixtures, a session rooted in a caller-provided directory, and fake
//! build/test collaborators that honour cancellation.

#![allow(missing_docs)]

use async_trait::async_trait;
use ecb_core::{
    BridgeConfig, BridgeError, BuildReport, BuildRequest, BuildResult, BuildSystem, CancelToken, Dispatcher,
    Progress, Session, TestReport, TestRequest, TestRunner,
};
use ecb_reflect::{accessor, Reflected, TypeRegistry};
use ecb_scene::{NodeId, PropertyValue, SceneGraph};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// `names[0] → names[1] → …`, one node per level
pub fn chain(names: &[&str]) -> SceneGraph {
    let mut graph = SceneGraph::new();
    let mut parent: Option<NodeId> = None;
    for name in names {
        let id = match parent {
            Some(p) => graph.add_child(p, *name).unwrap(),
            None => graph.add_root(*name),
        };
        parent = Some(id);
    }
    graph
}

/// One root with `branching` children per node, `depth` levels in total
pub fn uniform_tree(depth: usize, branching: usize) -> SceneGraph {
    fn grow(graph: &mut SceneGraph, parent: NodeId, level: usize, depth: usize, branching: usize) {
        if level >= depth {
            return;
        }
        for i in 0..branching {
            let child = graph.add_child(parent, format!("n{level}_{i}")).unwrap();
            grow(graph, child, level + 1, depth, branching);
        }
    }

    let mut graph = SceneGraph::new();
    if depth > 0 {
        let root = graph.add_root("root");
        grow(&mut graph, root, 1, depth, branching);
    }
    graph
}

/// A small scene that validates with no issues and no warnings
///
/// ```text
/// root                 Transform
/// ├── Main Camera      Transform, Camera (target = root/Player)
/// └── Player           Transform, Rigidbody
/// ```
pub fn clean_scene(registry: &TypeRegistry) -> SceneGraph {
    let mut graph = SceneGraph::new();
    let root = graph.add_root("root");
    let camera = graph.add_child(root, "Main Camera").unwrap();
    let player = graph.add_child(root, "Player").unwrap();

    for (id, types) in [
        (root, &["Transform"][..]),
        (camera, &["Transform", "Camera"][..]),
        (player, &["Transform", "Rigidbody"][..]),
    ] {
        for type_name in types {
            let descriptor = registry.resolve(type_name).unwrap();
            graph.attach(id, descriptor.construct()).unwrap();
        }
    }

    let camera_type = registry.resolve("Camera").unwrap();
    let (_, instance) = graph.node_mut(camera).unwrap().component_mut("Camera").unwrap();
    accessor::set_value(
        &mut Reflected::new(camera_type, instance),
        "target",
        PropertyValue::ObjectRef(Some(player)),
    )
    .unwrap();
    graph
}

/// Configuration writing artifacts and the log into `dir`
pub fn test_config(dir: &Path) -> BridgeConfig {
    BridgeConfig::with_output_dir(dir)
}

pub fn test_session(dir: &Path) -> Session {
    Session::new(test_config(dir)).unwrap()
}

pub fn test_dispatcher(dir: &Path) -> Dispatcher {
    Dispatcher::new(Arc::new(test_session(dir)))
}

/// Dispatcher whose collaborators are the given fakes
pub fn dispatcher_with(dir: &Path, build: Arc<dyn BuildSystem>, tests: Arc<dyn TestRunner>) -> Dispatcher {
    let session = test_session(dir).with_build_system(build).with_test_runner(tests);
    Dispatcher::new(Arc::new(session))
}

/// Sleep for `delay` in small steps, failing fast once cancelled
async fn work(delay: Duration, cancel: &CancelToken, observed: &AtomicBool) -> Result<(), BridgeError> {
    let step = Duration::from_millis(5);
    let mut elapsed = Duration::ZERO;
    while elapsed < delay {
        if cancel.is_cancelled() {
            observed.store(true, Ordering::SeqCst);
            return Err(BridgeError::Cancelled);
        }
        tokio::time::sleep(step).await;
        elapsed += step;
    }
    Ok(())
}

/// Build system that takes `delay` and answers with `report`
#[derive(Debug, Default)]
pub struct FakeBuildSystem {
    pub delay: Duration,
    pub report: BuildReport,
    pub requests: std::sync::Mutex<Vec<BuildRequest>>,
    pub saw_cancel: AtomicBool,
}

impl FakeBuildSystem {
    pub fn succeeding(delay: Duration) -> Self {
        Self {
            delay,
            report: BuildReport {
                result: BuildResult::Succeeded,
                total_time_seconds: delay.as_secs_f64(),
                total_size_bytes: 1024,
                output_path: "out/game".to_string(),
                errors: Vec::new(),
                warnings: Vec::new(),
            },
            ..Self::default()
        }
    }

    pub fn failing_with(errors: &[&str]) -> Self {
        Self {
            report: BuildReport {
                result: BuildResult::Failed,
                errors: errors.iter().map(|e| e.to_string()).collect(),
                ..BuildReport::default()
            },
            ..Self::default()
        }
    }
}

#[async_trait]
impl BuildSystem for FakeBuildSystem {
    async fn build(
        &self,
        request: BuildRequest,
        cancel: CancelToken,
        progress: Progress,
    ) -> Result<BuildReport, BridgeError> {
        progress.report(&format!("building {}", request.target));
        self.requests.lock().unwrap().push(request);
        work(self.delay, &cancel, &self.saw_cancel).await?;
        Ok(self.report.clone())
    }
}

/// Test runner that takes `delay` and answers with `report`
#[derive(Debug, Default)]
pub struct FakeTestRunner {
    pub delay: Duration,
    pub report: TestReport,
    pub requests: std::sync::Mutex<Vec<TestRequest>>,
    pub saw_cancel: AtomicBool,
}

impl FakeTestRunner {
    pub fn reporting(passed: u32, failed: u32, delay: Duration) -> Self {
        Self {
            delay,
            report: TestReport {
                passed,
                failed,
                skipped: 0,
                report_path: Some("out/tests.xml".to_string()),
            },
            ..Self::default()
        }
    }
}

#[async_trait]
impl TestRunner for FakeTestRunner {
    async fn run_tests(
        &self,
        request: TestRequest,
        cancel: CancelToken,
        progress: Progress,
    ) -> Result<TestReport, BridgeError> {
        progress.report(&format!("running {} tests", request.mode));
        self.requests.lock().unwrap().push(request);
        work(self.delay, &cancel, &self.saw_cancel).await?;
        Ok(self.report.clone())
    }
}

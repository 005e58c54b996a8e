//! Built-in commands end to end: dispatch, payload, artifact

use ecb_channel::{ArtifactKind, ErrorKind, OperationResult};
use ecb_core::Dispatcher;
use ecb_scene::SceneGraph;
use ecb_test_utils::{chain, clean_scene, test_dispatcher};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

async fn run(dispatcher: &Dispatcher, graph: &mut SceneGraph, line: &str) -> OperationResult {
    dispatcher.dispatch_line(graph, line).await
}

async fn ok(dispatcher: &Dispatcher, graph: &mut SceneGraph, line: &str) -> Value {
    let result = run(dispatcher, graph, line).await;
    assert!(result.success, "{line}: {:?}", result.error);
    result.data.unwrap()
}

async fn err(dispatcher: &Dispatcher, graph: &mut SceneGraph, line: &str) -> ErrorKind {
    let result = run(dispatcher, graph, line).await;
    assert!(!result.success, "{line} unexpectedly succeeded: {:?}", result.data);
    result.error_kind.unwrap()
}

fn scene(dispatcher: &Dispatcher) -> SceneGraph {
    clean_scene(dispatcher.session().registry())
}

#[tokio::test]
async fn hierarchy_of_a_three_node_chain() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = chain(&["root", "childA", "childB"]);

    let data = ok(&dispatcher, &mut graph, "hierarchy").await;
    let expected = json!({
        "totalRootObjects": 1,
        "hierarchy": [{
            "name": "root",
            "childCount": 1,
            "children": [{
                "name": "childA",
                "childCount": 1,
                "children": [{"name": "childB", "childCount": 0, "children": []}]
            }]
        }]
    });
    assert_eq!(data, expected);

    let artifact = dispatcher
        .session()
        .channel()
        .read("hierarchy", ArtifactKind::Result)
        .unwrap();
    assert_eq!(artifact.data, Some(expected));
}

#[tokio::test]
async fn hierarchy_of_a_subtree() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = chain(&["root", "childA", "childB"]);

    let data = ok(&dispatcher, &mut graph, "hierarchy /root/childA").await;
    assert_eq!(data["totalRootObjects"], 1);
    assert_eq!(data["hierarchy"][0]["name"], "childA");
    assert_eq!(data["hierarchy"][0]["childCount"], 1);
}

#[tokio::test]
async fn session_commands() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = SceneGraph::new();

    let ping = ok(&dispatcher, &mut graph, "ping").await;
    assert_eq!(ping["status"], "ok");
    assert_eq!(ping["commandCount"], 19);
    assert_eq!(ping["endpoint"], "stdio");

    let commands = ok(&dispatcher, &mut graph, "list_commands").await;
    let names: Vec<&str> = commands["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert!(names.contains(&"set_property"));

    let engine = ok(&dispatcher, &mut graph, "list_types engine").await;
    assert_eq!(engine["types"].as_array().unwrap().len(), 7);
    assert_eq!(engine["types"][1]["qualifiedName"], "engine::Camera");
    assert_eq!(engine["types"][1]["members"][0]["name"], "fieldOfView");
    assert_eq!(engine["types"][1]["members"][0]["type"], "float");

    let all = ok(&dispatcher, &mut graph, "list_types").await;
    assert_eq!(all["types"].as_array().unwrap().len(), 9);
    assert_eq!(err(&dispatcher, &mut graph, "list_types plugins").await, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn scan_counts_nodes_and_components() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let data = ok(&dispatcher, &mut graph, "scan").await;
    assert_eq!(
        data,
        json!({
            "totalNodes": 3,
            "activeNodes": 3,
            "maxDepth": 1,
            "totalComponents": 5,
            "missingComponentSlots": 0,
            "componentCounts": {"Camera": 1, "Rigidbody": 1, "Transform": 3},
        })
    );
}

#[tokio::test]
async fn back_to_back_scans_leave_parseable_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);
    let channel = dispatcher.session().channel().clone();

    let first = run(&dispatcher, &mut graph, "scan").await;
    assert_eq!(channel.read("scan", ArtifactKind::Result).unwrap(), first);
    let second = run(&dispatcher, &mut graph, "scan").await;
    assert_eq!(channel.read("scan", ArtifactKind::Result).unwrap(), second);
    assert_ne!(first.operation_id, second.operation_id);
}

#[tokio::test]
async fn clean_scene_validates() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let report = ok(&dispatcher, &mut graph, "validate").await;
    assert_eq!(
        report,
        json!({"totalNodesVisited": 3, "issues": [], "warnings": [], "info": [], "valid": true})
    );
}

#[tokio::test]
async fn destroyed_reference_is_one_warning() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let removed = ok(&dispatcher, &mut graph, "delete_object root/Player").await;
    assert_eq!(removed, json!({"path": "root/Player", "removedNodes": 1}));

    let report = ok(&dispatcher, &mut graph, "validate").await;
    assert_eq!(report["valid"], true);
    assert_eq!(report["issues"], json!([]));
    assert_eq!(
        report["warnings"],
        json!([{
            "severity": "warning",
            "nodePath": "root/Main Camera",
            "category": "missing_reference",
            "message": "Camera.target references a destroyed object"
        }])
    );
}

#[tokio::test]
async fn missing_slot_is_one_issue() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);
    let player = graph.resolve("root/Player").unwrap();
    assert!(graph.node_mut(player).unwrap().lose_component(1));

    let report = ok(&dispatcher, &mut graph, "validate").await;
    assert_eq!(report["valid"], false);
    assert_eq!(report["warnings"], json!([]));
    let issues = report["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["nodePath"], "root/Player");
    assert_eq!(issues[0]["category"], "missing_component");

    let subtree = ok(&dispatcher, &mut graph, "validate \"root/Main Camera\"").await;
    assert_eq!(subtree["totalNodesVisited"], 1);
    assert_eq!(subtree["valid"], true);
}

#[tokio::test]
async fn find_by_each_key() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let by_name = ok(&dispatcher, &mut graph, "find Player").await;
    assert_eq!(
        by_name,
        json!({"query": "Player", "by": "name", "count": 1, "matches": [{"name": "Player", "path": "root/Player"}]})
    );

    let by_component = ok(&dispatcher, &mut graph, "find Camera --by=component").await;
    assert_eq!(by_component["matches"][0]["path"], "root/Main Camera");

    let by_tag = ok(&dispatcher, &mut graph, "find Untagged --by=tag").await;
    assert_eq!(by_tag["count"], 3);

    let by_path = ok(&dispatcher, &mut graph, "find /root/Player --by=path").await;
    assert_eq!(by_path["count"], 1);
    let nowhere = ok(&dispatcher, &mut graph, "find root/Nobody --by=path").await;
    assert_eq!(nowhere["count"], 0);

    assert_eq!(err(&dispatcher, &mut graph, "find Player --by=colour").await, ErrorKind::InvalidArgument);
    assert_eq!(err(&dispatcher, &mut graph, "find").await, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn inspect_lists_node_members_and_slots() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let data = ok(&dispatcher, &mut graph, r#"inspect "root/Main Camera""#).await;
    assert_eq!(
        data,
        json!({
            "path": "root/Main Camera",
            "properties": {"name": "Main Camera", "active": "true", "tag": "Untagged", "layer": "0"},
            "components": [
                {"index": 0, "type": "Transform", "missing": false, "enabled": true},
                {"index": 1, "type": "Camera", "missing": false, "enabled": true},
            ]
        })
    );
    assert_eq!(err(&dispatcher, &mut graph, "inspect root/Nobody").await, ErrorKind::ObjectNotFound);
}

#[tokio::test]
async fn object_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let created = ok(&dispatcher, &mut graph, "create_object Enemy root --components=Transform,Light").await;
    assert_eq!(created, json!({"path": "root/Enemy", "name": "Enemy"}));

    let added = ok(&dispatcher, &mut graph, "add_component root/Enemy BoxCollider").await;
    assert_eq!(added, json!({"path": "root/Enemy", "type": "BoxCollider", "index": 2}));

    let removed = ok(&dispatcher, &mut graph, "remove_component root/Enemy BoxCollider").await;
    assert_eq!(removed["removed"], true);

    let renamed = ok(&dispatcher, &mut graph, "rename_object root/Enemy Boss").await;
    assert_eq!(renamed, json!({"oldPath": "root/Enemy", "path": "root/Boss"}));

    let moved = ok(&dispatcher, &mut graph, "reparent_object root/Boss root/Player").await;
    assert_eq!(moved, json!({"path": "root/Player/Boss"}));

    let detached = ok(&dispatcher, &mut graph, "reparent_object root/Player/Boss /").await;
    assert_eq!(detached, json!({"path": "Boss"}));

    let inactive = ok(&dispatcher, &mut graph, "set_active Boss off").await;
    assert_eq!(inactive, json!({"path": "Boss", "active": false}));

    let top = ok(&dispatcher, &mut graph, "create_object Sun").await;
    assert_eq!(top["path"], "Sun");

    let gone = ok(&dispatcher, &mut graph, "delete_object root").await;
    assert_eq!(gone["removedNodes"], 3);
    let hierarchy = ok(&dispatcher, &mut graph, "hierarchy").await;
    assert_eq!(hierarchy["totalRootObjects"], 2);
}

#[tokio::test]
async fn rejected_edits_leave_the_graph_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);
    let before = graph.len();

    assert_eq!(
        err(&dispatcher, &mut graph, "create_object Ghost root --components=Transform,Haunting").await,
        ErrorKind::TypeNotFound
    );
    assert_eq!(err(&dispatcher, &mut graph, "create_object a/b root").await, ErrorKind::InvalidArgument);
    assert_eq!(err(&dispatcher, &mut graph, "create_object Ghost root/Nobody").await, ErrorKind::ObjectNotFound);
    assert_eq!(err(&dispatcher, &mut graph, "reparent_object root root/Player").await, ErrorKind::InvalidArgument);
    assert_eq!(err(&dispatcher, &mut graph, "set_active root maybe").await, ErrorKind::TypeMismatch);
    assert_eq!(graph.len(), before);
}

#[tokio::test]
async fn padded_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);
    let before = graph.len();

    for line in [
        r#"create_object "Player " root"#,
        r#"create_object " Enemy""#,
        r#"rename_object root/Player "Player ""#,
        r#"set_property root/Player Node name " Player""#,
    ] {
        assert_eq!(err(&dispatcher, &mut graph, line).await, ErrorKind::InvalidArgument, "{line}");
    }
    assert_eq!(graph.len(), before);
    ok(&dispatcher, &mut graph, "inspect root/Player").await;
}

#[tokio::test]
async fn shadowed_user_type_keeps_its_identity() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ecb_test_utils::test_config(dir.path());
    config.types = ecb_core::BridgeConfig::from_toml(
        r#"
        [[types]]
        name = "Camera"
        namespace = "user"

        [[types.members]]
        name = "zoom"
        type = "float"
        default = "1"
        "#,
    )
    .unwrap()
    .types;
    let dispatcher = Dispatcher::new(std::sync::Arc::new(ecb_core::Session::new(config).unwrap()));
    let mut graph = scene(&dispatcher);

    let added = ok(&dispatcher, &mut graph, "add_component root user::Camera").await;
    assert_eq!(added, json!({"path": "root", "type": "user::Camera", "index": 1}));

    let report = ok(&dispatcher, &mut graph, "validate").await;
    assert_eq!(
        report,
        json!({"totalNodesVisited": 3, "issues": [], "warnings": [], "info": [], "valid": true})
    );

    let get = ok(&dispatcher, &mut graph, "get_component root user::Camera").await;
    assert_eq!(get["type"], "user::Camera");
    assert_eq!(get["properties"], json!({"zoom": "1"}));

    // a bare name means the engine type, which root does not carry
    assert_eq!(err(&dispatcher, &mut graph, "get_component root Camera").await, ErrorKind::ObjectNotFound);
    assert_eq!(
        err(&dispatcher, &mut graph, "set_property root Camera fieldOfView 70").await,
        ErrorKind::ObjectNotFound
    );
    assert_eq!(
        err(&dispatcher, &mut graph, "set_property root user::Camera fieldOfView 70").await,
        ErrorKind::PropertyNotFound
    );
    let zoom = ok(&dispatcher, &mut graph, "set_property root user::Camera zoom 2").await;
    assert_eq!(zoom["value"], "2");

    let scan = ok(&dispatcher, &mut graph, "scan").await;
    assert_eq!(
        scan["componentCounts"],
        json!({"Camera": 1, "Rigidbody": 1, "Transform": 3, "user::Camera": 1})
    );

    let user = ok(&dispatcher, &mut graph, "find user::Camera --by=component").await;
    assert_eq!(user["matches"], json!([{"name": "root", "path": "root"}]));
    let engine = ok(&dispatcher, &mut graph, "find Camera --by=component").await;
    assert_eq!(engine["matches"], json!([{"name": "Main Camera", "path": "root/Main Camera"}]));

    let inspected = ok(&dispatcher, &mut graph, "inspect root").await;
    assert_eq!(inspected["components"][1]["type"], "user::Camera");

    let removed = ok(&dispatcher, &mut graph, "remove_component root user::Camera").await;
    assert_eq!(removed["removed"], true);
    assert_eq!(
        err(&dispatcher, &mut graph, "remove_component root user::Camera").await,
        ErrorKind::ObjectNotFound
    );
}

#[tokio::test]
async fn set_then_get_through_commands() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let cases = [
        ("root/Player", "Rigidbody", "mass", "2.5", "2.5"),
        ("root/Player", "Rigidbody", "useGravity", "no", "false"),
        ("root/Player", "Rigidbody", "isKinematic", "TRUE", "true"),
        ("\"root/Main Camera\"", "Camera", "fieldOfView", "75", "75"),
        ("root", "Transform", "position", "(1, 2, 3.5)", "(1, 2, 3.5)"),
    ];
    for (path, ty, property, raw, shown) in cases {
        let set = ok(&dispatcher, &mut graph, &format!("set_property {path} {ty} {property} \"{raw}\"")).await;
        assert_eq!(set["value"], shown, "{ty}.{property}");
        let get = ok(&dispatcher, &mut graph, &format!("get_component {path} {ty}")).await;
        assert_eq!(get["properties"][property], shown, "{ty}.{property}");
    }

    let layer = ok(&dispatcher, &mut graph, "set_property root Node layer 7").await;
    assert_eq!(layer["value"], "7");
    let tag = ok(&dispatcher, &mut graph, "set_property root Node tag Player").await;
    assert_eq!(tag["value"], "Player");
    let inspected = ok(&dispatcher, &mut graph, "inspect root").await;
    assert_eq!(inspected["properties"]["layer"], "7");
    assert_eq!(inspected["properties"]["tag"], "Player");
}

#[tokio::test]
async fn object_references_are_paths() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let get = ok(&dispatcher, &mut graph, r#"get_component "root/Main Camera" Camera"#).await;
    assert_eq!(get["properties"]["target"], "root/Player");
    assert_eq!(get["properties"]["aspect"], (16.0f64 / 9.0).to_string());

    let set = ok(&dispatcher, &mut graph, r#"set_property "root/Main Camera" Camera target /root"#).await;
    assert_eq!(set["value"], "root");

    let cleared = ok(&dispatcher, &mut graph, r#"set_property "root/Main Camera" Camera target null"#).await;
    assert_eq!(cleared["value"], "null");
    let report = ok(&dispatcher, &mut graph, "validate").await;
    assert_eq!(report["warnings"][0]["message"], "Camera.target references no object");

    assert_eq!(
        err(&dispatcher, &mut graph, r#"set_property "root/Main Camera" Camera target root/Nobody"#).await,
        ErrorKind::ObjectNotFound
    );
}

#[tokio::test]
async fn property_failures_classify() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let cases = [
        (r#"set_property "root/Main Camera" Camera fieldOfView wide"#, ErrorKind::TypeMismatch),
        (r#"set_property "root/Main Camera" Camera aspect 2"#, ErrorKind::PropertyNotFound),
        (r#"set_property "root/Main Camera" Camera zoom 2"#, ErrorKind::PropertyNotFound),
        ("set_property root/Player Camera fieldOfView 2", ErrorKind::ObjectNotFound),
        ("set_property root/Player Teleporter range 2", ErrorKind::TypeNotFound),
        ("get_component root/Player camera", ErrorKind::TypeNotFound),
        ("add_component root/Player Teleporter", ErrorKind::TypeNotFound),
        ("remove_component root Camera", ErrorKind::ObjectNotFound),
        ("set_property root Node name a/b", ErrorKind::InvalidArgument),
        ("set_property root Transform", ErrorKind::InvalidArgument),
    ];
    for (line, kind) in cases {
        assert_eq!(err(&dispatcher, &mut graph, line).await, kind, "{line}");
    }
}

#[tokio::test]
async fn depth_guard_applies_to_commands() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ecb_test_utils::test_config(dir.path());
    config.max_traversal_depth = 2;
    let dispatcher = Dispatcher::new(std::sync::Arc::new(ecb_core::Session::new(config).unwrap()));
    let mut graph = chain(&["root", "childA", "childB"]);

    for line in ["hierarchy", "scan", "validate"] {
        assert_eq!(err(&dispatcher, &mut graph, line).await, ErrorKind::DepthLimitExceeded, "{line}");
    }
}

#[tokio::test]
async fn json_requests_dispatch_like_lines() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = test_dispatcher(dir.path());
    let mut graph = scene(&dispatcher);

    let data = ok(
        &dispatcher,
        &mut graph,
        r#"{"name": "find", "args": ["Camera"], "options": {"by": "component"}}"#,
    )
    .await;
    assert_eq!(data["count"], 1);
}

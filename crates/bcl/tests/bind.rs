//! Behavior tests binding complete sources into caller schemas

use bcl::{ErrorKind, SchemaError, SyntaxError, MAX_INCLUDE_DEPTH};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

#[derive(Default, Debug, PartialEq)]
struct Listener {
    address: String,
    port: u16,
    tls: bool,
}

#[derive(Default, Debug, PartialEq)]
struct Route {
    path: String,
    backend: String,
    timeout: f64,
}

#[derive(Default, Debug, PartialEq)]
struct Gateway {
    name: String,
    retries: i8,
    hosts: Vec<String>,
    limits: IndexMap<String, u32>,
    listener: Listener,
    route: Vec<Route>,
    upstream: IndexMap<String, Listener>,
    log_file: Option<PathBuf>,
}

bcl::composite! {
    Listener { address | addr, port, tls }
    Route { path, backend, timeout }
    Gateway { name, retries, hosts | host, limits, listener, route, upstream, log_file }
}

fn syntax_error(source: &str) -> SyntaxError {
    match bcl::from_str::<Gateway>(source).expect_err("must fail").into_kind() {
        ErrorKind::Syntax(error) => error,
        other => panic!("expected a syntax error, got {other}"),
    }
}

fn write(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

#[test]
fn scalars() {
    let gateway: Gateway = bcl::from_str(
        r#"
        name: "edge gateway";
        retries -3;
        listener { addr 0.0.0.0; port 8443; tls on; }
        route { path /; backend app; timeout 2.5; }
        log-file /var/log/gateway.log;
        "#,
    )
    .unwrap();

    assert_eq!(gateway.name, "edge gateway");
    assert_eq!(gateway.retries, -3);
    assert_eq!(
        gateway.listener,
        Listener {
            address: "0.0.0.0".into(),
            port: 8443,
            tls: true
        }
    );
    assert_eq!(gateway.route[0].timeout, 2.5);
    assert_eq!(gateway.log_file, Some(PathBuf::from("/var/log/gateway.log")));
}

#[test]
fn sequences_keep_input_order() {
    for source in [
        "hosts: [a, b, c];",
        "hosts: a b c;",
        "hosts a; hosts b c;",
        "host \"a\" 'b' c;",
    ] {
        let gateway: Gateway = bcl::from_str(source).unwrap();
        assert_eq!(gateway.hosts, ["a", "b", "c"], "{source}");
    }
}

#[test]
fn mapping_entries() {
    let gateway: Gateway = bcl::from_str("limits: burst 20; limits rate 5;").unwrap();
    assert_eq!(
        gateway.limits.into_iter().collect::<Vec<_>>(),
        [("burst".to_string(), 20), ("rate".to_string(), 5)]
    );

    for source in ["limits burst;", "limits burst 20 rate;"] {
        let error = bcl::from_str::<Gateway>(source).expect_err("must fail");
        assert!(
            matches!(error.kind(), ErrorKind::Schema(SchemaError::MappingArity(_))),
            "{source}: {error}"
        );
    }
}

#[test]
fn blocks() {
    let gateway: Gateway = bcl::from_str(
        r#"
        route { path /api; backend api; }
        route { path /; backend web; }
        upstream api { address 10.0.0.1; port 9000; }
        upstream "web pool" { address 10.0.0.2; port 8080; }
        "#,
    )
    .unwrap();

    let routes: Vec<_> = gateway
        .route
        .iter()
        .map(|route| (route.path.as_str(), route.backend.as_str()))
        .collect();
    assert_eq!(routes, [("/api", "api"), ("/", "web")]);

    assert_eq!(
        gateway.upstream.keys().collect::<Vec<_>>(),
        ["api", "web pool"]
    );
    assert_eq!(gateway.upstream["web pool"].port, 8080);
}

#[test]
fn variable_scoping() {
    let gateway: Gateway = bcl::from_str(
        r#"
        set backend shared;
        route {
            set backend private;
            backend $backend;
        }
        route { backend $backend; }
        name ${backend};
        "#,
    )
    .unwrap();

    assert_eq!(gateway.route[0].backend, "private");
    assert_eq!(gateway.route[1].backend, "shared");
    assert_eq!(gateway.name, "shared");
}

#[test]
fn unresolved_variables_pass_through() {
    let gateway: Gateway = bcl::from_str("name $undefined; hosts ${undefined} x$y;").unwrap();
    assert_eq!(gateway.name, "$undefined");
    assert_eq!(gateway.hosts, ["${undefined}", "x$y"]);
}

#[test]
fn unterminated_quote() {
    assert!(matches!(
        syntax_error("name: 'unterminated;"),
        SyntaxError::UnterminatedQuote(_)
    ));
    assert!(matches!(
        syntax_error("hosts \"a b;"),
        SyntaxError::UnterminatedQuote(_)
    ));
}

#[test]
fn invalid_utf8() {
    let mut gateway = Gateway::default();
    let error = bcl::bind_bytes(b"name \xff;", &mut gateway).expect_err("must fail");
    assert!(matches!(
        error.kind(),
        ErrorKind::Syntax(SyntaxError::Encoding)
    ));
}

#[test]
fn includes_in_sorted_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "20-web.bcl", "route { path /; backend web; }");
    write(
        dir.path(),
        "10-api.bcl",
        "set tier internal;\nroute { path /api; backend api; }",
    );
    write(dir.path(), "notes.txt", "not bound");
    let main = write(
        dir.path(),
        "gateway.bcl",
        &format!(
            "include {}/*-*.bcl;\nname $tier;\nlistener {{ include {}/none-*.bcl; port 80; }}",
            dir.path().display(),
            dir.path().display()
        ),
    );

    let gateway: Gateway = bcl::from_file(&main).unwrap();
    let paths: Vec<_> = gateway.route.iter().map(|route| route.path.as_str()).collect();
    assert_eq!(paths, ["/api", "/"]);
    assert_eq!(gateway.name, "internal");
    assert_eq!(gateway.listener.port, 80);
}

#[test]
fn include_inside_block() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "listener.bcl", "address 127.0.0.1;\nport 8080;");
    let source = format!(
        "listener {{ include {}/listener.bcl; tls yes; }}",
        dir.path().display()
    );

    let gateway: Gateway = bcl::from_str(&source).unwrap();
    assert_eq!(
        gateway.listener,
        Listener {
            address: "127.0.0.1".into(),
            port: 8080,
            tls: true
        }
    );
}

#[test]
fn included_file_must_balance_its_blocks() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "close.bcl", "}");
    let source = format!(
        "listener {{ include {}/close.bcl; }}",
        dir.path().display()
    );

    let error = bcl::from_str::<Gateway>(&source).expect_err("must fail");
    assert!(matches!(
        error.kind(),
        ErrorKind::Syntax(SyntaxError::UnexpectedClose)
    ));
    assert_eq!(
        error.location().file.as_deref(),
        Some(dir.path().join("close.bcl").as_path())
    );
}

#[test]
fn include_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.bcl");
    std::fs::write(&path, format!("include {};", path.display())).unwrap();

    let error = bcl::from_file::<Gateway>(&path).expect_err("must fail");
    assert!(matches!(
        error.kind(),
        ErrorKind::Syntax(SyntaxError::IncludeDepth(MAX_INCLUDE_DEPTH))
    ));
}

/// Writes `chain-000.bcl` including `chain-001.bcl` and so on, `levels` includes deep
fn include_chain(dir: &Path, levels: usize) -> PathBuf {
    for level in 0..levels {
        let next = dir.join(format!("chain-{:03}.bcl", level + 1));
        write(
            dir,
            &format!("chain-{level:03}.bcl"),
            &format!("include {};", next.display()),
        );
    }
    write(dir, &format!("chain-{levels:03}.bcl"), "name leaf;");
    dir.join("chain-000.bcl")
}

#[test]
fn include_depth_limit() {
    let dir = tempfile::tempdir().unwrap();
    let top = include_chain(dir.path(), MAX_INCLUDE_DEPTH);
    let gateway: Gateway = bcl::from_file(&top).unwrap();
    assert_eq!(gateway.name, "leaf");

    let dir = tempfile::tempdir().unwrap();
    let top = include_chain(dir.path(), MAX_INCLUDE_DEPTH + 1);
    let error = bcl::from_file::<Gateway>(&top).expect_err("must fail");
    assert!(matches!(
        error.kind(),
        ErrorKind::Syntax(SyntaxError::IncludeDepth(MAX_INCLUDE_DEPTH))
    ));
}

#[test]
fn colon_after_statement_keywords() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "listener.bcl", "port 8080;");
    let source = format!(
        "set : addr 10.0.0.1;\nlistener {{ include : {}/*.bcl; address $addr; }}",
        dir.path().display()
    );

    let gateway: Gateway = bcl::from_str(&source).unwrap();
    assert_eq!(gateway.listener.port, 8080);
    assert_eq!(gateway.listener.address, "10.0.0.1");
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.bcl");

    let error = bcl::from_file::<Gateway>(&path).expect_err("must fail");
    assert!(matches!(error.kind(), ErrorKind::Io { .. }));
    assert_eq!(error.location().position, None);
}

#[test]
fn error_locations_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.bcl", "name ok;\nretries lots;\n");

    let error = bcl::from_file::<Gateway>(&path).expect_err("must fail");
    assert_eq!(
        error.to_string(),
        format!(
            "{}:2:13: type error: `lots` is not a valid i8",
            path.display()
        )
    );
}

#[test]
fn session_binds_several_units() {
    let mut gateway = Gateway::default();
    let mut session = bcl::Session::new(&mut gateway);
    session.bind_str("set who ops;", None).unwrap();
    session.bind_str("name $who;", None).unwrap();
    assert_eq!(session.include_depth(), 0);
    drop(session);

    assert_eq!(gateway.name, "ops");
}

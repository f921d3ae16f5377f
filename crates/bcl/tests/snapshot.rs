//! Snapshot tests
//!
//! Binds each *.bcl file in /tests/ individually into a Bravefile and compares if the
//! rendered output changes.
//!
//! Fixtures include files relative to the crate directory.

#[test]
fn snapshots() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("BCL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    insta::glob!("*.bcl", |path| {
        let bravefile: bcl::bravefile::Bravefile =
            bcl::from_file(path).expect("must be a valid bravefile");

        insta::assert_json_snapshot!(bravefile);
    });
}

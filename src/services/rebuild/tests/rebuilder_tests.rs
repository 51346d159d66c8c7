use super::*;
use crate::test_utils::{
    found_match, init_logging, missing_match, project_named, single_group, zip_file_names, zip_of,
    zip_of_bytes,
};
use std::sync::Mutex;

async fn run(source: &[u8], groups: &[SubmissionGroup]) -> RebuildOutcome {
    init_logging();
    rebuild(
        source,
        groups,
        RebuildOptions::default(),
        None,
        &RebuildState::new(),
    )
    .await
    .expect("rebuild should succeed")
}

#[tokio::test]
async fn copies_a_project_out_of_a_nested_archive() {
    let inner = zip_of(&[
        ("Intra/settings.gradle", "rootProject.name = 'demo'\n"),
        ("Intra/build.gradle", "plugins { id 'java' }\n"),
    ]);
    let source = zip_of_bytes(&[("StudentA.zip", &inner)]);

    let groups = vec![single_group(
        "StudentA.zip",
        vec![project_named("StudentA.zip/Intra", "StudentA_Intra", Vec::new())],
    )];
    let outcome = run(&source, &groups).await;

    assert_eq!(outcome.files_copied, 2);
    assert_eq!(
        zip_file_names(&outcome.archive),
        vec![
            "StudentA_Intra/build.gradle".to_string(),
            "StudentA_Intra/settings.gradle".to_string(),
        ]
    );
}

#[tokio::test]
async fn keeps_siblings_of_the_matched_solution_file() {
    let source = zip_of(&[
        ("StudentA/Intra/SignalR.sln", ""),
        ("StudentA/Intra/Program.cs", ""),
        ("StudentA/Intra/SignalR.csproj", ""),
        ("StudentA/Intra/SignalR/Controllers/HomeController.cs", ""),
    ]);

    let groups = vec![single_group(
        "StudentA",
        vec![project_named(
            "StudentA/Intra",
            "StudentA_Intra",
            vec![
                found_match("solution", "StudentA/Intra/SignalR.sln"),
                found_match("projectDir", "StudentA/Intra/SignalR"),
                missing_match("csproj"),
                missing_match("program"),
            ],
        )],
    )];
    let outcome = run(&source, &groups).await;

    let names = zip_file_names(&outcome.archive);
    for expected in [
        "StudentA_Intra/SignalR.sln",
        "StudentA_Intra/Program.cs",
        "StudentA_Intra/SignalR.csproj",
        "StudentA_Intra/SignalR/Controllers/HomeController.cs",
    ] {
        assert!(names.contains(&expected.to_string()), "missing {expected}");
    }
}

#[tokio::test]
async fn copies_the_whole_directory_when_only_one_node_matched() {
    let source = zip_of(&[
        ("StudentA/Intra/SignalR.sln", ""),
        ("StudentA/Intra/Program.cs", ""),
        ("StudentA/Intra/SignalR/Controllers/HomeController.cs", ""),
    ]);

    let groups = vec![single_group(
        "StudentA",
        vec![project_named(
            "StudentA/Intra",
            "StudentA_Intra",
            vec![found_match("solution", "StudentA/Intra/SignalR.sln")],
        )],
    )];
    let outcome = run(&source, &groups).await;

    assert_eq!(outcome.files_copied, 3);
    assert!(zip_file_names(&outcome.archive)
        .iter()
        .all(|n| n.starts_with("StudentA_Intra/")));
}

#[tokio::test]
async fn skips_projects_with_blank_output_names() {
    let source = zip_of(&[("StudentA/code.txt", "x")]);
    let groups = vec![single_group(
        "StudentA",
        vec![project_named("StudentA", "   ", Vec::new())],
    )];
    let outcome = run(&source, &groups).await;

    assert_eq!(outcome.files_copied, 0);
    assert!(zip_file_names(&outcome.archive).is_empty());
}

#[tokio::test]
async fn a_root_with_no_files_is_not_an_error() {
    let source = zip_of(&[("StudentA/code.txt", "x")]);
    let groups = vec![single_group(
        "Ghost",
        vec![project_named("Ghost", "ghost_out", Vec::new())],
    )];
    let outcome = run(&source, &groups).await;
    assert_eq!(outcome.files_copied, 0);
}

#[tokio::test]
async fn cancellation_aborts_without_an_archive() {
    let source = zip_of(&[("StudentA/code.txt", "x")]);
    let groups = vec![single_group(
        "StudentA",
        vec![project_named("StudentA", "out", Vec::new())],
    )];

    let state = RebuildState::new();
    state.cancel();
    let err = rebuild(&source, &groups, RebuildOptions::default(), None, &state)
        .await
        .expect_err("cancelled rebuild must fail");
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn reports_progress_at_a_bounded_interval() {
    let source = zip_of(&[
        ("P/f1", ""),
        ("P/f2", ""),
        ("P/f3", ""),
        ("P/f4", ""),
        ("P/f5", ""),
        ("P/f6", ""),
        ("P/f7", ""),
    ]);
    let groups = vec![single_group(
        "P",
        vec![project_named("P", "out", Vec::new())],
    )];

    let events: Mutex<Vec<(f64, Option<String>)>> = Mutex::new(Vec::new());
    let on_progress = |ratio: f64, path: Option<&str>| {
        events
            .lock()
            .expect("event log poisoned")
            .push((ratio, path.map(str::to_string)));
    };

    init_logging();
    let outcome = rebuild(
        &source,
        &groups,
        RebuildOptions::default(),
        Some(&on_progress),
        &RebuildState::new(),
    )
    .await
    .expect("rebuild should succeed");
    assert_eq!(outcome.files_copied, 7);

    let events = events.into_inner().expect("event log poisoned");
    // One tick at the fifth file, one after the project, one final.
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].0, 5.0 / 7.0);
    assert!(events[0].1.is_some());
    assert_eq!(events[1], (1.0, None));
    assert_eq!(events[2], (1.0, None));
}

#[tokio::test]
async fn names_the_output_archive() {
    let source = zip_of(&[("A/x", "")]);
    let groups = vec![single_group("A", vec![project_named("A", "A_out", Vec::new())])];

    let outcome = run(&source, &groups).await;
    assert_eq!(outcome.output_name, "standardized.zip");

    let outcome = rebuild(
        &source,
        &groups,
        RebuildOptions {
            output_name: Some("session-42.zip".to_string()),
        },
        None,
        &RebuildState::new(),
    )
    .await
    .expect("rebuild should succeed");
    assert_eq!(outcome.output_name, "session-42.zip");
}

#[tokio::test]
async fn corrupt_source_archives_fail_the_whole_rebuild() {
    let err = rebuild(
        b"not a zip at all",
        &[],
        RebuildOptions::default(),
        None,
        &RebuildState::new(),
    )
    .await
    .expect_err("garbage bytes are not an archive");
    assert!(matches!(err, CoreError::ArchiveCorrupt(_)));
}

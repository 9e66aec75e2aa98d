use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use flowsketch_cli::{Args, run};
use flowsketch_core::{
    LayoutResult,
    geometry::{Point, Size},
    viewport::DragEvent,
};

/// Collects all .mmd files from a directory
fn collect_mmd_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("mmd")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        strict: true,
        pins: None,
    }
}

#[tokio::test]
async fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_mmd_files(demos_path());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!("{}.json", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        if let Err(e) = run(&args_for(demo_path, &output_path)).await {
            failed_demos.push((demo_path.clone(), e.to_string()));
            continue;
        }

        let json = fs::read_to_string(&output_path).expect("Output should be written");
        let result: LayoutResult = serde_json_from(&json);
        if result
            .graph()
            .nodes()
            .iter()
            .any(|node| node.position().is_none())
        {
            failed_demos.push((demo_path.clone(), "unpositioned node".to_string()));
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("All {} valid demos passed", valid_demos.len());
}

#[tokio::test]
async fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_mmd_files(demos_path().join("errors"));
    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if run(&args_for(demo_path, &output_path)).await.is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[tokio::test]
async fn e2e_pins_carry_over() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("chain.mmd");
    fs::write(&input, "graph TD\nA --> B\nB --> C\n").unwrap();

    // A previous run where the user then dragged B
    let first = temp_dir.path().join("first.json");
    run(&args_for(&input, &first)).await.expect("First run failed");
    let mut dragged = serde_json_from(&fs::read_to_string(&first).unwrap()).into_graph();
    assert!(dragged.apply_drag(&DragEvent::new("B", Point::new(420.0, 35.0))));
    let previous = LayoutResult::new(dragged, Size::new(800.0, 600.0));
    fs::write(&first, serde_json::to_string(&previous).unwrap()).unwrap();

    let second = temp_dir.path().join("second.json");
    let mut args = args_for(&input, &second);
    args.pins = Some(first.to_string_lossy().to_string());
    run(&args).await.expect("Second run failed");

    let after: LayoutResult = serde_json_from(&fs::read_to_string(&second).unwrap());
    let b = after.graph().node("B").unwrap();
    assert!(b.is_pinned());
    assert_eq!(b.position(), Some(Point::new(420.0, 35.0)));
    assert!(!after.graph().node("A").unwrap().is_pinned());
}

fn serde_json_from(json: &str) -> LayoutResult {
    serde_json::from_str(json).expect("Output should be a LayoutResult")
}

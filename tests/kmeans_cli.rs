use std::process::Command;

use tempfile::TempDir;

fn lloyd_bin() -> anyhow::Result<std::path::PathBuf> {
    if let Some(path) = std::env::var_os("CARGO_BIN_EXE_lloyd") {
        return Ok(path.into());
    }

    let exe = std::env::current_exe()?;
    let deps_dir = exe
        .parent()
        .ok_or_else(|| anyhow::anyhow!("test binary has no parent"))?;
    let target_dir = deps_dir
        .parent()
        .ok_or_else(|| anyhow::anyhow!("deps dir has no parent"))?;
    let candidate = target_dir.join(if cfg!(windows) { "lloyd.exe" } else { "lloyd" });
    if candidate.exists() {
        return Ok(candidate);
    }

    anyhow::bail!(
        "lloyd binary not found (checked CARGO_BIN_EXE_lloyd and {})",
        candidate.display()
    )
}

const FOUR_POINTS: &str = "1\t1\n1\t2\n9\t9\n9\t10\n";

#[test]
fn kmeans_cli_prints_passes_and_assignments() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("points.tsv");
    std::fs::write(&input, FOUR_POINTS)?;

    let output = Command::new(lloyd_bin()?)
        .args([
            "kmeans",
            "--input",
            input.to_str().expect("utf8 path"),
            "--k",
            "2",
            "--seed",
            "7",
            "--restarts",
            "20",
        ])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("restart=0 pass=1 changed=4"), "stdout={stdout}");
    assert!(stdout.contains("converged=true"), "stdout={stdout}");

    let rows: Vec<&str> = stdout
        .lines()
        .skip_while(|l| *l != "assignments:")
        .skip(1)
        .collect();
    assert_eq!(rows.len(), 4, "stdout={stdout}");
    let labels: Vec<&str> = rows
        .iter()
        .map(|r| r.split('\t').next().unwrap_or(""))
        .collect();
    assert_eq!(labels[0], labels[1], "stdout={stdout}");
    assert_eq!(labels[2], labels[3], "stdout={stdout}");
    assert_ne!(labels[0], labels[2], "stdout={stdout}");
    Ok(())
}

#[test]
fn kmeans_cli_json_and_predict_agree() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("points.tsv");
    let centroids = dir.path().join("centroids.tsv");
    std::fs::write(&input, FOUR_POINTS)?;

    let fit = Command::new(lloyd_bin()?)
        .args([
            "kmeans",
            "--input",
            input.to_str().expect("utf8 path"),
            "--k",
            "2",
            "--seed",
            "3",
            "--restarts",
            "20",
            "--json",
            "--centroids-out",
            centroids.to_str().expect("utf8 path"),
        ])
        .output()?;
    assert!(fit.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&fit.stdout)?;
    assert_eq!(doc["converged"], serde_json::Value::Bool(true));
    assert_eq!(doc["centroids"].as_array().map(Vec::len), Some(2));
    assert!((doc["inertia"].as_f64().unwrap_or(f64::NAN) - 1.0).abs() < 1e-9);
    let fitted: Vec<u64> = doc["assignments"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("assignments missing"))?
        .iter()
        .filter_map(|a| a["cluster"].as_u64())
        .collect();

    let predict = Command::new(lloyd_bin()?)
        .args([
            "predict",
            "--input",
            input.to_str().expect("utf8 path"),
            "--centroids",
            centroids.to_str().expect("utf8 path"),
        ])
        .output()?;
    assert!(predict.status.success());
    let stdout = String::from_utf8_lossy(&predict.stdout);
    let predicted: Vec<u64> = stdout
        .lines()
        .map(|l| l.split('\t').next().unwrap_or("").parse())
        .collect::<Result<_, _>>()?;
    assert_eq!(predicted, fitted);
    Ok(())
}

#[test]
fn kmeans_cli_reads_config_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("points.tsv");
    let config = dir.path().join("kmeans.json");
    std::fs::write(&input, FOUR_POINTS)?;
    std::fs::write(&config, r#"{"k": 4, "seed": 1, "init": "sample"}"#)?;

    let output = Command::new(lloyd_bin()?)
        .args([
            "kmeans",
            "--input",
            input.to_str().expect("utf8 path"),
            "--config",
            config.to_str().expect("utf8 path"),
            "--quiet",
        ])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("pass="), "stdout={stdout}");
    assert!(stdout.contains("inertia=0"), "stdout={stdout}");
    Ok(())
}

#[test]
fn kmeans_cli_rejects_malformed_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("points.tsv");
    std::fs::write(&input, "1\t1\n1\toops\n")?;

    let output = Command::new(lloyd_bin()?)
        .args([
            "kmeans",
            "--input",
            input.to_str().expect("utf8 path"),
            "--k",
            "1",
        ])
        .output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "stderr={stderr}");
    assert!(stderr.contains("oops"), "stderr={stderr}");
    Ok(())
}

#[test]
fn kmeans_cli_rejects_missing_file_and_bad_k() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("nope.tsv");
    let output = Command::new(lloyd_bin()?)
        .args([
            "kmeans",
            "--input",
            missing.to_str().expect("utf8 path"),
            "--k",
            "2",
        ])
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.tsv"));

    let input = dir.path().join("points.tsv");
    std::fs::write(&input, FOUR_POINTS)?;
    let output = Command::new(lloyd_bin()?)
        .args([
            "kmeans",
            "--input",
            input.to_str().expect("utf8 path"),
            "--k",
            "5",
        ])
        .output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cluster count 5"), "stderr={stderr}");
    Ok(())
}

#[test]
fn generate_then_cluster_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("blobs.tsv");
    let gen = Command::new(lloyd_bin()?)
        .args([
            "generate",
            "--out",
            input.to_str().expect("utf8 path"),
            "--k",
            "3",
            "--points",
            "30",
            "--dim",
            "3",
            "--seed",
            "5",
        ])
        .output()?;
    assert!(gen.status.success());
    let text = std::fs::read_to_string(&input)?;
    assert_eq!(text.lines().count(), 30);
    assert!(text.lines().all(|l| l.split('\t').count() == 3));

    let output = Command::new(lloyd_bin()?)
        .args([
            "kmeans",
            "--input",
            input.to_str().expect("utf8 path"),
            "--k",
            "3",
            "--seed",
            "5",
            "--json",
        ])
        .output()?;
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(doc["assignments"].as_array().map(Vec::len), Some(30));
    Ok(())
}

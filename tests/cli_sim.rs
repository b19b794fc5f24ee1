use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn command_sim_header() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("mice")?;
    let output = cmd
        .arg("sim")
        .arg("--len")
        .arg("20")
        .arg("--count")
        .arg("4")
        .arg("--mad")
        .arg("3")
        .arg("--rep")
        .arg("5")
        .arg("--seed")
        .arg("1")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(
        lines[0],
        "H\tVN:Z:1.0\tm:i:20\tn:i:4\tmad_id:i:3\tdup:Z:F\trep:i:5"
    );
    assert_eq!(lines.iter().filter(|l| l.starts_with("P\t")).count(), 4);
    assert!(lines.iter().any(|l| l.starts_with("P\tg4\t")));
    assert!(lines.iter().filter(|l| l.starts_with("S\t")).all(|l| l.ends_with("\tA")));
    assert!(lines.iter().filter(|l| l.starts_with("L\t")).all(|l| l.ends_with("\t0M")));

    Ok(())
}

#[test]
fn command_sim_seeded() -> anyhow::Result<()> {
    let run = |seed: &str| -> anyhow::Result<String> {
        let mut cmd = Command::cargo_bin("mice")?;
        let output = cmd.arg("sim").arg("--dup").arg("--seed").arg(seed).output()?;
        Ok(String::from_utf8(output.stdout)?)
    };

    assert_eq!(run("42")?, run("42")?);
    assert!(run("42")?.contains("dup:Z:T"));

    Ok(())
}

#[test]
fn command_sim_then_count() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let gfa = temp.path().join("sim.gfa");

    let mut cmd = Command::cargo_bin("mice")?;
    cmd.arg("sim")
        .arg("-m")
        .arg("200")
        .arg("-n")
        .arg("5")
        .arg("-s")
        .arg("3")
        .arg("-o")
        .arg(&gfa);
    cmd.assert().success();

    let mut counts = Vec::new();
    for order in ["lifo", "fifo", "random"] {
        let mut cmd = Command::cargo_bin("mice")?;
        let output = cmd
            .arg("count")
            .arg(&gfa)
            .arg("--order")
            .arg(order)
            .output()?;
        assert!(output.status.success());
        counts.push(String::from_utf8(output.stdout)?.trim().parse::<usize>()?);
    }

    assert!(counts[0] >= 1);
    assert!(counts.iter().all(|&c| c == counts[0]));

    Ok(())
}

#[test]
fn command_sim_zero_mad() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("mice")?;
    cmd.arg("sim").arg("--mad").arg("0");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));

    Ok(())
}

use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn claquete_cmd() -> Command {
    Command::cargo_bin("claquete").expect("Failed to find claquete binary")
}

#[test]
fn test_help_lists_encode_command() -> Result<(), Box<dyn Error>> {
    claquete_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("encode"));
    Ok(())
}

#[test]
fn test_encode_non_existent_input_fails() -> Result<(), Box<dyn Error>> {
    let output_dir = tempdir()?;

    claquete_cmd()
        .arg("encode")
        .arg("surely/this/does/not/exist/input.mp4")
        .arg(output_dir.path())
        .assert()
        .failure()
        .stderr(contains("Invalid input path"));

    Ok(())
}

#[test]
fn test_encode_rejects_unknown_preset() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;
    let input_file = input_dir.path().join("clip.mp4");
    std::fs::write(&input_file, "dummy content")?;

    claquete_cmd()
        .arg("encode")
        .arg(&input_file)
        .arg(output_dir.path())
        .arg("--preset")
        .arg("cinema")
        .assert()
        .failure()
        .stderr(contains("invalid value"));

    Ok(())
}

#[test]
fn test_encode_rejects_unknown_speed() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;
    let input_file = input_dir.path().join("clip.mp4");
    std::fs::write(&input_file, "dummy content")?;

    claquete_cmd()
        .arg("encode")
        .arg(&input_file)
        .arg(output_dir.path())
        .arg("--speed")
        .arg("slow")
        .assert()
        .failure()
        .stderr(contains("invalid value"));

    Ok(())
}

use std::env;
use std::path::Path;
use std::process::{Command, ExitCode};

const CI_STEPS: [&[&str]; 3] = [
    &["fmt", "--all", "--", "--check"],
    &[
        "clippy",
        "--workspace",
        "--all-targets",
        "--",
        "-D",
        "warnings",
    ],
    &["test", "--workspace"],
];

fn cargo(root: &Path, args: &[&str]) -> Result<(), String> {
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let shown = format!("cargo {}", args.join(" "));
    eprintln!("xtask: {shown}");
    let status = Command::new(cargo)
        .args(args)
        .current_dir(root)
        .status()
        .map_err(|e| format!("failed to run `{shown}`: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("command failed: {shown}"))
    }
}

fn main() -> ExitCode {
    let arg = env::args().nth(1).unwrap_or_else(|| "help".to_string());
    let Some(root) = Path::new(env!("CARGO_MANIFEST_DIR")).parent() else {
        eprintln!("xtask must live inside the workspace");
        return ExitCode::FAILURE;
    };

    let result = match arg.as_str() {
        "ci" => CI_STEPS.iter().try_for_each(|step| cargo(root, step)),
        "fmt" => cargo(root, CI_STEPS[0]),
        "lint" => cargo(root, CI_STEPS[1]),
        "test" => cargo(root, CI_STEPS[2]),
        "help" | "--help" | "-h" => {
            eprintln!("xtask commands:");
            eprintln!("  ci    fmt check, clippy and tests");
            eprintln!("  fmt");
            eprintln!("  lint");
            eprintln!("  test");
            Ok(())
        }
        _ => Err(format!(
            "unknown xtask command: {arg} (try `cargo run -p xtask -- help`)"
        )),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

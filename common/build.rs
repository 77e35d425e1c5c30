// Build version is the package version suffixed with the short git commit hash.

use std::process::Command;

fn main() {
    let commit_hash = if let Some(hash) = option_env!("SPKZ_COMMIT_HASH") {
        hash.chars().take(7).collect()
    } else {
        match Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output()
        {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            _ => "unknown".to_string(),
        }
    };

    let build_version = format!("{}-{}", env!("CARGO_PKG_VERSION"), commit_hash);
    println!("cargo:rerun-if-env-changed=SPKZ_COMMIT_HASH");
    println!("cargo:rustc-env=BUILD_VERSION={build_version}");
}

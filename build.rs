//! Stamps the build date into the CLI version string.

use std::env;

use time::OffsetDateTime;

const STAMP_VAR: &str = "FBX_GLTF_CONV_BUILD_DATE";

fn main() {
    println!("cargo:rerun-if-env-changed={STAMP_VAR}");

    // Reproducible builds pin the stamp from the environment
    let stamp = env::var(STAMP_VAR).unwrap_or_else(|_| {
        let now = OffsetDateTime::now_utc();
        format!("{} {:02}:{:02} UTC", now.date(), now.hour(), now.minute())
    });
    println!("cargo:rustc-env={STAMP_VAR}={stamp}");
}

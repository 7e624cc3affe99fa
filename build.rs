//! Embeds the build date and, outside `--features release`, the git commit
//! into the `--version` string.
//!
//! Every variable gets a value: anything vergen cannot collect (a source
//! tarball has no git checkout) is emitted as `unknown`.

use std::fmt::Display;

use vergen_gitcl::{BuildBuilder, Emitter};

fn main() {
    let mut emitter = Emitter::default();

    match BuildBuilder::default().build_date(true).build() {
        Ok(build) => {
            if let Err(e) = emitter.add_instructions(&build) {
                unknown("VERGEN_BUILD_DATE", e);
            }
        }
        Err(e) => unknown("VERGEN_BUILD_DATE", e),
    }

    #[cfg(not(feature = "release"))]
    match vergen_gitcl::GitclBuilder::default().sha(true).build() {
        Ok(git) => {
            if let Err(e) = emitter.add_instructions(&git) {
                unknown("VERGEN_GIT_SHA", e);
            }
        }
        Err(e) => unknown("VERGEN_GIT_SHA", e),
    }

    if let Err(e) = emitter.emit() {
        unknown("VERGEN_BUILD_DATE", &e);
        unknown("VERGEN_GIT_SHA", e);
    }
}

fn unknown(var: &str, error: impl Display) {
    println!("cargo:warning=Failed to collect {}: {}", var, error);
    println!("cargo:rustc-env={}=unknown", var);
}

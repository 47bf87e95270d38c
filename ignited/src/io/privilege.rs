//! Root privilege check.

use anyhow::{Result, bail};

/// Fail unless the process runs with an effective uid of 0.
#[cfg(unix)]
pub fn check_root() -> Result<()> {
    check_uid(nix::unistd::Uid::effective().as_raw())
}

#[cfg(not(unix))]
pub fn check_root() -> Result<()> {
    bail!("ignited requires a unix host to verify root privileges")
}

#[cfg_attr(not(unix), allow(dead_code))]
fn check_uid(euid: u32) -> Result<()> {
    if euid != 0 {
        bail!("ignited needs to run as root (effective uid {euid})");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_uid_passes() {
        check_uid(0).expect("root");
    }

    #[test]
    fn unprivileged_uid_is_rejected() {
        let err = check_uid(1000).unwrap_err();
        assert!(err.to_string().contains("needs to run as root"));
        assert!(err.to_string().contains("1000"));
    }
}

//! Workspace identity hashing.
//!
//! A workspace is identified by a short stable token derived from its absolute
//! path. The token keys the on-disk store under the host's storage directory,
//! so it must be a pure function of the path: same path in, same token out,
//! across processes and platforms.

/// 32-bit rolling hash over the input bytes (31-multiplier polynomial).
pub fn rolling_hash_32(input: &str) -> u32 {
    input
        .bytes()
        .fold(0u32, |hash, byte| hash.wrapping_mul(31).wrapping_add(byte as u32))
}

/// Stable short token for a workspace path, rendered as 8 hex digits.
pub fn workspace_id(workspace_path: &str) -> String {
    format!("{:08x}", rolling_hash_32(workspace_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_id_is_deterministic() {
        let a = workspace_id("/home/dev/project");
        let b = workspace_id("/home/dev/project");
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_paths_get_different_ids() {
        assert_ne!(
            workspace_id("/home/dev/project"),
            workspace_id("/home/dev/project2")
        );
    }

    #[test]
    fn empty_input_hashes_to_zero() {
        assert_eq!(rolling_hash_32(""), 0);
        assert_eq!(workspace_id(""), "00000000");
    }
}

use std::fs;
use std::path::Path;

/// Reads a text file, returning `None` on any I/O failure.
///
/// The failure is logged at `error` level; it is not propagated. A consumer
/// holding `None` source must treat it as an invalid resource, not a crash.
pub fn load_text(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            log::error!("failed to read {}: {err}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_is_absent() {
        assert_eq!(load_text("/nonexistent/kestrel/shader.wgsl"), None);
    }

    #[test]
    fn existing_file_round_trips() {
        let path = std::env::temp_dir().join(format!(
            "kestrel-loader-test-{}.txt",
            std::process::id()
        ));
        fs::write(&path, "fn main() {}").unwrap();

        assert_eq!(load_text(&path).as_deref(), Some("fn main() {}"));

        let _ = fs::remove_file(&path);
    }
}

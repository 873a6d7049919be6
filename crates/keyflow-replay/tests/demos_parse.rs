//! Every script in the workspace `demos/` directory must parse.

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use keyflow_replay::script::Script;

    #[test]
    fn parse_all_demo_scripts() {
        let demos_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent() // crates
            .and_then(|p| p.parent()) // workspace root
            .expect("workspace root")
            .join("demos");

        let mut found = 0usize;
        for entry in fs::read_dir(&demos_dir).expect("read demos dir") {
            let path = entry.unwrap().path();
            if path.extension().and_then(|s| s.to_str()) != Some("ron") {
                continue;
            }
            found += 1;
            let parsed = Script::load(&path);
            let fname = path.file_name().unwrap().to_string_lossy().to_string();
            assert!(parsed.is_ok(), "failed to parse {}: {:?}", fname, parsed.err());
        }
        assert!(found > 0, "no .ron files found in demos");
    }
}

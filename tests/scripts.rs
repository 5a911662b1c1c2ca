use std::fs;

use cleat::Environment;
use walkdir::WalkDir;

#[test]
fn fixture_scripts_load() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| {
                                         e.path().extension().is_some_and(|ext| ext == "cleat")
                                     })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        let mut env = Environment::new();

        if let Err(e) = env.load(&path.display().to_string(), &source) {
            panic!("Fixture {path:?} failed:\n{source}\nError: {e}");
        }
    }

    assert!(count > 0, "No fixture scripts found in tests/scripts");
}

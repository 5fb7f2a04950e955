#![no_main]

use libfuzzer_sys::fuzz_target;
use suitesync::ManifestFile;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // A manifest that parses must also build a registry or fail with an error, never panic
        if let Ok(manifest) = ManifestFile::parse(s) {
            let _ = manifest.registry();
            let _ = manifest.test_data_root(std::path::Path::new("."), None);
        }
    }
});

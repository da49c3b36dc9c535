//! Fuzz target for item path normalization.
//!
//! Goal: `ItemPath::new` should **never panic**, normalization must be
//! idempotent, and the parent chain must always terminate.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_item_path
//! ```

#![no_main]

use apiguard_types::ItemPath;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Structured input so the fuzzer also exercises `join`.
#[derive(Arbitrary, Debug)]
struct PathInput {
    raw: String,
    segment: String,
}

fuzz_target!(|input: PathInput| {
    // Limit input size to keep fuzzing fast
    if input.raw.len() > 4096 || input.segment.len() > 256 {
        return;
    }

    let path = ItemPath::new(&input.raw);

    // Normalization is idempotent
    assert_eq!(ItemPath::new(path.as_str()), path);

    // The parent chain terminates (each parent is strictly shorter)
    let mut steps = 0usize;
    let mut cursor = path.parent();
    while let Some(p) = cursor {
        steps += 1;
        assert!(steps <= input.raw.len() + 1, "parent chain did not terminate");
        cursor = p.parent();
    }

    let _ = path.join(&input.segment);
});

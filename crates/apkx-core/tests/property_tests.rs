//! Property-based tests for name sanitization and conflict remapping.

#![allow(clippy::expect_used)]

use apkx_core::ExtractionConfig;
use apkx_core::Extractor;
use apkx_core::security::ConflictSet;
use apkx_core::security::remap_entry;
use apkx_core::security::sanitize_entry_name;
use apkx_core::test_utils::MemoryBackend;
use apkx_core::test_utils::write_test_zip;
use apkx_core::types::DestDir;
use apkx_core::types::EntryName;
use proptest::prelude::*;
use std::collections::HashSet;
use tempfile::TempDir;

fn create_test_dest() -> (TempDir, DestDir) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dest = DestDir::new(temp.path()).expect("failed to create dest");
    (temp, dest)
}

/// Names built from traversal-heavy segments and both separators.
fn hostile_name() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("..".to_string()),
            Just(".".to_string()),
            Just(String::new()),
            "[a-z]{1,4}",
            Just("C:".to_string()),
        ],
        1..8,
    )
    .prop_flat_map(|segments| {
        let separators = prop::collection::vec(prop_oneof![Just('/'), Just('\\')], segments.len());
        (Just(segments), separators)
    })
    .prop_map(|(segments, separators)| {
        segments
            .iter()
            .zip(separators)
            .map(|(segment, sep)| format!("{segment}{sep}"))
            .collect::<String>()
    })
}

/// Distinct file names over a tiny alphabet, so prefixes collide often.
/// Some live under the default quarantine directory.
fn colliding_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("(__conflicts__/)?[abc](/[abc]){0,3}", 1..12)
        .prop_map(|set| set.into_iter().collect())
}

/// Colliding names spelled with redundant separators and `.` segments.
fn noisy_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec(("[abc]", prop_oneof![Just("/"), Just("//"), Just("/./"), Just("\\")]), 1..4),
        1..10,
    )
    .prop_map(|names| {
        names
            .into_iter()
            .map(|segments| {
                let mut name = String::new();
                for (idx, (segment, separator)) in segments.iter().enumerate() {
                    if idx > 0 {
                        name.push_str(separator);
                    }
                    name.push_str(segment);
                }
                name
            })
            .collect()
    })
}

fn is_ancestor(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len() && path.starts_with(ancestor) && path.as_bytes()[ancestor.len()] == b'/'
}

proptest! {
    /// Sanitized names never leave the destination nor resolve to it.
    #[test]
    fn prop_sanitized_names_stay_below_destination(name in hostile_name()) {
        let (_temp, dest) = create_test_dest();
        let config = ExtractionConfig::default();
        if let Some(safe) = sanitize_entry_name(&name, &config) {
            let joined = dest.join(&safe);
            prop_assert!(joined.starts_with(dest.as_path()));
            prop_assert_ne!(joined.as_path(), dest.as_path());
            prop_assert!(safe.as_path().components().all(|c| matches!(c, std::path::Component::Normal(_))));
        }
    }

    /// Every remapped name is distinct and none is a directory of another.
    #[test]
    fn prop_remapped_names_do_not_overlap(raw in colliding_names()) {
        let names: Vec<EntryName> = raw.iter().map(|n| EntryName::from(n.as_str())).collect();
        let conflicts = ConflictSet::detect(&names, &ExtractionConfig::default());
        let remapped: Vec<String> = names
            .iter()
            .map(|name| remap_entry(name, &conflicts).into_owned())
            .collect();

        let unique: HashSet<&String> = remapped.iter().collect();
        prop_assert_eq!(unique.len(), remapped.len());
        for x in &remapped {
            for y in &remapped {
                prop_assert!(!is_ancestor(x, y), "{} is an ancestor of {}", x, y);
            }
        }
    }

    /// Only files used as directories are members of the conflict set.
    #[test]
    fn prop_conflict_members_have_descendants(raw in colliding_names()) {
        let names: Vec<EntryName> = raw.iter().map(|n| EntryName::from(n.as_str())).collect();
        let conflicts = ConflictSet::detect(&names, &ExtractionConfig::default());
        for name in &raw {
            let has_descendant = raw.iter().any(|other| is_ancestor(name, other));
            prop_assert_eq!(conflicts.contains(name), has_descendant);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every file entry survives extraction with its own contents.
    #[test]
    fn prop_extraction_is_lossless(raw in colliding_names()) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let archive = temp.path().join("app.apk");
        write_test_zip(&archive, &[("stub", "")]);

        let entries: Vec<(&str, &str)> = raw.iter().map(|n| (n.as_str(), n.as_str())).collect();
        let mut extractor = Extractor::new(ExtractionConfig::default())
            .with_backend(MemoryBackend::new(&entries));
        let out = temp.path().join("out");
        let report = extractor.extract(&archive, &out).expect("extraction failed");

        prop_assert_eq!(report.files_extracted, raw.len());

        let names: Vec<EntryName> = raw.iter().map(|n| EntryName::from(n.as_str())).collect();
        let conflicts = ConflictSet::detect(&names, &ExtractionConfig::default());
        for name in &names {
            let remapped = remap_entry(name, &conflicts);
            let contents = std::fs::read_to_string(out.join(&*remapped))
                .expect("missing extracted file");
            prop_assert_eq!(contents, name.as_str());
        }
    }

    /// Names that only collide once normalized still extract without loss.
    #[test]
    fn prop_normalized_collisions_are_lossless(raw in noisy_names()) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let archive = temp.path().join("app.apk");
        write_test_zip(&archive, &[("stub", "")]);

        let config = ExtractionConfig::default();
        let distinct: HashSet<_> = raw
            .iter()
            .filter_map(|name| sanitize_entry_name(name, &config))
            .collect();

        let entries: Vec<(&str, &str)> = raw.iter().map(|n| (n.as_str(), n.as_str())).collect();
        let mut extractor = Extractor::new(config)
            .with_backend(MemoryBackend::new(&entries));
        let report = extractor
            .extract(&archive, temp.path().join("out"))
            .expect("extraction failed");

        prop_assert_eq!(report.files_extracted, distinct.len());
    }
}

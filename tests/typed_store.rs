//! Behavior of the typed facade over plain and encrypted namespaces.

mod common;

use std::collections::{BTreeSet, HashMap, HashSet};

use common::{for_each_store, memory_store, sample_profile, Profile};
use typed_prefs::{Error, Json, SaveOutcome, ValueKind};

fn set(members: &[&str]) -> HashSet<String> {
    members.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_roundtrip_boundary_values() -> anyhow::Result<()> {
    for_each_store(|mode, _, store| {
        for s in ["", "plain", "ünïcødé ✓", "line\nbreak"] {
            assert!(store.put_sync("s", s.to_string())?, "{mode}");
            assert_eq!(store.get("s", "default".to_string())?, s, "{mode}");
        }

        for b in [true, false] {
            assert!(store.put_sync("b", b)?);
            assert_eq!(store.get("b", !b)?, b, "{mode}");
        }

        for i in [0, -1, 1, i32::MIN, i32::MAX] {
            assert!(store.put_sync("i", i)?);
            assert_eq!(store.get("i", 42i32)?, i, "{mode}");
        }

        for l in [0, -1, i64::MIN, i64::MAX] {
            assert!(store.put_sync("l", l)?);
            assert_eq!(store.get("l", 42i64)?, l, "{mode}");
        }

        for f in [0.0f32, -0.0, f32::MIN_POSITIVE, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(store.put_sync("f", f)?);
            assert_eq!(store.get("f", 1.5f32)?.to_bits(), f.to_bits(), "{mode}");
        }

        let cases: [&[&str]; 3] = [&[], &["one"], &["a", "b", ""]];
        for members in cases {
            assert!(store.put_sync("set", set(members))?);
            assert_eq!(store.get("set", set(&["default"]))?, set(members), "{mode}");
        }
        Ok(())
    })
}

#[test]
fn test_double_roundtrip_is_bit_exact() -> anyhow::Result<()> {
    let payload_nan = f64::from_bits(0x7ff8_dead_beef_0001);
    let negative_nan = f64::from_bits(0xfff0_0000_0000_0001);
    let values = [
        0.0,
        -0.0,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
        payload_nan,
        negative_nan,
        f64::MIN_POSITIVE,
        f64::MAX,
        std::f64::consts::PI,
    ];

    for_each_store(|mode, _, store| {
        for v in values {
            assert!(store.put_sync("d", v)?);
            let back = store.get("d", 7.0f64)?;
            assert_eq!(back.to_bits(), v.to_bits(), "{mode}: {v}");
        }
        Ok(())
    })
}

#[test]
fn test_double_is_stored_as_long_bits() -> anyhow::Result<()> {
    let (_, store) = memory_store();
    store.put("d", 1.0f64)?;
    assert_eq!(store.get("d", 0i64)?, 1.0f64.to_bits() as i64);
    Ok(())
}

#[test]
fn test_missing_key_returns_default() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        assert_eq!(store.get("nope", "dflt".to_string())?, "dflt");
        assert!(store.get("nope", true)?);
        assert_eq!(store.get("nope", -3i32)?, -3);
        assert_eq!(store.get("nope", -4i64)?, -4);
        assert_eq!(store.get("nope", 2.5f32)?, 2.5);
        assert_eq!(store.get("nope", f64::NAN)?.to_bits(), f64::NAN.to_bits());
        assert_eq!(store.get("nope", set(&["x"]))?, set(&["x"]));
        assert_eq!(store.get_object("nope", sample_profile())?, sample_profile());
        assert_eq!(store.get_list("nope", vec![1, 2])?, vec![1, 2]);
        assert!(!store.is_key_present("nope")?);
        Ok(())
    })
}

#[test]
fn test_remove_then_get_returns_default() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("k", 10i32)?;
        assert!(store.is_key_present("k")?);
        store.remove("k")?;
        assert!(!store.is_key_present("k")?);
        assert_eq!(store.get("k", 0i32)?, 0);

        // Removing again is fine.
        store.remove("k")?;
        Ok(())
    })
}

#[test]
fn test_remove_sync() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("k", 1i32)?;
        assert!(store.remove_sync("k"));
        assert!(!store.is_key_present("k")?);
        Ok(())
    })
}

#[test]
fn test_put_overwrites() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("k", "first".to_string())?;
        store.put("k", "second".to_string())?;
        assert_eq!(store.get("k", String::new())?, "second");
        Ok(())
    })
}

#[test]
fn test_put_if_absent_keeps_first_value() -> anyhow::Result<()> {
    for_each_store(|mode, _, store| {
        assert!(store.put_if_absent("k", 1i32)?, "{mode}");
        assert!(!store.put_if_absent("k", 2i32)?, "{mode}");
        assert_eq!(store.get("k", 0i32)?, 1);
        Ok(())
    })
}

#[test]
fn test_put_if_absent_checks_any_kind() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("k", true)?;
        assert!(!store.put_if_absent("k", "text".to_string())?);
        assert!(store.get("k", false)?);
        Ok(())
    })
}

#[test]
fn test_put_sync_if_absent_outcomes() -> anyhow::Result<()> {
    for_each_store(|mode, backend, store| {
        assert_eq!(
            store.put_sync_if_absent("k", 1i64)?,
            SaveOutcome::SavedSuccessfully,
            "{mode}"
        );
        assert_eq!(
            store.put_sync_if_absent("k", 2i64)?,
            SaveOutcome::KeyAlreadyExists,
            "{mode}"
        );
        assert_eq!(store.get("k", 0i64)?, 1);

        backend.set_fail_commits(true);
        assert_eq!(
            store.put_sync_if_absent("other", 3i64)?,
            SaveOutcome::NotSaved,
            "{mode}"
        );
        assert!(!store.is_key_present("other")?);

        // An existing key is reported before any commit is attempted.
        assert_eq!(
            store.put_sync_if_absent("k", 4i64)?,
            SaveOutcome::KeyAlreadyExists
        );
        backend.set_fail_commits(false);
        Ok(())
    })
}

#[test]
fn test_put_sync_reports_failed_commit() -> anyhow::Result<()> {
    for_each_store(|mode, backend, store| {
        store.put("k", "old".to_string())?;

        backend.set_fail_commits(true);
        assert!(!store.put_sync("k", "new".to_string())?, "{mode}");
        assert!(!store.put_object_sync("obj", &sample_profile())?, "{mode}");
        assert!(!store.remove_sync("k"));
        backend.set_fail_commits(false);

        assert_eq!(store.get("k", String::new())?, "old");
        assert!(store.put_sync("k", "new".to_string())?);
        assert_eq!(store.get("k", String::new())?, "new");
        Ok(())
    })
}

#[test]
fn test_get_and_remove() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("token", "abc".to_string())?;
        assert_eq!(store.get_and_remove("token", String::new())?, "abc");
        assert!(!store.is_key_present("token")?);
        assert_eq!(store.get("token", "gone".to_string())?, "gone");

        // Absent key: default comes back and nothing fails.
        assert_eq!(store.get_and_remove("token", 9i32)?, 9);
        Ok(())
    })
}

#[test]
fn test_get_and_remove_structured() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("p", Json(sample_profile()))?;
        let Json(profile) = store.get_and_remove("p", Json(sample_profile()))?;
        assert_eq!(profile, sample_profile());
        assert!(!store.is_key_present("p")?);
        Ok(())
    })
}

#[test]
fn test_wrong_kind_is_type_mismatch() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("k", 5i32)?;

        let err = store.get("k", 0i64).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: ValueKind::Long,
                found: ValueKind::Int,
                ..
            }
        ));
        assert!(store.get("k", String::new()).unwrap_err().is_type_mismatch());
        assert!(store.get("k", 0.0f32).unwrap_err().is_type_mismatch());

        // The value is untouched.
        assert_eq!(store.get("k", 0i32)?, 5);
        Ok(())
    })
}

#[test]
fn test_structured_object_roundtrip() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        let profile = sample_profile();
        assert!(store.put_object_sync("profile", &profile)?);

        let default = Profile {
            name: String::new(),
            age: 0,
            tags: Vec::new(),
            scores: Default::default(),
        };
        assert_eq!(store.get_object("profile", default)?, profile);
        Ok(())
    })
}

#[test]
fn test_structured_collections() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put_list("array", &["a", "b", "c"])?;
        assert_eq!(
            store.get_list::<String>("array", Vec::new())?,
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );

        let profiles = vec![sample_profile(), sample_profile()];
        assert!(store.put_list_sync("profiles", &profiles)?);
        assert_eq!(store.get_list::<Profile>("profiles", Vec::new())?, profiles);

        let mut map = HashMap::new();
        map.insert("x".to_string(), vec![1u32, 2]);
        map.insert("y".to_string(), Vec::new());
        store.put_map("map", &map)?;
        assert_eq!(store.get_map::<Vec<u32>>("map", HashMap::new())?, map);

        let ordered: BTreeSet<String> = ["z", "a"].iter().map(|s| s.to_string()).collect();
        store.put("ordered", Json(ordered.clone()))?;
        assert_eq!(store.get("ordered", Json(BTreeSet::<String>::new()))?.0, ordered);
        Ok(())
    })
}

#[test]
fn test_empty_list_roundtrips_as_empty_list() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        // `[]` is not empty text, so the stored empty list wins over the default.
        store.put_list::<i32>("list", &[])?;
        assert_eq!(store.get("list", String::new())?, "[]");
        assert_eq!(store.get_list("list", vec![99])?, Vec::<i32>::new());
        Ok(())
    })
}

#[test]
fn test_array_roundtrip() -> anyhow::Result<()> {
    for_each_store(|mode, backend, store| {
        let profiles = [sample_profile(), sample_profile()];
        store.put_array("profiles", &profiles)?;
        assert_eq!(store.get_array::<Profile>("profiles", &[])?, profiles.to_vec(), "{mode}");

        assert!(store.put_array_sync("scores", &[1.5f64, -0.0, 3.25])?);
        assert_eq!(store.get_array("scores", &[0.0f64])?, vec![1.5, -0.0, 3.25]);

        // Absent and empty-string keys fall back to the default array.
        assert_eq!(store.get_array("missing", &[7u8, 8])?, vec![7, 8]);
        store.put("blank", String::new())?;
        assert_eq!(store.get_array("blank", &[7u8])?, vec![7]);

        backend.set_fail_commits(true);
        assert!(!store.put_array_sync("scores", &[9.0f64])?);
        backend.set_fail_commits(false);
        assert_eq!(store.get_array("scores", &[0.0f64])?, vec![1.5, -0.0, 3.25]);
        Ok(())
    })
}

#[test]
fn test_empty_array_roundtrips_as_empty_array() -> anyhow::Result<()> {
    for_each_store(|mode, _, store| {
        store.put_array::<String>("tags", &[])?;
        assert_eq!(store.get("tags", String::new())?, "[]", "{mode}");
        assert_eq!(
            store.get_array("tags", &["fallback".to_string()])?,
            Vec::<String>::new()
        );

        assert!(store.put_array_sync::<i32>("tags", &[])?);
        assert!(store.get_array("tags", &[1i32])?.is_empty());
        Ok(())
    })
}

#[test]
fn test_empty_string_reads_as_absent_for_structured_values() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        // Preserved quirk: an empty stored string is indistinguishable from a
        // missing key for structured reads.
        store.put("list", String::new())?;
        assert!(store.is_key_present("list")?);
        assert_eq!(store.get_list("list", vec![99])?, vec![99]);
        assert_eq!(store.get_object("list", sample_profile())?, sample_profile());

        // Plain string reads still see the empty string.
        assert_eq!(store.get("list", "default".to_string())?, "");
        Ok(())
    })
}

#[test]
fn test_malformed_json_is_an_error() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("p", "{not json".to_string())?;
        assert!(store.get_object("p", sample_profile()).unwrap_err().is_json());

        store.put("p", "[1, 2]".to_string())?;
        assert!(store.get_object("p", sample_profile()).unwrap_err().is_json());
        Ok(())
    })
}

#[test]
fn test_structured_value_on_non_string_kind() -> anyhow::Result<()> {
    for_each_store(|_, _, store| {
        store.put("n", 1i32)?;
        assert!(
            store
                .get_list::<i32>("n", Vec::new())
                .unwrap_err()
                .is_type_mismatch()
        );
        Ok(())
    })
}

#[test]
fn test_keys_and_clear() -> anyhow::Result<()> {
    for_each_store(|mode, _, store| {
        store.put("b", 1i32)?;
        store.put("a", true)?;
        store.put_object("c", &sample_profile())?;
        assert_eq!(store.keys()?, vec!["a", "b", "c"], "{mode}");

        store.clear()?;
        assert!(store.keys()?.is_empty(), "{mode}");
        assert!(!store.is_key_present("a")?);

        // The store keeps working after a clear.
        store.put("a", 2i32)?;
        assert_eq!(store.get("a", 0i32)?, 2);
        Ok(())
    })
}

use serde_json::json;

use super::*;
use crate::attributes::{encode_settings, AttributeError, AttributeSet, MassSpecAttrs, Settings};

fn group_text(pairs: &[(&str, serde_json::Value)]) -> String {
    let mut settings = Settings::new();
    for (k, v) in pairs {
        settings.insert(k.to_string(), v.clone());
    }
    encode_settings(&settings).unwrap()
}

fn legacy_scan() -> ScanAttributes {
    let mut raw = AttributeSet::new();
    raw.insert(
        "MassSpecAttrs".into(),
        group_text(&[
            ("polarity", json!(-1)),
            ("rt", json!(3.2)),
            ("tic", json!(5.0e8)),
            ("baselise_noise", json!(12.5)),
            ("baselise_noise_std", json!(1.5)),
        ]),
    );
    ScanAttributes {
        scan: "0".into(),
        raw_profile: Some(raw),
        scan_group: AttributeSet::new(),
    }
}

#[test]
fn test_raw_profile_with_misspelled_key() {
    let resolver = CompatResolver::default();
    let scan = legacy_scan();
    let value = resolver.resolve(&scan, "MassSpecAttrs", "baseline_noise").unwrap();
    assert_eq!(value, json!(12.5));

    let attrs = resolver.mass_spec_attrs(&scan).unwrap();
    assert_eq!(attrs.polarity, -1);
    assert_eq!(attrs.baseline_noise, 12.5);
    assert_eq!(attrs.baseline_noise_std, 1.5);
    assert_eq!(attrs.a_term, None);
}

#[test]
fn test_scan_group_layout() {
    let mut group = AttributeSet::new();
    let attrs = MassSpecAttrs {
        rt: 1.0,
        ..Default::default()
    };
    group.insert(
        "MassSpecAttrs".into(),
        encode_settings(&attrs.to_settings().unwrap()).unwrap(),
    );
    let scan = ScanAttributes {
        scan: "4".into(),
        raw_profile: Some(AttributeSet::new()),
        scan_group: group,
    };
    let resolver = CompatResolver::default();
    let (source, _) = resolver.resolve_group(&scan, "MassSpecAttrs").unwrap();
    assert_eq!(source, AttributeSource::ScanGroup);
    assert_eq!(resolver.mass_spec_attrs(&scan).unwrap(), attrs);
}

#[test]
fn test_raw_profile_wins_over_scan_group() {
    let mut scan = legacy_scan();
    scan.scan_group
        .insert("MassSpecAttrs".into(), group_text(&[("rt", json!(99.0))]));
    let resolver = CompatResolver::default();
    assert_eq!(
        resolver.resolve(&scan, "MassSpecAttrs", "rt").unwrap(),
        json!(3.2)
    );
    // found group is final even when the key is missing there
    let err = resolver.resolve(&scan, "MassSpecAttrs", "Aterm").unwrap_err();
    assert!(matches!(err, AttributeError::MissingAttribute { .. }));
}

#[test]
fn test_missing_group_reports_scan_group_and_key() {
    let resolver = CompatResolver::default();
    let err = resolver
        .resolve(&legacy_scan(), "TransientSetting", "number_data_points")
        .unwrap_err();
    match err {
        AttributeError::MissingAttribute { scan, group, key } => {
            assert_eq!(scan, "0");
            assert_eq!(group, "TransientSetting");
            assert_eq!(key, "number_data_points");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(resolver.group(&legacy_scan(), "TransientSetting").unwrap().is_none());
}

#[test]
fn test_rename_applies_once() {
    let rename = KeyRename::new("baseline", "baselise");
    assert_eq!(rename.apply("baseline_noise").as_deref(), Some("baselise_noise"));
    assert_eq!(rename.apply("rt"), None);
}

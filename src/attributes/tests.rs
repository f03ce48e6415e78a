use super::*;
use chrono::TimeZone;
use serde_json::{json, Value};

fn sample_settings() -> Settings {
    let mut settings = Settings::new();
    settings.insert("z_key".into(), json!(1));
    settings.insert("a_key".into(), json!({"nested_b": 2, "nested_a": [1, 2]}));
    settings.insert("min_ppm_error".into(), json!(-1.5));
    settings
}

#[test]
fn test_encode_is_sorted_and_indented() {
    let text = encode_settings(&sample_settings()).unwrap();
    let a = text.find("\"a_key\"").unwrap();
    let m = text.find("\"min_ppm_error\"").unwrap();
    let z = text.find("\"z_key\"").unwrap();
    assert!(a < m && m < z);
    assert!(text.find("\"nested_a\"").unwrap() < text.find("\"nested_b\"").unwrap());
    assert!(text.contains("\n    \"a_key\""));
}

#[test]
fn test_encode_is_deterministic() {
    let first = encode_settings(&sample_settings()).unwrap();
    let second = encode_settings(&sample_settings()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_decode_roundtrip() {
    let text = encode_settings(&sample_settings()).unwrap();
    let decoded = decode_settings("MoleculaSearchSetting", &text).unwrap();
    assert_eq!(decoded, sample_settings());
}

#[test]
fn test_missing_group_is_empty() {
    let attrs = AttributeSet::new();
    assert!(read_group(&attrs, "MassSpecPeakSetting").unwrap().is_empty());
    assert!(read_group_key(&attrs, "MassSpecPeakSetting", "x")
        .unwrap()
        .is_none());
}

#[test]
fn test_sub_key_lookup() {
    let mut attrs = AttributeSet::new();
    write_group(&mut attrs, "MoleculaSearchSetting", &sample_settings()).unwrap();
    let value = read_group_key(&attrs, "MoleculaSearchSetting", "min_ppm_error").unwrap();
    assert_eq!(value, Some(json!(-1.5)));
}

#[test]
fn test_non_object_group_rejected() {
    let err = decode_settings("MassSpecAttrs", "[1, 2]").unwrap_err();
    assert!(matches!(err, AttributeError::NotAnObject { .. }));
    assert!(decode_settings("MassSpecAttrs", "null").unwrap().is_empty());
}

#[test]
fn test_mass_spec_attrs_keys() {
    let attrs = MassSpecAttrs {
        polarity: -1,
        rt: 12.5,
        tic: 1.0e9,
        a_term: Some(1.5),
        baseline_noise: 10.0,
        baseline_noise_std: 2.0,
        ..Default::default()
    };
    let map = attrs.to_settings().unwrap();
    assert_eq!(map.get("Aterm"), Some(&json!(1.5)));
    assert_eq!(map.get("Bterm"), Some(&Value::Null));
    assert_eq!(map.get("polarity"), Some(&json!(-1)));
    assert_eq!(MassSpecAttrs::from_settings(map).unwrap(), attrs);
}

#[test]
fn test_mass_spec_attrs_required_key() {
    let mut map = MassSpecAttrs::default().to_settings().unwrap();
    map.remove("tic");
    let err = MassSpecAttrs::from_settings(map).unwrap_err();
    assert!(matches!(err, AttributeError::InvalidAttribute { key, .. } if key == "tic"));
}

#[test]
fn test_mass_spec_attrs_non_finite() {
    let attrs = MassSpecAttrs {
        baseline_noise: f64::NAN,
        ..Default::default()
    };
    let err = attrs.to_settings().unwrap_err();
    assert!(
        matches!(err, AttributeError::InvalidAttribute { ref key, .. } if key == "baseline_noise")
    );

    let attrs = MassSpecAttrs {
        tic: f64::INFINITY,
        ..Default::default()
    };
    assert!(attrs.check_finite().is_err());

    // optional terms degrade to null and read back as None
    let attrs = MassSpecAttrs {
        a_term: Some(f64::NAN),
        ..Default::default()
    };
    let map = attrs.to_settings().unwrap();
    assert_eq!(map.get("Aterm"), Some(&Value::Null));
    assert_eq!(MassSpecAttrs::from_settings(map).unwrap().a_term, None);
}

#[test]
fn test_mass_spec_attrs_from_lookup_optional() {
    let stored = MassSpecAttrs::default().to_settings().unwrap();
    let attrs = MassSpecAttrs::from_lookup(|key| {
        if MassSpecAttrs::OPTIONAL_KEYS.contains(&key) {
            return Err(AttributeError::MissingAttribute {
                scan: "0".into(),
                group: "MassSpecAttrs".into(),
                key: key.into(),
            });
        }
        Ok(stored.get(key).cloned().unwrap())
    })
    .unwrap();
    assert_eq!(attrs, MassSpecAttrs::default());
}

#[test]
fn test_settings_snapshot_groups() {
    let snapshot = SettingsSnapshot {
        molecular_search: sample_settings(),
        ..Default::default()
    };
    let mut attrs = AttributeSet::new();
    snapshot.write_run_groups(&mut attrs).unwrap();
    assert!(attrs.contains_key("MoleculaSearchSetting"));
    assert!(attrs.contains_key("MassSpecPeakSetting"));
    assert!(!attrs.contains_key("TransientSetting"));
    assert_eq!(SettingsSnapshot::read_run_groups(&attrs).unwrap(), snapshot);
}

#[test]
fn test_date_utc_format() {
    let time = chrono::Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();
    let text = format_date_utc(time);
    assert_eq!(text, "07/03/2024 14:05:09 UTC");
    assert_eq!(parse_date_utc(&text), Some(time));
}

#[test]
fn test_root_attributes() {
    let info = AcquisitionInfo {
        file_name: "run.raw".into(),
        analyzer: "ICR".into(),
        instrument_label: "12T".into(),
        sample_name: "SRFA".into(),
    };
    let time = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let attrs = info.to_root_attributes(time);
    assert_eq!(attrs.get("data_structure").unwrap(), "mass_spectrum");
    assert_eq!(AcquisitionInfo::from_root_attributes(&attrs), info);
}

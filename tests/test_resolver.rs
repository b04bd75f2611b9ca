use sonde_postprocess::{
    formulas::{humidity, stability::gravity},
    postprocess, postprocess_with, resolve, Dataset, DeriveError, OverwritePolicy,
    PostprocessConfig, Resolver, Value, RULES, STATION_LATITUDE,
};

fn scalar(ds: &Dataset, name: &str) -> f64 {
    ds.get(name).and_then(Value::as_scalar).unwrap()
}

fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
    (val1 - val2).abs() < eps
}

#[test]
fn test_relative_humidity_from_specific_humidity() {
    let mut ds = Dataset::new()
        .with_variable("hus", 0.008)
        .with_variable("ta", 290.0)
        .with_variable("p", 90_000.0);

    assert!(resolve(&mut ds, "hur", &[]).unwrap());

    // Every step along the way is kept
    for name in &["w", "esat", "wsat", "hur"] {
        assert!(ds.contains(name), "{}", name);
    }

    let w = humidity::mixing_ratio_from_specific_humidity(0.008);
    let wsat = humidity::saturation_mixing_ratio(90_000.0, 290.0);
    assert!(approx_equal(scalar(&ds, "w"), w, 1.0e-12));
    assert!(approx_equal(scalar(&ds, "wsat"), wsat, 1.0e-12));
    assert!(approx_equal(
        scalar(&ds, "hur"),
        humidity::relative_humidity(w, wsat),
        1.0e-9
    ));
}

#[test]
fn test_relative_humidity_needs_temperature_and_pressure() {
    let mut ds = Dataset::new().with_variable("hus", 0.008);

    assert!(!resolve(&mut ds, "hur", &[]).unwrap());
    assert!(!ds.contains("hur"));
    assert!(!ds.contains("wsat"));

    let mut ds = Dataset::new()
        .with_variable("hus", 0.008)
        .with_variable("ta", 290.0);
    assert!(!resolve(&mut ds, "hur", &[]).unwrap());
    assert!(!ds.contains("hur"));
    assert!(!ds.contains("wsat"));
}

#[test]
fn test_specific_humidity_has_priority() {
    let mut ds = Dataset::new()
        .with_variable("hus", 0.008)
        .with_variable("hur", 20.0)
        .with_variable("wsat", 0.012);

    assert!(resolve(&mut ds, "w", &[]).unwrap());

    let from_hus = humidity::mixing_ratio_from_specific_humidity(0.008);
    let from_hur = humidity::mixing_ratio_from_relative_humidity(20.0, 0.012);
    assert!(!approx_equal(from_hus, from_hur, 1.0e-4));
    assert!(approx_equal(scalar(&ds, "w"), from_hus, 1.0e-12));
}

#[test]
fn test_relative_humidity_used_without_specific_humidity() {
    let mut ds = Dataset::new()
        .with_variable("hur", 20.0)
        .with_variable("wsat", 0.012);

    assert!(resolve(&mut ds, "w", &[]).unwrap());
    assert!(approx_equal(scalar(&ds, "w"), 0.0024, 1.0e-12));
}

#[test]
fn test_deterministic() {
    let initial = Dataset::new()
        .with_variable("p", vec![100_000.0, 90_000.0])
        .with_variable("ta", vec![290.0, 283.0])
        .with_variable("hur", vec![60.0, 55.0]);

    let mut first = initial.clone();
    let mut second = initial.clone();
    assert!(resolve(&mut first, "td", &[]).unwrap());
    assert!(resolve(&mut second, "td", &[]).unwrap());

    assert_eq!(first.get("td"), second.get("td"));
    assert_eq!(first.len(), second.len());
}

#[test]
fn test_cycles_fail_cleanly() {
    // Wind speed needs components which need wind speed
    let mut ds = Dataset::new().with_variable("wdd", 270.0);
    assert!(!resolve(&mut ds, "ua", &[]).unwrap());
    assert!(!resolve(&mut ds, "wds", &[]).unwrap());
    assert_eq!(ds.len(), 1);

    // Same for height and geopotential height. Sources are tried in order, so gravity is never
    // reached once the first source is cut.
    let mut ds = Dataset::new().with_variable(STATION_LATITUDE, 45.0);
    assert!(!resolve(&mut ds, "z", &[]).unwrap());
    assert!(!resolve(&mut ds, "zg", &[]).unwrap());
    assert!(!ds.contains("z"));
    assert!(!ds.contains("zg"));
    assert!(!ds.contains("g"));

    // Having gravity does not break the cycle
    assert!(resolve(&mut ds, "g", &[]).unwrap());
    assert!(!resolve(&mut ds, "z", &[]).unwrap());
    assert!(!resolve(&mut ds, "zg", &[]).unwrap());
    assert_eq!(ds.len(), 2);
}

#[test]
fn test_unknown_variable() {
    let mut ds = Dataset::new().with_variable("ta", 290.0);

    assert!(!resolve(&mut ds, "not_a_variable", &[]).unwrap());
    assert_eq!(ds.len(), 1);
}

#[test]
fn test_chain_blocks_sources() {
    let mut ds = Dataset::new()
        .with_variable("ta", 290.0)
        .with_variable("p", 90_000.0)
        .with_variable("hus", 0.008);

    // As if called while already resolving w
    assert!(!resolve(&mut ds, "hur", &["w"]).unwrap());
    assert!(!ds.contains("hur"));
    assert!(!ds.contains("w"));
}

#[test]
fn test_multiple_outputs_written_together() {
    let zg: Vec<f64> = (0..=20).map(|i| f64::from(i) * 200.0).collect();
    let p: Vec<f64> = zg.iter().map(|z| 100_000.0 * (-z / 8_000.0).exp()).collect();
    let theta_v: Vec<f64> = zg.iter().map(|z| 295.0 + 0.004 * z).collect();

    let mut ds = Dataset::new()
        .with_variable("zg", zg)
        .with_variable("p", p)
        .with_variable("theta_v", theta_v)
        .with_variable(STATION_LATITUDE, 45.0);

    assert!(resolve(&mut ds, "bvf", &[]).unwrap());

    let n = ds.get("bvf").unwrap().profile_len();
    assert!(n.unwrap() > 0);
    assert_eq!(ds.get("p_bvf").unwrap().profile_len(), n);
    assert_eq!(ds.get("zg_bvf").unwrap().profile_len(), n);
}

#[test]
fn test_undefined_inputs_still_resolve() {
    let mut ds = Dataset::new().with_variable("e", Value::undefined());

    assert!(resolve(&mut ds, "td", &[]).unwrap());
    assert!(ds.get("td").unwrap().is_undefined());
}

#[test]
fn test_inconsistent_profiles_are_an_error() {
    let mut ds = Dataset::new()
        .with_variable("p", vec![100_000.0, 90_000.0, 80_000.0])
        .with_variable("w", vec![0.008, 0.006]);

    assert_eq!(
        resolve(&mut ds, "e", &[]).unwrap_err(),
        DeriveError::ShapeMismatch {
            expected: 3,
            found: 2
        }
    );
    assert!(!ds.contains("e"));
}

#[test]
fn test_failure_memo_matches_plain_resolver() {
    let initial = Dataset::new()
        .with_variable("ta", 290.0)
        .with_variable("wdd", 270.0);

    for target in &["hur", "ua", "tv", "esat"] {
        let mut plain = initial.clone();
        let mut memo = initial.clone();
        let mut memo_resolver = Resolver::new(RULES).with_failure_memo();

        assert_eq!(
            Resolver::new(RULES).resolve(&mut plain, target).unwrap(),
            memo_resolver.resolve(&mut memo, target).unwrap(),
            "{}",
            target
        );
        assert_eq!(plain.len(), memo.len(), "{}", target);
    }
}

#[test]
fn test_fallback_latitude_scoping() {
    let mut ds = Dataset::new().with_variable("zg", vec![0.0, 1_000.0, 2_000.0]);
    postprocess(&mut ds).unwrap();

    assert!(!ds.contains(STATION_LATITUDE));
    assert!(approx_equal(scalar(&ds, "g"), gravity(45.0), 1.0e-12));

    // Gravity at 45 degrees is close to standard gravity
    let z = ds.get("z").unwrap().as_profile().unwrap();
    assert_eq!(z.len(), 3);
    assert!(z[2].unpack() > 1_990.0 && z[2].unpack() < 2_010.0);
}

#[test]
fn test_preserve_existing_policy() {
    let initial = Dataset::new()
        .with_variable("hus", 0.008)
        .with_variable("w", 0.5);

    // hus comes before w in the table, so it is rebuilt from the present w first
    let mut recomputed = initial.clone();
    postprocess(&mut recomputed).unwrap();
    assert!(approx_equal(
        scalar(&recomputed, "hus"),
        humidity::specific_humidity(0.5),
        1.0e-12
    ));
    assert!(approx_equal(scalar(&recomputed, "hus"), 1.0 / 3.0, 1.0e-12));
    assert!(approx_equal(scalar(&recomputed, "w"), 0.5, 1.0e-12));

    let mut preserved = initial.clone();
    let config = PostprocessConfig::new().with_overwrite(OverwritePolicy::PreserveExisting);
    postprocess_with(&mut preserved, &config, RULES).unwrap();
    assert_eq!(scalar(&preserved, "hus"), 0.008);
    assert_eq!(scalar(&preserved, "w"), 0.5);
}

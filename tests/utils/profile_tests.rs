use sonde_postprocess::{
    profile::{prof, ProfileConfig},
    surface::{merge_surface, SurfaceConfig},
    Dataset, Direction,
};

use super::{approx_equal, scalar, valid};

pub fn test_levels_and_means(pts: &Dataset) {
    let profile = prof(pts, &ProfileConfig::new()).unwrap();

    let p = valid(&profile, "p");
    assert!(p.len() > 100);
    assert_eq!(p[0], 100_250.0);
    // Highest to lowest pressure, evenly spaced
    for pair in p.windows(2) {
        assert!(approx_equal(pair[0] - pair[1], 500.0, 1.0e-9));
    }

    for &name in &["z", "ta", "hur", "lat", "lon", "time"] {
        assert_eq!(
            profile.get(name).unwrap().profile_len(),
            Some(p.len()),
            "{}",
            name
        );
    }

    // Heights increase up the profile
    let z = valid(&profile, "z");
    assert!(z.windows(2).all(|pair| pair[1] > pair[0]));
    assert!(approx_equal(z[0], 70.0, 1.0e-9));
}

pub fn test_drift_wind(pts: &Dataset) {
    let profile = prof(pts, &ProfileConfig::new()).unwrap();

    let wdd = valid(&profile, "wdd");
    let wds = valid(&profile, "wds");
    assert!(wdd.len() > 100);
    assert_eq!(wdd.len(), wds.len());

    // The balloon drifts east in a westerly wind of 8 to 25 m/s
    let westerly = wdd
        .iter()
        .zip(&wds)
        .filter(|&(&dir, &spd)| approx_equal(dir, 270.0, 1.0) && spd > 7.0 && spd < 26.0)
        .count();
    assert!(westerly as f64 > 0.9 * wdd.len() as f64);

    assert!(wds.iter().all(|&spd| spd >= 0.0));
    assert!(wdd.iter().all(|&dir| (0.0..360.0).contains(&dir)));
}

pub fn test_descending_leg(pts: &Dataset) {
    let up = prof(pts, &ProfileConfig::new()).unwrap();
    let down = prof(
        pts,
        &ProfileConfig::new().with_direction(Direction::Descending),
    )
    .unwrap();

    // Same levels, different points
    assert_eq!(up.get("p"), down.get("p"));

    let ta_up = valid(&up, "ta");
    let ta_down = valid(&down, "ta");
    assert!(ta_down.len() > 10);
    assert!(ta_down.len() < ta_up.len() / 2);

    // The descent never gets near the ground
    assert!(down.get("ta").unwrap().at(0).is_none());
}

pub fn test_surface_merge(pts: &Dataset, sfc: &Dataset) {
    let mut profile = prof(pts, &ProfileConfig::new()).unwrap();

    assert!(merge_surface(&mut profile, sfc, &SurfaceConfig::new()).unwrap());
    assert_eq!(scalar(&profile, "ps"), 100_480.0);
    assert_eq!(scalar(&profile, "tas"), 289.9);
    assert_eq!(scalar(&profile, "hurs"), 78.0);
    assert_eq!(scalar(&profile, "ts"), 292.3);
    assert!(!profile.contains("uas"));
}

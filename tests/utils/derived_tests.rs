use itertools::izip;
use sonde_postprocess::{
    formulas::{humidity, stability::gravity, wind},
    rules::declared_targets,
    Dataset, RULES, STATION_LATITUDE,
};

use super::{approx_equal, scalar, valid};

pub fn test_everything_derivable_is_present(profile: &Dataset) {
    for target in declared_targets(RULES) {
        assert!(profile.contains(target), "{}", target);
    }
}

pub fn test_humidity(profile: &Dataset) {
    let ta = profile.get("ta").unwrap().as_profile().unwrap();
    let td = profile.get("td").unwrap().as_profile().unwrap();
    let hur = profile.get("hur").unwrap().as_profile().unwrap();
    let w = profile.get("w").unwrap().as_profile().unwrap();
    let hus = profile.get("hus").unwrap().as_profile().unwrap();

    let mut checked = 0;
    for (ta, td, hur, w, hus) in izip!(ta, td, hur, w, hus) {
        if let (Some(ta), Some(td), Some(hur), Some(w), Some(hus)) = (
            ta.into_option(),
            td.into_option(),
            hur.into_option(),
            w.into_option(),
            hus.into_option(),
        ) {
            assert!(td <= ta);
            assert!(hur > 0.0 && hur <= 100.0);
            assert!(hus < w);
            checked += 1;
        }
    }
    assert!(checked > 100);

    // Mixing ratio and vapor pressure agree
    let p = scalar(profile, "ps");
    let ws = scalar(profile, "ws");
    let es = scalar(profile, "es");
    assert!(approx_equal(humidity::vapor_pressure(p, ws), es, 1.0e-6));
    assert!(approx_equal(scalar(profile, "hurs"), 78.0, 1.0e-9));
}

pub fn test_temperatures(profile: &Dataset) {
    let theta = valid(profile, "theta");

    // Stable profile, potential temperature grows with height
    assert!(theta.last().unwrap() > theta.first().unwrap());

    let ta = profile.get("ta").unwrap().as_profile().unwrap();
    let tv = profile.get("tv").unwrap().as_profile().unwrap();
    let theta = profile.get("theta").unwrap().as_profile().unwrap();
    let theta_v = profile.get("theta_v").unwrap().as_profile().unwrap();

    let mut checked = 0;
    for (ta, tv, theta, theta_v) in izip!(ta, tv, theta, theta_v) {
        if let (Some(ta), Some(tv), Some(theta), Some(theta_v)) = (
            ta.into_option(),
            tv.into_option(),
            theta.into_option(),
            theta_v.into_option(),
        ) {
            assert!(tv >= ta);
            assert!(theta_v >= theta);
            checked += 1;
        }
    }
    assert!(checked > 100);

    // Parcels cool on the way up, the dry one fastest
    let ta_par = valid(profile, "ta_par");
    let ta_par_sat = valid(profile, "ta_par_sat");
    assert!(ta_par.windows(2).all(|pair| pair[1] < pair[0]));
    assert!(ta_par_sat.last().unwrap() > ta_par.last().unwrap());
    let expected = scalar(profile, "tas") * (100_250.0_f64 / 100_480.0).powf(0.2853);
    assert!(approx_equal(ta_par[0], expected, 0.01));

    let ta_surf_par = valid(profile, "ta_surf_par");
    assert!(ta_surf_par[0] > ta_par[0]);
}

pub fn test_condensation_levels(profile: &Dataset) {
    let ps = scalar(profile, "ps");

    let p_lcl = scalar(profile, "p_lcl");
    assert!(p_lcl < ps && p_lcl > 85_000.0);
    let zg_lcl = scalar(profile, "zg_lcl");
    assert!(zg_lcl > 200.0 && zg_lcl < 1_500.0);

    let p_ll = scalar(profile, "p_ll");
    assert!(p_ll < ps && p_ll > 80_000.0);
    let zg_ll = scalar(profile, "zg_ll");
    assert!(zg_ll > 300.0 && zg_ll < 2_500.0);
}

pub fn test_stability(profile: &Dataset) {
    let g = scalar(profile, "g");
    assert!(approx_equal(g, gravity(45.0), 1.0e-12));
    assert!(approx_equal(scalar(profile, "gamma"), g / 1006.0, 1.0e-12));

    let bvf = valid(profile, "bvf");
    assert!(bvf.len() > 20);
    assert!(bvf.iter().all(|&n| n > 0.0 && n < 0.05));

    let zg_bvf = valid(profile, "zg_bvf");
    assert!(zg_bvf
        .windows(2)
        .all(|pair| approx_equal(pair[1] - pair[0], 400.0, 1.0e-6)));

    // Above the tropopause the isothermal layer is much more stable
    let top = bvf[bvf.len() - 2];
    assert!(top > bvf[2]);
}

pub fn test_winds(profile: &Dataset) {
    let wdd = profile.get("wdd").unwrap().as_profile().unwrap();
    let wds = profile.get("wds").unwrap().as_profile().unwrap();
    let ua = profile.get("ua").unwrap().as_profile().unwrap();
    let va = profile.get("va").unwrap().as_profile().unwrap();

    for (wdd, wds, ua, va) in izip!(wdd, wds, ua, va) {
        assert_eq!(wdd.is_some(), ua.is_some());
        if let (Some(wdd), Some(wds), Some(ua), Some(va)) = (
            wdd.into_option(),
            wds.into_option(),
            ua.into_option(),
            va.into_option(),
        ) {
            let (u, v) = wind::components(wds, wdd);
            assert!(approx_equal(u, ua, 1.0e-6));
            assert!(approx_equal(v, va, 1.0e-6));
        }
    }

    let (u, v) = wind::components(6.0, 265.0);
    assert!(approx_equal(scalar(profile, "uas"), u, 1.0e-9));
    assert!(approx_equal(scalar(profile, "vas"), v, 1.0e-9));
    assert!(scalar(profile, "uas") > 5.9);
}

pub fn test_station_latitude_not_leaked(profile: &Dataset) {
    assert!(!profile.contains(STATION_LATITUDE));


    // The balloon positions are not the station, gravity comes from the fallback
    assert!(valid(profile, "lat").iter().all(|&lat| approx_equal(lat, 50.0, 1.0e-6)));
    assert!(approx_equal(scalar(profile, "g"), gravity(45.0), 1.0e-12));
}

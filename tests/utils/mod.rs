use std::{fs::File, io::Read, path::PathBuf, str::FromStr};

use sonde_postprocess::{Dataset, Value};

pub mod derived_tests;
pub mod profile_tests;

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_mod_name:ident, $points:expr, $surface:expr) => {
        mod $test_mod_name {

            use sonde_postprocess::Dataset;

            use crate::utils;

            fn load_data() -> (Dataset, Dataset) {
                (utils::load_test_file($points), utils::load_test_file($surface))
            }

            mod profile {
                use super::load_data;
                use crate::utils::profile_tests;

                #[test]
                fn levels_and_means() {
                    let (pts, _) = load_data();
                    profile_tests::test_levels_and_means(&pts);
                }

                #[test]
                fn drift_wind() {
                    let (pts, _) = load_data();
                    profile_tests::test_drift_wind(&pts);
                }

                #[test]
                fn descending_leg() {
                    let (pts, _) = load_data();
                    profile_tests::test_descending_leg(&pts);
                }

                #[test]
                fn surface_merge() {
                    let (pts, sfc) = load_data();
                    profile_tests::test_surface_merge(&pts, &sfc);
                }
            }

            mod derived {
                use super::load_data;
                use crate::utils::{derived_tests, full_profile};

                #[test]
                fn everything_derivable_is_present() {
                    let (pts, sfc) = load_data();
                    derived_tests::test_everything_derivable_is_present(&full_profile(&pts, &sfc));
                }

                #[test]
                fn humidity() {
                    let (pts, sfc) = load_data();
                    derived_tests::test_humidity(&full_profile(&pts, &sfc));
                }

                #[test]
                fn temperatures() {
                    let (pts, sfc) = load_data();
                    derived_tests::test_temperatures(&full_profile(&pts, &sfc));
                }

                #[test]
                fn condensation_levels() {
                    let (pts, sfc) = load_data();
                    derived_tests::test_condensation_levels(&full_profile(&pts, &sfc));
                }

                #[test]
                fn stability() {
                    let (pts, sfc) = load_data();
                    derived_tests::test_stability(&full_profile(&pts, &sfc));
                }

                #[test]
                fn winds() {
                    let (pts, sfc) = load_data();
                    derived_tests::test_winds(&full_profile(&pts, &sfc));
                }

                #[test]
                fn station_latitude_not_leaked() {
                    let (pts, sfc) = load_data();
                    derived_tests::test_station_latitude_not_leaked(&full_profile(&pts, &sfc));
                }
            }
        }
    };
}

#[allow(unused_macros)] // False alarm
macro_rules! check_file_complete {
    ($test_name:ident, $fname:expr, [$($column:expr),+]) => {
        #[test]
        fn $test_name() {
            let ds = crate::utils::load_test_file($fname);
            let len = ds.get("time").and_then(|v| v.profile_len()).unwrap();
            assert!(len > 0);

            $(
                let column = ds.get($column).expect($column);
                assert_eq!(column.profile_len(), Some(len), "{}", $column);
            )+
        }
    };
}

/// Load a CSV file from the test data directory into a dataset, one profile per column.
///
/// Empty fields are missing values.
pub fn load_test_file(fname: &str) -> Dataset {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    load_test_csv(&test_path)
}

fn load_test_csv(location: &PathBuf) -> Dataset {
    let mut f = File::open(location).expect(&format!("Error opening file: {:#?}", location));

    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .expect(&format!("Error reading file: {:#?}", location));

    let mut lines = contents.lines().filter(|line| !line.trim().is_empty());
    let names: Vec<&str> = lines
        .next()
        .expect("Missing header line")
        .split(',')
        .map(str::trim)
        .collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for line in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        assert_eq!(fields.len(), names.len(), "Bad line: {}", line);

        for (col, field) in columns.iter_mut().zip(fields) {
            let val = if field.is_empty() {
                std::f64::NAN
            } else {
                f64::from_str(field).expect(&format!("Bad number: {}", field))
            };
            col.push(val);
        }
    }

    names
        .into_iter()
        .zip(columns)
        .fold(Dataset::new(), |ds, (name, col)| {
            ds.with_variable(name, Value::profile(col))
        })
}

/// Points to profile, surface merged in and everything derived, the way a conversion job does it.
#[allow(dead_code)]
pub fn full_profile(pts: &Dataset, sfc: &Dataset) -> Dataset {
    use sonde_postprocess::{
        postprocess,
        profile::{prof, ProfileConfig},
        surface::{merge_surface, SurfaceConfig},
    };

    let mut profile = prof(pts, &ProfileConfig::new()).expect("Error building profile");
    assert!(merge_surface(&mut profile, sfc, &SurfaceConfig::new())
        .expect("Error merging surface"));
    postprocess(&mut profile).expect("Error in postprocess");
    profile
}

/// Valid values of a profile variable, panicking if it is missing.
#[allow(dead_code)]
pub fn valid(ds: &Dataset, name: &str) -> Vec<f64> {
    ds.get(name)
        .expect(&format!("Missing variable {}", name))
        .valid_values()
        .collect()
}

/// A scalar variable, panicking if it is missing or undefined.
#[allow(dead_code)]
pub fn scalar(ds: &Dataset, name: &str) -> f64 {
    ds.get(name)
        .and_then(Value::as_scalar)
        .expect(&format!("Missing scalar {}", name))
}

#[allow(dead_code)]
pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
    (val1 - val2).abs() < eps
}

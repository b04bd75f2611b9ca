use sonde_postprocess::{
    profile::{prof, ProfileConfig},
    surface::{merge_surface, SurfaceConfig},
    Dataset, Value,
};
use std::{fs::File, io::Read, path::PathBuf, str::FromStr};

/// Radiosonde points and surface records.
pub fn load_test_files() -> (Dataset, Dataset) {
    (load_test_file("ascent.csv"), load_test_file("surface.csv"))
}

/// A binned profile with the surface merged in, ready for postprocessing.
#[allow(dead_code)]
pub fn load_profile() -> Dataset {
    let (pts, sfc) = load_test_files();

    let mut profile = prof(&pts, &ProfileConfig::new()).expect("Error building profile");
    merge_surface(&mut profile, &sfc, &SurfaceConfig::new()).expect("Error merging surface");
    profile
}

fn load_test_file(fname: &str) -> Dataset {
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
        for (col, field) in columns.iter_mut().zip(line.split(',').map(str::trim)) {
            col.push(f64::from_str(field).unwrap_or(std::f64::NAN));
        }
    }

    names
        .into_iter()
        .zip(columns)
        .fold(Dataset::new(), |ds, (name, col)| {
            ds.with_variable(name, Value::profile(col))
        })
}

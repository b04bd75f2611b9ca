//! Standard descriptive metadata for profile variables.
//!
//! The resolver never reads these; they ride along with the dataset for whatever writes it out.
use crate::dataset::{Attributes, Dataset};

struct Header {
    name: &'static str,
    long_name: &'static str,
    standard_name: Option<&'static str>,
    units: &'static str,
    dims: &'static [&'static str],
    extra: &'static [(&'static str, &'static str)],
}

const fn header(
    name: &'static str,
    long_name: &'static str,
    standard_name: Option<&'static str>,
    units: &'static str,
    dims: &'static [&'static str],
) -> Header {
    Header {
        name,
        long_name,
        standard_name,
        units,
        dims,
        extra: &[],
    }
}

const fn with_extra(h: Header, extra: &'static [(&'static str, &'static str)]) -> Header {
    Header { extra, ..h }
}

const P: &[&str] = &["p"];
const P_BVF: &[&str] = &["p_bvf"];
const SCALAR: &[&str] = &[];

const TIME_UNITS: &str = "days since -4713-11-24 12:00 UTC";
const GREGORIAN: &[(&str, &str)] = &[("calendar", "proleptic_gregorian")];
const STANDARD_PRESSURE: &[(&str, &str)] = &[("comment", "assumed standard pressure 1000 hPa")];

static HEADERS: &[Header] = &[
    header(
        "bvf",
        "brunt vaisala frequency in air",
        Some("brunt_vaisala_frequency_in_air"),
        "s-1",
        P_BVF,
    ),
    header(
        "e",
        "water vapor partial pressure in air",
        Some("water_vapor_partial_pressure_in_air"),
        "Pa",
        P,
    ),
    header(
        "es",
        "near-surface water vapor partial pressure in air",
        Some("water_vapor_partial_pressure_in_air"),
        "Pa",
        SCALAR,
    ),
    header(
        "esat",
        "saturation water vapor partial pressure in air",
        Some("water_vapor_partial_pressure_in_air"),
        "Pa",
        P,
    ),
    header(
        "esats",
        "near-surface saturation water vapor partial pressure in air",
        Some("water_vapor_partial_pressure_in_air"),
        "Pa",
        SCALAR,
    ),
    with_extra(
        header("g", "gravitational acceleration", None, "m s-2", SCALAR),
        &[("comment", "at mean sea level, ignoring height dependence")],
    ),
    with_extra(
        header(
            "gamma",
            "air temperature lapse rate",
            Some("air_temperature_lapse_rate"),
            "K m-1",
            SCALAR,
        ),
        &[
            ("comment", "assuming dry adiabatic process"),
            ("units_metadata", "temperature: difference"),
        ],
    ),
    with_extra(
        header(
            "gamma_sat",
            "air temperature saturation lapse rate",
            Some("air_temperature_lapse_rate"),
            "K m-1",
            P,
        ),
        &[
            ("comment", "assuming moist adiabatic process"),
            ("units_metadata", "temperature: difference"),
        ],
    ),
    header(
        "hur",
        "relative humidity",
        Some("relative_humidity"),
        "%",
        P,
    ),
    header(
        "hurs",
        "near-surface relative humidity",
        Some("relative_humidity"),
        "%",
        SCALAR,
    ),
    header(
        "hus",
        "specific humidity",
        Some("specific_humidity"),
        "1",
        P,
    ),
    header(
        "huss",
        "near-surface specific humidity",
        Some("specific_humidity"),
        "1",
        SCALAR,
    ),
    header("lat", "latitude", Some("latitude"), "degree_north", P),
    header("lon", "longitude", Some("longitude"), "degree_east", P),
    header("p", "pressure", Some("air_pressure"), "Pa", P),
    header(
        "p_bvf",
        "pressure of bvf",
        Some("air_pressure"),
        "Pa",
        P_BVF,
    ),
    header(
        "p_lcl",
        "lifting condensation level pressure",
        Some("air_pressure"),
        "Pa",
        SCALAR,
    ),
    header(
        "p_ll",
        "lifting level pressure",
        Some("air_pressure"),
        "Pa",
        SCALAR,
    ),
    header(
        "ps",
        "surface air pressure",
        Some("surface_air_pressure"),
        "Pa",
        SCALAR,
    ),
    header("rho", "air density", Some("air_density"), "kg m-3", P),
    header("rhod", "dry air density", Some("air_density"), "kg m-3", P),
    header(
        "rhods",
        "near-surface dry air density",
        Some("air_density"),
        "kg m-3",
        SCALAR,
    ),
    header(
        "rhos",
        "near-surface air density",
        Some("air_density"),
        "kg m-3",
        SCALAR,
    ),
    header(
        "rhow",
        "water vapor density",
        Some("air_density"),
        "kg m-3",
        P,
    ),
    header(
        "rhows",
        "near-surface water vapor density",
        Some("air_density"),
        "kg m-3",
        SCALAR,
    ),
    header(
        "station_lat",
        "station latitude",
        Some("latitude"),
        "degree_north",
        SCALAR,
    ),
    header(
        "station_lon",
        "station longitude",
        Some("longitude"),
        "degree_east",
        SCALAR,
    ),
    with_extra(
        header(
            "station_time",
            "station time",
            Some("time"),
            TIME_UNITS,
            SCALAR,
        ),
        GREGORIAN,
    ),
    header(
        "station_z",
        "station altitude",
        Some("height_above_reference_ellipsoid"),
        "m",
        SCALAR,
    ),
    header("ta", "air temperature", Some("air_temperature"), "K", P),
    header(
        "ta_par",
        "dry adiabatic air parcel temperature",
        Some("air_temperature"),
        "K",
        P,
    ),
    header(
        "ta_par_sat",
        "saturation air parcel temperature",
        Some("air_temperature"),
        "K",
        P,
    ),
    header(
        "ta_surf_par",
        "dry adiabatic surface air parcel temperature",
        Some("air_temperature"),
        "K",
        P,
    ),
    header(
        "ta_surf_par_sat",
        "saturation surface air parcel temperature",
        Some("air_temperature"),
        "K",
        P,
    ),
    header(
        "tas",
        "near-surface air temperature",
        Some("air_temperature"),
        "K",
        SCALAR,
    ),
    header(
        "td",
        "dew point temperature",
        Some("dew_point_temperature"),
        "K",
        P,
    ),
    header(
        "tds",
        "near-surface dew point temperature",
        Some("dew_point_temperature"),
        "K",
        SCALAR,
    ),
    header(
        "tv",
        "virtual temperature",
        Some("virtual_temperature"),
        "K",
        P,
    ),
    header(
        "tvs",
        "near-surface virtual temperature",
        Some("virtual_temperature"),
        "K",
        SCALAR,
    ),
    with_extra(
        header(
            "theta",
            "air potential temperature",
            Some("air_potential_temperature"),
            "K",
            P,
        ),
        STANDARD_PRESSURE,
    ),
    with_extra(
        header(
            "theta_v",
            "virtual potential temperature",
            Some("virtual_temperature"),
            "K",
            P,
        ),
        STANDARD_PRESSURE,
    ),
    with_extra(
        header("time", "time", Some("time"), TIME_UNITS, P),
        GREGORIAN,
    ),
    header(
        "ts",
        "surface temperature",
        Some("surface_temperature"),
        "K",
        SCALAR,
    ),
    header("ua", "eastward wind", Some("eastward_wind"), "m s-1", P),
    header(
        "uas",
        "eastward near-surface wind",
        Some("eastward_wind"),
        "m s-1",
        SCALAR,
    ),
    header("va", "northward wind", Some("northward_wind"), "m s-1", P),
    header(
        "vas",
        "northward near-surface wind",
        Some("northward_wind"),
        "m s-1",
        SCALAR,
    ),
    header("w", "humidity mixing ratio", None, "1", P),
    header(
        "wdd",
        "wind from direction",
        Some("wind_from_direction"),
        "degree",
        P,
    ),
    header(
        "wdds",
        "near-surface wind from direction",
        Some("wind_from_direction"),
        "degree",
        SCALAR,
    ),
    header("wds", "wind speed", Some("wind_speed"), "m s-1", P),
    header(
        "wdss",
        "near-surface wind speed",
        Some("wind_speed"),
        "m s-1",
        SCALAR,
    ),
    header(
        "ws",
        "near-surface humidity mixing ratio",
        None,
        "1",
        SCALAR,
    ),
    header("wsat", "saturation humidity mixing ratio", None, "1", P),
    header(
        "wsats",
        "near-surface saturation humidity mixing ratio",
        None,
        "1",
        SCALAR,
    ),
    header(
        "z",
        "altitude",
        Some("height_above_reference_ellipsoid"),
        "m",
        P,
    ),
    header(
        "zg",
        "geopotential height",
        Some("geopotential_height"),
        "m",
        P,
    ),
    header(
        "zg_bvf",
        "geopotential height of bvf",
        Some("geopotential_height"),
        "m",
        P_BVF,
    ),
    header(
        "zg_lcl",
        "lifting condensation level geopotential height",
        Some("geopotential_height"),
        "m",
        SCALAR,
    ),
    header(
        "zg_ll",
        "lifting level geopotential height",
        Some("geopotential_height"),
        "m",
        SCALAR,
    ),
];

impl Header {
    fn attributes(&self) -> Attributes {
        let attrs = Attributes::new()
            .with_long_name(self.long_name)
            .with_units(self.units)
            .with_dims(self.dims);

        let attrs = match self.standard_name {
            Some(name) => attrs.with_standard_name(name),
            None => attrs,
        };

        self.extra
            .iter()
            .fold(attrs, |attrs, &(key, value)| attrs.with_extra(key, value))
    }
}

/// Standard metadata for a known variable.
///
/// # Examples
///
/// ```rust
/// use sonde_postprocess::headers::standard_attributes;
///
/// let hur = standard_attributes("hur").unwrap();
/// assert_eq!(hur.units.as_deref(), Some("%"));
/// assert_eq!(hur.dims, vec!["p".to_owned()]);
///
/// assert!(standard_attributes("not_a_variable").is_none());
/// ```
pub fn standard_attributes(name: &str) -> Option<Attributes> {
    HEADERS
        .iter()
        .find(|h| h.name == name)
        .map(Header::attributes)
}

/// Attach standard metadata to every known variable in the dataset that has none.
///
/// Returns the number of variables annotated.
pub fn annotate(dataset: &mut Dataset) -> usize {
    let missing: Vec<(String, Attributes)> = dataset
        .names()
        .filter(|name| dataset.attributes(name).is_none())
        .filter_map(|name| standard_attributes(name).map(|attrs| (name.to_owned(), attrs)))
        .collect();

    let count = missing.len();
    for (name, attrs) in missing {
        dataset.set_attributes(name, attrs);
    }
    count
}

use super::types::NewSatellite;

/// Satellites every fresh store starts with.
pub fn default_satellites() -> Vec<NewSatellite> {
    [
        (25544, "ISS (ZARYA)", "Space Station", "ISS", "1998-11-20"),
        (28654, "NOAA-18", "Weather", "US", "2005-05-20"),
        (20580, "HUBBLE SPACE TELESCOPE", "Space Telescope", "US", "1990-04-24"),
        (43013, "STARLINK-1007", "Communication", "US", "2019-11-11"),
        (39084, "WORLDVIEW-2", "Earth Resources", "US", "2009-10-08"),
    ]
    .into_iter()
    .map(|(norad_id, name, category, country, launch_date)| NewSatellite {
        norad_id,
        name: name.to_string(),
        category: Some(category.to_string()),
        launch_date: Some(launch_date.to_string()),
        country: Some(country.to_string()),
        is_active: true,
    })
    .collect()
}

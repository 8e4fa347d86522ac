//! Fallback coordinates for developments whose sheet row has none.

use super::text::fold_accents;

/// Geographic centre of Mexico.
pub const DEFAULT_COORDINATES: (f64, f64) = (23.6345, -102.5528);

const CITY_COORDINATES: &[(&str, (f64, f64))] = &[
    ("Ciudad de México", (19.4326, -99.1332)),
    ("CDMX", (19.4326, -99.1332)),
    ("Toluca", (19.2826, -99.6557)),
    ("Puebla", (19.0414, -98.2063)),
    ("Monterrey", (25.6866, -100.3161)),
    ("Chihuahua", (28.6353, -106.0889)),
    ("Torreón", (25.5428, -103.4067)),
    ("León", (21.1250, -101.6860)),
    ("Oaxaca", (17.0732, -96.7266)),
    ("Mérida", (20.9674, -89.5926)),
    ("Villahermosa", (17.9892, -92.9475)),
    ("Querétaro", (20.5888, -100.3899)),
    ("Aguascalientes", (21.8818, -102.2916)),
    ("Guadalajara", (20.6597, -103.3496)),
    ("Tijuana", (32.5149, -117.0382)),
    ("Cancún", (21.1619, -86.8515)),
    ("San Luis Potosí", (22.1565, -100.9855)),
    ("Hermosillo", (29.0729, -110.9559)),
    ("Saltillo", (25.4267, -100.9924)),
    ("Culiacán", (24.8091, -107.3940)),
    ("Morelia", (19.7060, -101.1950)),
    ("Veracruz", (19.1738, -96.1342)),
];

/// Look a city up exactly, then accent/case-insensitively, then by partial
/// match in either direction.
pub fn city_coordinates(city: &str) -> (f64, f64) {
    let city = city.trim();
    if city.is_empty() {
        return DEFAULT_COORDINATES;
    }

    if let Some((_, coords)) = CITY_COORDINATES.iter().find(|(name, _)| *name == city) {
        return *coords;
    }

    let folded = fold_accents(city);
    if let Some((_, coords)) = CITY_COORDINATES
        .iter()
        .find(|(name, _)| fold_accents(name) == folded)
    {
        return *coords;
    }

    CITY_COORDINATES
        .iter()
        .find(|(name, _)| {
            let known = fold_accents(name);
            known.contains(&folded) || folded.contains(&known)
        })
        .map(|(_, coords)| *coords)
        .unwrap_or(DEFAULT_COORDINATES)
}

/// Catalog coordinates win unless missing or `(0, 0)`.
pub fn resolve_coordinates(latitude: Option<f64>, longitude: Option<f64>, city: &str) -> (f64, f64) {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) if !(lat == 0.0 && lon == 0.0) => (lat, lon),
        _ => city_coordinates(city),
    }
}

//! Per-country chart colours.
//!
//! Listed countries get a fixed colour taken from their flag. Anything else
//! is hashed into a fallback palette, so a given name always gets the same
//! colour regardless of the order in which countries are drawn.

use crate::classification::Rgb;

const COUNTRY_COLORS: &[(&str, &str)] = &[
    ("Nigeria", "#009E60"),
    ("Senegal", "#FCD116"),
    ("Burkina Faso", "#7F4E1E"),
    ("Côte d'Ivoire", "#F77F00"),
    ("Mali", "#CE1126"),
    ("Niger", "#45B7D1"),
    ("Chad", "#C60C30"),
    ("Mauritania", "#00A651"),
    ("Gambia", "#D21034"),
    ("Guinea-Bissau", "#E70013"),
    ("Guinea", "#FF6B6B"),
    ("Sierra Leone", "#1EB53A"),
    ("Liberia", "#C41E3A"),
    ("Ghana", "#4ECDC4"),
    ("Togo", "#0066CC"),
    ("Benin", "#96CEB4"),
    ("Cameroon", "#007A5E"),
    ("Central African Republic", "#FFCD00"),
    ("Congo", "#82E0AA"),
    ("Democratic Republic of the Congo", "#007934"),
    ("Gabon", "#3C8D0D"),
    ("Equatorial Guinea", "#006C3A"),
    ("São Tomé and Príncipe", "#CC0000"),
    ("Angola", "#006838"),
    ("Zambia", "#F1948A"),
    ("Malawi", "#009639"),
    ("Mozambique", "#D7BDE2"),
    ("Zimbabwe", "#75C043"),
    ("Botswana", "#003580"),
    ("Namibia", "#007A4D"),
    ("South Africa", "#F7DC6F"),
    ("Eswatini", "#85C1E9"),
    ("Lesotho", "#FC3F1E"),
    ("Madagascar", "#BB8FCE"),
    ("Comoros", "#F8C471"),
    ("Seychelles", "#EA2839"),
    ("Mauritius", "#0055A4"),
    ("Réunion", "#98D8C8"),
    ("Mayotte", "#6AB2E7"),
    ("Djibouti", "#FFEAA7"),
    ("Eritrea", "#009A49"),
    ("Ethiopia", "#43A047"),
    ("Somalia", "#000000"),
    ("Kenya", "#FFCD00"),
    ("Uganda", "#1EB53A"),
    ("Tanzania", "#00A1DE"),
    ("Rwanda", "#DDA0DD"),
    ("Burundi", "#2C3E50"),
    ("South Sudan", "#E74C3C"),
    ("Sudan", "#8E44AD"),
    ("Egypt", "#34495E"),
    ("Libya", "#E67E22"),
    ("Tunisia", "#006233"),
    ("Algeria", "#C1272D"),
    ("Morocco", "#7F8C8D"),
    ("Western Sahara", "#003F87"),
    ("Cape Verde", "#3498DB"),
    ("Cabo Verde", "#3498DB"),
];

const FALLBACK_COLORS: &[&str] = &[
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA", "#F1948A", "#D7BDE2", "#AED6F1",
];

/// Neutral grey used for the all-country average line.
pub const AVERAGE_COLOR: Rgb = Rgb(0x66, 0x66, 0x66);

/// 32-bit FNV-1a. Stable across runs and platforms, unlike the std hasher.
fn fnv1a(s: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for b in s.bytes() {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

pub fn listed_country_color(name: &str) -> Option<Rgb> {
    COUNTRY_COLORS
        .iter()
        .find(|(country, _)| *country == name)
        .and_then(|(_, hex)| Rgb::from_hex(hex))
}

pub fn country_color(name: &str) -> Rgb {
    if let Some(color) = listed_country_color(name) {
        return color;
    }
    let idx = fnv1a(name) as usize % FALLBACK_COLORS.len();
    Rgb::from_hex(FALLBACK_COLORS[idx]).unwrap_or(AVERAGE_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_countries_use_flag_colors() {
        assert_eq!(country_color("Mali").to_hex(), "#ce1126");
        assert_eq!(country_color("Senegal").to_hex(), "#fcd116");
    }

    #[test]
    fn fallback_is_stable_and_order_independent() {
        let first = country_color("Atlantis");
        let _ = country_color("Lemuria");
        let _ = country_color("Mu");
        assert_eq!(country_color("Atlantis"), first);
        assert!(FALLBACK_COLORS
            .iter()
            .filter_map(|h| Rgb::from_hex(h))
            .any(|c| c == first));
    }

    #[test]
    fn every_table_entry_is_valid_hex() {
        for (_, hex) in COUNTRY_COLORS {
            assert!(Rgb::from_hex(hex).is_some(), "{hex}");
        }
        for hex in FALLBACK_COLORS {
            assert!(Rgb::from_hex(hex).is_some(), "{hex}");
        }
    }

    #[test]
    fn fnv_reference_values() {
        assert_eq!(fnv1a(""), 0x811c_9dc5);
        assert_eq!(fnv1a("a"), 0xe40c_292c);
    }
}

// Label classification: free-text zone labels to macro-zones, and client
// counts to colour buckets.
use crate::types::{Bucket, LegendEntry, MacroZone};

/// Map a zone label to its macro-zone. Case-insensitive; checks run in a
/// fixed order and the first hit wins, so "Centro Norte" is `CENTRO`.
/// Only an exact "LIMA" is Lima; "Lima Provincias" falls through.
pub fn classify_zone(label: &str) -> MacroZone {
    let zona = label.to_uppercase();
    if zona == "LIMA" {
        MacroZone::Lima
    } else if zona.contains("CENTRO") {
        MacroZone::Centro
    } else if zona.contains("NORTE") {
        MacroZone::Norte
    } else if zona.contains("SUR") {
        MacroZone::Sur
    } else if zona.contains("ORIENTE") {
        MacroZone::Oriente
    } else {
        MacroZone::Otro
    }
}

/// Ranges are closed on the right: 50 is `1-50`, 51 is `51-100`.
/// A count of 0 is placed in the lowest bucket rather than left unclassified.
pub fn bucket_for(client_count: u64) -> Bucket {
    match client_count {
        0..=50 => Bucket::UpTo50,
        51..=100 => Bucket::UpTo100,
        101..=200 => Bucket::UpTo200,
        201..=500 => Bucket::UpTo500,
        _ => Bucket::Over500,
    }
}

pub fn legend() -> Vec<LegendEntry> {
    Bucket::ALL
        .iter()
        .map(|b| LegendEntry {
            bucket: *b,
            color: b.color(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn classifies_known_labels() {
        assert_eq!(classify_zone("Lima"), MacroZone::Lima);
        assert_eq!(classify_zone("Centro Norte"), MacroZone::Centro);
        assert_eq!(classify_zone("Costa Sur"), MacroZone::Sur);
        assert_eq!(classify_zone("Selva"), MacroZone::Otro);
        assert_eq!(classify_zone("norte chico"), MacroZone::Norte);
        assert_eq!(classify_zone("ORIENTE AMAZONICO"), MacroZone::Oriente);
    }

    #[test]
    fn lima_requires_exact_match() {
        assert_eq!(classify_zone("LIMA PROVINCIAS"), MacroZone::Otro);
        assert_eq!(classify_zone("Lima Sur"), MacroZone::Sur);
    }

    #[test]
    fn centro_wins_over_later_checks() {
        assert_eq!(classify_zone("CENTRO SUR"), MacroZone::Centro);
        assert_eq!(classify_zone("NORTE ORIENTE"), MacroZone::Norte);
        assert_eq!(classify_zone("CENTRO ANDINO"), MacroZone::Centro);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(bucket_for(50).label(), "1-50 clientes");
        assert_eq!(bucket_for(51).label(), "51-100 clientes");
        assert_eq!(bucket_for(100).label(), "51-100 clientes");
        assert_eq!(bucket_for(200).label(), "101-200 clientes");
        assert_eq!(bucket_for(500).label(), "201-500 clientes");
        assert_eq!(bucket_for(501).label(), "501+ clientes");
    }

    #[test]
    fn zero_clients_land_in_lowest_bucket() {
        // Boundary policy: (0, 50] is widened to [0, 50].
        assert_eq!(bucket_for(0), Bucket::UpTo50);
        assert_eq!(bucket_for(0).label(), "1-50 clientes");
    }

    #[test]
    fn legend_colours_are_distinct_and_ordered() {
        let entries = legend();
        let labels: Vec<&str> = entries.iter().map(|e| e.bucket.label()).collect();
        assert_eq!(
            labels,
            vec![
                "1-50 clientes",
                "51-100 clientes",
                "101-200 clientes",
                "201-500 clientes",
                "501+ clientes"
            ]
        );
        let colours: HashSet<&str> = entries.iter().map(|e| e.color).collect();
        assert_eq!(colours.len(), 5);
        for entry in &entries {
            assert_eq!(entry.color, entry.bucket.color());
        }
    }
}

//! Places the court visited in 1205 and the days it takes to ride between them.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::UNKNOWN_ROUTE_DAYS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Castle,
    Palace,
    City,
    Monastery,
    Manor,
    Port,
}

impl LocationKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Castle => "Royal Castle",
            Self::Palace => "Royal Palace",
            Self::City => "City",
            Self::Monastery => "Monastery/Abbey",
            Self::Manor => "Royal Manor",
            Self::Port => "Port/Harbor",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: LocationKind,
    pub region: &'static str,
    pub description: &'static str,
}

const fn place(
    id: &'static str,
    name: &'static str,
    kind: LocationKind,
    region: &'static str,
    description: &'static str,
) -> Location {
    Location {
        id,
        name,
        kind,
        region,
        description,
    }
}

use LocationKind::{Castle, City, Manor, Monastery, Palace, Port};

pub const LOCATIONS: [Location; 27] = [
    // Royal heartland
    place(
        "westminster",
        "Westminster",
        Palace,
        "southern_england",
        "The seat of royal government and chancery, home to Westminster Palace and Abbey.",
    ),
    place(
        "winchester",
        "Winchester",
        Castle,
        "southern_england",
        "Ancient capital of England, royal treasury, and major stronghold.",
    ),
    place(
        "windsor",
        "Windsor",
        Castle,
        "southern_england",
        "Favored royal residence with extensive hunting grounds along the Thames.",
    ),
    place(
        "portsmouth",
        "Portsmouth",
        Port,
        "southern_england",
        "Major naval base and embarkation point for continental campaigns.",
    ),
    place(
        "portchester",
        "Portchester",
        Castle,
        "southern_england",
        "Coastal fortress near Portsmouth, ancient Roman fort converted to royal castle.",
    ),
    place(
        "guildford",
        "Guildford",
        Castle,
        "southern_england",
        "Royal castle and hunting lodge south of London.",
    ),
    place(
        "marlborough",
        "Marlborough",
        Castle,
        "southern_england",
        "Important royal castle in Wiltshire, center of Savernake Forest.",
    ),
    place(
        "clarendon",
        "Clarendon",
        Palace,
        "southern_england",
        "Royal hunting lodge and palace near Salisbury, a favorite residence.",
    ),
    place(
        "woodstock",
        "Woodstock",
        Palace,
        "southern_england",
        "Ancestral royal palace in Oxfordshire with extensive deer parks.",
    ),
    place(
        "oxford",
        "Oxford",
        City,
        "southern_england",
        "Important town with royal castle, growing center of learning.",
    ),
    place(
        "reading",
        "Reading",
        Monastery,
        "southern_england",
        "Major Benedictine abbey on the Thames, royal burials.",
    ),
    place(
        "canterbury",
        "Canterbury",
        City,
        "southern_england",
        "Seat of the Archbishop, England's premier religious center.",
    ),
    place(
        "dover",
        "Dover",
        Castle,
        "southern_england",
        "Key fortress guarding the shortest crossing to France.",
    ),
    // The north
    place(
        "york",
        "York",
        City,
        "northern_england",
        "Major northern city, seat of archbishop, strategic stronghold.",
    ),
    place(
        "nottingham",
        "Nottingham",
        Castle,
        "northern_england",
        "Powerful Midlands fortress, gateway to the north.",
    ),
    place(
        "northampton",
        "Northampton",
        Castle,
        "northern_england",
        "Important Midlands stronghold and administrative center.",
    ),
    place(
        "lincoln",
        "Lincoln",
        City,
        "northern_england",
        "Major cathedral city and commercial center.",
    ),
    // Marches
    place(
        "gloucester",
        "Gloucester",
        City,
        "welsh_marches",
        "Gateway to Wales, important administrative and military center.",
    ),
    place(
        "bristol",
        "Bristol",
        Port,
        "welsh_marches",
        "Major western port city, center of trade with Ireland and Wales.",
    ),
    place(
        "shrewsbury",
        "Shrewsbury",
        Castle,
        "welsh_marches",
        "Key fortress controlling the Welsh borderlands.",
    ),
    place(
        "ludlow",
        "Ludlow",
        Castle,
        "welsh_marches",
        "Marcher stronghold in Shropshire.",
    ),
    // Lesser stops
    place(
        "abingdon",
        "Abingdon",
        Monastery,
        "southern_england",
        "Abbey town on the Thames between Oxford and Reading.",
    ),
    place(
        "silverstone",
        "Silverstone",
        Manor,
        "northern_england",
        "Royal manor in Northamptonshire.",
    ),
    place(
        "burbage",
        "Burbage",
        Manor,
        "southern_england",
        "Royal manor in Savernake Forest near Marlborough.",
    ),
    place(
        "hinton",
        "Hinton",
        Monastery,
        "southern_england",
        "Carthusian priory in Somerset.",
    ),
    place(
        "lambeth",
        "Lambeth",
        Palace,
        "southern_england",
        "Archbishop's palace across the Thames from Westminster.",
    ),
    place(
        "ludgershall",
        "Ludgershall",
        Castle,
        "southern_england",
        "Royal castle and hunting lodge in Wiltshire.",
    ),
];

/// Known routes in days; each pair is valid in both directions.
pub const ROUTES: [(&str, &str, u32); 27] = [
    ("westminster", "windsor", 1),
    ("westminster", "guildford", 1),
    ("westminster", "canterbury", 2),
    ("westminster", "dover", 2),
    ("westminster", "oxford", 2),
    ("westminster", "reading", 1),
    ("windsor", "oxford", 1),
    ("windsor", "woodstock", 1),
    ("oxford", "woodstock", 1),
    ("winchester", "westminster", 2),
    ("winchester", "portsmouth", 1),
    ("winchester", "portchester", 1),
    ("winchester", "clarendon", 1),
    ("winchester", "marlborough", 1),
    ("portsmouth", "portchester", 0),
    ("marlborough", "clarendon", 1),
    ("marlborough", "oxford", 1),
    ("westminster", "northampton", 2),
    ("oxford", "northampton", 1),
    ("northampton", "nottingham", 2),
    ("nottingham", "york", 2),
    ("westminster", "york", 5),
    ("oxford", "gloucester", 2),
    ("gloucester", "bristol", 1),
    ("gloucester", "shrewsbury", 2),
    ("bristol", "winchester", 3),
    ("canterbury", "dover", 1),
];

#[must_use]
pub fn location(id: &str) -> Option<&'static Location> {
    LOCATIONS.iter().find(|loc| loc.id == id)
}

/// Days between two places: 0 for the same place, the route table in either
/// direction, otherwise an estimate.
#[must_use]
pub fn travel_time(from: &str, to: &str) -> u32 {
    if from == to {
        return 0;
    }
    ROUTES
        .iter()
        .find(|(a, b, _)| (*a == from && *b == to) || (*a == to && *b == from))
        .map_or(UNKNOWN_ROUTE_DAYS, |(_, _, days)| *days)
}

/// Display name, or the id title-cased when the place is not in the gazetteer.
#[must_use]
pub fn format_location_name(id: &str) -> String {
    if let Some(loc) = location(id) {
        return loc.name.to_string();
    }
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Location ids in `region`, in gazetteer order.
#[must_use]
pub fn locations_in_region(region: &str) -> Vec<&'static str> {
    LOCATIONS
        .iter()
        .filter(|loc| loc.region == region)
        .map(|loc| loc.id)
        .collect()
}

/// Built-in travel atlas backed by the tables above.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gazetteer;

impl crate::TravelAtlas for Gazetteer {
    fn travel_time(&self, from: &str, to: &str) -> u32 {
        travel_time(from, to)
    }

    fn display_name(&self, location: &str) -> String {
        format_location_name(location)
    }

    fn is_known(&self, location: &str) -> bool {
        self::location(location).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_symmetric() {
        for (from, to, days) in ROUTES {
            assert_eq!(travel_time(from, to), days);
            assert_eq!(travel_time(to, from), days);
        }
        assert_eq!(travel_time("westminster", "york"), 5);
    }

    #[test]
    fn same_place_and_unknown_routes() {
        assert_eq!(travel_time("york", "york"), 0);
        assert_eq!(travel_time("york", "dover"), 3);
        assert_eq!(travel_time("portsmouth", "portchester"), 0);
    }

    #[test]
    fn every_route_endpoint_is_a_known_place() {
        for (from, to, _) in ROUTES {
            assert!(location(from).is_some(), "{from}");
            assert!(location(to).is_some(), "{to}");
        }
    }

    #[test]
    fn names_fall_back_to_title_case() {
        assert_eq!(format_location_name("westminster"), "Westminster");
        assert_eq!(format_location_name("la_rochelle"), "La Rochelle");
    }

    #[test]
    fn regions_list_their_locations() {
        let marches = locations_in_region("welsh_marches");
        assert_eq!(marches, vec!["gloucester", "bristol", "shrewsbury", "ludlow"]);
        assert_eq!(locations_in_region("southern_england").len(), 18);
        assert!(locations_in_region("scotland_border").is_empty());
        assert_eq!(location("reading").map(|l| l.kind.label()), Some("Monastery/Abbey"));
    }
}

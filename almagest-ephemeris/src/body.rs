//! The closed set of bodies the engine computes.

use std::fmt;

/// A solar-system body, with the conventional stable integer id.
///
/// The ids match the external convention used by the file formats and the
/// binding layers: Sun 0 through Pluto 9, the lunar nodes 10/11, Earth 13.
/// Id 12 is intentionally unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    MeanNode,
    TrueNode,
    Earth,
}

impl Body {
    /// All bodies in id order.
    pub const ALL: [Body; 13] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::MeanNode,
        Body::TrueNode,
        Body::Earth,
    ];

    /// The stable integer id.
    pub const fn id(self) -> i32 {
        match self {
            Body::Sun => 0,
            Body::Moon => 1,
            Body::Mercury => 2,
            Body::Venus => 3,
            Body::Mars => 4,
            Body::Jupiter => 5,
            Body::Saturn => 6,
            Body::Uranus => 7,
            Body::Neptune => 8,
            Body::Pluto => 9,
            Body::MeanNode => 10,
            Body::TrueNode => 11,
            Body::Earth => 13,
        }
    }

    /// Look a body up by id; `None` for unassigned ids.
    pub fn from_id(id: i32) -> Option<Body> {
        Body::ALL.iter().copied().find(|b| b.id() == id)
    }

    /// The human-readable name, in the casing the external convention uses.
    pub const fn display_name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::MeanNode => "mean Node",
            Body::TrueNode => "true Node",
            Body::Earth => "Earth",
        }
    }

    /// Sun through Saturn.
    pub const fn classical() -> [Body; 7] {
        [
            Body::Sun,
            Body::Moon,
            Body::Mercury,
            Body::Venus,
            Body::Mars,
            Body::Jupiter,
            Body::Saturn,
        ]
    }

    /// Uranus, Neptune, Pluto.
    pub const fn modern() -> [Body; 3] {
        [Body::Uranus, Body::Neptune, Body::Pluto]
    }

    /// The lunar nodes.
    pub const fn nodes() -> [Body; 2] {
        [Body::MeanNode, Body::TrueNode]
    }

    pub const fn is_node(self) -> bool {
        matches!(self, Body::MeanNode | Body::TrueNode)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_the_external_convention() {
        assert_eq!(Body::Sun.id(), 0);
        assert_eq!(Body::Moon.id(), 1);
        assert_eq!(Body::Pluto.id(), 9);
        assert_eq!(Body::MeanNode.id(), 10);
        assert_eq!(Body::TrueNode.id(), 11);
        assert_eq!(Body::Earth.id(), 13);
    }

    #[test]
    fn from_id_round_trips() {
        for body in Body::ALL {
            assert_eq!(Body::from_id(body.id()), Some(body));
        }
        assert_eq!(Body::from_id(-1), None);
        assert_eq!(Body::from_id(12), None);
        assert_eq!(Body::from_id(999), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(Body::MeanNode.to_string(), "mean Node");
        assert_eq!(Body::TrueNode.to_string(), "true Node");
        assert_eq!(Body::Sun.to_string(), "Sun");
    }

    #[test]
    fn groupings() {
        assert_eq!(Body::classical().len(), 7);
        assert_eq!(Body::classical()[6], Body::Saturn);
        assert_eq!(Body::modern(), [Body::Uranus, Body::Neptune, Body::Pluto]);
        assert!(Body::MeanNode.is_node());
        assert!(!Body::Earth.is_node());
        assert!(!Body::classical().contains(&Body::Earth));
    }

    #[test]
    fn all_has_thirteen_entries() {
        assert_eq!(Body::ALL.len(), 13);
    }
}

//! Emergency-dial directory
//!
//! A static hotline list; the client renders it and shells out to the
//! platform dialer via the `tel:` URI. Read-only, no lifecycle beyond
//! lookup.

/// One emergency hotline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyContact {
    pub id: u32,
    pub name: &'static str,
    pub icon: &'static str,
    pub number: &'static str,
    pub description: &'static str,
}

impl EmergencyContact {
    /// URI handed to the platform dialer
    pub fn dial_uri(&self) -> String {
        format!("tel:{}", self.number)
    }
}

/// The hotline directory
pub const HOTLINES: [EmergencyContact; 6] = [
    EmergencyContact {
        id: 1,
        name: "Police",
        icon: "🛡️",
        number: "100",
        description: "Crime, security threats",
    },
    EmergencyContact {
        id: 2,
        name: "Fire",
        icon: "🔥",
        number: "101",
        description: "Fire incidents, rescue",
    },
    EmergencyContact {
        id: 3,
        name: "Ambulance",
        icon: "🏥",
        number: "102",
        description: "Medical emergencies",
    },
    EmergencyContact {
        id: 4,
        name: "Disaster",
        icon: "⚠️",
        number: "911",
        description: "Natural disasters, floods",
    },
    EmergencyContact {
        id: 5,
        name: "Traffic",
        icon: "🚗",
        number: "136",
        description: "Accidents, road incidents",
    },
    EmergencyContact {
        id: 6,
        name: "Rescue",
        icon: "💓",
        number: "143",
        description: "Search and rescue",
    },
];

/// The full directory in display order
pub fn directory() -> &'static [EmergencyContact] {
    &HOTLINES
}

/// Look up a hotline by id
pub fn by_id(id: u32) -> Option<&'static EmergencyContact> {
    HOTLINES.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_dial_uri() {
        let disaster = by_id(4).unwrap();
        assert_eq!(disaster.name, "Disaster");
        assert_eq!(disaster.dial_uri(), "tel:911");
        assert!(by_id(99).is_none());
    }
}

/// Elemental affinity picked at join time.
///
/// The element scales a player's acceleration and the damage of every projectile
/// they fire. Its color is only forwarded to clients for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Wind,
}

/// Gameplay modifiers and display identity for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementProfile {
    /// Multiplier applied to the base projectile damage.
    pub damage_modifier: f32,

    /// Multiplier applied to the base player acceleration.
    pub speed_modifier: f32,

    /// Projectile displacement in world units per tick.
    pub projectile_speed: f32,

    /// CSS color string used by clients.
    pub color: &'static str,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Water, Element::Earth, Element::Wind];

    pub fn profile(self) -> ElementProfile {
        match self {
            Element::Fire => ElementProfile {
                damage_modifier: 1.2,
                speed_modifier: 1.0,
                projectile_speed: 10.0,
                color: "#ff4500",
            },
            Element::Water => ElementProfile {
                damage_modifier: 1.0,
                speed_modifier: 1.1,
                projectile_speed: 10.0,
                color: "#00bfff",
            },
            Element::Earth => ElementProfile {
                damage_modifier: 1.1,
                speed_modifier: 0.9,
                projectile_speed: 10.0,
                color: "#8b4513",
            },
            Element::Wind => ElementProfile {
                damage_modifier: 0.8,
                speed_modifier: 1.2,
                projectile_speed: 10.0,
                color: "#e0ffff",
            },
        }
    }

    /// Name used on the wire for this element.
    pub fn wire_name(self) -> &'static str {
        match self {
            Element::Fire => "FEU",
            Element::Water => "EAU",
            Element::Earth => "TERRE",
            Element::Wind => "VENT",
        }
    }

    /// Parses a wire name, accepting the English spelling too. Case-insensitive.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "FEU" | "FIRE" => Some(Element::Fire),
            "EAU" | "WATER" => Some(Element::Water),
            "TERRE" | "EARTH" => Some(Element::Earth),
            "VENT" | "WIND" => Some(Element::Wind),
            _ => None,
        }
    }
}

/// Enemy archetype catalog.
///
/// A fixed table: symbol, base stats, XP reward, behaviour and the player
/// level at which the archetype starts appearing. Enemies carry their
/// `Archetype` id, so XP lookup never goes through the display glyph.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Behavior {
    /// Drifts along a heading, bouncing off walls.
    Wander,
    /// Steers toward the player, holding a standoff distance.
    Chase,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Archetype {
    Fox,
    Wolf,
    Ogre,
    Dragon,
    Demon,
    Skull,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ArchetypeStats {
    pub symbol: &'static str,
    pub health: i32,
    pub damage: i32,
    pub xp: u32,
    pub behavior: Behavior,
    pub min_level: u32,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Fox,
        Archetype::Wolf,
        Archetype::Ogre,
        Archetype::Dragon,
        Archetype::Demon,
        Archetype::Skull,
    ];

    /// The highest tier; the only one that can spawn as a boss.
    pub const BOSS: Archetype = Archetype::Skull;

    pub fn stats(self) -> ArchetypeStats {
        use Behavior::*;
        let (symbol, health, damage, xp, behavior, min_level) = match self {
            Archetype::Fox    => ("🦊",  50, 15,  10, Wander, 1),
            Archetype::Wolf   => ("🐺",  75, 25,  20, Chase,  3),
            Archetype::Ogre   => ("👹", 100, 30,  25, Chase,  1),
            Archetype::Dragon => ("🐉", 200, 40,  50, Chase,  5),
            Archetype::Demon  => ("👿", 300, 50,  75, Chase,  7),
            Archetype::Skull  => ("💀", 500, 75, 150, Chase,  9),
        };
        ArchetypeStats { symbol, health, damage, xp, behavior, min_level }
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Fox => "Fox",
            Archetype::Wolf => "Wolf",
            Archetype::Ogre => "Ogre",
            Archetype::Dragon => "Dragon",
            Archetype::Demon => "Demon",
            Archetype::Skull => "Skull",
        }
    }

    /// Reverse lookup from a display glyph. Only for external callers that
    /// have nothing but a symbol; the simulation itself never needs it.
    pub fn from_symbol(symbol: &str) -> Option<Archetype> {
        Archetype::ALL.into_iter().find(|a| a.stats().symbol == symbol)
    }

    /// Archetypes unlocked at `level`, in catalog order.
    pub fn available_at(level: u32) -> Vec<Archetype> {
        Archetype::ALL.into_iter().filter(|a| a.stats().min_level <= level).collect()
    }
}

/// Health of a boss variant.
pub fn boss_health(base: i32) -> i32 {
    base * 2
}

/// Damage of a boss variant: ×1.5, rounded down.
pub fn boss_damage(base: i32) -> i32 {
    base * 3 / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_unlocks_fox_and_ogre() {
        assert_eq!(Archetype::available_at(1), vec![Archetype::Fox, Archetype::Ogre]);
    }

    #[test]
    fn max_level_unlocks_everything() {
        assert_eq!(Archetype::available_at(10).len(), Archetype::ALL.len());
    }

    #[test]
    fn symbols_are_unique() {
        for a in Archetype::ALL {
            assert_eq!(Archetype::from_symbol(a.stats().symbol), Some(a));
        }
        assert_eq!(Archetype::from_symbol("🐸"), None);
    }

    #[test]
    fn boss_scaling() {
        let s = Archetype::BOSS.stats();
        assert_eq!(boss_health(s.health), 1000);
        assert_eq!(boss_damage(s.damage), 112);
    }
}

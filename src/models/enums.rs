use serde::{Deserialize, Serialize};

/// Macro to generate enum with a stable `as_str` label
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }
    };
}

str_enum!(Tier {
    High => "high",
    Medium => "medium",
    Low => "low",
});

impl Tier {
    /// Numeric weight: high=3, medium=2, low=1.
    pub fn weight(&self) -> usize {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Star annotation, one glyph per weight point.
    pub fn stars(&self) -> String {
        "★".repeat(self.weight())
    }
}

str_enum!(BackendKind {
    Local => "local",
    Remote => "remote",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_weights_descend() {
        assert_eq!(Tier::High.weight(), 3);
        assert_eq!(Tier::Medium.weight(), 2);
        assert_eq!(Tier::Low.weight(), 1);
    }

    #[test]
    fn tier_stars_match_weight() {
        assert_eq!(Tier::High.stars(), "★★★");
        assert_eq!(Tier::Medium.stars(), "★★");
        assert_eq!(Tier::Low.stars(), "★");
    }

    #[test]
    fn labels_are_lowercase() {
        assert_eq!(Tier::High.as_str(), "high");
        assert_eq!(Tier::Low.as_str(), "low");
        assert_eq!(BackendKind::Remote.as_str(), "remote");
    }
}

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreBand {
    pub const fn for_score(score_300_to_900: u16) -> Self {
        match score_300_to_900 {
            750.. => Self::Excellent,
            700..=749 => Self::Good,
            650..=699 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    pub const fn range_text(self) -> &'static str {
        match self {
            Self::Excellent => "750+",
            Self::Good => "700-749",
            Self::Fair => "650-699",
            Self::Poor => "<650",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScoreBand;

    #[test]
    fn band_edges_are_inclusive_at_the_lower_bound() {
        assert_eq!(ScoreBand::for_score(300), ScoreBand::Poor);
        assert_eq!(ScoreBand::for_score(649), ScoreBand::Poor);
        assert_eq!(ScoreBand::for_score(650), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(699), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(700), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(749), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(750), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_score(900), ScoreBand::Excellent);
    }

    #[test]
    fn bands_order_from_worst_to_best() {
        assert!(ScoreBand::Poor < ScoreBand::Fair);
        assert!(ScoreBand::Good < ScoreBand::Excellent);
        assert_eq!(ScoreBand::Fair.range_text(), "650-699");
    }
}

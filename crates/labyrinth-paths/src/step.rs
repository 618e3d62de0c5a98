use labyrinth_core::Point;

/// One snapshot of a running search, suitable for drawing a frame.
///
/// While the frontier is being expanded `path` is `None`. Once the search
/// has finished, every further step carries the path reconstructed so far,
/// ordered from the goal back toward the start.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStep {
    /// Every point expanded so far, in expansion order.
    pub trace: Vec<Point>,
    /// Partial path, goal first. `None` until reconstruction begins.
    pub path: Option<Vec<Point>>,
}

impl SearchStep {
    pub(crate) fn searching(trace: Vec<Point>) -> Self {
        Self { trace, path: None }
    }

    /// The path in walking order (start first), if reconstruction has begun.
    ///
    /// On the last step of a search this is the final answer; a single
    /// point means the goal could not be reached.
    pub fn route(&self) -> Option<Vec<Point>> {
        self.path
            .as_ref()
            .map(|p| p.iter().rev().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_reverses_accumulation_order() {
        let step = SearchStep {
            trace: vec![Point::new(0, 0)],
            path: Some(vec![Point::new(2, 0), Point::new(1, 0), Point::new(0, 0)]),
        };
        assert_eq!(
            step.route(),
            Some(vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)])
        );
        assert_eq!(SearchStep::searching(Vec::new()).route(), None);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn step_round_trip() {
        let step = SearchStep {
            trace: vec![Point::new(1, 1), Point::new(3, 1)],
            path: Some(vec![Point::new(3, 1)]),
        };
        let json = serde_json::to_string(&step).unwrap();
        let back: SearchStep = serde_json::from_str(&json).unwrap();
        assert_eq!(step, back);
    }
}

//! Container-visibility classification.

use std::fmt;

use showtest_winops::Rect;

/// Direction in which an element is clipped out of a viewable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipDirection {
    /// Element sits above the visible region.
    Above,
    /// Element sits below the visible region.
    Below,
    /// Element sits left of the visible region.
    Left,
    /// Element sits right of the visible region.
    Right,
}

impl ClipDirection {
    /// Whether this is a vertical clip.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Above | Self::Below)
    }
}

impl fmt::Display for ClipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Above => "above",
            Self::Below => "below",
            Self::Left => "left of",
            Self::Right => "right of",
        };
        write!(f, "{}", s)
    }
}

/// How an element relates to its scroll container's box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContainerVisibility {
    /// A usable slice is visible; carries the intersection rectangle. Click
    /// points must land inside this slice, not the full element box.
    Visible(Rect),
    /// No usable slice; the element lies in the given direction.
    Clipped(ClipDirection),
}

/// Classify `element` against `container`.
///
/// The intersection must span at least `eps` in both dimensions to count as
/// visible. Vertical clipping is checked before horizontal; the order is a
/// compatibility choice, not a load-bearing one.
pub fn classify(element: &Rect, container: &Rect, eps: f64) -> ContainerVisibility {
    let inter = element.intersect(container);
    if inter.spans_at_least(eps) {
        return ContainerVisibility::Visible(inter);
    }

    if inter.h < eps {
        if element.bottom() <= container.top() || element.top() < container.top() {
            ContainerVisibility::Clipped(ClipDirection::Above)
        } else {
            ContainerVisibility::Clipped(ClipDirection::Below)
        }
    } else if element.right() <= container.left() || element.left() < container.left() {
        ContainerVisibility::Clipped(ClipDirection::Left)
    } else {
        ContainerVisibility::Clipped(ClipDirection::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 4.0;

    fn sidebar() -> Rect {
        Rect::new(0.0, 100.0, 220.0, 500.0)
    }

    #[test]
    fn fully_inside_is_visible_with_full_intersection() {
        let elem = Rect::new(20.0, 300.0, 180.0, 32.0);
        match classify(&elem, &sidebar(), EPS) {
            ContainerVisibility::Visible(inter) => assert_eq!(inter, elem),
            other => panic!("expected visible, got {:?}", other),
        }
    }

    #[test]
    fn entirely_below_is_clipped_below() {
        // Element spans y 650..682, container ends at y 600.
        let elem = Rect::new(20.0, 650.0, 180.0, 32.0);
        assert_eq!(
            classify(&elem, &sidebar(), EPS),
            ContainerVisibility::Clipped(ClipDirection::Below)
        );
    }

    #[test]
    fn entirely_above_is_clipped_above() {
        let elem = Rect::new(20.0, 40.0, 180.0, 32.0);
        assert_eq!(
            classify(&elem, &sidebar(), EPS),
            ContainerVisibility::Clipped(ClipDirection::Above)
        );
    }

    #[test]
    fn horizontal_clip_when_vertical_overlap_exists() {
        let elem = Rect::new(260.0, 300.0, 80.0, 32.0);
        assert_eq!(
            classify(&elem, &sidebar(), EPS),
            ContainerVisibility::Clipped(ClipDirection::Right)
        );
        let elem = Rect::new(-120.0, 300.0, 80.0, 32.0);
        assert_eq!(
            classify(&elem, &sidebar(), EPS),
            ContainerVisibility::Clipped(ClipDirection::Left)
        );
    }

    #[test]
    fn vertical_wins_when_clipped_on_both_axes() {
        // Below and to the right; vertical is checked first.
        let elem = Rect::new(400.0, 700.0, 80.0, 32.0);
        assert_eq!(
            classify(&elem, &sidebar(), EPS),
            ContainerVisibility::Clipped(ClipDirection::Below)
        );
    }

    #[test]
    fn sliver_under_epsilon_is_clipped() {
        // Only 3 px of the element pokes into the container bottom.
        let elem = Rect::new(20.0, 597.0, 180.0, 32.0);
        assert_eq!(
            classify(&elem, &sidebar(), EPS),
            ContainerVisibility::Clipped(ClipDirection::Below)
        );
    }

    #[test]
    fn partial_clip_yields_intersection_not_full_box() {
        // Element straddles the container bottom with 20 px visible.
        let elem = Rect::new(20.0, 580.0, 180.0, 32.0);
        match classify(&elem, &sidebar(), EPS) {
            ContainerVisibility::Visible(inter) => {
                assert_eq!(inter, Rect::new(20.0, 580.0, 180.0, 20.0));
                // Midpoint of the slice, not of the element.
                assert_eq!(inter.center().y, 590.0);
            }
            other => panic!("expected visible slice, got {:?}", other),
        }
    }
}
